// src/io/xyz.rs
// Plain and extended XYZ. Only the first frame is read.

use super::{element_from_label, parse_f64};
use crate::error::InputError;
use crate::model::{Cell, Structure};
use std::path::Path;

pub fn parse_text(text: &str, path: &Path) -> Result<Structure, InputError> {
    let mut lines = text.lines().enumerate();

    // 1. Number of Atoms
    let (_, count_line) = lines.next().ok_or_else(|| InputError::parse(path, 1, "empty XYZ file"))?;
    let n_atoms: usize = count_line
        .trim()
        .parse()
        .map_err(|_| InputError::parse(path, 1, format!("invalid atom count '{}'", count_line.trim())))?;

    // 2. Comment line, may carry Lattice="..." and pbc="..."
    let comment = lines.next().map(|(_, l)| l).unwrap_or("");
    let cell = parse_comment_cell(comment, path)?;

    // 3. Atoms
    let mut atoms = Vec::with_capacity(n_atoms);
    for _ in 0..n_atoms {
        let (n, line) = lines
            .next()
            .ok_or_else(|| InputError::parse(path, atoms.len() + 3, format!("expected {} atoms, found {}", n_atoms, atoms.len())))?;
        let line_no = n + 1;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(InputError::parse(path, line_no, "expected 'symbol x y z'"));
        }
        let x = parse_f64(parts[1], path, line_no, "x")?;
        let y = parse_f64(parts[2], path, line_no, "y")?;
        let z = parse_f64(parts[3], path, line_no, "z")?;
        atoms.push((element_from_label(parts[0]), [x, y, z]));
    }

    let mut structure = Structure::from_atoms(cell, atoms);
    structure.title = comment.trim().to_string();
    Ok(structure)
}

/// Extended-XYZ cell. A `Lattice` without `pbc` is periodic on all axes.
fn parse_comment_cell(comment: &str, path: &Path) -> Result<Cell, InputError> {
    let lattice = match quoted_value(comment, "Lattice") {
        Some(lat_str) => {
            let parts: Vec<f64> = lat_str.split_whitespace().filter_map(|s| s.parse().ok()).collect();
            if parts.len() != 9 {
                return Err(InputError::parse(path, 2, "Lattice needs 9 numbers"));
            }
            [
                [parts[0], parts[1], parts[2]],
                [parts[3], parts[4], parts[5]],
                [parts[6], parts[7], parts[8]],
            ]
        }
        None => return Ok(Cell::isolated()),
    };

    let mut cell = Cell::periodic(lattice);
    if let Some(pbc_str) = quoted_value(comment, "pbc") {
        let flags: Vec<bool> = pbc_str
            .split_whitespace()
            .map(|f| matches!(f.to_ascii_uppercase().as_str(), "T" | "TRUE" | "1"))
            .collect();
        if flags.len() != 3 {
            return Err(InputError::parse(path, 2, "pbc needs 3 flags"));
        }
        cell.pbc = [flags[0], flags[1], flags[2]];
    }
    Ok(cell)
}

/// Value of `key="..."` in an extended-XYZ comment line (key case-insensitive).
fn quoted_value<'a>(comment: &'a str, key: &str) -> Option<&'a str> {
    let lower = comment.to_ascii_lowercase();
    let pattern = format!("{}=\"", key.to_ascii_lowercase());
    let mut from = 0;
    while let Some(rel) = lower[from..].find(&pattern) {
        let start = from + rel;
        // Must be a whole key, not the tail of another one.
        let whole = start == 0 || lower.as_bytes()[start - 1].is_ascii_whitespace();
        let value_start = start + pattern.len();
        if whole {
            let end = comment[value_start..].find('"')?;
            return Some(&comment[value_start..value_start + end]);
        }
        from = value_start;
    }
    None
}
