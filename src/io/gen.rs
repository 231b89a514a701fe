// src/io/gen.rs
// DFTB+ gen format. Type C is a cluster, S a supercell in Cartesian
// coordinates, F a supercell in fractional coordinates.

use super::{element_from_label, parse_f64};
use crate::error::InputError;
use crate::model::{Cell, Structure};
use crate::utils::linalg::frac_to_cart;
use std::path::Path;

pub fn parse_text(text: &str, path: &Path) -> Result<Structure, InputError> {
    // Comments run from '#' to end of line.
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(n, l)| (n + 1, l.split('#').next().unwrap_or("").trim()))
        .filter(|(_, l)| !l.is_empty());

    // 1. Header: atom count and geometry type
    let (line_no, header) = lines.next().ok_or_else(|| InputError::parse(path, 1, "empty gen file"))?;
    let mut head = header.split_whitespace();
    let n_atoms: usize = head
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| InputError::parse(path, line_no, "invalid atom count"))?;
    let kind = head
        .next()
        .map(str::to_ascii_uppercase)
        .ok_or_else(|| InputError::parse(path, line_no, "missing geometry type"))?;
    if !matches!(kind.as_str(), "C" | "S" | "F") {
        return Err(InputError::parse(path, line_no, format!("unknown geometry type '{}'", kind)));
    }

    // 2. Species names, referenced 1-based by the atom lines
    let (_, species_line) = lines.next().ok_or_else(|| InputError::parse(path, line_no + 1, "missing species line"))?;
    let species: Vec<String> = species_line.split_whitespace().map(element_from_label).collect();

    // 3. Atoms: index species x y z
    let mut raw = Vec::with_capacity(n_atoms);
    for _ in 0..n_atoms {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| InputError::parse(path, 0, format!("expected {} atoms, found {}", n_atoms, raw.len())))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 5 {
            return Err(InputError::parse(path, line_no, "expected 'index species x y z'"));
        }
        let element = parts[1]
            .parse::<usize>()
            .ok()
            .and_then(|t| t.checked_sub(1))
            .and_then(|t| species.get(t))
            .ok_or_else(|| InputError::parse(path, line_no, format!("invalid species index '{}'", parts[1])))?;
        let x = parse_f64(parts[2], path, line_no, "x")?;
        let y = parse_f64(parts[3], path, line_no, "y")?;
        let z = parse_f64(parts[4], path, line_no, "z")?;
        raw.push((element.clone(), [x, y, z]));
    }

    if kind == "C" {
        return Ok(Structure::from_atoms(Cell::isolated(), raw));
    }

    // 4. Origin, then three lattice vectors
    let mut rows = [[0.0; 3]; 4];
    for row in rows.iter_mut() {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| InputError::parse(path, 0, "missing origin or lattice vectors"))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(InputError::parse(path, line_no, "expected three numbers"));
        }
        for k in 0..3 {
            row[k] = parse_f64(parts[k], path, line_no, "vector component")?;
        }
    }
    let lattice = [rows[1], rows[2], rows[3]];

    let atoms = raw.into_iter().map(|(el, p)| {
        let p = if kind == "F" { frac_to_cart(p, lattice) } else { p };
        (el, p)
    });
    Ok(Structure::from_atoms(Cell::periodic(lattice), atoms))
}
