// src/io/pdb.rs
// ATOM/HETATM records plus the CRYST1 cell. Only the first MODEL is read.

use super::{element_from_label, parse_f64};
use crate::error::InputError;
use crate::model::{Cell, Structure};
use crate::utils::linalg::lattice_from_parameters;
use std::path::Path;

pub fn parse_text(text: &str, path: &Path) -> Result<Structure, InputError> {
    let mut atoms = Vec::new();
    let mut cell = Cell::isolated();
    let mut title = String::new();

    for (n, line) in text.lines().enumerate() {
        let line_no = n + 1;
        let record = line.get(..6).unwrap_or(line).trim_end();
        match record {
            "ATOM" | "HETATM" => atoms.push(parse_atom(line, path, line_no)?),
            "CRYST1" => cell = parse_cryst1(line, path, line_no)?,
            "TITLE" | "COMPND" if title.is_empty() => {
                title = line.get(10..).unwrap_or("").trim().to_string();
            }
            "ENDMDL" | "END" => break,
            _ => {}
        }
    }

    let mut structure = Structure::from_atoms(cell, atoms);
    structure.title = title;
    Ok(structure)
}

fn column<'a>(line: &'a str, from: usize, to: usize) -> &'a str {
    let to = to.min(line.len());
    line.get(from..to).unwrap_or("").trim()
}

fn parse_atom(line: &str, path: &Path, line_no: usize) -> Result<(String, [f64; 3]), InputError> {
    let x = parse_f64(column(line, 30, 38), path, line_no, "x")?;
    let y = parse_f64(column(line, 38, 46), path, line_no, "y")?;
    let z = parse_f64(column(line, 46, 54), path, line_no, "z")?;

    // Element columns 77-78, else the atom name (" CA " is calcium only when
    // left-justified, so fall back to its letters).
    let element = match column(line, 76, 78) {
        "" => element_from_label(column(line, 12, 16).trim_start_matches(|c: char| c.is_ascii_digit())),
        el => element_from_label(el),
    };
    Ok((element, [x, y, z]))
}

fn parse_cryst1(line: &str, path: &Path, line_no: usize) -> Result<Cell, InputError> {
    let a = parse_f64(column(line, 6, 15), path, line_no, "a")?;
    let b = parse_f64(column(line, 15, 24), path, line_no, "b")?;
    let c = parse_f64(column(line, 24, 33), path, line_no, "c")?;
    let alpha = parse_f64(column(line, 33, 40), path, line_no, "alpha")?;
    let beta = parse_f64(column(line, 40, 47), path, line_no, "beta")?;
    let gamma = parse_f64(column(line, 47, 54), path, line_no, "gamma")?;

    // A 1 x 1 x 1 box is the conventional "no cell" placeholder.
    if (a - 1.0).abs() < 1e-6 && (b - 1.0).abs() < 1e-6 && (c - 1.0).abs() < 1e-6 {
        return Ok(Cell::isolated());
    }
    Ok(Cell::periodic(lattice_from_parameters(a, b, c, alpha, beta, gamma)))
}
