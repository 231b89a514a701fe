// src/io/gjf.rs
// Gaussian input: link0 and route lines, title, charge/multiplicity, then
// Cartesian atoms until a blank line. `Tv` entries are translation vectors.

use super::{element_from_label, parse_f64};
use crate::error::InputError;
use crate::model::{Cell, Structure};
use crate::utils::geometry;
use std::path::Path;

#[derive(PartialEq)]
enum Section {
    Route,
    Title,
    ChargeMultiplicity,
    Atoms,
}

pub fn parse_text(text: &str, path: &Path) -> Result<Structure, InputError> {
    let mut section = Section::Route;
    let mut seen_route = false;
    let mut title = String::new();
    let mut atoms = Vec::new();
    let mut vectors: Vec<[f64; 3]> = Vec::new();

    for (n, raw) in text.lines().enumerate() {
        let line_no = n + 1;
        let line = raw.split('!').next().unwrap_or("").trim();

        match section {
            Section::Route => {
                if line.starts_with('#') {
                    seen_route = true;
                } else if line.is_empty() && seen_route {
                    section = Section::Title;
                }
            }
            Section::Title => {
                if line.is_empty() {
                    section = Section::ChargeMultiplicity;
                } else {
                    if !title.is_empty() {
                        title.push(' ');
                    }
                    title.push_str(line);
                }
            }
            Section::ChargeMultiplicity => {
                if !line.is_empty() {
                    section = Section::Atoms;
                }
            }
            Section::Atoms => {
                if line.is_empty() {
                    break;
                }
                let (label, xyz) = parse_atom_line(line, path, line_no)?;
                if label.eq_ignore_ascii_case("tv") {
                    vectors.push(xyz);
                } else {
                    atoms.push((element_from_label(&label), xyz));
                }
            }
        }
    }

    if section != Section::Atoms {
        return Err(InputError::parse(path, text.lines().count(), "no molecule section found"));
    }

    let mut structure = Structure::from_atoms(cell_from_vectors(&vectors), atoms);
    structure.title = title;
    Ok(structure)
}

/// "C(Fragment=1) 0 1.0 2.0 3.0" -> ("C", [1, 2, 3]). The optional freeze
/// column is skipped by taking the last three fields.
fn parse_atom_line(line: &str, path: &Path, line_no: usize) -> Result<(String, [f64; 3]), InputError> {
    let parts: Vec<&str> = line.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty()).collect();
    if parts.len() < 4 {
        return Err(InputError::parse(path, line_no, "expected Cartesian 'symbol x y z' (Z-matrix input is not supported)"));
    }
    let label = parts[0].split(['(', '-']).next().unwrap_or(parts[0]).to_string();
    let k = parts.len() - 3;
    Ok((
        label,
        [
            parse_f64(parts[k], path, line_no, "x")?,
            parse_f64(parts[k + 1], path, line_no, "y")?,
            parse_f64(parts[k + 2], path, line_no, "z")?,
        ],
    ))
}

/// One to three translation vectors. Missing axes are filled with unit
/// vectors perpendicular to the given ones and are not periodic.
fn cell_from_vectors(vectors: &[[f64; 3]]) -> Cell {
    match vectors {
        [] => Cell::isolated(),
        [a] => {
            let (b, c) = geometry::perpendicular_basis(geometry::normalize(*a));
            Cell {
                lattice: [*a, b, c],
                pbc: [true, false, false],
            }
        }
        [a, b] => Cell {
            lattice: [*a, *b, geometry::normalize(geometry::cross(*a, *b))],
            pbc: [true, true, false],
        },
        [a, b, c, ..] => Cell::periodic([*a, *b, *c]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_molecule_block() {
        let text = "\
%chk=water.chk
# opt b3lyp/6-31g(d)

water
monomer

0 1
O          0.00000000    0.00000000    0.11730000
H(Fragment=1)  0.00000000    0.75720000   -0.46920000
H     0    0.00000000   -0.75720000   -0.46920000

";
        let st = parse_text(text, Path::new("water.gjf")).unwrap();
        assert_eq!(st.symbols(), vec!["O", "H", "H"]);
        assert_eq!(st.atoms[2].position, [0.0, -0.7572, -0.4692]);
        assert_eq!(st.title, "water monomer");
        assert!(!st.cell.is_periodic());
    }

    #[test]
    fn test_translation_vector() {
        let text = "# pbe\n\nchain\n\n0 1\nC 0 0 0\nC 1.4 0 0\nTv 2.8 0 0\n";
        let st = parse_text(text, Path::new("chain.gjf")).unwrap();
        assert_eq!(st.len(), 2);
        assert_eq!(st.cell.pbc, [true, false, false]);
        assert_eq!(st.cell.lattice[0], [2.8, 0.0, 0.0]);
    }

    #[test]
    fn test_zmatrix_rejected() {
        let text = "# hf\n\nz\n\n0 1\nO\nH 1 0.96\n";
        assert!(matches!(
            parse_text(text, Path::new("z.gjf")),
            Err(InputError::Parse { line: 6, .. })
        ));
    }
}
