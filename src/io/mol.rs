// src/io/mol.rs
// MDL molfile, V2000 connection table. Only the atom block is read; bonds
// are resolved from geometry like every other format.

use super::{element_from_label, parse_f64};
use crate::error::InputError;
use crate::model::{Cell, Structure};
use std::path::Path;

pub fn parse_text(text: &str, path: &Path) -> Result<Structure, InputError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 4 {
        return Err(InputError::parse(path, lines.len(), "missing header or counts line"));
    }

    // 1. Counts line (line 4): aaabbb ... V2000
    let counts = lines[3];
    if counts.contains("V3000") {
        return Err(InputError::parse(path, 4, "V3000 molfiles are not supported"));
    }
    let n_atoms: usize = counts
        .get(..3)
        .map(str::trim)
        .and_then(|s| s.parse().ok())
        .or_else(|| counts.split_whitespace().next().and_then(|s| s.parse().ok()))
        .ok_or_else(|| InputError::parse(path, 4, "invalid atom count"))?;

    // 2. Atom block: x y z symbol ...
    let mut atoms = Vec::with_capacity(n_atoms);
    for i in 0..n_atoms {
        let line_no = 5 + i;
        let line = lines
            .get(line_no - 1)
            .ok_or_else(|| InputError::parse(path, line_no, format!("expected {} atoms, found {}", n_atoms, i)))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(InputError::parse(path, line_no, "expected 'x y z symbol'"));
        }
        let x = parse_f64(parts[0], path, line_no, "x")?;
        let y = parse_f64(parts[1], path, line_no, "y")?;
        let z = parse_f64(parts[2], path, line_no, "z")?;
        atoms.push((element_from_label(parts[3]), [x, y, z]));
    }

    let mut structure = Structure::from_atoms(Cell::isolated(), atoms);
    structure.title = lines[0].trim().to_string();
    Ok(structure)
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHANE: &str = "\
methane
  handmade

  5  4  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.6291    0.6291    0.6291 H   0  0  0  0  0  0  0  0  0  0  0  0
   -0.6291   -0.6291    0.6291 H   0  0  0  0  0  0  0  0  0  0  0  0
   -0.6291    0.6291   -0.6291 H   0  0  0  0  0  0  0  0  0  0  0  0
    0.6291   -0.6291   -0.6291 H   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  1  3  1  0
  1  4  1  0
  1  5  1  0
M  END
";

    #[test]
    fn test_atom_block() {
        let st = parse_text(METHANE, Path::new("ch4.mol")).unwrap();
        assert_eq!(st.formula(), "CH4");
        assert_eq!(st.atoms[2].position, [-0.6291, -0.6291, 0.6291]);
        assert_eq!(st.title, "methane");
    }

    #[test]
    fn test_v3000_rejected() {
        let text = "x\n\n\n  0  0  0     0  0            999 V3000\n";
        assert!(matches!(
            parse_text(text, Path::new("x.mol")),
            Err(InputError::Parse { line: 4, .. })
        ));
    }
}
