// src/io/cif.rs
// CIF reader: cell parameters, the atom-site loop and symmetry expansion.
// Only the first data block is read.

use super::element_from_label;
use crate::error::InputError;
use crate::model::{Cell, Structure};
use crate::utils::linalg::{frac_to_cart, lattice_from_parameters};
use std::path::Path;

/// Fractional tolerance for merging symmetry-equivalent sites.
const DUPLICATE_EPS: f64 = 1e-3;

struct Site {
    element: String,
    frac: [f64; 3],
}

pub fn parse_text(text: &str, path: &Path) -> Result<Structure, InputError> {
    let mut params: [Option<f64>; 6] = [None; 6];
    let mut symmetry_ops: Vec<String> = Vec::new();
    let mut sites: Vec<Site> = Vec::new();
    let mut title = String::new();
    let mut blocks = 0;

    let mut in_loop = false;
    let mut loop_has_rows = false;
    let mut headers: Vec<String> = Vec::new();

    for (n, raw) in text.lines().enumerate() {
        let line_no = n + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(name) = trimmed.strip_prefix("data_") {
            blocks += 1;
            if blocks > 1 {
                break;
            }
            title = name.to_string();
            in_loop = false;
            continue;
        }

        // 1. Loop detection
        if trimmed.starts_with("loop_") {
            in_loop = true;
            loop_has_rows = false;
            headers.clear();
            continue;
        }

        // 2. Tags: loop headers, or key/value items once the loop has data
        if trimmed.starts_with('_') {
            if in_loop && !loop_has_rows {
                headers.push(trimmed.to_ascii_lowercase());
                continue;
            }
            in_loop = false;
            let mut kv = trimmed.splitn(2, char::is_whitespace);
            let tag = kv.next().unwrap_or("").to_ascii_lowercase();
            let value = kv.next().unwrap_or("").trim();
            let slot = match tag.as_str() {
                "_cell_length_a" => Some(0),
                "_cell_length_b" => Some(1),
                "_cell_length_c" => Some(2),
                "_cell_angle_alpha" => Some(3),
                "_cell_angle_beta" => Some(4),
                "_cell_angle_gamma" => Some(5),
                _ => None,
            };
            if let Some(i) = slot {
                params[i] = Some(
                    parse_cif_float(value)
                        .ok_or_else(|| InputError::parse(path, line_no, format!("invalid value for {}", tag)))?,
                );
            }
            continue;
        }

        // 3. Loop rows
        if in_loop {
            loop_has_rows = true;
            if is_symmetry_loop(&headers) {
                if let Some(op) = symmetry_op_from_row(trimmed) {
                    symmetry_ops.push(op);
                }
            } else if let Some(site) = site_from_row(&headers, trimmed, path, line_no)? {
                sites.push(site);
            }
        }
    }

    let [a, b, c, alpha, beta, gamma] = params;
    let (a, b, c) = match (a, b, c) {
        (Some(a), Some(b), Some(c)) => (a, b, c),
        _ => return Err(InputError::parse(path, 0, "missing _cell_length_a/b/c")),
    };
    let lattice = lattice_from_parameters(
        a,
        b,
        c,
        alpha.unwrap_or(90.0),
        beta.unwrap_or(90.0),
        gamma.unwrap_or(90.0),
    );

    if symmetry_ops.is_empty() {
        symmetry_ops.push("x,y,z".to_string());
    }

    // 4. Expand symmetry, wrap to [0,1) and merge duplicates
    let mut expanded: Vec<Site> = Vec::new();
    for site in &sites {
        for op in &symmetry_ops {
            let p = apply_symmetry(site.frac, op);
            let wrapped = [p[0].rem_euclid(1.0), p[1].rem_euclid(1.0), p[2].rem_euclid(1.0)];
            let duplicate = expanded.iter().any(|e| {
                (0..3).all(|k| {
                    let d = (e.frac[k] - wrapped[k]).abs();
                    d < DUPLICATE_EPS || (1.0 - d) < DUPLICATE_EPS
                })
            });
            if !duplicate {
                expanded.push(Site {
                    element: site.element.clone(),
                    frac: wrapped,
                });
            }
        }
    }

    let atoms = expanded
        .into_iter()
        .map(|s| (s.element, frac_to_cart(s.frac, lattice)));
    let mut structure = Structure::from_atoms(Cell::periodic(lattice), atoms);
    structure.title = title;
    Ok(structure)
}

fn is_symmetry_loop(headers: &[String]) -> bool {
    headers
        .iter()
        .any(|h| h.contains("_symmetry_equiv_pos_as_xyz") || h.contains("_space_group_symop_operation_xyz"))
}

/// "1 'x, y+1/2, -z'" -> "x,y+1/2,-z"
fn symmetry_op_from_row(row: &str) -> Option<String> {
    let clean = row.replace(['\'', '"'], "");
    let start = clean.find(|c: char| matches!(c, 'x' | 'y' | 'z' | 'X' | 'Y' | 'Z' | '-' | '+'))?;
    // A leading sign can belong to the operation, not to the index column.
    let head = &clean[..start];
    let op = if head.trim().is_empty() || head.ends_with(char::is_whitespace) {
        &clean[start..]
    } else {
        return None;
    };
    let op: String = op.chars().filter(|c| !c.is_whitespace()).collect();
    if op.split(',').count() == 3 {
        Some(op)
    } else {
        None
    }
}

fn site_from_row(headers: &[String], row: &str, path: &Path, line_no: usize) -> Result<Option<Site>, InputError> {
    let col = |name: &str| headers.iter().position(|h| h == name);
    let (fx, fy, fz) = match (
        col("_atom_site_fract_x"),
        col("_atom_site_fract_y"),
        col("_atom_site_fract_z"),
    ) {
        (Some(x), Some(y), Some(z)) => (x, y, z),
        _ => return Ok(None),
    };
    let label_col = col("_atom_site_type_symbol").or_else(|| col("_atom_site_label"));

    let parts: Vec<&str> = row.split_whitespace().collect();
    if parts.len() < headers.len() {
        return Err(InputError::parse(path, line_no, "atom site row has too few columns"));
    }
    let coord = |i: usize| {
        parse_cif_float(parts[i])
            .ok_or_else(|| InputError::parse(path, line_no, format!("invalid coordinate '{}'", parts[i])))
    };
    let element = label_col.map(|i| element_from_label(parts[i])).unwrap_or_else(|| "X".to_string());

    Ok(Some(Site {
        element,
        frac: [coord(fx)?, coord(fy)?, coord(fz)?],
    }))
}

fn apply_symmetry(p: [f64; 3], op: &str) -> [f64; 3] {
    let parts: Vec<&str> = op.split(',').collect();
    if parts.len() != 3 {
        return p;
    }
    [
        evaluate_expr(parts[0], p),
        evaluate_expr(parts[1], p),
        evaluate_expr(parts[2], p),
    ]
}

/// Sum of signed terms such as "-x+1/2".
fn evaluate_expr(expr: &str, p: [f64; 3]) -> f64 {
    let s = expr.replace(' ', "").to_lowercase();
    let mut val = 0.0;
    let mut current_term = String::new();

    for c in s.chars() {
        if (c == '+' || c == '-') && !current_term.is_empty() {
            val += evaluate_term(&current_term, p);
            current_term.clear();
        }
        current_term.push(c);
    }
    if !current_term.is_empty() {
        val += evaluate_term(&current_term, p);
    }
    val
}

fn evaluate_term(term: &str, p: [f64; 3]) -> f64 {
    let (sign, t) = match term.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, term.strip_prefix('+').unwrap_or(term)),
    };

    if t.contains('x') {
        return sign * p[0];
    } else if t.contains('y') {
        return sign * p[1];
    } else if t.contains('z') {
        return sign * p[2];
    }

    match t.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().unwrap_or(0.0);
            let den: f64 = den.parse().unwrap_or(1.0);
            sign * num / den
        }
        None => sign * t.parse::<f64>().unwrap_or(0.0),
    }
}

/// "5.431(2)" -> 5.431
fn parse_cif_float(s: &str) -> Option<f64> {
    let clean: String = s.trim().chars().take_while(|c| *c != '(').collect();
    clean.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NACL: &str = "\
data_NaCl
_cell_length_a 5.64
_cell_length_b 5.64
_cell_length_c 5.64
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 90
loop_
_symmetry_equiv_pos_as_xyz
'x, y, z'
'x, y+1/2, z+1/2'
'x+1/2, y, z+1/2'
'x+1/2, y+1/2, z'
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Na1 Na 0.0 0.0 0.0
Cl1 Cl 0.5 0.5 0.5
";

    #[test]
    fn test_fcc_expansion() {
        let st = parse_text(NACL, Path::new("nacl.cif")).unwrap();
        assert_eq!(st.len(), 8);
        assert_eq!(st.formula(), "Cl4Na4");
        assert!(st.cell.is_periodic());
        assert!((st.cell.lattice[0][0] - 5.64).abs() < 1e-9);
        assert_eq!(st.title, "NaCl");
    }

    #[test]
    fn test_uncertainty_suffix() {
        assert_eq!(parse_cif_float("5.431(2)"), Some(5.431));
        assert_eq!(parse_cif_float("?"), None);
    }

    #[test]
    fn test_evaluate_expr() {
        let p = [0.1, 0.2, 0.3];
        assert!((evaluate_expr("-x+1/2", p) - 0.4).abs() < 1e-12);
        assert!((evaluate_expr("y-z", p) + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry_row_with_index() {
        assert_eq!(symmetry_op_from_row("2 '-x, -y, z'"), Some("-x,-y,z".to_string()));
        assert_eq!(symmetry_op_from_row("'x, y, z'"), Some("x,y,z".to_string()));
    }

    #[test]
    fn test_missing_cell_is_error() {
        let text = "data_x\nloop_\n_atom_site_label\n_atom_site_fract_x\n_atom_site_fract_y\n_atom_site_fract_z\nC 0 0 0\n";
        assert!(matches!(
            parse_text(text, Path::new("x.cif")),
            Err(InputError::Parse { .. })
        ));
    }

    #[test]
    fn test_label_only_sites() {
        let text = "\
data_si
_cell_length_a 3
_cell_length_b 3
_cell_length_c 3
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Si1 0 0 0
Si2 0.25 0.25 0.25
";
        let st = parse_text(text, Path::new("si.cif")).unwrap();
        assert_eq!(st.symbols(), vec!["Si", "Si"]);
        assert!((st.atoms[1].position[0] - 0.75).abs() < 1e-9);
    }
}
