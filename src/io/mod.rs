// src/io/mod.rs
// Structure readers. Each yields an atom set plus cell; nothing here touches
// the modeling document.

pub mod cif;
pub mod gen;
pub mod gjf;
pub mod mol;
pub mod pdb;
pub mod xyz;

use crate::error::InputError;
use crate::model::elements::{normalize_symbol, ALL_ELEMENTS};
use crate::model::Structure;
use log::info;
use std::fs;
use std::path::Path;

pub fn load_structure(path: &Path) -> Result<Structure, InputError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let parse: fn(&str, &Path) -> Result<Structure, InputError> = match ext.as_str() {
        "xyz" => xyz::parse_text,
        "cif" => cif::parse_text,
        "gen" => gen::parse_text,
        "pdb" => pdb::parse_text,
        "mol" => mol::parse_text,
        "gjf" => gjf::parse_text,
        _ => {
            return Err(InputError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: ext,
            })
        }
    };
    let structure = parse(&read_text(path)?, path)?;

    if structure.is_empty() {
        return Err(InputError::Empty {
            path: path.to_path_buf(),
        });
    }
    info!(
        "Loaded {} atoms ({}) from {:?}{}",
        structure.len(),
        structure.formula(),
        path,
        if structure.cell.is_periodic() { ", periodic" } else { "" }
    );
    Ok(structure)
}

fn read_text(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Symbol for a file label: atomic numbers ("8") become symbols, labels like
/// "C12" or "FE" are normalized, anything else is kept as written.
pub(crate) fn element_from_label(label: &str) -> String {
    if let Ok(z) = label.trim().parse::<usize>() {
        if (1..=ALL_ELEMENTS.len()).contains(&z) {
            return ALL_ELEMENTS[z - 1].to_string();
        }
    }
    normalize_symbol(label).unwrap_or_else(|| label.trim().to_string())
}

pub(crate) fn parse_f64(token: &str, path: &Path, line: usize, what: &str) -> Result<f64, InputError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::parse(path, line, format!("invalid {} '{}'", what, token)))
}
