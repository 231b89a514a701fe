// src/utils/report.rs

use crate::model::structure::Structure;
use crate::modeling::document::Document;
use crate::molecule::BuildReport;
use crate::presets::{PresetKind, PresetLibrary};

const MAX_ROWS: usize = 20;

/// Printed when a structure file is loaded
pub fn structure_summary(structure: &Structure, filename: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("File: {}\n", filename));
    out.push_str(&format!("Formula: {}\n", structure.formula()));
    if structure.cell.is_periodic() {
        let flags: Vec<&str> = structure.cell.pbc.iter().map(|&p| if p { "T" } else { "F" }).collect();
        out.push_str(&format!("Periodic: {}\n", flags.join(" ")));
    }
    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!(
        "{:<8} {:<8} {:<10} {:<10} {:<10}\n",
        "Index", "Element", "X", "Y", "Z"
    ));
    out.push_str("--------------------------------------------------\n");

    for atom in structure.atoms.iter().take(MAX_ROWS) {
        out.push_str(&format!(
            "{:<8} {:<8} {:<10.4} {:<10.4} {:<10.4}\n",
            atom.index, atom.element, atom.position[0], atom.position[1], atom.position[2]
        ));
    }

    if structure.atoms.len() > MAX_ROWS {
        out.push_str(&format!("... and {} more atoms.\n", structure.atoms.len() - MAX_ROWS));
    }

    out
}

/// Printed after a build: counts, then the bodies of the new component.
pub fn build_summary(report: &BuildReport, doc: &Document) -> String {
    let mut out = String::new();
    out.push_str(&format!("Component: {}\n", report.name));
    out.push_str(&format!(
        "Atoms: {}   Half-bonds: {}   Neighbor records: {}\n",
        report.atom_bodies.len(),
        report.bond_bodies.len(),
        report.neighbor_records
    ));
    out.push_str(&format!(
        "Appearances: {} created, {} reused ({:.0}% hit rate)\n",
        report.appearances.misses,
        report.appearances.hits,
        report.appearances.hit_rate() * 100.0
    ));
    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!("{:<16} {:<8} {:<16}\n", "Body", "Kind", "Appearance"));
    out.push_str("--------------------------------------------------\n");

    let bodies = report
        .component
        .and_then(|c| doc.component(c))
        .map(|c| c.bodies.as_slice())
        .unwrap_or(&[]);
    for body in bodies.iter().take(MAX_ROWS).filter_map(|id| doc.body(*id)) {
        let kind = if body.feature.is_sweep() { "sweep" } else { "revolve" };
        let appearance = body
            .appearance
            .and_then(|a| doc.appearance(a))
            .map(|a| a.name.as_str())
            .unwrap_or("-");
        out.push_str(&format!("{:<16} {:<8} {:<16}\n", body.name, kind, appearance));
    }
    if bodies.len() > MAX_ROWS {
        out.push_str(&format!("... and {} more bodies.\n", bodies.len() - MAX_ROWS));
    }

    out
}

pub fn preset_listing(lib: &PresetLibrary) -> String {
    let mut out = String::new();
    for kind in [PresetKind::Radii, PresetKind::Colors] {
        out.push_str(&format!("{}:\n", kind));
        for name in lib.names(kind) {
            let default = lib.preset(kind, name).map(|p| p.default_value.as_str()).unwrap_or("");
            out.push_str(&format!("  {:<16} (default {})\n", name, default));
        }
    }
    out
}
