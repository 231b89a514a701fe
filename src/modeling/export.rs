// src/modeling/export.rs

use super::document::Document;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

// --- JSON Export Entry Point ---
pub fn to_json(doc: &Document) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}

/// Writes the whole document (components, bodies, appearances) to `path`.
pub fn export_document(doc: &Document, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, doc)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modeling::engine::ModelingEngine;
    use crate::presets::Rgb;

    #[test]
    fn test_export_round_trips_through_file() {
        let mut doc = Document::new();
        doc.create_component("Water").unwrap();
        doc.copy_appearance("O_color", Rgb(255, 13, 13)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        export_document(&doc, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["components"][0]["name"], "Water");
        assert_eq!(value["appearances"][0]["name"], "O_color");
        assert_eq!(value["materials"][0]["name"], "PrismMaterial-022");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let doc = Document::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/model.json");
        assert!(export_document(&doc, &path).is_err());
        assert!(to_json(&doc).unwrap().contains("\"bodies\""));
    }
}
