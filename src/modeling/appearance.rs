// src/modeling/appearance.rs
// Per-element appearance lookup. The appearances themselves live in the
// host document; this wrapper only derives the key, decides hit or miss and
// counts both.

use super::engine::{AppearanceId, ModelingEngine};
use crate::error::EngineError;
use crate::presets::Rgb;
use log::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
pub struct AppearanceCache {
    hits: u64,
    misses: u64,
}

impl AppearanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document-wide appearance name for an element: "O" -> "O_color".
    pub fn make_key(element: &str) -> String {
        format!("{}_color", element)
    }

    /// Returns the document appearance for `element`, copying it from the
    /// baseline with `color` on first use.
    ///
    /// An existing entry wins even if it was created with a different color;
    /// entries are never updated.
    pub fn get_or_create<E: ModelingEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        element: &str,
        color: Rgb,
    ) -> Result<AppearanceId, EngineError> {
        let key = Self::make_key(element);

        if let Some(id) = engine.find_appearance(&key) {
            self.hits += 1;
            return Ok(id);
        }

        self.misses += 1;
        let id = engine.copy_appearance(&key, color)?;
        debug!("Created appearance '{}' ({})", key, color);
        Ok(id)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
        }
    }

    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modeling::document::Document;

    #[test]
    fn test_key_format() {
        assert_eq!(AppearanceCache::make_key("Fe"), "Fe_color");
    }

    #[test]
    fn test_second_lookup_is_hit() {
        let mut doc = Document::new();
        let mut cache = AppearanceCache::new();
        let a = cache.get_or_create(&mut doc, "O", Rgb(255, 13, 13)).unwrap();
        let b = cache.get_or_create(&mut doc, "O", Rgb(255, 13, 13)).unwrap();
        assert_eq!(a, b);
        assert_eq!(doc.appearances.len(), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert!((cache.stats().hit_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_existing_entry_keeps_its_color() {
        let mut doc = Document::new();
        let mut cache = AppearanceCache::new();
        let a = cache.get_or_create(&mut doc, "C", Rgb(144, 144, 144)).unwrap();
        let b = cache.get_or_create(&mut doc, "C", Rgb(0, 0, 0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(doc.appearance(a).unwrap().albedo, Rgb(144, 144, 144));
    }

    #[test]
    fn test_cache_is_shared_through_the_document() {
        let mut doc = Document::new();
        AppearanceCache::new()
            .get_or_create(&mut doc, "N", Rgb(48, 80, 248))
            .unwrap();
        // A fresh wrapper still finds the entry created by an earlier build.
        let mut cache = AppearanceCache::new();
        cache.get_or_create(&mut doc, "N", Rgb(48, 80, 248)).unwrap();
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(doc.appearances.len(), 1);
    }
}
