// src/modeling/mod.rs
// Solid-model side of the pipeline: primitive descriptions, the engine
// boundary, the in-memory document and the per-element appearance cache.

pub mod appearance;
pub mod builder;
pub mod document;
pub mod engine;
pub mod export;
pub mod primitives;

pub use appearance::AppearanceCache;
pub use document::Document;
pub use engine::{AppearanceId, BodyId, ComponentId, MaterialId, ModelingEngine};
