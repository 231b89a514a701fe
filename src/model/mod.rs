//src/model/mod.rs
pub mod structure;
pub mod elements;
pub mod params;

// Re-exports for cleaner imports
pub use structure::{Atom, Cell, Structure};
pub use elements::{get_atom_cov, get_atomic_number, ALL_ELEMENTS};
pub use params::BuildParams;
