// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Problems reading a structure file, raised before the document is touched.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no structure file selected")]
    NoFile,

    #[error("unsupported structure format '{extension}' ({path})")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("'{path}' contains no atoms")]
    Empty { path: PathBuf },
}

impl InputError {
    pub fn parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Preset and parameter problems. Fatal to the current build.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("resource directory '{0}' does not exist")]
    MissingResourceDir(PathBuf),

    #[error("no '{kind}' presets found in '{dir}'")]
    NoPresets { kind: String, dir: PathBuf },

    #[error("unknown {kind} preset '{name}'")]
    UnknownPreset { kind: String, name: String },

    #[error("element '{element}' is not in the periodic table")]
    UnknownElement { element: String },

    #[error("{path}:{line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid {kind} value '{value}' for {element} in preset '{preset}'")]
    InvalidValue {
        kind: String,
        preset: String,
        element: String,
        value: String,
    },

    #[error("invalid build parameter: {0}")]
    InvalidParameter(String),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Degenerate primitives. Bodies committed before the failure stay in the document.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("atom '{body}' has non-positive radius {radius}; its revolve axis would have zero length")]
    ZeroRadius { body: String, radius: f64 },

    #[error("bond '{body}' has coincident endpoints (length {length:.3e})")]
    CoincidentEndpoints { body: String, length: f64 },

    #[error("'{body}' has a non-finite coordinate")]
    NonFinite { body: String },

    #[error("neighbor index {index} out of range for '{body}'")]
    BadNeighbor { body: String, index: usize },
}

/// Failures reported by the modeling engine while realizing a description.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown component handle {0}")]
    UnknownComponent(usize),

    #[error("unknown body handle {0}")]
    UnknownBody(usize),

    #[error("unknown appearance handle {0}")]
    UnknownAppearance(usize),

    #[error("appearance '{0}' already exists")]
    DuplicateAppearance(String),

    #[error("{feature} rejected: {reason}")]
    Rejected { feature: &'static str, reason: String },
}

/// Everything that can end a build in the `Failed` state.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("molecule '{0}' was already built; configure a new build")]
    AlreadyBuilt(String),
}

/// Anything the command line reports before exiting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("cannot write '{path}': {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
