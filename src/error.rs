//! Error types for the simulation core.
//!
//! Geometry problems are rejected when a molecule is built, numeric divergence is
//! reported by the integrator, and configuration problems are raised when a new
//! parameter set is applied (the previous configuration stays active).

use thiserror::Error;

/// Errors raised by the simulation core and its persistence layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A molecule could not be initialized from its atoms.
    #[error("invalid molecule geometry: {0}")]
    InvalidMoleculeGeometry(String),

    /// Integration produced a non-finite state for a molecule.
    #[error("numeric divergence in molecule {molecule_id}")]
    NumericDivergence {
        /// Id of the molecule that diverged.
        molecule_id: u64,
    },

    /// A configuration value was unknown, missing or out of bounds.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No level element carries the given id.
    #[error("unknown level element {0}")]
    UnknownElement(u64),

    /// No molecule carries the given id.
    #[error("unknown molecule {0}")]
    UnknownMolecule(u64),

    /// The level record was written by a newer schema.
    #[error("unsupported level version {0}")]
    UnsupportedVersion(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),
}

impl Error {
    /// Shorthand for a [`Error::Configuration`] error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
