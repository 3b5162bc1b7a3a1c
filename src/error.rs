//! Error types shared by the loaders, geometry and the simulator.

use std::path::PathBuf;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading assets or advancing the simulation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An asset file could not be opened or read.
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A terrain or mesh file is malformed.
    #[error("{path:?}:{line}: {message}")]
    FileFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// In-memory mesh data violates the mesh invariants.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// In-memory elevation grid violates the heightfield invariants.
    #[error("invalid terrain: {0}")]
    InvalidTerrain(String),

    /// A matrix inversion or normalization hit a singular input.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    /// A heightfield query landed outside the sampled grid.
    #[error("query ({x}, {y}) is outside the terrain domain")]
    OutOfBounds { x: f32, y: f32 },

    /// The tick length was zero, negative or not finite.
    #[error("invalid timestep {0}")]
    InvalidTimestep(f32),

    /// No terrain with the requested index or name is loaded.
    #[error("unknown terrain {0}")]
    UnknownTerrain(String),
}

impl Error {
    pub(crate) fn format(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::FileFormat {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Whether this error only affects the current tick.
    pub fn is_tick_local(&self) -> bool {
        matches!(
            self,
            Self::DegenerateGeometry(_) | Self::OutOfBounds { .. } | Self::InvalidTimestep(_)
        )
    }
}
