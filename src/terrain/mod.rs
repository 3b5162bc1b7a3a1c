//! Heightfield terrain: elevation grids, point queries, grid generators.

pub mod generate;
pub mod heightfield;

use std::sync::Arc;

pub use heightfield::{Bounds, Heightfield};

/// A heightfield registered with the simulator under a display name.
#[derive(Debug, Clone)]
pub struct Terrain {
    pub name: String,
    pub field: Arc<Heightfield>,
}

impl Terrain {
    pub fn new(name: impl Into<String>, field: Heightfield) -> Self {
        Self {
            name: name.into(),
            field: Arc::new(field),
        }
    }
}
