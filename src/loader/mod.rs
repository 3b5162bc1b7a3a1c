//! Asset loaders
//!
//! Text formats for terrain grids (`.dem`) and indexed face meshes (`.face`).
//! Parse errors carry the file path and line number; nothing here aborts the
//! process.

mod mesh_file;
mod terrain_file;

use std::path::Path;

pub use mesh_file::{parse_mesh, read_mesh_file};
pub use terrain_file::{parse_terrain, read_terrain_file};

use crate::error::{Error, Result};

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a single token, reporting `what` on failure.
fn parse_token<T: std::str::FromStr>(
    path: &Path,
    line: usize,
    token: Option<&str>,
    what: &str,
) -> Result<T> {
    let token = token.ok_or_else(|| Error::format(path, line, format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| Error::format(path, line, format!("invalid {what} `{token}`")))
}
