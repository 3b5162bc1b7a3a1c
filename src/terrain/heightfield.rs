//! Heightfield terrain
//!
//! A regular grid of elevations centered on the world origin. Sample
//! `(rows / 2, cols / 2)` sits at world `(0, 0)` and row 0 is the northern
//! (maximum y) edge:
//!
//! ```text
//!   x = scale * (col - cols / 2)
//!   y = scale * (rows / 2 - row)
//!   z = elevation[row][col]
//! ```
//!
//! Every cell is split along its UL-LR diagonal into an upper-right and a
//! lower-left triangle. Heights are interpolated linearly inside the triangle
//! containing the query point; normals are the flat normal of that triangle.

use glam::Vec3;

use crate::error::{Error, Result};
use crate::geometry::{Face, Mesh};

/// World-space horizontal extent of a heightfield, inclusive on all sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// A query point resolved to a grid cell and the triangle it falls in.
#[derive(Debug, Clone, Copy)]
struct CellPoint {
    row: usize,
    col: usize,
    /// Fraction of the way to the next column, in [0, 1].
    x_rem: f32,
    /// Fraction of the way to the next row (southwards), in [0, 1].
    y_rem: f32,
}

impl CellPoint {
    #[inline]
    fn in_lower_left(&self) -> bool {
        self.x_rem < self.y_rem
    }
}

/// Triangulated elevation grid.
#[derive(Debug, Clone)]
pub struct Heightfield {
    rows: usize,
    cols: usize,
    scale: f32,
    elevations: Vec<f32>,
    mesh: Mesh,
}

impl Heightfield {
    /// Build from a grid of rows (row 0 is the top of the map).
    pub fn new(grid: Vec<Vec<f32>>, scale: f32) -> Result<Self> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if let Some(row) = grid.iter().position(|r| r.len() != cols) {
            return Err(Error::InvalidTerrain(format!(
                "row {row} has {} samples, expected {cols}",
                grid[row].len()
            )));
        }
        Self::from_samples(rows, cols, grid.into_iter().flatten().collect(), scale)
    }

    /// Build from row-major samples.
    pub fn from_samples(rows: usize, cols: usize, elevations: Vec<f32>, scale: f32) -> Result<Self> {
        if rows < 2 || cols < 2 {
            return Err(Error::InvalidTerrain(format!(
                "grid must be at least 2x2, got {rows}x{cols}"
            )));
        }
        if elevations.len() != rows * cols {
            return Err(Error::InvalidTerrain(format!(
                "expected {} samples for a {rows}x{cols} grid, got {}",
                rows * cols,
                elevations.len()
            )));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidTerrain(format!(
                "horizontal scale must be positive, got {scale}"
            )));
        }
        if let Some(i) = elevations.iter().position(|e| !e.is_finite()) {
            return Err(Error::InvalidTerrain(format!(
                "sample ({}, {}) is not finite",
                i / cols,
                i % cols
            )));
        }

        let mesh = triangulate(rows, cols, scale, &elevations)?;
        Ok(Self {
            rows,
            cols,
            scale,
            elevations,
            mesh,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// World units per grid step.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Stored elevation of a sample.
    pub fn elevation(&self, row: usize, col: usize) -> f32 {
        self.elevations[row * self.cols + col]
    }

    /// The triangulated surface, two faces per cell.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// World position of a grid sample.
    pub fn sample_position(&self, row: usize, col: usize) -> Vec3 {
        sample_position(self.rows, self.cols, self.scale, row, col, self.elevation(row, col))
    }

    pub fn bounds(&self) -> Bounds {
        let (half_r, half_c) = ((self.rows / 2) as f32, (self.cols / 2) as f32);
        Bounds {
            min_x: -half_c * self.scale,
            max_x: ((self.cols - 1) as f32 - half_c) * self.scale,
            min_y: (half_r - (self.rows - 1) as f32) * self.scale,
            max_y: half_r * self.scale,
        }
    }

    /// Interpolated elevation at world `(x, y)`.
    ///
    /// Points outside [`bounds`](Self::bounds) are reported as
    /// [`Error::OutOfBounds`].
    pub fn height(&self, x: f32, y: f32) -> Result<f32> {
        self.locate(x, y, false).map(|p| self.interpolate(&p))
    }

    /// Flat normal of the triangle under world `(x, y)`.
    pub fn normal(&self, x: f32, y: f32) -> Result<Vec3> {
        self.locate(x, y, false).map(|p| self.face_normal(&p))
    }

    /// Like [`height`](Self::height), clamping finite points onto the grid edge.
    pub fn height_clamped(&self, x: f32, y: f32) -> Result<f32> {
        self.locate(x, y, true).map(|p| self.interpolate(&p))
    }

    /// Like [`normal`](Self::normal), clamping finite points onto the grid edge.
    pub fn normal_clamped(&self, x: f32, y: f32) -> Result<Vec3> {
        self.locate(x, y, true).map(|p| self.face_normal(&p))
    }

    fn locate(&self, x: f32, y: f32, clamp: bool) -> Result<CellPoint> {
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::OutOfBounds { x, y });
        }

        // Undo the centering offset and the vertical flip.
        let mut gx = x / self.scale + (self.cols / 2) as f32;
        let mut gy = (self.rows / 2) as f32 - y / self.scale;

        let (max_gx, max_gy) = ((self.cols - 1) as f32, (self.rows - 1) as f32);
        if clamp {
            gx = gx.clamp(0.0, max_gx);
            gy = gy.clamp(0.0, max_gy);
        } else if !(0.0..=max_gx).contains(&gx) || !(0.0..=max_gy).contains(&gy) {
            return Err(Error::OutOfBounds { x, y });
        }

        // The last sample row/column belongs to the last cell.
        let col = (gx.floor() as usize).min(self.cols - 2);
        let row = (gy.floor() as usize).min(self.rows - 2);

        Ok(CellPoint {
            row,
            col,
            x_rem: gx - col as f32,
            y_rem: gy - row as f32,
        })
    }

    fn interpolate(&self, p: &CellPoint) -> f32 {
        let (row, col) = (p.row, p.col);
        let (xr, yr) = (p.x_rem, p.y_rem);
        let upper_left = self.elevation(row, col);
        let lower_right = self.elevation(row + 1, col + 1);

        if p.in_lower_left() {
            let lower_left = self.elevation(row + 1, col);
            (1.0 - yr) * upper_left + xr * lower_right + (yr - xr) * lower_left
        } else {
            let upper_right = self.elevation(row, col + 1);
            (1.0 - xr) * upper_left + yr * lower_right + (xr - yr) * upper_right
        }
    }

    fn face_normal(&self, p: &CellPoint) -> Vec3 {
        let square = p.row * (self.cols - 1) + p.col;
        let face = 2 * square + usize::from(p.in_lower_left());
        self.mesh.normals()[face]
    }
}

fn sample_position(rows: usize, cols: usize, scale: f32, row: usize, col: usize, z: f32) -> Vec3 {
    Vec3::new(
        scale * (col as f32 - (cols / 2) as f32),
        scale * ((rows / 2) as f32 - row as f32),
        z,
    )
}

/// Two counter-clockwise triangles per cell: upper-right first, then lower-left.
fn triangulate(rows: usize, cols: usize, scale: f32, elevations: &[f32]) -> Result<Mesh> {
    let vertices = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .map(|(row, col)| sample_position(rows, cols, scale, row, col, elevations[row * cols + col]))
        .collect();

    let width = cols as u32;
    let mut faces: Vec<Face> = Vec::with_capacity(2 * (rows - 1) * (cols - 1));
    for row in 0..rows as u32 - 1 {
        for col in 0..width - 1 {
            let base = row * width + col;
            faces.push([base, base + width + 1, base + 1]);
            faces.push([base, base + width, base + width + 1]);
        }
    }

    Mesh::new(vertices, faces)
}
