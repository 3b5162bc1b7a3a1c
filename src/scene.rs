//! Scene assembly: terrains and bodies from files or generators.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::geometry::primitives;
use crate::loader;
use crate::physics::{PhysicsConfig, Simulator};
use crate::terrain::{generate, Heightfield, Terrain};

/// Samples per side of the procedural terrains.
const PROCEDURAL_GRID: usize = 41;

/// Where the scene assets live.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Directory the file names below are resolved against.
    pub asset_dir: PathBuf,
    /// Terrain files in cycling order.
    pub terrain_files: Vec<String>,
    pub sphere_mesh: String,
    pub polyhedron_mesh: String,
    /// World units per grid sample. Default: 3.
    pub terrain_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            terrain_files: vec![
                "flatland.dem".to_string(),
                "stripeland.dem".to_string(),
                "rollingland.dem".to_string(),
            ],
            sphere_mesh: "spheroid.face".to_string(),
            polyhedron_mesh: "dodecahedron.face".to_string(),
            terrain_scale: 3.0,
        }
    }
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    pub fn terrain_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terrain_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn meshes(mut self, sphere: impl Into<String>, polyhedron: impl Into<String>) -> Self {
        self.sphere_mesh = sphere.into();
        self.polyhedron_mesh = polyhedron.into();
        self
    }

    pub fn terrain_scale(mut self, scale: f32) -> Self {
        self.terrain_scale = scale;
        self
    }
}

/// Builds ready-to-run simulators.
pub struct Scene;

impl Scene {
    /// Load every terrain and both body meshes from disk.
    ///
    /// Terrains are named after their file stem.
    pub fn load(scene: &SceneConfig, physics: PhysicsConfig) -> Result<Simulator> {
        let terrains = scene
            .terrain_files
            .iter()
            .map(|file| {
                let path = scene.asset_dir.join(file);
                let field = loader::read_terrain_file(&path, scene.terrain_scale)?;
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.clone());
                Ok(Terrain::new(name, field))
            })
            .collect::<Result<Vec<_>>>()?;

        let sphere = loader::read_mesh_file(scene.asset_dir.join(&scene.sphere_mesh))?;
        let polyhedron = loader::read_mesh_file(scene.asset_dir.join(&scene.polyhedron_mesh))?;

        info!(
            "Scene loaded from {:?}: {} terrains",
            scene.asset_dir,
            terrains.len()
        );
        Simulator::new(physics, terrains, Arc::new(sphere), Arc::new(polyhedron))
    }

    /// Build the default scene without touching the filesystem.
    pub fn procedural(physics: PhysicsConfig) -> Result<Simulator> {
        let n = PROCEDURAL_GRID;
        let terrains = vec![
            Terrain::new("flatland", Heightfield::new(generate::flat(n, n), 3.0)?),
            Terrain::new(
                "stripeland",
                Heightfield::new(generate::stripes(n, n, 4, 2.0), 3.0)?,
            ),
            Terrain::new(
                "rollingland",
                Heightfield::new(generate::rolling(n, n, 3.0, 20.0), 3.0)?,
            ),
        ];

        let sphere = primitives::uv_sphere(physics.sphere_radius, 24, 12)?;
        let polyhedron = primitives::dodecahedron(1.0)?;

        info!("Procedural scene built: {} terrains", terrains.len());
        Simulator::new(physics, terrains, Arc::new(sphere), Arc::new(polyhedron))
    }
}
