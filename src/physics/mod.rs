//! Single-body terrain physics.
//!
//! # Architecture
//!
//! Each fixed tick runs, in order:
//!
//! 1. Apply gravity to the linear velocity
//! 2. Detect contact with the terrain under the body center
//! 3. Apply the restitution impulse and correct penetration
//! 4. Integrate orientation (polyhedron only)
//! 5. Integrate position with the updated velocity
//!
//! A tick works on a copy of the state and commits it only when every step
//! succeeded, so a failed tick leaves the body where it was.

pub mod body;
pub mod contact;
pub mod rigid_body;
pub mod solver;

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::geometry::Mesh;
use crate::terrain::{Heightfield, Terrain};

use self::body::{Body, BodyVariant, PolyhedronBody, SphereBody};
use self::contact::ContactResponse;
use self::rigid_body::RigidBodyState;

/// What to do when the body leaves the terrain's sampled area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// Query the nearest point on the grid edge.
    #[default]
    Clamp,
    /// Abort the tick with [`Error::OutOfBounds`].
    Reject,
}

/// Configuration for the simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, 0, -9.8).
    pub gravity: Vec3,
    /// Coefficient of restitution. Default: 0.6.
    pub elasticity: f32,
    /// Collision radius of the sphere variant. Default: 1.
    pub sphere_radius: f32,
    /// Fixed timestep in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of ticks per [`Simulator::advance`] call. Default: 4.
    pub max_substeps: u32,
    /// Default: (0, 0, 10).
    pub initial_position: Vec3,
    /// Launch velocity before the launch angle is applied. Default: (5, 0, 0).
    pub initial_velocity: Vec3,
    pub initial_orientation: Quat,
    pub initial_angular_velocity: Vec3,
    /// Default: [`BoundsPolicy::Clamp`].
    pub bounds: BoundsPolicy,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, 0.0, -9.8),
            elasticity: 0.6,
            sphere_radius: 1.0,
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
            initial_position: Vec3::new(0.0, 0.0, 10.0),
            initial_velocity: Vec3::new(5.0, 0.0, 0.0),
            initial_orientation: Quat::IDENTITY,
            initial_angular_velocity: Vec3::ZERO,
            bounds: BoundsPolicy::Clamp,
        }
    }
}

impl PhysicsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn sphere_radius(mut self, radius: f32) -> Self {
        self.sphere_radius = radius;
        self
    }

    pub fn fixed_timestep(mut self, seconds: f64) -> Self {
        self.fixed_timestep = seconds;
        self
    }

    /// Set the launch position and velocity.
    pub fn launch(mut self, position: Vec3, velocity: Vec3) -> Self {
        self.initial_position = position;
        self.initial_velocity = velocity;
        self
    }

    pub fn spin(mut self, orientation: Quat, angular_velocity: Vec3) -> Self {
        self.initial_orientation = orientation;
        self.initial_angular_velocity = angular_velocity;
        self
    }

    pub fn bounds(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }
}

/// Controls exposed to a presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Advance one fixed tick.
    Step,
    Reset,
    /// Cycle to the next terrain.
    SwitchTerrain,
    SelectTerrain(usize),
    /// Toggle sphere/polyhedron (resets the body).
    SwitchVariant,
    /// Add to the launch angle, in degrees.
    RotateLaunch(f32),
}

/// Result of a successful tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Ticks completed since the last reset, including this one.
    pub tick: u64,
    pub contact: Option<ContactResponse>,
}

/// Owns the body, its two shapes and the terrains.
pub struct Simulator {
    config: PhysicsConfig,
    terrains: Vec<Terrain>,
    active_terrain: usize,
    sphere: SphereBody,
    polyhedron: PolyhedronBody,
    variant: BodyVariant,
    launch_angle: f32,
    state: RigidBodyState,
    ticks: u64,
    accumulator: f64,
    /// Body center currently outside the active terrain's grid.
    off_terrain: bool,
}

impl Simulator {
    /// Create a simulator starting on the first terrain with the sphere.
    pub fn new(
        config: PhysicsConfig,
        terrains: Vec<Terrain>,
        sphere_mesh: Arc<Mesh>,
        polyhedron_mesh: Arc<Mesh>,
    ) -> Result<Self> {
        if terrains.is_empty() {
            return Err(Error::InvalidTerrain("at least one terrain is required".into()));
        }

        let state = RigidBodyState::initial(&config, 0.0);
        Ok(Self {
            sphere: SphereBody {
                radius: config.sphere_radius,
                mesh: sphere_mesh,
            },
            polyhedron: PolyhedronBody::new(polyhedron_mesh),
            config,
            terrains,
            active_terrain: 0,
            variant: BodyVariant::Sphere,
            launch_angle: 0.0,
            state,
            ticks: 0,
            accumulator: 0.0,
            off_terrain: false,
        })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// On error the body state is unchanged.
    pub fn step(&mut self, dt: f32) -> Result<StepOutcome> {
        match self.try_step(dt) {
            Ok((state, contact)) => {
                self.state = state;
                self.ticks += 1;
                trace!(tick = self.ticks, position = ?state.position, "tick");
                self.track_terrain_edge();
                Ok(StepOutcome {
                    tick: self.ticks,
                    contact,
                })
            }
            Err(err) => {
                warn!("Tick {} aborted: {}", self.ticks + 1, err);
                Err(err)
            }
        }
    }

    /// Advance one tick of the configured fixed timestep.
    pub fn step_fixed(&mut self) -> Result<StepOutcome> {
        self.step(self.config.fixed_timestep as f32)
    }

    fn try_step(&self, dt: f32) -> Result<(RigidBodyState, Option<ContactResponse>)> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(Error::InvalidTimestep(dt));
        }

        let body = self.body();
        let terrain = &self.terrains[self.active_terrain].field;
        let mut next = self.state;

        // 1. Gravity
        rigid_body::apply_gravity(&mut next, self.config.gravity, dt);

        // 2-3. Contact detection and response
        let response = match body.detect(&next, terrain, self.config.bounds)? {
            Some(contact) => {
                let response = solver::resolve(body, &mut next, &contact, self.config.elasticity)?;
                debug!(
                    variant = ?body.variant(),
                    depth = contact.penetration,
                    impulse = ?response.impulse,
                    "terrain contact"
                );
                Some(response)
            }
            None => None,
        };

        // 4. Orientation
        if body.variant() == BodyVariant::Polyhedron {
            rigid_body::integrate_orientation(&mut next, dt);
        }

        // 5. Position
        rigid_body::integrate_position(&mut next, dt);

        Ok((next, response))
    }

    fn track_terrain_edge(&mut self) {
        let p = self.state.position;
        let off = !self.active_terrain().field.bounds().contains(p.x, p.y);
        if off && !self.off_terrain && self.config.bounds == BoundsPolicy::Clamp {
            warn!(
                "Body left terrain {:?} at ({}, {}), clamping queries to the edge",
                self.active_terrain().name,
                p.x,
                p.y
            );
        }
        self.off_terrain = off;
    }

    /// Run as many fixed ticks as `elapsed` seconds of wall time allow.
    ///
    /// Leftover time carries over to the next call. Returns the number of
    /// ticks run. A failed tick discards the pending time; ticks committed
    /// before it stay committed.
    pub fn advance(&mut self, elapsed: f64) -> Result<u32> {
        let fixed = self.config.fixed_timestep;
        self.accumulator += elapsed;

        let mut substeps = 0u32;
        while self.accumulator >= fixed && substeps < self.config.max_substeps {
            if let Err(err) = self.step(fixed as f32) {
                self.accumulator = 0.0;
                return Err(err);
            }
            self.accumulator -= fixed;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > fixed * self.config.max_substeps as f64 {
            self.accumulator = 0.0;
        }

        Ok(substeps)
    }

    /// Put the body back at its launch state.
    pub fn reset(&mut self) {
        self.state = RigidBodyState::initial(&self.config, self.launch_angle);
        self.ticks = 0;
        self.accumulator = 0.0;
        self.off_terrain = false;
        info!(
            "Reset {:?} with launch angle {} degrees",
            self.variant, self.launch_angle
        );
    }

    /// Toggle between sphere and polyhedron, then reset.
    pub fn switch_variant(&mut self) {
        self.variant = self.variant.toggled();
        self.reset();
    }

    /// Cycle to the next terrain. The body is not reset.
    pub fn switch_terrain(&mut self) {
        self.active_terrain = (self.active_terrain + 1) % self.terrains.len();
        info!("Switched to terrain {:?}", self.terrains[self.active_terrain].name);
    }

    pub fn select_terrain(&mut self, index: usize) -> Result<()> {
        if index >= self.terrains.len() {
            return Err(Error::UnknownTerrain(index.to_string()));
        }
        self.active_terrain = index;
        info!("Switched to terrain {:?}", self.terrains[index].name);
        Ok(())
    }

    pub fn select_terrain_by_name(&mut self, name: &str) -> Result<()> {
        let index = self
            .terrains
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| Error::UnknownTerrain(name.to_string()))?;
        self.select_terrain(index)
    }

    /// Launch angle in degrees for the next reset.
    pub fn set_launch_angle(&mut self, degrees: f32) {
        self.launch_angle = degrees;
    }

    /// Add to the launch angle; takes effect on the next reset.
    pub fn adjust_launch_angle(&mut self, delta_degrees: f32) {
        self.launch_angle += delta_degrees;
    }

    /// Execute a presentation-layer command. Returns the tick outcome for
    /// [`Command::Step`].
    pub fn apply(&mut self, command: Command) -> Result<Option<StepOutcome>> {
        match command {
            Command::Step => return self.step_fixed().map(Some),
            Command::Reset => self.reset(),
            Command::SwitchTerrain => self.switch_terrain(),
            Command::SelectTerrain(index) => self.select_terrain(index)?,
            Command::SwitchVariant => self.switch_variant(),
            Command::RotateLaunch(degrees) => self.adjust_launch_angle(degrees),
        }
        Ok(None)
    }

    pub fn state(&self) -> &RigidBodyState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn orientation(&self) -> Quat {
        self.state.orientation
    }

    pub fn linear_velocity(&self) -> Vec3 {
        self.state.linear_velocity
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.state.angular_velocity
    }

    /// Model matrix of the body for rendering.
    pub fn model_matrix(&self) -> Mat4 {
        self.state.model_matrix()
    }

    pub fn variant(&self) -> BodyVariant {
        self.variant
    }

    pub fn launch_angle(&self) -> f32 {
        self.launch_angle
    }

    /// Ticks since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn body(&self) -> Body<'_> {
        match self.variant {
            BodyVariant::Sphere => Body::Sphere(&self.sphere),
            BodyVariant::Polyhedron => Body::Polyhedron(&self.polyhedron),
        }
    }

    /// Mesh of the active body, for rendering.
    pub fn active_mesh(&self) -> Arc<Mesh> {
        self.body().mesh().clone()
    }

    pub fn terrains(&self) -> &[Terrain] {
        &self.terrains
    }

    pub fn active_terrain_index(&self) -> usize {
        self.active_terrain
    }

    pub fn active_terrain(&self) -> &Terrain {
        &self.terrains[self.active_terrain]
    }

    /// Shared handle to the active heightfield.
    pub fn heightfield(&self) -> Arc<Heightfield> {
        self.active_terrain().field.clone()
    }

    /// Height of the active terrain, under the configured bounds policy.
    pub fn terrain_height(&self, x: f32, y: f32) -> Result<f32> {
        self.config.bounds.height(&self.active_terrain().field, x, y)
    }

    /// Normal of the active terrain, under the configured bounds policy.
    pub fn terrain_normal(&self, x: f32, y: f32) -> Result<Vec3> {
        self.config.bounds.normal(&self.active_terrain().field, x, y)
    }
}
