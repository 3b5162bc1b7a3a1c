//! Rebound
//!
//! A rigid body, either an analytic sphere or a convex polyhedron, dropped
//! onto heightfield terrain and bounced with fixed-step impulse physics.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - Checked 3x3 inverse, quaternion composition and integration
//! 2. **geometry** - Indexed triangle meshes, inertia, procedural bodies
//! 3. **terrain** - Heightfields with interpolated height and normal queries
//! 4. **loader** - `.dem` terrain and `.face` mesh file parsers
//! 5. **physics** - Body state, contact detection and response, the simulator
//! 6. **scene** - Assembles a simulator from asset files or generators
//!
//! Nothing renders here. A presentation layer reads
//! [`Simulator::model_matrix`], [`Simulator::active_mesh`] and the terrain
//! meshes, and drives the simulation through [`Command`] or
//! [`Simulator::advance`].

pub mod error;
pub mod geometry;
pub mod loader;
pub mod math;
pub mod physics;
pub mod scene;
pub mod terrain;

// Re-export commonly used types
pub use error::{Error, Result};

pub use geometry::{Face, Mesh, VertexPN};

pub use terrain::{Bounds, Heightfield, Terrain};

pub use physics::body::BodyVariant;
pub use physics::contact::{Contact, ContactResponse};
pub use physics::rigid_body::RigidBodyState;
pub use physics::{BoundsPolicy, Command, PhysicsConfig, Simulator, StepOutcome};

pub use scene::{Scene, SceneConfig};

// Re-export glam for convenience
pub use glam;
