//! Scene graph and components.
//!
//! This crate provides scene management:
//! - Node hierarchy with composed transforms
//! - Camera and fly controller
//! - Point light
//! - Humanoid rig and its walk cycle

pub mod camera;
pub mod light;
pub mod node;
pub mod rig;
pub mod transform;
pub mod walk;

pub use camera::{Camera, FlyController, FlyInput};
pub use light::PointLight;
pub use node::{Attachment, Drawable, Node, NodePath};
pub use rig::{Joint, PrimitiveFactory, Rig, RigConfig, RigJoints, Side};
pub use transform::{Transform, rotation_degrees, translation};
pub use walk::{WalkConfig, WalkCycle, WalkPhase};
