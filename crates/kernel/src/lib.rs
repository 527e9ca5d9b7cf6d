//! Scene Kernel: the scene graph the ship lives in, plus the tap highlight.
//!
//! # Invariants
//! - All node mutations flow through explicit operations and are logged.
//! - A node's position is the translation column of its stored transform.

pub mod highlight;
pub mod rig;
pub mod scene;

pub use highlight::Highlighter;
pub use rig::SceneRig;
pub use scene::{
    Camera, Geometry, Light, LightKind, Material, Projection, Scene, SceneError, SceneEvent,
    SceneNode,
};
