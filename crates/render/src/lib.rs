//! Rendering Adapter: view camera, hit testing and a text renderer.
//!
//! # Invariants
//! - Renderers and hit tests read the scene; they never mutate it.
//! - Screen points are in points, origin top-left, y down.

mod camera;
mod hit;
mod renderer;

pub use camera::{Ray, ViewCamera, Viewport};
pub use hit::{HitResult, hit_test};
pub use renderer::{DebugTextRenderer, Renderer};
