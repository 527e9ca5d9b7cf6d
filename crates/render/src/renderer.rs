use std::fmt::Write;

use spatialplane_common::Color;
use spatialplane_kernel::{Projection, Scene};
use spatialplane_motion::heading_of;

use crate::camera::ViewCamera;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and the resolved camera and produces output.
/// It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen through `camera`.
    fn render(&self, scene: &Scene, camera: &ViewCamera) -> Self::Output;
}

/// Renders the scene graph as indented text, one line per node.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Append a node/geometry/light count footer.
    pub show_statistics: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statistics(mut self, show: bool) -> Self {
        self.show_statistics = show;
        self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &ViewCamera) -> String {
        let mut out = String::new();
        let eye = camera.position();
        let look = camera.forward();
        let projection = match camera.projection {
            Projection::Orthographic { scale } => format!("ortho scale={scale:.1}"),
            Projection::Perspective { fov_degrees } => format!("perspective fov={fov_degrees:.0}"),
        };
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) look=({:.2}, {:.2}, {:.2}) {projection}",
            eye.x, eye.y, eye.z, look.x, look.y, look.z
        );

        let (mut geometries, mut lights) = (0, 0);
        for id in scene.walk() {
            if id == scene.root() {
                continue;
            }
            let Some(node) = scene.node(id) else { continue };
            let depth = depth_of(scene, id);
            let p = node.position();
            let name = node.name.as_deref().unwrap_or("<unnamed>");
            let _ = write!(
                out,
                "{:indent$}{name} [{}] pos=({:.2}, {:.2}, {:.2}) heading={:.3}",
                "",
                id.short(),
                p.x,
                p.y,
                p.z,
                heading_of(&node.transform),
                indent = depth * 2
            );
            if let Some(g) = &node.geometry {
                geometries += 1;
                if g.material.emission != Color::BLACK {
                    let [r, gr, b, _] = g.material.emission.0;
                    let _ = write!(out, " emission=({r:.2}, {gr:.2}, {b:.2})");
                }
            }
            if let Some(light) = &node.light {
                lights += 1;
                let _ = write!(out, " light={:?}", light.kind);
            }
            out.push('\n');
        }

        if self.show_statistics {
            let _ = writeln!(
                out,
                "-- nodes: {} geometries: {geometries} lights: {lights}",
                scene.node_count()
            );
        }
        out
    }
}

fn depth_of(scene: &Scene, id: spatialplane_common::NodeId) -> usize {
    let mut depth = 0;
    let mut cursor = scene.node(id).and_then(|n| n.parent());
    while let Some(parent) = cursor {
        if parent == scene.root() {
            break;
        }
        depth += 1;
        cursor = scene.node(parent).and_then(|n| n.parent());
    }
    depth
}
