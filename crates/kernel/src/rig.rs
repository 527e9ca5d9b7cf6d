use glam::Vec3;
use spatialplane_common::{Color, NodeId, Placement};

use crate::scene::{Camera, Light, LightKind, Projection, Scene, SceneNode};

/// Ids of the camera and lights the demo adds around the loaded asset.
#[derive(Debug, Clone, Copy)]
pub struct SceneRig {
    pub camera: NodeId,
    pub omni: NodeId,
    pub ambient: NodeId,
}

impl SceneRig {
    /// Half-height of the top-down view, in world units.
    pub const ORTHOGRAPHIC_SCALE: f32 = 20.0;
    pub const CAMERA_HEIGHT: f32 = 15.0;

    /// Add a top-down orthographic camera, an omni key light and a dark gray
    /// ambient light under the scene root.
    pub fn install(scene: &mut Scene) -> Self {
        let camera = scene.add_child(
            SceneNode::named("camera")
                .with_camera(Camera {
                    projection: Projection::Orthographic {
                        scale: Self::ORTHOGRAPHIC_SCALE,
                    },
                })
                .with_placement(
                    Placement::at(Vec3::new(0.0, Self::CAMERA_HEIGHT, 0.0))
                        .with_euler(Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0)),
                ),
        );

        let omni = scene.add_child(
            SceneNode::named("omni")
                .with_light(Light {
                    kind: LightKind::Omni,
                    color: Color::WHITE,
                })
                .with_placement(Placement::at(Vec3::new(0.0, 10.0, 10.0))),
        );

        let ambient = scene.add_child(SceneNode::named("ambient").with_light(Light {
            kind: LightKind::Ambient,
            color: Color::DARK_GRAY,
        }));

        tracing::debug!("camera and lights installed");
        Self {
            camera,
            omni,
            ambient,
        }
    }
}
