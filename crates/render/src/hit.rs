use glam::{Vec2, Vec3};
use spatialplane_common::NodeId;
use spatialplane_kernel::{Scene, SceneError};

use crate::camera::{ViewCamera, Viewport};

/// A node under a screen point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub node: NodeId,
    /// Distance along the pick ray.
    pub distance: f32,
    /// Scene-space point where the ray meets the bounding sphere.
    pub point: Vec3,
}

/// Every geometry node whose bounding sphere the ray through `point` meets,
/// nearest first.
pub fn hit_test(
    scene: &Scene,
    camera: &ViewCamera,
    point: Vec2,
    viewport: Viewport,
) -> Result<Vec<HitResult>, SceneError> {
    let ray = camera.screen_ray(point, viewport);
    let mut hits = Vec::new();
    for id in scene.walk() {
        let Some(geometry) = scene.node(id).and_then(|n| n.geometry.as_ref()) else {
            continue;
        };
        let world = scene.world_transform(id)?;
        let center = world.w_axis.truncate();
        let scale = world
            .x_axis
            .truncate()
            .length()
            .max(world.y_axis.truncate().length())
            .max(world.z_axis.truncate().length());
        if let Some(distance) = ray.intersect_sphere(center, geometry.bounding_radius * scale) {
            hits.push(HitResult {
                node: id,
                distance,
                point: ray.at(distance),
            });
        }
    }
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    tracing::debug!(x = point.x, y = point.y, hits = hits.len(), "hit test");
    Ok(hits)
}
