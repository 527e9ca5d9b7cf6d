use glam::{Mat4, Vec2, Vec3};
use spatialplane_common::NodeId;
use spatialplane_kernel::{Projection, Scene, SceneError};

/// Ray for picking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point along the ray at distance `t`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Nearest non-negative hit distance against a sphere, if any.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let near = -b - root;
        let far = -b + root;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // Origin inside the sphere.
            Some(0.0)
        } else {
            None
        }
    }
}

/// Size of the view in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(390.0, 844.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Normalized device coordinates: x right, y up, both in `[-1, 1]`.
    pub fn to_ndc(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            2.0 * point.x / self.width - 1.0,
            1.0 - 2.0 * point.y / self.height,
        )
    }
}

/// The camera the scene is viewed through, resolved to scene space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCamera {
    pub world: Mat4,
    pub projection: Projection,
}

impl ViewCamera {
    /// Resolve the camera attached to node `id`.
    pub fn from_node(scene: &Scene, id: NodeId) -> Result<Self, SceneError> {
        let node = scene.node(id).ok_or(SceneError::NodeNotFound(id))?;
        let camera = node.camera.ok_or(SceneError::NoCamera(id))?;
        Ok(Self {
            world: scene.world_transform(id)?,
            projection: camera.projection,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    /// Viewing direction: the camera's local -Z in scene space.
    pub fn forward(&self) -> Vec3 {
        self.world.transform_vector3(Vec3::NEG_Z).normalize()
    }

    /// Ray through a screen point.
    pub fn screen_ray(&self, point: Vec2, viewport: Viewport) -> Ray {
        let ndc = viewport.to_ndc(point);
        let aspect = viewport.aspect();
        match self.projection {
            Projection::Orthographic { scale } => {
                let local = Vec3::new(ndc.x * scale * aspect, ndc.y * scale, 0.0);
                Ray::new(self.world.transform_point3(local), self.forward())
            }
            Projection::Perspective { fov_degrees } => {
                let half = (fov_degrees.to_radians() / 2.0).tan();
                let local = Vec3::new(ndc.x * half * aspect, ndc.y * half, -1.0);
                Ray::new(self.position(), self.world.transform_vector3(local))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spatialplane_kernel::SceneRig;

    fn top_down() -> ViewCamera {
        let mut scene = Scene::new();
        let rig = SceneRig::install(&mut scene);
        ViewCamera::from_node(&scene, rig.camera).unwrap()
    }

    #[test]
    fn rig_camera_looks_straight_down() {
        let cam = top_down();
        let f = cam.forward();
        assert_relative_eq!(f.y, -1.0, epsilon = 1e-6);
        assert_eq!(cam.position(), Vec3::new(0.0, 15.0, 0.0));
    }

    #[test]
    fn screen_center_ray_hits_origin() {
        let cam = top_down();
        let vp = Viewport::new(200.0, 400.0);
        let ray = cam.screen_ray(vp.center(), vp);
        let ground = ray.at(15.0);
        assert_relative_eq!(ground.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ground.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ground.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn ortho_scale_is_half_height() {
        let cam = top_down();
        let vp = Viewport::new(200.0, 400.0);
        // Top edge of the screen is 20 units toward -Z; right edge is 10 units toward +X.
        let top = cam.screen_ray(Vec2::new(100.0, 0.0), vp);
        assert_relative_eq!(top.origin.z, -20.0, epsilon = 1e-4);
        let right = cam.screen_ray(Vec2::new(200.0, 200.0), vp);
        assert_relative_eq!(right.origin.x, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn node_without_camera_is_rejected() {
        let mut scene = Scene::new();
        let id = scene.add_child(spatialplane_kernel::SceneNode::named("ship"));
        assert!(matches!(
            ViewCamera::from_node(&scene, id),
            Err(SceneError::NoCamera(_))
        ));
    }

    #[test]
    fn sphere_intersection() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        assert_relative_eq!(ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap(), 9.0);
        assert!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0).is_none());
        assert_eq!(ray.intersect_sphere(Vec3::new(0.0, 10.0, 0.0), 2.0), Some(0.0));
        assert!(ray.intersect_sphere(Vec3::new(0.0, 20.0, 0.0), 1.0).is_none());
    }
}
