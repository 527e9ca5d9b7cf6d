use glam::{Mat4, Vec3};

/// Heading of the move from `from` to `to`: `atan2(dx, dz)`, measured from
/// +Z toward +X.
///
/// A zero-length planar move returns exactly `0.0`, whatever the signs of the
/// zero components.
pub fn heading_between(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    if d.x == 0.0 && d.z == 0.0 {
        return 0.0;
    }
    d.x.atan2(d.z)
}

/// Rotate by `heading` about +Y, then translate to `target`.
pub fn compose(heading: f32, target: Vec3) -> Mat4 {
    let rotation = Mat4::from_rotation_y(heading);
    let translation = Mat4::from_translation(target);
    // Column vectors: the right-hand factor applies first.
    translation * rotation
}

/// Recover the heading stored in a transform built by [`compose`].
pub fn heading_of(transform: &Mat4) -> f32 {
    let forward = transform.z_axis;
    if forward.x == 0.0 && forward.z == 0.0 {
        return 0.0;
    }
    forward.x.atan2(forward.z)
}
