//! Vector and quaternion helpers shared by placement, fleet motion and ballistics.

use glam::{EulerRot, Mat3, Quat, Vec2, Vec3};

/// Surface coordinates span `[-SURFACE_COORD_SCALE / 2, SURFACE_COORD_SCALE / 2]` on each axis.
pub const SURFACE_COORD_SCALE: f32 = 100.0;

/// Lengths below this are treated as zero.
pub const LENGTH_EPSILON: f32 = 1e-5;

/// Map a 2D surface coordinate to a unit direction from the planet center.
///
/// Longitude is `(x / scale) * 2π`, latitude is `(y / scale) * π`. With the default
/// scale of 100 the conventional `[-50, 50]` range covers the whole sphere.
pub fn spherical_direction(coord: Vec2, scale: f32) -> Vec3 {
    let scale = if scale.abs() > LENGTH_EPSILON { scale } else { SURFACE_COORD_SCALE };
    let lon = (coord.x / scale) * std::f32::consts::TAU;
    let lat = (coord.y / scale) * std::f32::consts::PI;
    Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin()).normalize_or(Vec3::X)
}

/// Rotation whose forward axis (-Z) points along `forward`, keeping local +Y as close to `up` as possible.
///
/// Returns `None` for a zero-length forward. When `forward` is parallel to `up` an alternate up
/// axis is used so the result is always a valid rotation.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return None;
    }

    let mut right = f.cross(up);
    if right.length_squared() < LENGTH_EPSILON {
        let alt = if f.z.abs() < 0.9 { Vec3::Z } else { Vec3::X };
        right = f.cross(alt);
    }
    let right = right.normalize();
    let true_up = right.cross(f);

    Some(Quat::from_mat3(&Mat3::from_cols(right, true_up, -f)).normalize())
}

/// Rotation that aims the forward axis from `from` toward `to`.
pub fn look_at(from: Vec3, to: Vec3, up: Vec3) -> Option<Quat> {
    look_rotation(to - from, up)
}

/// Spherically interpolate `current` toward `target` at `rate` per second.
///
/// The interpolation factor is `min(1, dt * rate)`, so large frames finish the turn instead of overshooting.
pub fn slerp_toward(current: Quat, target: Quat, rate: f32, dt: f32) -> Quat {
    let t = (dt * rate).clamp(0.0, 1.0);
    current.slerp(target, t).normalize()
}

/// Remove the component of `v` parallel to `axis`.
pub fn reject_from(v: Vec3, axis: Vec3) -> Vec3 {
    let n = axis.normalize_or_zero();
    if n == Vec3::ZERO {
        return v;
    }
    v - n * v.dot(n)
}

/// Rotation that maps local +Y onto the given surface normal.
pub fn align_up(normal: Vec3) -> Quat {
    let n = normal.normalize_or_zero();
    if n == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(Vec3::Y, n)
}

/// Euler angles (radians, XYZ order) to a quaternion.
pub fn euler_xyz(rot: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rot.x, rot.y, rot.z)
}
