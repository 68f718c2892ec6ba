//! Transform component plus the planet and fleet-wrapper coordinate frames.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::math::{self, LENGTH_EPSILON};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Look at a target position. Leaves the rotation alone if the target is coincident.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        if let Some(rotation) = math::look_at(self.position, target, up) {
            self.rotation = rotation;
        }
    }
}

/// A planet's world placement: center, uniform scale and spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetFrame {
    pub center: Vec3,
    pub scale: f32,
    pub rotation: Quat,
}

impl PlanetFrame {
    /// Build from the wire representation: position, uniform scale and XYZ Euler angles.
    pub fn from_euler(center: Vec3, scale: f32, euler: Vec3) -> Self {
        Self {
            center,
            scale,
            rotation: math::euler_xyz(euler),
        }
    }

    /// Rotate a planet-local direction into world space.
    pub fn direction_to_world(&self, local_dir: Vec3) -> Vec3 {
        self.rotation * local_dir
    }

    /// Rotation a child of the planet needs to cancel the planet's spin.
    pub fn wrapper_counter_rotation(&self) -> Quat {
        self.rotation.inverse()
    }

    /// The rotation-cancelled frame fleets of this planet live in.
    pub fn wrapper(&self) -> WrapperFrame {
        WrapperFrame::new(self.center, self.scale)
    }
}

/// Fleet formation frame: anchored at the planet center, scaled like the planet,
/// never rotated. Keeps fleets upright however the planet spins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapperFrame {
    pub center: Vec3,
    pub scale: f32,
}

impl Default for WrapperFrame {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 1.0)
    }
}

impl WrapperFrame {
    /// A degenerate scale is replaced by 1.0.
    pub fn new(center: Vec3, scale: f32) -> Self {
        let scale = if scale.abs() > LENGTH_EPSILON { scale } else { 1.0 };
        Self { center, scale }
    }

    pub fn world_to_local_point(&self, world: Vec3) -> Vec3 {
        (world - self.center) / self.scale
    }

    pub fn world_to_local_vector(&self, world: Vec3) -> Vec3 {
        world / self.scale
    }

    pub fn local_to_world_point(&self, local: Vec3) -> Vec3 {
        self.center + local * self.scale
    }

    pub fn local_to_world_vector(&self, local: Vec3) -> Vec3 {
        local * self.scale
    }
}

/// Raw transform data for GPU upload (instance data).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Transform> for TransformRaw {
    fn from(transform: &Transform) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
        }
    }
}

impl From<Transform> for TransformRaw {
    fn from(transform: Transform) -> Self {
        Self::from(&transform)
    }
}
