//! Core types and utilities for the colony client.
//!
//! This crate provides the foundational types used across all client systems:
//! - Vector/quaternion helpers (look-at, slerp, spherical surface directions)
//! - Transform plus planet and fleet-wrapper coordinate frames
//! - Host clock and frame-driven timers
//! - Common component types for ECS

pub mod components;
pub mod math;
pub mod time;
pub mod transform;

pub use components::*;
pub use math::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
