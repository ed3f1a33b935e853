//! Core engine types and utilities for Stardrift.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and spatial helpers
//! - Frame time management
//! - Single-threaded continuation queue
//! - Asset-neutral scene fragments (meshes + materials)

pub mod scene;
pub mod tasks;
pub mod time;
pub mod transform;

pub use scene::*;
pub use tasks::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
