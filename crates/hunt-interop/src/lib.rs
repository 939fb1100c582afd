//! Ping/pong staging textures for the preview.
//!
//! This crate defines the [`PreviewBridge`] trait, the interface the capture
//! pipeline uses to reach the pair of staging textures it copies into. The
//! pool owns the textures; the pipeline only reads and writes them.
//! [`StagingPool`] is a bridge that allocates the pair through the host
//! [`Device`](hunt_core::Device).

pub mod bridge;
pub mod staging;

pub use bridge::{PreviewBridge, StagingHandles};
pub use staging::StagingPool;
