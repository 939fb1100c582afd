//! Common interface for the preview staging pair.

use anyhow::Result;
use hunt_core::{Device, Format, Resource, ResourceView, TextureDesc};

/// Handles of one staging texture. Views are optional: a pool may only
/// create the views a given path needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagingHandles {
    pub resource: Resource,
    pub render_target: Option<ResourceView>,
    pub shader_resource: Option<ResourceView>,
}

/// Common interface for the ping/pong staging pair.
///
/// "Ping" is the intermediate texture the captured resource is copied into
/// before the shader pass; "pong" holds the displayable preview. Both are
/// exclusively owned by the implementation.
pub trait PreviewBridge {
    fn ping(&self, device: &dyn Device) -> Option<StagingHandles>;

    fn pong(&self, device: &dyn Device) -> Option<StagingHandles>;

    /// Whether `resource` can be copied into the staging pair and viewed as
    /// `view_format` without reallocating.
    fn is_compatible(&self, device: &dyn Device, resource: Resource, view_format: Format) -> bool;

    /// Reallocate the pair to match `desc`, viewed as `view_format`.
    fn recreate(&mut self, device: &dyn Device, desc: &TextureDesc, view_format: Format)
        -> Result<()>;

    /// Release everything allocated for `device`.
    fn cleanup(&mut self, device: &dyn Device);
}
