//! Optional resource-state transitions around the capture work.
//!
//! With [`BarrierPolicy::Elided`] nothing is recorded and the host's own
//! tracking is relied upon.

use hunt_core::{CommandList, Resource, ResourceUsage};

pub use crate::config::BarrierPolicy;

impl BarrierPolicy {
    /// Raw copy of `source` (currently bound as `source_usage`) into a
    /// staging texture that rests in the shader-resource state.
    pub fn copy_resource(
        self,
        cmd: &mut dyn CommandList,
        source: Resource,
        source_usage: ResourceUsage,
        dest: Resource,
    ) {
        let resting = [source_usage, ResourceUsage::SHADER_RESOURCE];
        let copying = [ResourceUsage::COPY_SOURCE, ResourceUsage::COPY_DEST];

        if self == Self::Transition {
            cmd.barrier(&[source, dest], &resting, &copying);
        }
        cmd.copy_resource(source, dest);
        if self == Self::Transition {
            cmd.barrier(&[source, dest], &copying, &resting);
        }
    }

    /// Run `render` with `target` in the render-target state.
    pub fn render_to<R>(
        self,
        cmd: &mut dyn CommandList,
        target: Resource,
        render: impl FnOnce(&mut dyn CommandList) -> R,
    ) -> R {
        if self == Self::Transition {
            cmd.barrier(
                &[target],
                &[ResourceUsage::SHADER_RESOURCE],
                &[ResourceUsage::RENDER_TARGET],
            );
        }
        let result = render(&mut *cmd);
        if self == Self::Transition {
            cmd.barrier(
                &[target],
                &[ResourceUsage::RENDER_TARGET],
                &[ResourceUsage::SHADER_RESOURCE],
            );
        }
        result
    }
}
