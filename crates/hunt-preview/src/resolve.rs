//! Resolution of the resource an instrumented call renders into.

use hunt_core::{
    BoundResourceSource, CommandList, Format, Invocation, PreviewStage, Resource, ResourceDesc,
    ResourceUsage, TextureDesc, ToggleGroup,
};
use tracing::trace;

use crate::error::{PreviewError, PreviewResult};

/// Everything captured about the target when it is first resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub resource: Resource,
    pub desc: TextureDesc,
    pub view_format: Format,
    pub usage: ResourceUsage,
    pub stage: PreviewStage,
}

/// Pure query over the host's bound-resource tracking.
pub struct TargetResolver<'a> {
    source: &'a dyn BoundResourceSource,
}

impl<'a> TargetResolver<'a> {
    pub fn new(source: &'a dyn BoundResourceSource) -> Self {
        Self { source }
    }

    /// Query the bound resource for the highest-precedence stage flagged on
    /// `invocation`, matching on that stage's flag alone. Lower-precedence
    /// stages are not consulted even when the winner has nothing bound.
    pub fn resolve(
        &self,
        cmd: &dyn CommandList,
        group: &ToggleGroup,
        invocation: &Invocation,
    ) -> PreviewResult<ResolvedTarget> {
        let failure = |stage| PreviewError::ResolutionFailure {
            call_location: invocation.call_location,
            stage,
        };

        let stage = invocation.flags.preview_stage().ok_or_else(|| failure(None))?;
        let view = self
            .source
            .current_resource_view(cmd, group, stage, invocation.flags & stage.flag())
            .ok_or_else(|| failure(Some(stage)))?;

        // Buffers (e.g. structured UAVs) cannot be previewed.
        let ResourceDesc::Texture(desc) = cmd.device().resource_desc(view.resource) else {
            return Err(failure(Some(stage)));
        };

        let view_format = match view.format {
            Format::Unknown => desc.format.default_typed(),
            format => format,
        };
        trace!(?stage, resource = view.resource.raw(), ?view_format, "resolved bound resource");

        Ok(ResolvedTarget {
            resource: view.resource,
            desc,
            view_format,
            usage: view.usage,
            stage,
        })
    }
}
