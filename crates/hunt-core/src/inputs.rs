//! Per-call inputs from the instrumentation layer.

use bitflags::bitflags;

use crate::groups::GroupId;

bitflags! {
    /// Which shader stage(s) an instrumented call could be contributing to
    /// the preview. Flags are freely combinable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InvocationFlags: u64 {
        const PREVIEW_PIXEL = 1 << 0;
        const PREVIEW_VERTEX = 1 << 1;
        const PREVIEW_COMPUTE = 1 << 2;
    }
}

/// The stage a bound resource is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewStage {
    Pixel,
    Vertex,
    Compute,
}

impl PreviewStage {
    /// Stage index as understood by the resource-tracking collaborator.
    pub fn index(self) -> u32 {
        match self {
            Self::Pixel => 0,
            Self::Vertex => 1,
            Self::Compute => 2,
        }
    }

    pub fn flag(self) -> InvocationFlags {
        match self {
            Self::Pixel => InvocationFlags::PREVIEW_PIXEL,
            Self::Vertex => InvocationFlags::PREVIEW_VERTEX,
            Self::Compute => InvocationFlags::PREVIEW_COMPUTE,
        }
    }
}

impl InvocationFlags {
    /// The single stage to query for these flags.
    ///
    /// Precedence is pixel, then vertex, then compute. Only the winner is
    /// queried even when several flags are set.
    pub fn preview_stage(self) -> Option<PreviewStage> {
        if self.contains(Self::PREVIEW_PIXEL) {
            Some(PreviewStage::Pixel)
        } else if self.contains(Self::PREVIEW_VERTEX) {
            Some(PreviewStage::Vertex)
        } else if self.contains(Self::PREVIEW_COMPUTE) {
            Some(PreviewStage::Compute)
        } else {
            None
        }
    }
}

/// One instrumented draw or dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    /// Ordinal of the call site within this frame's instrumented sequence.
    pub call_location: u32,
    pub flags: InvocationFlags,
    /// Toggle group that instrumented this call.
    pub group: GroupId,
}

impl Invocation {
    pub fn new(call_location: u32, flags: InvocationFlags, group: GroupId) -> Self {
        Self {
            call_location,
            flags,
            group,
        }
    }
}
