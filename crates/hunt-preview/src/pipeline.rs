//! Blit pipeline handles owned by a device scope.

use hunt_core::{ColorWriteMask, Pipeline, PipelineLayout, Resource, Sampler};

/// One programmable copy: pipeline state plus the layout and sampler it was
/// built with. Only ever constructed with all three handles valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitPipeline {
    pub pipeline: Pipeline,
    pub layout: PipelineLayout,
    pub sampler: Sampler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitKind {
    /// Writes all four channels.
    Copy,
    /// Writes colour only, leaving destination alpha untouched.
    AlphaPreservingCopy,
}

impl BlitKind {
    pub fn write_mask(self) -> ColorWriteMask {
        match self {
            Self::Copy => ColorWriteMask::ALL,
            Self::AlphaPreservingCopy => ColorWriteMask::COLOR,
        }
    }
}

/// Per-device blit objects.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlitPipelines {
    pub copy: Option<BlitPipeline>,
    pub alpha_preserving_copy: Option<BlitPipeline>,
    /// Legacy family only.
    pub fullscreen_quad: Option<Resource>,
}

impl BlitPipelines {
    pub fn get(&self, kind: BlitKind) -> Option<&BlitPipeline> {
        match kind {
            BlitKind::Copy => self.copy.as_ref(),
            BlitKind::AlphaPreservingCopy => self.alpha_preserving_copy.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, kind: BlitKind) -> &mut Option<BlitPipeline> {
        match kind {
            BlitKind::Copy => &mut self.copy,
            BlitKind::AlphaPreservingCopy => &mut self.alpha_preserving_copy,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.copy.is_none() && self.alpha_preserving_copy.is_none() && self.fullscreen_quad.is_none()
    }
}
