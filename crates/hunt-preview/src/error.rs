//! Failure taxonomy of the preview pipeline.
//!
//! None of these ever reach the host: the addon entry points log them and
//! carry on. The worst observable outcome is a stale, blank or skipped
//! preview.

use hunt_core::{DeviceApi, Format, PreviewStage, Resource};
use thiserror::Error;

use crate::invocation::MAX_CALL_SITES;

#[derive(Debug, Error)]
pub enum PreviewError {
    /// The resource tracker had nothing bound for the queried stage.
    #[error("no resource bound for {stage:?} at call {call_location}")]
    ResolutionFailure {
        call_location: u32,
        stage: Option<PreviewStage>,
    },

    /// The captured target does not fit the staging textures.
    #[error("capture target {target:?} is incompatible with preview format {view_format:?}")]
    FormatIncompatibility { target: Resource, view_format: Format },

    #[error("unable to create blit pipeline")]
    PipelineCreation(#[source] anyhow::Error),

    #[error("device api {0:?} cannot run the preview blit")]
    UnsupportedApi(DeviceApi),

    #[error("call location {0} exceeds the {max} tracked call sites", max = MAX_CALL_SITES)]
    CallLocationOutOfRange(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewErrorClass {
    /// Nothing happened this call; expected during normal operation.
    Skip,
    /// The preview is stale or blank until something is rebuilt.
    Degraded,
}

impl PreviewError {
    pub fn class(&self) -> PreviewErrorClass {
        match self {
            Self::ResolutionFailure { .. } | Self::UnsupportedApi(_) => PreviewErrorClass::Skip,
            Self::FormatIncompatibility { .. }
            | Self::PipelineCreation(_)
            | Self::CallLocationOutOfRange(_) => PreviewErrorClass::Degraded,
        }
    }
}

pub type PreviewResult<T> = Result<T, PreviewError>;
