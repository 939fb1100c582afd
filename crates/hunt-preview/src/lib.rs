//! Live-preview capture for the shader hunter.
//!
//! While the user edits a toggle group, the host reports every instrumented
//! draw or dispatch to [`PreviewAddon::on_invocation`]. On call 0 of a
//! session the resource bound for the flagged stage is resolved and latched
//! as the preview target; the first later call that qualifies copies it into
//! the ping/pong staging pair and runs the optional flip and tone-map
//! effects over the result.
//!
//! # Overview
//!
//! - [`PendingInvocationSet`] tracks which call sites are awaiting
//!   resolution on a command list.
//! - [`TargetResolver`] asks the host which resource is bound for a stage.
//! - [`capture::update_preview`] is the per-device capture state machine.
//! - [`DeviceScope`] owns the blit pipelines; see [`dispatch`] for their
//!   creation and the fullscreen copy draw.
//! - [`PreviewAddon`] is the registry the host lifecycle callbacks go
//!   through.

pub mod addon;
pub mod barrier;
pub mod buffer;
pub mod bytes;
pub mod capture;
pub mod config;
pub mod context;
pub mod dispatch;
mod env_config;
pub mod error;
pub mod invocation;
pub mod pipeline;
pub mod resolve;
pub mod shaders;

#[cfg(test)]
mod testing;

pub use addon::PreviewAddon;
pub use barrier::BarrierPolicy;
pub use bytes::AsBytes;
pub use capture::{CaptureOutcome, CapturePath};
pub use config::PreviewConfig;
pub use context::{Capabilities, CaptureState, CommandListScope, DeviceScope, HuntPreview};
pub use error::{PreviewError, PreviewErrorClass, PreviewResult};
pub use invocation::{PendingInvocationSet, MAX_CALL_SITES, SLOT_WIDTH};
pub use pipeline::{BlitKind, BlitPipeline, BlitPipelines};
pub use resolve::{ResolvedTarget, TargetResolver};
