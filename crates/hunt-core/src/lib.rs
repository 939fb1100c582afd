//! Host protocol types for the shader-hunt preview pipeline.
//!
//! The preview pipeline never talks to a graphics API directly. Everything it
//! needs from the host (object creation, command recording, bound-resource
//! queries, post-processing techniques, embedded shader bytecode) goes
//! through the traits in [`host`], using the opaque handles and descriptors
//! defined in [`api`].

pub mod api;
pub mod groups;
pub mod host;
pub mod inputs;
pub mod logging;

pub use api::*;
pub use groups::{GroupId, ToggleGroup, ToggleGroups};
pub use host::{
    BoundResourceSource, CommandList, Device, EffectRuntime, EmbeddedShaders, ResolvedView,
    ShaderId, ShaderLibrary,
};
pub use inputs::{Invocation, InvocationFlags, PreviewStage};
