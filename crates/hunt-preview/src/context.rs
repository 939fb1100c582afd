//! Per-device and per-command-list state.
//!
//! A [`DeviceScope`] is created when the host initialises a device and lives
//! until the device is destroyed. A [`CommandListScope`] lives for one
//! command list and is reset on every recording pass.

use hunt_core::{DeviceApi, Format, GroupId, Resource, ResourceUsage, TextureDesc};

use crate::invocation::PendingInvocationSet;
use crate::pipeline::BlitPipelines;
use crate::resolve::ResolvedTarget;
use crate::shaders::ShaderFamily;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// What the device's API family can do, resolved once at device init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub api: DeviceApi,
    /// `None` when no blit shaders exist for the family.
    pub shader_family: Option<ShaderFamily>,
    /// Whether the capture may be routed through the shader copy so the
    /// preview alpha can be controlled.
    pub supports_alpha_clear: bool,
    pub needs_explicit_quad_buffer: bool,
    pub uses_strip_topology: bool,
}

impl Capabilities {
    pub fn for_api(api: DeviceApi) -> Self {
        let shader_family = ShaderFamily::for_api(api);
        let legacy = shader_family == Some(ShaderFamily::Legacy);
        Self {
            api,
            shader_family,
            supports_alpha_clear: api.is_direct3d(),
            needs_explicit_quad_buffer: legacy,
            uses_strip_topology: legacy,
        }
    }

    pub fn supports_blit(&self) -> bool {
        self.shader_family.is_some()
    }
}

// ---------------------------------------------------------------------------
// Capture session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No target resolved yet this session.
    Idle,
    /// Target latched, waiting for a qualifying call.
    TargetResolved,
    /// The capture ran (or was skipped as incompatible) this session.
    Captured,
}

/// The capture session of one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuntPreview {
    pub target: Option<Resource>,
    pub target_desc: Option<TextureDesc>,
    /// Usage the target was bound as when it was resolved.
    pub target_usage: ResourceUsage,
    /// Declared format of the target resource.
    pub format: Format,
    /// Format the target is viewed through.
    pub view_format: Format,
    pub width: u32,
    pub height: u32,
    pub matched: bool,
    /// Set when the staging pair must be reallocated to fit the target.
    pub recreate_preview: bool,
    /// Call-site filter. `0` lets every call after call 0 qualify; otherwise
    /// a call qualifies when its ordinal shares a bit with the filter.
    pub target_invocation_location: u64,
}

impl HuntPreview {
    pub fn new(target_invocation_location: u64) -> Self {
        Self {
            target: None,
            target_desc: None,
            target_usage: ResourceUsage::empty(),
            format: Format::Unknown,
            view_format: Format::Unknown,
            width: 0,
            height: 0,
            matched: false,
            recreate_preview: false,
            target_invocation_location,
        }
    }

    pub fn state(&self) -> CaptureState {
        match (self.target, self.matched) {
            (None, _) => CaptureState::Idle,
            (Some(_), false) => CaptureState::TargetResolved,
            (Some(_), true) => CaptureState::Captured,
        }
    }

    pub(crate) fn latch(&mut self, resolved: &ResolvedTarget) {
        self.target = Some(resolved.resource);
        self.target_desc = Some(resolved.desc);
        self.target_usage = resolved.usage;
        self.format = resolved.desc.format;
        self.view_format = resolved.view_format;
        self.width = resolved.desc.width;
        self.height = resolved.desc.height;
        self.matched = false;
    }

    /// Whether `call_location` passes the call-site filter.
    pub fn qualifies(&self, call_location: u32) -> bool {
        if self.target_invocation_location == 0 {
            call_location != 0
        } else {
            u64::from(call_location) & self.target_invocation_location != 0
        }
    }

    /// The staging layout the last target asked for, if a reallocation is
    /// pending. Clears the request.
    pub(crate) fn take_recreate_request(&mut self) -> Option<(TextureDesc, Format)> {
        if !std::mem::take(&mut self.recreate_preview) {
            return None;
        }
        self.target_desc.map(|desc| (desc, self.view_format))
    }

    /// Start a new session. The call-site filter is kept; a pending
    /// reallocation request is dropped, so take it first.
    pub fn reset(&mut self) {
        *self = Self::new(self.target_invocation_location);
    }
}

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DeviceScope {
    pub caps: Capabilities,
    pub hunt_preview: HuntPreview,
    pub blit: BlitPipelines,
    /// Edit group the current session was started for.
    pub session_group: Option<GroupId>,
}

impl DeviceScope {
    pub fn new(api: DeviceApi, target_invocation_location: u64) -> Self {
        Self {
            caps: Capabilities::for_api(api),
            hunt_preview: HuntPreview::new(target_invocation_location),
            blit: BlitPipelines::default(),
            session_group: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct CommandListScope {
    pub pending: PendingInvocationSet,
}

impl CommandListScope {
    pub fn reset(&mut self) {
        self.pending.reset();
    }
}
