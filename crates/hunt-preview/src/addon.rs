//! Host lifecycle wiring.
//!
//! [`PreviewAddon`] is the registry the host callbacks go through. It owns a
//! [`DeviceScope`] per device and a [`CommandListScope`] per command list,
//! keyed by the host's opaque ids, and is the only place errors are turned
//! into log output: nothing is ever reported back to the host.

use std::collections::HashMap;

use hunt_core::{
    BoundResourceSource, CommandList, CommandListId, Device, DeviceId, EffectRuntime, GroupId,
    Invocation, ShaderLibrary, ToggleGroups,
};
use hunt_interop::PreviewBridge;
use tracing::{debug, trace, warn};

use crate::capture::{update_preview, CaptureContext, CaptureOutcome};
use crate::config::PreviewConfig;
use crate::context::{CommandListScope, DeviceScope, HuntPreview};
use crate::error::{PreviewError, PreviewErrorClass};
use crate::resolve::TargetResolver;

fn log_error(context: &str, e: &PreviewError) {
    match e.class() {
        PreviewErrorClass::Skip => debug!("{context}: {e}"),
        PreviewErrorClass::Degraded => warn!("{context}: {e:#}"),
    }
}

/// Start a new session on `scope`, reallocating the staging pair first if
/// the last capture asked for it.
fn reset_scope<B: PreviewBridge>(scope: &mut DeviceScope, bridge: &mut B, device: &dyn Device) {
    if let Some((desc, view_format)) = scope.hunt_preview.take_recreate_request() {
        if bridge.recreate(device, &desc, view_format).is_ok() {
            debug!(width = desc.width, height = desc.height, "preview staging recreated");
        }
    }
    scope.hunt_preview.reset();
}

pub struct PreviewAddon<B: PreviewBridge, S: ShaderLibrary> {
    config: PreviewConfig,
    bridge: B,
    shaders: S,
    groups: ToggleGroups,
    devices: HashMap<DeviceId, DeviceScope>,
    command_lists: HashMap<CommandListId, CommandListScope>,
}

impl<B: PreviewBridge, S: ShaderLibrary> PreviewAddon<B, S> {
    /// Create the addon. Installs the log subscriber on first use.
    pub fn new(bridge: B, shaders: S, config: PreviewConfig) -> Self {
        hunt_core::logging::init();
        Self {
            config,
            bridge,
            shaders,
            groups: ToggleGroups::new(),
            devices: HashMap::new(),
            command_lists: HashMap::new(),
        }
    }

    /// Create the addon with configuration read from the environment.
    pub fn from_env(bridge: B, shaders: S) -> Self {
        Self::new(bridge, shaders, PreviewConfig::from_env())
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    pub fn groups(&self) -> &ToggleGroups {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut ToggleGroups {
        &mut self.groups
    }

    pub fn set_editing_group(&mut self, id: Option<GroupId>) {
        self.groups.set_editing(id);
    }

    pub fn device_scope(&self, device: DeviceId) -> Option<&DeviceScope> {
        self.devices.get(&device)
    }

    pub fn preview(&self, device: DeviceId) -> Option<&HuntPreview> {
        self.devices.get(&device).map(|scope| &scope.hunt_preview)
    }

    /// Change the call-site filter of one device. Takes effect for the next
    /// capture; an already latched target is kept.
    pub fn set_target_invocation_location(&mut self, device: DeviceId, location: u64) {
        if let Some(scope) = self.devices.get_mut(&device) {
            scope.hunt_preview.target_invocation_location = location;
        }
    }

    // -----------------------------------------------------------------------
    // Device lifecycle
    // -----------------------------------------------------------------------

    pub fn on_init_device(&mut self, device: &dyn Device) {
        let scope = DeviceScope::new(device.api(), self.config.target_invocation_location);
        debug!(device = device.id().0, api = ?scope.caps.api, "device registered");
        if let Some(mut old) = self.devices.insert(device.id(), scope) {
            old.destroy_shaders(device);
        }
    }

    /// Build the blit pipelines for `device`. Returns false if setup failed;
    /// blits on this device are then no-ops.
    pub fn init_shaders(&mut self, device: &dyn Device) -> bool {
        let Some(scope) = self.devices.get_mut(&device.id()) else {
            warn!(device = device.id().0, "init_shaders on unknown device");
            return false;
        };
        match scope.init_shaders(device, &self.shaders) {
            Ok(()) => true,
            Err(e) => {
                log_error("blit setup failed", &e);
                false
            }
        }
    }

    pub fn on_destroy_device(&mut self, device: &dyn Device) {
        if let Some(mut scope) = self.devices.remove(&device.id()) {
            scope.destroy_shaders(device);
        }
        self.bridge.cleanup(device);
    }

    // -----------------------------------------------------------------------
    // Command list lifecycle
    // -----------------------------------------------------------------------

    pub fn on_init_command_list(&mut self, cmd: &dyn CommandList) {
        self.command_lists.insert(cmd.id(), CommandListScope::default());
    }

    pub fn on_destroy_command_list(&mut self, cmd: CommandListId) {
        self.command_lists.remove(&cmd);
    }

    /// A new recording pass begins.
    pub fn on_reset_command_list(&mut self, cmd: CommandListId) {
        if let Some(scope) = self.command_lists.get_mut(&cmd) {
            scope.reset();
        }
    }

    // -----------------------------------------------------------------------
    // Invocations
    // -----------------------------------------------------------------------

    /// Record that `invocation` was instrumented on `cmd` and awaits
    /// resolution.
    pub fn register_invocation(&mut self, cmd: CommandListId, invocation: &Invocation) {
        let scope = self.command_lists.entry(cmd).or_default();
        if let Err(e) = scope.pending.register(invocation) {
            log_error("invocation not tracked", &e);
        }
    }

    pub fn pending(&self, cmd: CommandListId) -> Option<&CommandListScope> {
        self.command_lists.get(&cmd)
    }

    /// Process an instrumented call. Returns `None` when the call was
    /// dropped because of an error (already logged).
    pub fn on_invocation(
        &mut self,
        cmd: &mut dyn CommandList,
        invocation: &Invocation,
        resources: &dyn BoundResourceSource,
        runtime: Option<&mut dyn EffectRuntime>,
    ) -> Option<CaptureOutcome> {
        let device_id = cmd.device().id();
        let Some(device_scope) = self.devices.get_mut(&device_id) else {
            warn!(device = device_id.0, "invocation on unknown device");
            return None;
        };
        let list_scope = self.command_lists.entry(cmd.id()).or_default();

        let editing = self.groups.editing_id();
        if self.config.reset_on_group_change && device_scope.session_group != editing {
            reset_scope(device_scope, &mut self.bridge, cmd.device());
        }
        device_scope.session_group = editing;

        let ctx = CaptureContext {
            groups: &self.groups,
            resolver: TargetResolver::new(resources),
            bridge: &mut self.bridge,
            runtime: runtime.map(|r| r as &mut dyn EffectRuntime),
            barriers: self.config.barriers,
        };
        match update_preview(device_scope, list_scope, cmd, invocation, ctx) {
            Ok(outcome) => {
                trace!(call = invocation.call_location, ?outcome, "invocation processed");
                Some(outcome)
            }
            Err(e) => {
                log_error("preview update skipped", &e);
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// End of frame: the next call 0 resolves a fresh target.
    pub fn on_present(&mut self, device: &dyn Device) {
        self.reset_session(device);
    }

    pub fn reset_session(&mut self, device: &dyn Device) {
        if let Some(scope) = self.devices.get_mut(&device.id()) {
            reset_scope(scope, &mut self.bridge, device);
        }
    }
}
