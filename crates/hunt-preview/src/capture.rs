//! The capture state machine.
//!
//! Per device, a session moves Idle → TargetResolved → Captured:
//!
//! - call 0 resolves the bound resource and latches it as the target;
//! - the first later call that passes the call-site filter, belongs to the
//!   edit group and finds the session unmatched runs the capture;
//! - the session then stays matched until it is reset.

use hunt_core::{
    CommandList, EffectRuntime, Invocation, Resource, SpecialEffect, ToggleGroup, ToggleGroups,
};
use hunt_interop::PreviewBridge;
use tracing::debug;

use crate::barrier::BarrierPolicy;
use crate::context::{CommandListScope, DeviceScope};
use crate::error::{PreviewError, PreviewResult};
use crate::resolve::TargetResolver;

/// Host collaborators consulted while processing one invocation.
pub struct CaptureContext<'a> {
    pub groups: &'a ToggleGroups,
    pub resolver: TargetResolver<'a>,
    pub bridge: &'a mut dyn PreviewBridge,
    /// `None` when the post-processing runtime is not loaded.
    pub runtime: Option<&'a mut dyn EffectRuntime>,
    pub barriers: BarrierPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePath {
    /// One raw copy from the target into pong.
    Direct,
    /// Raw copy into ping, then a shader copy from ping into pong.
    ShaderCopy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// No group is selected for editing.
    Inactive,
    /// Call 0 latched a new target.
    TargetResolved,
    /// No target yet and this is not call 0.
    AwaitingTarget,
    /// The call was filtered out or belongs to another group.
    NotQualified,
    /// This session already captured.
    AlreadyMatched,
    Captured(CapturePath),
}

/// Process one instrumented call.
///
/// The call's pending bits are cleared before anything else, whatever the
/// outcome.
pub fn update_preview(
    device_scope: &mut DeviceScope,
    list_scope: &mut CommandListScope,
    cmd: &mut dyn CommandList,
    invocation: &Invocation,
    ctx: CaptureContext<'_>,
) -> PreviewResult<CaptureOutcome> {
    list_scope.pending.clear(invocation);

    let groups = ctx.groups;
    let Some(group) = groups.editing() else {
        return Ok(CaptureOutcome::Inactive);
    };

    let preview = &mut device_scope.hunt_preview;
    let Some(target) = preview.target else {
        if invocation.call_location != 0 {
            return Ok(CaptureOutcome::AwaitingTarget);
        }
        let resolved = ctx.resolver.resolve(&*cmd, group, invocation)?;
        preview.latch(&resolved);
        debug!(
            resource = resolved.resource.raw(),
            stage = ?resolved.stage,
            width = preview.width,
            height = preview.height,
            format = ?preview.format,
            view_format = ?preview.view_format,
            "preview target resolved"
        );
        return Ok(CaptureOutcome::TargetResolved);
    };

    if preview.matched {
        return Ok(CaptureOutcome::AlreadyMatched);
    }
    if !preview.qualifies(invocation.call_location) || invocation.group != group.id {
        return Ok(CaptureOutcome::NotQualified);
    }

    let result = capture(device_scope, cmd, group, target, ctx);
    device_scope.hunt_preview.matched = true;
    result
}

fn capture(
    device_scope: &mut DeviceScope,
    cmd: &mut dyn CommandList,
    group: &ToggleGroup,
    target: Resource,
    ctx: CaptureContext<'_>,
) -> PreviewResult<CaptureOutcome> {
    let preview = &mut device_scope.hunt_preview;
    let view_format = preview.view_format;

    let (compatible, ping, pong) = {
        let device = cmd.device();
        (
            ctx.bridge.is_compatible(device, target, view_format),
            ctx.bridge.ping(device),
            ctx.bridge.pong(device),
        )
    };
    let incompatible = || PreviewError::FormatIncompatibility {
        target,
        view_format,
    };
    if !compatible {
        preview.recreate_preview = true;
        return Err(incompatible());
    }
    let Some(pong) = pong else {
        preview.recreate_preview = true;
        return Err(incompatible());
    };

    let (width, height) = (preview.width, preview.height);
    let target_usage = preview.target_usage;
    let barriers = ctx.barriers;

    let shader_copy = group.clear_preview_alpha && device_scope.caps.supports_alpha_clear;
    let path = if shader_copy {
        // The shader copy needs ping's SRV and pong's RTV; without them
        // nothing is copied and the pair is reallocated at the next reset.
        let views = ping.and_then(|ping| {
            Some((ping.resource, ping.shader_resource?, pong.render_target?))
        });
        let Some((ping, source, dest)) = views else {
            preview.recreate_preview = true;
            return Err(incompatible());
        };
        barriers.copy_resource(cmd, target, target_usage, ping);
        barriers.render_to(cmd, pong.resource, |cmd| {
            device_scope.copy_resource(cmd, source, dest, width, height)
        });
        CapturePath::ShaderCopy
    } else {
        barriers.copy_resource(cmd, target, target_usage, pong.resource);
        CapturePath::Direct
    };

    if let (Some(runtime), Some(pong_rtv)) = (ctx.runtime, pong.render_target) {
        let effects = [
            (group.flip_buffer, SpecialEffect::Flip),
            (group.tone_map, SpecialEffect::TonemapToSdr),
        ];
        for (enabled, effect) in effects {
            if !enabled {
                continue;
            }
            if let Some(technique) = runtime.special_effect(effect) {
                runtime.render_technique(technique, cmd, pong_rtv, pong_rtv);
            }
        }
    }

    debug!(?path, target = target.raw(), "preview captured");
    Ok(CaptureOutcome::Captured(path))
}
