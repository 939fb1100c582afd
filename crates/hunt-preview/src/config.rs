//! Addon-wide configuration.
//!
//! Per-group options live on [`hunt_core::ToggleGroup`]; this covers the
//! knobs that apply to every device.

use once_cell::sync::Lazy;

use crate::env_config::{env_var_enabled_unless_falsey, env_var_positive_u64, env_var_truthy};

pub const BARRIERS_ENV_VAR: &str = "SHADER_HUNT_PREVIEW_BARRIERS";
pub const RESET_ON_GROUP_CHANGE_ENV_VAR: &str = "SHADER_HUNT_RESET_ON_GROUP_CHANGE";
pub const TARGET_LOCATION_ENV_VAR: &str = "SHADER_HUNT_TARGET_LOCATION";

/// Whether resource-state transitions are issued around the capture copy
/// and the shader blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarrierPolicy {
    /// Issue no barriers; the host's own state transitions are trusted.
    #[default]
    Elided,
    /// Transition the target and staging textures into copy/render states
    /// and back again.
    Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewConfig {
    pub barriers: BarrierPolicy,
    /// Start a new capture session whenever the selected edit group changes.
    pub reset_on_group_change: bool,
    /// Default call-site filter for new devices. `0` is unrestricted.
    pub target_invocation_location: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            barriers: BarrierPolicy::Elided,
            reset_on_group_change: true,
            target_invocation_location: 0,
        }
    }
}

static FROM_ENV: Lazy<PreviewConfig> = Lazy::new(PreviewConfig::read_env);

impl PreviewConfig {
    /// Configuration read from the environment, cached on first use.
    pub fn from_env() -> Self {
        *FROM_ENV
    }

    fn read_env() -> Self {
        let barriers = if env_var_truthy(BARRIERS_ENV_VAR) {
            BarrierPolicy::Transition
        } else {
            BarrierPolicy::Elided
        };
        Self {
            barriers,
            reset_on_group_change: env_var_enabled_unless_falsey(RESET_ON_GROUP_CHANGE_ENV_VAR),
            target_invocation_location: env_var_positive_u64(TARGET_LOCATION_ENV_VAR).unwrap_or(0),
        }
    }

    pub fn with_barriers(mut self, barriers: BarrierPolicy) -> Self {
        self.barriers = barriers;
        self
    }

    pub fn with_target_invocation_location(mut self, location: u64) -> Self {
        self.target_invocation_location = location;
        self
    }
}
