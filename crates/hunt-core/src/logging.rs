//! Diagnostic output.
//!
//! Hosts load the addon into their own process, so logging is opt-in: call
//! [`init`] once from the addon entry point. The filter is read from
//! `SHADER_HUNT_LOG` using `tracing-subscriber`'s `EnvFilter` syntax and
//! defaults to `warn`.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "SHADER_HUNT_LOG";

static INIT: OnceCell<()> = OnceCell::new();

/// Install the global `tracing` subscriber. Later calls are no-ops, as is the
/// first call if the host already installed a subscriber.
pub fn init() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!("logging initialised");
        }
    });
}
