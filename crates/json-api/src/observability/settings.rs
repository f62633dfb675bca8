//! Request log settings, fixed once at startup.

use std::{sync::OnceLock, time::Duration};

use crate::config::observability::ObservabilityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RequestLogSettings {
    pub(super) slow_request_threshold: Duration,
    pub(super) propagate_parent: bool,
}

impl Default for RequestLogSettings {
    fn default() -> Self {
        Self {
            slow_request_threshold: Duration::from_secs(1),
            propagate_parent: false,
        }
    }
}

impl From<&ObservabilityConfig> for RequestLogSettings {
    fn from(config: &ObservabilityConfig) -> Self {
        Self {
            slow_request_threshold: config.slow_request_threshold(),
            propagate_parent: config.propagate_parent(),
        }
    }
}

static SETTINGS: OnceLock<RequestLogSettings> = OnceLock::new();

/// Later calls are ignored; the first configuration wins.
pub(super) fn install(settings: RequestLogSettings) {
    let _first = SETTINGS.set(settings);
}

pub(super) fn current() -> RequestLogSettings {
    SETTINGS.get().copied().unwrap_or_default()
}
