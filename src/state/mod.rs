//! Shared read-only client state.

pub mod timezones;

use std::sync::Arc;

use crate::config::AppConfig;

pub use self::timezones::TimezoneSet;

/// Cheaply cloneable handle to [`AppState`].
pub type SharedState = Arc<AppState>;

/// Read-only state shared by the read loop and the action handlers.
#[derive(Debug)]
pub struct AppState {
    config: AppConfig,
    timezones: TimezoneSet,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, timezones: TimezoneSet) -> SharedState {
        Arc::new(Self { config, timezones })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Supported timezone names.
    pub fn timezones(&self) -> &TimezoneSet {
        &self.timezones
    }
}
