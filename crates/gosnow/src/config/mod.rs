#[allow(clippy::module_inception)]
mod config;
mod polling_config;
mod replay_config;
mod storage_config;

pub(crate) use {
    config::Config, polling_config::PollingConfig, replay_config::ReplayConfig,
    storage_config::StorageConfig,
};

pub(crate) const DEFAULT_ACTIVE_INTERVAL_MS: u64 = 500;
pub(crate) const DEFAULT_IDLE_INTERVAL_MS: u64 = 2000;
pub(crate) const DEFAULT_REPLAY_SPEEDUP: f64 = 1.0;

pub(crate) fn default_active_interval_ms() -> u64 {
    DEFAULT_ACTIVE_INTERVAL_MS
}

pub(crate) fn default_idle_interval_ms() -> u64 {
    DEFAULT_IDLE_INTERVAL_MS
}

pub(crate) fn default_max_sessions() -> usize {
    gosnow_core::DEFAULT_MAX_SESSIONS
}

pub(crate) fn default_replay_speedup() -> f64 {
    DEFAULT_REPLAY_SPEEDUP
}
