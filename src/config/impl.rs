use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to in-memory defaults when
/// `init_config()` has not been called yet.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration
///
/// Loads configuration from the given TOML path (default "config.toml").
/// If the file doesn't exist, uses in-memory defaults plus `SV__*` env vars.
///
/// # Examples
/// ```no_run
/// use surveylinker::config::init_config;
/// init_config(None);
/// ```
pub fn init_config(path: Option<&str>) {
    let loaded = StaticConfig::load(path);
    match CONFIG.get() {
        Some(existing) => existing.store(Arc::new(loaded)),
        None => {
            let _ = CONFIG.set(ArcSwap::from_pointee(loaded));
        }
    }
}
