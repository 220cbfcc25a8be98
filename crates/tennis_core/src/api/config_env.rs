use crate::engine::EngineConfig;

/// Engine config for a request: an explicit config wins, then the file named
/// by `TENNIS_ENGINE_CONFIG_PATH`, then defaults.
pub(crate) fn resolve_engine_config(explicit: Option<EngineConfig>) -> Result<EngineConfig, String> {
    if let Some(config) = explicit {
        config.validate().map_err(|e| format!("Invalid engine config in request: {e}"))?;
        return Ok(config);
    }
    EngineConfig::from_env()
        .map(Option::unwrap_or_default)
        .map_err(|e| format!("Failed to load engine config: {e}"))
}
