use std::path::PathBuf;

use facecheck_config::{
    load_resolved_config, load_resolved_from_paths, ConfigError, ResolvedConfig,
};

use crate::cli::ModelArgs;
use crate::errors::{AppError, AppResult};

pub fn load_config() -> AppResult<ResolvedConfig> {
    let loaded = load_resolved_config().map_err(map_config_error)?;
    log_source(loaded.source.as_ref());
    Ok(loaded.resolved)
}

pub fn load_config_from(paths: &[PathBuf]) -> AppResult<ResolvedConfig> {
    let loaded = load_resolved_from_paths(paths).map_err(map_config_error)?;
    log_source(loaded.source.as_ref());
    Ok(loaded.resolved)
}

fn log_source(source: Option<&PathBuf>) {
    match source {
        Some(path) => tracing::debug!(path = %path.display(), "loaded configuration"),
        None => tracing::debug!("no configuration file found; using defaults"),
    }
}

/// Flags given on the command line win over the configuration file.
pub fn apply_model_overrides(mut config: ResolvedConfig, args: &ModelArgs) -> ResolvedConfig {
    if let Some(path) = &args.landmark_model {
        config.landmark_model = Some(path.clone());
    }
    if let Some(path) = &args.encoder_model {
        config.encoder_model = Some(path.clone());
    }
    if let Some(jitters) = args.jitters {
        config.jitters = jitters.max(1);
    }
    config
}

pub fn map_config_error(err: ConfigError) -> AppError {
    match err {
        ConfigError::Read { path, source } => AppError::ConfigRead { path, source },
        ConfigError::Parse { path, message } => AppError::ConfigParse { path, message },
    }
}
