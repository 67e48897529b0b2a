// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{ExportError, Result};

/// Basic sanity checks on a parsed configuration.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    if cfg.compiler.path.trim().is_empty() {
        return Err(ExportError::ConfigError(
            "[compiler].path must not be empty".to_string(),
        ));
    }

    if cfg.export.output_dir.trim().is_empty() {
        return Err(ExportError::ConfigError(
            "[export].output_dir must not be empty".to_string(),
        ));
    }

    Ok(())
}
