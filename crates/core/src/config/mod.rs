use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{PlayerOptions, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub options: PlayerOptions,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            options: PlayerOptions::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Turn;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"options":{"turn":"mirror","hold_notes":false}}"#).unwrap();

        assert_eq!(config.options.turn, Turn::Mirror);
        assert!(!config.options.hold_notes);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, crate::ChartError::Io(_)));
    }
}
