// =============================================================================
// Runtime Configuration — engine and server settings
// =============================================================================
//
// Loaded once at startup from `engine_config.json`.  All fields carry a serde
// default so a partial (or empty) file is valid.  Two environment variables
// override the file after `.env` has been loaded:
//
//   INDICATOR_BIND_ADDR   listen address
//   INDICATOR_PARALLEL    `true` / `false`
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "engine_config.json";

const ENV_BIND_ADDR: &str = "INDICATOR_BIND_ADDR";
const ENV_PARALLEL: &str = "INDICATOR_PARALLEL";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_true() -> bool {
    true
}

fn default_parallel_min_rows() -> usize {
    256
}

fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024
}

// =============================================================================
// EngineConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Evaluate independent indicator calls on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Smallest series that is worth fanning out.
    #[serde(default = "default_parallel_min_rows")]
    pub parallel_min_rows: usize,

    /// Request body cap for `POST /api/v1/enrich`.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            parallel: true,
            parallel_min_rows: default_parallel_min_rows(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or malformed file is an error; the caller decides whether
    /// to fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse engine config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            parallel = config.parallel,
            "engine config loaded"
        );

        Ok(config)
    }

    /// [`load`](Self::load), falling back to defaults with a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, "using default engine config");
                Self::default()
            }
        }
    }

    /// Apply `INDICATOR_BIND_ADDR` / `INDICATOR_PARALLEL` from the process
    /// environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_BIND_ADDR).ok(),
            std::env::var(ENV_PARALLEL).ok(),
        );
    }

    fn apply_overrides(&mut self, bind_addr: Option<String>, parallel: Option<String>) {
        if let Some(addr) = bind_addr.filter(|a| !a.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(raw) = parallel {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.parallel = true,
                "0" | "false" | "no" | "off" => self.parallel = false,
                other => warn!(value = %other, "ignoring invalid {ENV_PARALLEL}"),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert!(cfg.parallel);
        assert_eq!(cfg.parallel_min_rows, 256);
        assert_eq!(cfg.max_body_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "parallel": false, "parallel_min_rows": 10 }"#;
        let cfg: EngineConfig = serde_json::from_str(json).unwrap();
        assert!(!cfg.parallel);
        assert_eq!(cfg.parallel_min_rows, 10);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(EngineConfig::load("/nonexistent/engine_config.json").is_err());
        assert_eq!(
            EngineConfig::load_or_default("/nonexistent/engine_config.json"),
            EngineConfig::default()
        );
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("engine_config_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{ "bind_addr": "127.0.0.1:9000" }"#).unwrap();
        let cfg = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert!(cfg.parallel);
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut cfg = EngineConfig::default();
        cfg.apply_overrides(Some("127.0.0.1:8080".into()), Some("false".into()));
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert!(!cfg.parallel);

        cfg.apply_overrides(None, Some("ON".into()));
        assert!(cfg.parallel);
    }

    #[test]
    fn invalid_parallel_override_is_ignored() {
        let mut cfg = EngineConfig::default();
        cfg.apply_overrides(Some("  ".into()), Some("maybe".into()));
        assert_eq!(cfg, EngineConfig::default());
    }
}
