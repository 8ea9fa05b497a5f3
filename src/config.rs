//! TOML configuration for threatcorr.
//!
//! A small layered model: an explicit path, then the `THREATCORR_CONFIG`
//! environment variable, then the system location, then compiled-in defaults.
//! The scoring lookup tables are not configurable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::correlate::DEFAULT_TIME_WINDOW_SECS;

pub const CONFIG_ENV_VAR: &str = "THREATCORR_CONFIG";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/threatcorr/threatcorr.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreatCorrConfig {
    #[serde(default)]
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` on the command line.
    Explicit(PathBuf),
    /// The `THREATCORR_CONFIG` environment variable.
    Environment(PathBuf),
    /// [`SYSTEM_CONFIG_PATH`].
    System(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Environment(p) | ConfigSource::System(p) => {
                Some(p)
            }
            ConfigSource::Defaults => None,
        }
    }
}

/// A candidate file that existed or was named but failed to load.
#[derive(Debug)]
pub struct RejectedConfig {
    pub source: ConfigSource,
    pub error: anyhow::Error,
}

/// Outcome of config resolution. Resolution runs before logging is set up, so
/// diagnostics are kept here and emitted by [`ResolvedConfig::log`].
#[derive(Debug)]
pub struct ResolvedConfig {
    pub config: ThreatCorrConfig,
    pub source: ConfigSource,
    pub rejected: Vec<RejectedConfig>,
}

impl ResolvedConfig {
    /// Report how the configuration was resolved. Call after the tracing
    /// subscriber is installed.
    pub fn log(&self) {
        for rejected in &self.rejected {
            let path = rejected.source.path().map(Path::display);
            match rejected.source {
                ConfigSource::Environment(_) => warn!(
                    path = ?path,
                    error = %format!("{:#}", rejected.error),
                    "THREATCORR_CONFIG set but file could not be loaded, trying fallback"
                ),
                _ => warn!(
                    path = ?path,
                    error = %format!("{:#}", rejected.error),
                    "system config file exists but could not be loaded, using defaults"
                ),
            }
        }

        match self.source.path() {
            Some(path) => info!(path = %path.display(), "loaded threatcorr configuration"),
            None => debug!("no config file loaded, using compiled-in defaults"),
        }
    }
}

impl ThreatCorrConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Resolve configuration from `explicit`, then [`CONFIG_ENV_VAR`], then
    /// [`SYSTEM_CONFIG_PATH`], then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<ResolvedConfig> {
        let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::resolve_from(explicit, env_path.as_deref(), Path::new(SYSTEM_CONFIG_PATH))
    }

    /// An explicit path must load. The environment path is tried whenever it
    /// is set, the system path only when the file exists; a failure at either
    /// is recorded and resolution moves on.
    pub fn resolve_from(
        explicit: Option<&Path>,
        env_path: Option<&Path>,
        system_path: &Path,
    ) -> Result<ResolvedConfig> {
        if let Some(path) = explicit {
            return Ok(ResolvedConfig {
                config: Self::load(path)?,
                source: ConfigSource::Explicit(path.to_path_buf()),
                rejected: Vec::new(),
            });
        }

        let candidates = [
            env_path.map(|p| ConfigSource::Environment(p.to_path_buf())),
            system_path
                .exists()
                .then(|| ConfigSource::System(system_path.to_path_buf())),
        ];

        let mut rejected = Vec::new();
        for source in candidates.into_iter().flatten() {
            let Some(path) = source.path() else { continue };
            match Self::load(path) {
                Ok(config) => {
                    return Ok(ResolvedConfig {
                        config,
                        source,
                        rejected,
                    })
                }
                Err(error) => rejected.push(RejectedConfig { source, error }),
            }
        }

        Ok(ResolvedConfig {
            config: Self::default(),
            source: ConfigSource::Defaults,
            rejected,
        })
    }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Maximum gap, in seconds, between chained events.
    pub time_window_seconds: u64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            time_window_seconds: DEFAULT_TIME_WINDOW_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = ThreatCorrConfig::default();
        assert_eq!(cfg.correlation.time_window_seconds, 3600);
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.logging.json);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: ThreatCorrConfig = toml::from_str(
            r#"
[logging]
json = true
"#,
        )
        .unwrap();
        assert!(cfg.logging.json);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.correlation.time_window_seconds, 3600);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let cfg: ThreatCorrConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.correlation.time_window_seconds, 3600);
    }

    #[test]
    fn test_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("threatcorr.toml");
        std::fs::write(
            &path,
            r#"
[correlation]
time_window_seconds = 900
"#,
        )
        .unwrap();

        let resolved =
            ThreatCorrConfig::resolve_from(Some(&path), None, Path::new("/nonexistent")).unwrap();
        assert_eq!(resolved.config.correlation.time_window_seconds, 900);
        assert_eq!(resolved.source, ConfigSource::Explicit(path));
        assert!(resolved.rejected.is_empty());
    }

    #[test]
    fn test_explicit_missing_path_errors() {
        let result = ThreatCorrConfig::resolve_from(
            Some(Path::new("/nonexistent/threatcorr.toml")),
            None,
            Path::new("/nonexistent"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[correlation]\ntime_window_seconds = \"soon\"\n").unwrap();
        assert!(ThreatCorrConfig::load(&path).is_err());
    }

    #[test]
    fn test_unloadable_env_path_is_recorded_and_defaults_used() {
        let dir = tempfile::TempDir::new().unwrap();
        let env_path = dir.path().join("missing.toml");
        let system_path = dir.path().join("also-missing.toml");

        let resolved = ThreatCorrConfig::resolve_from(None, Some(&env_path), &system_path).unwrap();
        assert_eq!(resolved.source, ConfigSource::Defaults);
        assert_eq!(resolved.rejected.len(), 1);
        assert_eq!(resolved.rejected[0].source, ConfigSource::Environment(env_path));
        assert!(format!("{:#}", resolved.rejected[0].error).contains("failed to read config file"));
        assert_eq!(resolved.config.correlation.time_window_seconds, 3600);
    }

    #[test]
    fn test_bad_env_file_falls_through_to_system() {
        let dir = tempfile::TempDir::new().unwrap();
        let env_path = dir.path().join("env.toml");
        std::fs::write(&env_path, "[logging\n").unwrap();
        let system_path = dir.path().join("system.toml");
        std::fs::write(&system_path, "[correlation]\ntime_window_seconds = 120\n").unwrap();

        let resolved = ThreatCorrConfig::resolve_from(None, Some(&env_path), &system_path).unwrap();
        assert_eq!(resolved.source, ConfigSource::System(system_path));
        assert_eq!(resolved.config.correlation.time_window_seconds, 120);
        assert_eq!(resolved.rejected.len(), 1);
    }

    #[test]
    fn test_env_file_wins_over_system() {
        let dir = tempfile::TempDir::new().unwrap();
        let env_path = dir.path().join("env.toml");
        std::fs::write(&env_path, "[logging]\nlevel = \"debug\"\n").unwrap();
        let system_path = dir.path().join("system.toml");
        std::fs::write(&system_path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let resolved = ThreatCorrConfig::resolve_from(None, Some(&env_path), &system_path).unwrap();
        assert_eq!(resolved.source, ConfigSource::Environment(env_path));
        assert_eq!(resolved.config.logging.level, "debug");
        assert!(resolved.rejected.is_empty());
    }

    #[test]
    fn test_no_candidates_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let resolved =
            ThreatCorrConfig::resolve_from(None, None, &dir.path().join("absent.toml")).unwrap();
        assert_eq!(resolved.source, ConfigSource::Defaults);
        assert!(resolved.source.path().is_none());
        assert!(resolved.rejected.is_empty());
    }
}
