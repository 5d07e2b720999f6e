//! Pipeline configuration types.
//!
//! [`PipelineConfig`] is deserialized from JSON and shared read-only across
//! every node in a pipeline. Every field defaults sensibly so a completely
//! empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Process-wide pipeline configuration.
///
/// The orchestrator owns one of these for the lifetime of the pipeline; nodes
/// hold an `Arc` and never mutate it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Suppress all informational output from supervised processes, surfacing
    /// only errors.
    pub quiet: bool,
    /// Capture verbose per-process log files for post-mortem diagnosis.
    pub debug_logs: bool,
    /// External tool locations.
    pub tools: ToolsConfig,
}

/// Optional explicit paths for external tools.
///
/// When a path is absent (or does not exist), the tool is located on `PATH`
/// instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
}

impl PipelineConfig {
    /// Deserialize a `PipelineConfig` from a JSON string.
    ///
    /// This is intentionally string-based so the caller can read the file
    /// however it sees fit (async, embedded, etc.).
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_off() {
        let cfg = PipelineConfig::default();
        assert!(!cfg.quiet);
        assert!(!cfg.debug_logs);
        assert!(cfg.tools.ffmpeg_path.is_none());
    }

    #[test]
    fn empty_json_is_valid() {
        let cfg = PipelineConfig::from_json("{}").unwrap();
        assert!(!cfg.quiet);
        assert!(!cfg.debug_logs);
    }

    #[test]
    fn parses_fields() {
        let cfg = PipelineConfig::from_json(
            r#"{"quiet": true, "debug_logs": true, "tools": {"ffmpeg_path": "/opt/ffmpeg"}}"#,
        )
        .unwrap();
        assert!(cfg.quiet);
        assert!(cfg.debug_logs);
        assert_eq!(cfg.tools.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg")));
    }

    #[test]
    fn invalid_json_is_validation_error() {
        let err = PipelineConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let cfg = PipelineConfig::load_or_default(Some(Path::new("/nonexistent/pipefeed.json")));
        assert!(!cfg.quiet);
    }

    #[test]
    fn load_none_uses_defaults() {
        let cfg = PipelineConfig::load_or_default(None);
        assert!(!cfg.debug_logs);
    }

    #[test]
    fn load_existing_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"quiet": true}}"#).unwrap();
        let cfg = PipelineConfig::load_or_default(Some(tmp.path()));
        assert!(cfg.quiet);
    }

    #[test]
    fn roundtrips_through_json() {
        let cfg = PipelineConfig {
            quiet: true,
            debug_logs: false,
            tools: ToolsConfig::default(),
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back = PipelineConfig::from_json(&json).unwrap();
        assert!(back.quiet);
        assert!(!back.debug_logs);
    }
}
