//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the external
//! CLI tools the pipeline drives (ffmpeg, ffprobe) and provides lookup
//! methods for the node implementations.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ToolsConfig;
use crate::error::{Error, Result};

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// Resolved location of a single external tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Human-readable tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool locations.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// For each known tool, if the [`ToolsConfig`] supplies a custom path
    /// **and** that path exists, it is used directly. Otherwise
    /// [`which::which`] is used to locate the tool in `PATH`. Tools that are
    /// not found are silently omitted from the registry.
    pub fn discover(tools_config: &ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "ffmpeg" => tools_config.ffmpeg_path.as_deref(),
                "ffprobe" => tools_config.ffprobe_path.as_deref(),
                _ => None,
            };

            let resolved = if let Some(p) = custom_path {
                if p.exists() {
                    Some(p.to_path_buf())
                } else {
                    // Custom path does not exist; fall back to PATH.
                    which::which(name).ok()
                }
            } else {
                which::which(name).ok()
            };

            if let Some(path) = resolved {
                tools.insert(
                    name.to_string(),
                    ToolConfig {
                        name: name.to_string(),
                        path,
                    },
                );
            }
        }

        Self { tools }
    }

    /// Return a reference to the [`ToolConfig`] for the given tool, or an
    /// [`Error::Launch`] if the tool was not found during discovery.
    pub fn require(&self, name: &str) -> Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| Error::Launch {
            tool: name.to_string(),
            message: format!("{name} not found; is it installed and in PATH?"),
        })
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| {
                if let Some(cfg) = self.tools.get(name) {
                    let version = detect_version(&cfg.path);
                    ToolInfo {
                        name: name.to_string(),
                        available: true,
                        version,
                        path: Some(cfg.path.clone()),
                    }
                } else {
                    ToolInfo {
                        name: name.to_string(),
                        available: false,
                        version: None,
                        path: None,
                    }
                }
            })
            .collect()
    }
}

/// Run `<tool> -version` and return the first line of stdout.
fn detect_version(path: &PathBuf) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}
