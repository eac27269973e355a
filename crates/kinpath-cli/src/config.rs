//! CLI configuration
//!
//! Values come from `~/.kinpath/config.toml`. Flags and environment
//! variables are applied on top by the commands that read them.

use std::path::{Path, PathBuf};

use kinpath_core::limits::{validate_search_depth, DEFAULT_MAX_DEPTH};
use kinpath_core::LayoutMetrics;
use serde::{Deserialize, Serialize};

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kinpath")
}

/// Default location of the config file
pub fn config_file_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hops searched per side by `find`
    pub max_depth: u32,

    /// Where the database lives; `None` means the default directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// `table` or `json`
    pub default_format: String,

    pub layout: LayoutMetrics,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            data_dir: None,
            default_format: "table".to_string(),
            layout: LayoutMetrics::default(),
        }
    }
}

const KEYS: &[&str] = &[
    "max_depth",
    "data_dir",
    "default_format",
    "layout.node_width",
    "layout.node_height",
    "layout.horizontal_gap",
    "layout.vertical_gap",
];

impl Config {
    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Keys accepted by `get` and `set`
    pub fn keys() -> &'static [&'static str] {
        KEYS
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "max_depth" => self.max_depth.to_string(),
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string()),
            "default_format" => self.default_format.clone(),
            "layout.node_width" => self.layout.node_width.to_string(),
            "layout.node_height" => self.layout.node_height.to_string(),
            "layout.horizontal_gap" => self.layout.horizontal_gap.to_string(),
            "layout.vertical_gap" => self.layout.vertical_gap.to_string(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "max_depth" => {
                let depth: u32 = value.parse()?;
                validate_search_depth(depth)?;
                self.max_depth = depth;
            }
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "default_format" => match value {
                "table" | "json" => self.default_format = value.to_string(),
                other => anyhow::bail!("Unknown format '{}'. Use table or json", other),
            },
            "layout.node_width" => self.layout.node_width = parse_size(value)?,
            "layout.node_height" => self.layout.node_height = parse_size(value)?,
            "layout.horizontal_gap" => self.layout.horizontal_gap = parse_size(value)?,
            "layout.vertical_gap" => self.layout.vertical_gap = parse_size(value)?,
            other => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                other,
                KEYS.join(", ")
            ),
        }
        Ok(())
    }
}

fn parse_size(value: &str) -> anyhow::Result<f64> {
    let size: f64 = value.parse()?;
    if !size.is_finite() || size < 0.0 {
        anyhow::bail!("Size must be a non-negative number, got {}", value);
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_depth, 10);
    }

    #[test]
    fn test_set_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("max_depth", "4").unwrap();
        config.set("layout.node_width", "120").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.max_depth, 4);
        assert_eq!(loaded.get("layout.node_width").unwrap(), "120");
        assert_eq!(loaded.layout.vertical_gap, 60.0);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_depth = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.default_format, "table");
        assert_eq!(config.layout, LayoutMetrics::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("max_depth", "51").is_err());
        assert!(config.set("default_format", "xml").is_err());
        assert!(config.set("layout.node_height", "-1").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, Config::default());
    }
}
