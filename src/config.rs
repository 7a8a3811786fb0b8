use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{Result, RuenError};

/// Default location of the Argos package index
pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/argosopentech/argospm-index/main/index.json";

fn default_freshness_window_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub io: IoConfig,
    pub source: SourceConfig,
    pub detection: DetectionConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoConfig {
    /// File the text to translate is read from
    pub input_path: PathBuf,
    /// File the translation is written to (overwritten on every successful run)
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Where the input text comes from
    pub mode: SourceMode,
    /// The input file wins over the clipboard if it was modified less than
    /// this many seconds ago (Auto mode only)
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceMode {
    /// File: always read the input file
    File,
    /// Auto: read the input file if it is fresh, the clipboard otherwise
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// How the translation direction is chosen
    pub mode: DetectionMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMode {
    /// Heuristic: any Cyrillic letter means Russian
    Heuristic,
    /// Detector: statistical language detection, heuristic on failure
    Detector,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to the argos-translate binary
    pub binary_path: String,
    /// Argos package store; the engine's own default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages_dir: Option<PathBuf>,
    /// URL of the remote package index
    pub index_url: String,
    /// Directory for the downloaded index and package archives
    pub cache_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io: IoConfig {
                input_path: PathBuf::from("input.txt"),
                output_path: PathBuf::from("output.txt"),
            },
            source: SourceConfig {
                mode: SourceMode::Auto,
                freshness_window_secs: default_freshness_window_secs(),
            },
            detection: DetectionConfig {
                mode: DetectionMode::Detector,
            },
            engine: EngineConfig {
                binary_path: "argos-translate".to_string(),
                packages_dir: None,
                index_url: DEFAULT_INDEX_URL.to_string(),
                cache_dir: PathBuf::from(".ruen/cache"),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuenError::Config(format!("Failed to read config file: {}", e)))?;

        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RuenError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| RuenError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load the explicit config file, else `config.toml` from the current
    /// directory, else the defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                if Path::new("config.toml").exists() {
                    info!("Found config.toml in current directory, loading...");
                    Self::from_file("config.toml")
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

impl SourceConfig {
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_secs)
    }
}

impl EngineConfig {
    /// Resolve the package store the same way argos-translate does:
    /// explicit setting, then `ARGOS_PACKAGES_DIR`, then
    /// `$XDG_DATA_HOME/argos-translate/packages` with `~/.local/share` as the
    /// data home on every platform
    pub fn resolve_packages_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.packages_dir {
            return Ok(dir.clone());
        }

        if let Some(dir) = std::env::var_os("ARGOS_PACKAGES_DIR") {
            return Ok(PathBuf::from(dir));
        }

        default_packages_dir(std::env::var_os("XDG_DATA_HOME"), dirs::home_dir()).ok_or_else(|| {
            RuenError::Config("Cannot determine the Argos package directory".to_string())
        })
    }

    pub fn index_cache_path(&self) -> PathBuf {
        self.cache_dir.join("index.json")
    }
}

/// Argos's default package store for a given `XDG_DATA_HOME` and home dir
fn default_packages_dir(xdg_data_home: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    let data_home = match xdg_data_home.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home?.join(".local").join("share"),
    };
    Some(data_home.join("argos-translate").join("packages"))
}

impl FromStr for SourceMode {
    type Err = RuenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "auto" => Ok(Self::Auto),
            _ => Err(RuenError::Config(format!(
                "Invalid source mode '{}'. Valid modes: auto, file",
                s
            ))),
        }
    }
}

impl FromStr for DetectionMode {
    type Err = RuenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "heuristic" => Ok(Self::Heuristic),
            "detector" => Ok(Self::Detector),
            _ => Err(RuenError::Config(format!(
                "Invalid detection mode '{}'. Valid modes: detector, heuristic",
                s
            ))),
        }
    }
}
