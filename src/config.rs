//! Mapper configuration
//!
//! Resolution order, highest first:
//! 1. Command-line flags (applied by the binary)
//! 2. Environment variables
//! 3. YAML config file
//! 4. Compiled defaults
//!
//! Relative paths are resolved against `data_dir`.

use crate::source::{CreditClientOptions, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_READ_ONLY: &str = "MERIDIAN_READ_ONLY";
pub const ENV_DATA_DIR: &str = "MERIDIAN_DATA_DIR";
pub const ENV_CREDITS_TOKEN: &str = "DISCOGS_TOKEN";
/// Set by the hosting platform whose filesystem is read-only
pub const ENV_HOSTED: &str = "VERCEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub base_url: String,
    pub attempts: u32,
    pub retry_delay_ms: u64,
    pub quota_backoff_ms: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.deezer.com".to_string(),
            attempts: 3,
            retry_delay_ms: 1500,
            quota_backoff_ms: 2000,
        }
    }
}

impl CatalogSettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts, Duration::from_millis(self.retry_delay_ms))
            .with_quota_backoff(Duration::from_millis(self.quota_backoff_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub attempts: u32,
    pub retry_delay_ms: u64,
    pub default_retry_after_secs: u64,
    pub pacing_ms: u64,
    pub user_agent: String,
}

impl Default for CreditSettings {
    fn default() -> Self {
        let defaults = CreditClientOptions::default();
        Self {
            base_url: defaults.base_url,
            token: None,
            attempts: 2,
            retry_delay_ms: 2000,
            default_retry_after_secs: 3,
            pacing_ms: 1200,
            user_agent: defaults.user_agent,
        }
    }
}

impl CreditSettings {
    pub fn options(&self) -> CreditClientOptions {
        CreditClientOptions {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            user_agent: self.user_agent.clone(),
            policy: RetryPolicy::new(self.attempts, Duration::from_millis(self.retry_delay_ms)),
            default_retry_after: Duration::from_secs(self.default_retry_after_secs),
            pacing: Duration::from_millis(self.pacing_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSettings {
    pub search_url: String,
    pub attempts: u32,
    pub retry_delay_ms: u64,
    pub user_agent: String,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search".to_string(),
            attempts: 2,
            retry_delay_ms: 1500,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)"
                .to_string(),
        }
    }
}

impl WebSettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts, Duration::from_millis(self.retry_delay_ms))
    }
}

/// Per-axis tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    pub tempo_window: f64,
    pub tempo_limit: usize,
    pub era_window: i32,
    pub era_weight: f64,
    pub related_limit: usize,
    pub related_weight: f64,
    pub album_limit: usize,
    pub track_limit: usize,
    pub album_pacing_ms: u64,
    pub member_limit: usize,
    pub member_group_limit: usize,
    pub solo_group_limit: usize,
    pub peer_weight: f64,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            tempo_window: 5.0,
            tempo_limit: 20,
            era_window: 2,
            era_weight: 0.6,
            related_limit: 10,
            related_weight: 0.7,
            album_limit: 20,
            track_limit: 50,
            album_pacing_ms: 250,
            member_limit: 10,
            member_group_limit: 6,
            solo_group_limit: 8,
            peer_weight: 0.5,
        }
    }
}

impl AxisSettings {
    pub fn album_pacing(&self) -> Duration {
        Duration::from_millis(self.album_pacing_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Base directory for every relative path below
    pub data_dir: PathBuf,
    pub graph_file: PathBuf,
    pub tempo_dataset: PathBuf,
    /// Extra JSON arrays of `{artist}` records consulted by gap analysis
    pub reference_datasets: Vec<PathBuf>,
    pub fixtures_file: PathBuf,
    /// Never write the graph back (hosted deployments)
    pub read_only: bool,
    pub catalog: CatalogSettings,
    pub credits: CreditSettings,
    pub web: WebSettings,
    pub axes: AxisSettings,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            graph_file: PathBuf::from("graph.json"),
            tempo_dataset: PathBuf::from("tracks.json"),
            reference_datasets: vec![PathBuf::from("library.json")],
            fixtures_file: PathBuf::from("fixtures.yaml"),
            read_only: false,
            catalog: CatalogSettings::default(),
            credits: CreditSettings::default(),
            web: WebSettings::default(),
            axes: AxisSettings::default(),
        }
    }
}

/// Default data directory (~/.local/share/meridian on Linux)
pub fn default_data_dir() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("meridian")
}

/// Truthy unless empty, `0` or `false`
fn flag_set(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

impl MapperConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file. A missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable lookup.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if lookup(ENV_READ_ONLY).is_some_and(|v| flag_set(&v))
            || lookup(ENV_HOSTED).is_some_and(|v| flag_set(&v))
        {
            self.read_only = true;
        }
        if let Some(token) = lookup(ENV_CREDITS_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.credits.token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let axes = &self.axes;
        if axes.tempo_window < 0.0 {
            return Err(ConfigError::Invalid("axes.tempo_window must be >= 0".into()));
        }
        if axes.era_window < 0 {
            return Err(ConfigError::Invalid("axes.era_window must be >= 0".into()));
        }
        for (name, weight) in [
            ("axes.related_weight", axes.related_weight),
            ("axes.era_weight", axes.era_weight),
            ("axes.peer_weight", axes.peer_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::Invalid(format!("{} must be within [0, 1]", name)));
            }
        }
        Ok(())
    }

    /// Resolve a configured path against `data_dir`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn graph_path(&self) -> PathBuf {
        self.resolve(&self.graph_file)
    }

    pub fn tempo_dataset_path(&self) -> PathBuf {
        self.resolve(&self.tempo_dataset)
    }

    pub fn fixtures_path(&self) -> PathBuf {
        self.resolve(&self.fixtures_file)
    }

    pub fn reference_paths(&self) -> Vec<PathBuf> {
        self.reference_datasets.iter().map(|p| self.resolve(p)).collect()
    }
}
