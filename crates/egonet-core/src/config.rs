use crate::{EgoNetError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main configuration for EgoNet analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EgoNetConfig {
    /// Iteration bounds and tolerances for metric computations
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Random down-sampling defaults
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Node coloring defaults
    #[serde(default)]
    pub colors: ColorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Power-iteration bound for eigenvector centrality
    #[serde(default = "default_eigenvector_max_iterations")]
    pub eigenvector_max_iterations: usize,

    /// Convergence tolerance, scaled by node count
    #[serde(default = "default_eigenvector_tolerance")]
    pub eigenvector_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            eigenvector_max_iterations: default_eigenvector_max_iterations(),
            eigenvector_tolerance: default_eigenvector_tolerance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Roster size kept by a default down-sample (ego included)
    #[serde(default = "default_sample_target")]
    pub target_count: usize,

    /// Fixed seed for reproducible samples
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            target_count: default_sample_target(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_ego_color")]
    pub ego: String,

    /// Used for alters whose attribute value has no palette entry
    #[serde(default = "default_fallback_color")]
    pub fallback: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            ego: default_ego_color(),
            fallback: default_fallback_color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "full", "compact", "pretty"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_eigenvector_max_iterations() -> usize {
    100
}
fn default_eigenvector_tolerance() -> f64 {
    1.0e-6
}
fn default_sample_target() -> usize {
    200
}
fn default_ego_color() -> String {
    "blue".to_string()
}
fn default_fallback_color() -> String {
    "white".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "full".to_string()
}

/// Configuration manager with layered sources
pub struct ConfigManager {
    config: EgoNetConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file)
    /// 2. Config file (.egonet.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        Self::load_dotenv();

        let (config, config_path) = Self::load_config_file()?;
        let config = Self::apply_env_overrides(config)?;
        Self::validate_config(&config)?;

        match config_path {
            Some(ref path) => info!("Loaded EgoNet config from {}", path.display()),
            None => info!("No EgoNet config file found, using defaults"),
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Load an explicit config file; environment overrides still apply.
    pub fn from_path(path: &Path) -> Result<Self> {
        let config = Self::read_toml_file(path)?;
        let config = Self::apply_env_overrides(config)?;
        Self::validate_config(&config)?;
        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            }
        }
    }

    /// Search order:
    /// 1. ./.egonet.toml
    /// 2. ~/.egonet/config.toml
    fn load_config_file() -> Result<(EgoNetConfig, Option<PathBuf>)> {
        let local_config = Path::new(".egonet.toml");
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".egonet").join("config.toml");
            if user_config.exists() {
                let config = Self::read_toml_file(&user_config)?;
                return Ok((config, Some(user_config)));
            }
        }

        Ok((EgoNetConfig::default(), None))
    }

    fn read_toml_file(path: &Path) -> Result<EgoNetConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: EgoNetConfig = toml::from_str(&content)?;
        Ok(config)
    }

    fn apply_env_overrides(mut config: EgoNetConfig) -> Result<EgoNetConfig> {
        if let Ok(level) = std::env::var("EGONET_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("EGONET_LOG_FORMAT") {
            config.logging.format = format;
        }
        if let Ok(iterations) = std::env::var("EGONET_EIGENVECTOR_MAX_ITERATIONS") {
            config.analysis.eigenvector_max_iterations = iterations.parse().map_err(|_| {
                EgoNetError::Config(format!(
                    "EGONET_EIGENVECTOR_MAX_ITERATIONS is not a number: {}",
                    iterations
                ))
            })?;
        }
        if let Ok(seed) = std::env::var("EGONET_SAMPLE_SEED") {
            config.sampling.seed = Some(seed.parse().map_err(|_| {
                EgoNetError::Config(format!("EGONET_SAMPLE_SEED is not a number: {}", seed))
            })?);
        }
        Ok(config)
    }

    pub fn validate_config(config: &EgoNetConfig) -> Result<()> {
        if config.analysis.eigenvector_max_iterations == 0 {
            return Err(EgoNetError::Config(
                "eigenvector_max_iterations must be at least 1".to_string(),
            ));
        }
        if !(config.analysis.eigenvector_tolerance > 0.0) {
            return Err(EgoNetError::Config(format!(
                "eigenvector_tolerance must be positive, got {}",
                config.analysis.eigenvector_tolerance
            )));
        }
        if config.sampling.target_count == 0 {
            return Err(EgoNetError::Config(
                "sampling target_count must be at least 1".to_string(),
            ));
        }

        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(EgoNetError::Config(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    other
                )))
            }
        }

        match config.logging.format.as_str() {
            "full" | "compact" | "pretty" => {}
            other => {
                return Err(EgoNetError::Config(format!(
                    "Invalid log format: {}. Must be one of: full, compact, pretty",
                    other
                )))
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &EgoNetConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn create_default_config(path: &Path) -> Result<()> {
        let config = EgoNetConfig::default();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| EgoNetError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}
