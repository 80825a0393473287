/*!
 * Simulation Configuration
 *
 * Layered configuration for both allocator variants:
 * 1. Built-in defaults from `core::limits`
 * 2. Optional JSON file named by `FRAGSIM_CONFIG`
 * 3. Environment overrides (`FRAGSIM_TOTAL_MEMORY`, `FRAGSIM_BLOCK_SIZE`,
 *    `FRAGSIM_FRAGMENT_THRESHOLD`, `FRAGSIM_MAX_REQUEST`)
 */

use crate::core::limits::{DEFAULT_BLOCK_SIZE, DEFAULT_FRAGMENT_THRESHOLD, DEFAULT_TOTAL_MEMORY};
use crate::core::types::Size;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const ENV_CONFIG_PATH: &str = "FRAGSIM_CONFIG";
pub const ENV_TOTAL_MEMORY: &str = "FRAGSIM_TOTAL_MEMORY";
pub const ENV_BLOCK_SIZE: &str = "FRAGSIM_BLOCK_SIZE";
pub const ENV_FRAGMENT_THRESHOLD: &str = "FRAGSIM_FRAGMENT_THRESHOLD";
pub const ENV_MAX_REQUEST: &str = "FRAGSIM_MAX_REQUEST";

/// Configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Total memory must be positive")]
    #[diagnostic(code(config::zero_capacity))]
    ZeroCapacity,

    #[error("Block size must be positive")]
    #[diagnostic(code(config::zero_block_size))]
    ZeroBlockSize,

    #[error("Block size {block_size} exceeds total memory {total_memory}")]
    #[diagnostic(
        code(config::block_too_large),
        help("Use a block size no larger than the address space, ideally one that divides it.")
    )]
    BlockLargerThanMemory { block_size: Size, total_memory: Size },

    #[error("Request limit must be positive when set")]
    #[diagnostic(code(config::zero_request_limit), help("Unset the limit to disable it."))]
    ZeroRequestLimit,

    #[error("Invalid value {value:?} for {var}")]
    #[diagnostic(
        code(config::invalid_env),
        help("Environment overrides must be non-negative integers.")
    )]
    InvalidEnv { var: &'static str, value: String },

    #[error("Failed to read config file {}", .path.display())]
    #[diagnostic(code(config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {}", .path.display())]
    #[diagnostic(code(config::parse), help("The config file must be a JSON object."))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fixed-block allocator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedBlockConfig {
    pub total_memory: Size,
    pub block_size: Size,
    /// Caller-side cap on a single request
    pub max_request: Option<Size>,
}

impl Default for FixedBlockConfig {
    fn default() -> Self {
        Self {
            total_memory: DEFAULT_TOTAL_MEMORY,
            block_size: DEFAULT_BLOCK_SIZE,
            max_request: None,
        }
    }
}

impl FixedBlockConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_memory == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.block_size > self.total_memory {
            return Err(ConfigError::BlockLargerThanMemory {
                block_size: self.block_size,
                total_memory: self.total_memory,
            });
        }
        if self.max_request == Some(0) {
            return Err(ConfigError::ZeroRequestLimit);
        }
        Ok(())
    }
}

/// First-fit allocator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstFitConfig {
    pub total_memory: Size,
    /// Free regions strictly smaller than this are reported as fragmented
    pub fragment_threshold: Size,
    /// Caller-side cap on a single request
    pub max_request: Option<Size>,
}

impl Default for FirstFitConfig {
    fn default() -> Self {
        Self {
            total_memory: DEFAULT_TOTAL_MEMORY,
            fragment_threshold: DEFAULT_FRAGMENT_THRESHOLD,
            max_request: None,
        }
    }
}

impl FirstFitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_memory == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_request == Some(0) {
            return Err(ConfigError::ZeroRequestLimit);
        }
        Ok(())
    }
}

/// Configuration for a full simulation session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub fixed: FixedBlockConfig,
    pub first_fit: FirstFitConfig,
}

impl SimulationConfig {
    /// Load defaults, then the `FRAGSIM_CONFIG` file if set, then env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::from_json_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;

        info!(
            fixed_memory = config.fixed.total_memory,
            block_size = config.fixed.block_size,
            first_fit_memory = config.first_fit.total_memory,
            fragment_threshold = config.first_fit.fragment_threshold,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Read config file");
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |var: &'static str| -> Result<Option<Size>, ConfigError> {
            match lookup(var) {
                Some(value) => value
                    .trim()
                    .parse::<Size>()
                    .map(Some)
                    .map_err(|_| ConfigError::InvalidEnv { var, value }),
                None => Ok(None),
            }
        };

        if let Some(total) = parse(ENV_TOTAL_MEMORY)? {
            self.fixed.total_memory = total;
            self.first_fit.total_memory = total;
        }
        if let Some(block_size) = parse(ENV_BLOCK_SIZE)? {
            self.fixed.block_size = block_size;
        }
        if let Some(threshold) = parse(ENV_FRAGMENT_THRESHOLD)? {
            self.first_fit.fragment_threshold = threshold;
        }
        if let Some(limit) = parse(ENV_MAX_REQUEST)? {
            self.fixed.max_request = Some(limit);
            self.first_fit.max_request = Some(limit);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fixed.validate()?;
        self.first_fit.validate()
    }
}
