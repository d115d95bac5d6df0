//! Stress run configuration.
//!
//! Settings come from an optional YAML file and are overridden by flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default number of payloads moved through the buffer.
pub const DEFAULT_ITERATIONS: usize = 65535;
/// Default segment size (chain) or capacity (ring) in bytes.
pub const DEFAULT_SIZE: usize = 1024;
/// Default ring poll timeout in milliseconds.
pub const DEFAULT_POLL_MS: u64 = 4;

/// Settings for one stress run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// Number of payloads to write and read back.
    pub iterations: usize,

    /// Segment size for `chain`, capacity for `ring`.
    pub size: usize,

    /// Ring poll timeout in milliseconds.
    pub poll_ms: u64,

    /// Directory receiving `src.bin` and `dst.bin`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump: Option<PathBuf>,
}

impl Default for StressConfig {
    fn default() -> Self {
        StressConfig {
            iterations: DEFAULT_ITERATIONS,
            size: DEFAULT_SIZE,
            poll_ms: DEFAULT_POLL_MS,
            dump: None,
        }
    }
}

/// Flag values; `None` keeps the value from the file or the default.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub iterations: Option<usize>,
    pub size: Option<usize>,
    pub poll_ms: Option<u64>,
    pub dump: Option<PathBuf>,
}

impl StressConfig {
    /// Loads a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Parses YAML; missing fields keep their defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: StressConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Applies flag overrides on top of this config.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(n) = overrides.iterations {
            self.iterations = n;
        }
        if let Some(n) = overrides.size {
            self.size = n;
        }
        if let Some(ms) = overrides.poll_ms {
            self.poll_ms = ms;
        }
        if overrides.dump.is_some() {
            self.dump = overrides.dump;
        }
        self
    }

    /// Checks values the buffers cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            anyhow::bail!("size must be greater than 0");
        }
        Ok(())
    }
}
