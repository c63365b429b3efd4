//! Configuration for huffpack

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::container::Mode;
use crate::error::{HuffError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HuffConfig {
    pub mode: Mode,
    pub buffer_size: usize,
    pub max_input_size: u64,
}

impl Default for HuffConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Verbose,
            buffer_size: 64 * 1024,
            max_input_size: u64::from(u32::MAX),
        }
    }
}

impl HuffConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| HuffError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject settings the engine can't run with
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(HuffError::Config("buffer_size must be at least 1".into()));
        }
        Ok(())
    }
}
