use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::size::ElementCount;

pub const DEFAULT_ELEMENTS: usize = 10;
pub const DEFAULT_SENTINEL: u8 = 0xFF;

/// Settings for one run of the lesson.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonConfig {
    /// Elements in every demonstration buffer.
    pub elements: usize,
    /// Byte written into buffers before they are filled, so leftovers show up.
    pub sentinel: u8,
    /// Byte the buffers are filled with.
    pub fill: u8,
    /// Write the rendered report to stderr.
    pub narrate: bool,
}

impl Default for LessonConfig {
    fn default() -> Self {
        LessonConfig {
            elements: DEFAULT_ELEMENTS,
            sentinel: DEFAULT_SENTINEL,
            fill: 0,
            narrate: false,
        }
    }
}

impl LessonConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LessonConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::ReadError {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elements == 0 {
            return Err(ConfigError::invalid_value("elements", "must be at least 1"));
        }
        if self.sentinel == self.fill {
            return Err(ConfigError::invalid_value(
                "sentinel",
                format!("must differ from fill byte {:#04x}", self.fill),
            ));
        }
        Ok(())
    }

    pub fn element_count(&self) -> ElementCount {
        ElementCount::new(self.elements)
    }
}
