use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapping::MappingOverride;
use crate::normalize::DateOrder;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid delimiter {0:?}: quotes and line breaks cannot separate fields")]
    InvalidDelimiter(char),
}

/// Knobs for one import. Every field has a default, so an empty TOML
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub delimiter: char,
    pub date_order: DateOrder,
    /// Cap on sampled unparsed dates and retained skipped-row details.
    pub max_samples: usize,
    /// "Today" for the date fallback. `None` means the local date when the import starts.
    pub reference_date: Option<NaiveDate>,
    pub mapping: MappingOverride,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            date_order: DateOrder::MonthFirst,
            max_samples: 10,
            reference_date: None,
            mapping: MappingOverride::default(),
        }
    }
}

impl ImportOptions {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let options: ImportOptions = toml::from_str(toml_content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(ConfigError::InvalidDelimiter(self.delimiter));
        }
        Ok(())
    }

    /// The override to apply, if the caller supplied any.
    pub fn mapping_override(&self) -> Option<&MappingOverride> {
        (!self.mapping.is_empty()).then_some(&self.mapping)
    }
}
