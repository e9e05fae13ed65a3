//! Configuration for compression simulation, uploads and storage

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::media::extension_of;

/// Storage backend for per-user ledgers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    File,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UploadError {
    #[error("{name} is {size} bytes, larger than the {max} byte limit")]
    TooLarge { name: String, size: u64, max: u64 },

    #[error("{name}: format `{format}` is not allowed")]
    FormatNotAllowed { name: String, format: String },

    #[error("{name} is empty")]
    Empty { name: String },
}

/// Application configuration, read from `config.json` when present
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay before a simulated document compression completes
    pub document_delay_ms: u64,

    /// Lower bound of the simulated document size ratio (inclusive)
    pub document_ratio_min: f64,

    /// Upper bound of the simulated document size ratio (exclusive)
    pub document_ratio_max: f64,

    /// Interval between progress updates while compressing
    pub progress_interval_ms: u64,

    /// Number of history entries shown by default
    pub recent_limit: usize,

    /// Largest accepted upload, in bytes
    pub max_file_size: u64,

    /// Accepted file extensions (lower case)
    pub allowed_formats: Vec<String>,

    /// External image re-encode command; `{input}` and `{output}` are substituted
    pub image_command: String,

    pub backend: Backend,
}

impl Config {
    pub fn new() -> Self {
        Self {
            document_delay_ms: 1500,
            document_ratio_min: 0.4,
            document_ratio_max: 0.7,
            progress_interval_ms: 150,
            recent_limit: 5,
            max_file_size: 52_428_800,
            allowed_formats: ["jpg", "jpeg", "png", "gif", "webp", "bmp", "pdf"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            image_command: "convert {input} -quality 70 {output}".to_string(),
            backend: Backend::File,
        }
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: Option<Self> = compressx_store::read_json(path)?;
        let config = config.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Validate and write to `path`, replacing any previous file atomically
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        compressx_store::atomic_write(path, json.as_bytes())?;
        Ok(())
    }

    /// Change one setting from its textual form.
    ///
    /// Lists take comma separated values; text settings take the value as is;
    /// everything else is parsed as JSON. The result is not validated until saved.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut fields = serde_json::to_value(&*self)?;
        let Some(slot) = fields.get_mut(key) else {
            anyhow::bail!("unknown setting `{key}`");
        };

        *slot = match slot {
            Value::String(_) => Value::String(value.to_string()),
            Value::Array(_) => Value::Array(
                value
                    .split(',')
                    .map(|item| item.trim().to_ascii_lowercase())
                    .filter(|item| !item.is_empty())
                    .map(Value::String)
                    .collect(),
            ),
            _ => serde_json::from_str(value)
                .with_context(|| format!("`{value}` is not a valid value for `{key}`"))?,
        };

        *self = serde_json::from_value(fields)
            .with_context(|| format!("`{value}` is not a valid value for `{key}`"))?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.document_ratio_min)
            || !(0.0..=1.0).contains(&self.document_ratio_max)
            || self.document_ratio_min >= self.document_ratio_max
        {
            anyhow::bail!(
                "document ratio range [{}, {}) must be non-empty and within [0, 1]",
                self.document_ratio_min,
                self.document_ratio_max
            );
        }
        if self.progress_interval_ms == 0 {
            anyhow::bail!("progress_interval_ms must be positive");
        }
        if self.recent_limit == 0 {
            anyhow::bail!("recent_limit must be positive");
        }
        if self.allowed_formats.is_empty() {
            anyhow::bail!("allowed_formats must name at least one format");
        }
        Ok(())
    }

    /// Check an upload's size and format before it is compressed
    pub fn check_upload(&self, name: &str, size: u64) -> Result<(), UploadError> {
        if size == 0 {
            return Err(UploadError::Empty {
                name: name.to_string(),
            });
        }
        if size > self.max_file_size {
            return Err(UploadError::TooLarge {
                name: name.to_string(),
                size,
                max: self.max_file_size,
            });
        }
        let format = extension_of(Path::new(name)).unwrap_or_default();
        if !self.allowed_formats.iter().any(|f| f.eq_ignore_ascii_case(&format)) {
            return Err(UploadError::FormatNotAllowed {
                name: name.to_string(),
                format,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
