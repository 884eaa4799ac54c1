#![forbid(unsafe_code)]

//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use vellum_core::Error;
use vellum_trust::TrustPolicy;

/// Settings shared by every document service.
///
/// Serialized flat, so a configuration file reads
/// `{"timestamp_max_offset": 300000, "max_grace_period": 604800000}`.
/// Missing keys keep their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(flatten)]
    pub trust: TrustPolicy,
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| Error::Config(format!("invalid configuration: {e}")))?;
        config.trust.check().map_err(Error::Config)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_timestamp_max_offset(mut self, millis: i64) -> Self {
        self.trust.timestamp_max_offset = millis;
        self
    }

    pub fn with_max_grace_period(mut self, millis: i64) -> Self {
        self.trust.max_grace_period = millis;
        self
    }

    pub fn with_prefer_timestamp_time(mut self, prefer: bool) -> Self {
        self.trust.prefer_timestamp_time = prefer;
        self
    }
}
