//! Where timeline definitions come from.
//!
//! Definitions are fetched lazily, one timeline at a time, the first time
//! navigation needs them. A failed fetch blocks the transition and leaves
//! navigation state untouched.

use std::future::Future;
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::log_debug;
use crate::models::{SurveyConfig, TimelineDefinition};

use super::validation;

const ENABLE_LOGS: bool = false;

pub trait TimelineSource {
    /// Navigation order of every configured timeline.
    fn fetch_keys(&self) -> impl Future<Output = ConfigResult<Vec<String>>> + Send;

    fn fetch_definition(
        &self,
        key: &str,
    ) -> impl Future<Output = ConfigResult<TimelineDefinition>> + Send;
}

/// Reads the survey configuration document from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> ConfigResult<SurveyConfig> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConfigError::Read {
                path: self.path.clone(),
                source,
            })?;
        let config = parse_config(&contents)?;
        log_debug!(
            "Loaded {} timelines from {}",
            config.timelines.len(),
            self.path.display()
        );
        Ok(config)
    }
}

impl TimelineSource for FileSource {
    async fn fetch_keys(&self) -> ConfigResult<Vec<String>> {
        Ok(self.load().await?.keys())
    }

    async fn fetch_definition(&self, key: &str) -> ConfigResult<TimelineDefinition> {
        let config = self.load().await?;
        find_definition(&config, key)
    }
}

/// In-memory configuration, validated once at construction.
#[derive(Debug, Clone)]
pub struct StaticSource {
    config: SurveyConfig,
}

impl StaticSource {
    pub fn new(config: SurveyConfig) -> ConfigResult<Self> {
        validation::validate_config(&config)?;
        Ok(Self { config })
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(Self {
            config: parse_config(json)?,
        })
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }
}

impl TimelineSource for StaticSource {
    async fn fetch_keys(&self) -> ConfigResult<Vec<String>> {
        Ok(self.config.keys())
    }

    async fn fetch_definition(&self, key: &str) -> ConfigResult<TimelineDefinition> {
        find_definition(&self.config, key)
    }
}

/// Parse and validate a configuration document.
pub fn parse_config(json: &str) -> ConfigResult<SurveyConfig> {
    let config: SurveyConfig = serde_json::from_str(json)?;
    validation::validate_config(&config)?;
    Ok(config)
}

fn find_definition(config: &SurveyConfig, key: &str) -> ConfigResult<TimelineDefinition> {
    config
        .timeline(key)
        .cloned()
        .ok_or_else(|| ConfigError::MissingTimeline {
            key: key.to_string(),
        })
}

/// A source must answer with the timeline that was asked for.
pub fn ensure_key(requested: &str, definition: &TimelineDefinition) -> ConfigResult<()> {
    if definition.key != requested {
        return Err(ConfigError::KeyMismatch {
            expected: requested.to_string(),
            actual: definition.key.clone(),
        });
    }
    Ok(())
}
