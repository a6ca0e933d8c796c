// fernctl/src/config/mod.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "fernctl.json";

/// SSM DeleteParameters accepts at most this many names per call.
pub const MAX_DELETE_BATCH_SIZE: usize = 10;

// Structs for deserializing fernctl.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJsonConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub prune_untagged: Option<bool>,
    pub delete_batch_size: Option<usize>,
}

// Application's internal configuration structs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub aws: AwsSettings,
    pub prune_untagged: bool,
    pub delete_batch_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            aws: AwsSettings::default(),
            prune_untagged: false,
            delete_batch_size: MAX_DELETE_BATCH_SIZE,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `explicit_path` if given, otherwise from
    /// `fernctl.json` in the working directory when it exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match explicit_path {
            Some(path) => Self::load_from_json(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_json(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from_json(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
        let raw_json_config: RawJsonConfig = serde_json::from_str(&config_content)
            .with_context(|| {
                format!(
                    "Failed to parse JSON from config file at {}",
                    config_path.display()
                )
            })?;

        Self::from_raw(raw_json_config)
    }

    pub fn from_raw(raw: RawJsonConfig) -> Result<Self> {
        let delete_batch_size = raw.delete_batch_size.unwrap_or(MAX_DELETE_BATCH_SIZE);
        if delete_batch_size == 0 || delete_batch_size > MAX_DELETE_BATCH_SIZE {
            return Err(anyhow::anyhow!(
                "delete_batch_size must be between 1 and {}, got {}",
                MAX_DELETE_BATCH_SIZE,
                delete_batch_size
            ));
        }

        Ok(AppConfig {
            aws: AwsSettings {
                region: non_empty(raw.region),
                profile: non_empty(raw.profile),
                endpoint_url: non_empty(raw.endpoint_url),
            },
            prune_untagged: raw.prune_untagged.unwrap_or(false),
            delete_batch_size,
        })
    }

    /// Command-line flags win over the config file.
    pub fn with_overrides(mut self, region: Option<String>, profile: Option<String>) -> Self {
        if let Some(region) = non_empty(region) {
            self.aws.region = Some(region);
        }
        if let Some(profile) = non_empty(profile) {
            self.aws.profile = Some(profile);
        }
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
