use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::cli::Cli;
use crate::utils::normalize_languages;
use crate::HarvestError;

/// Environment variable holding the YouTube Data API key
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Optional override of the Data API endpoint
pub const API_BASE_URL_ENV: &str = "YOUTUBE_API_BASE_URL";

const CONFIG_FILE_NAME: &str = "harvest.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// YouTube Data API settings
    pub youtube: YoutubeConfig,

    /// Harvest run settings
    pub harvest: HarvestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    /// API key, only ever read from the environment
    #[serde(skip)]
    pub api_key: String,

    /// Base URL of the Data API v3
    pub api_base_url: String,

    /// Items requested per playlist page (the API caps this at 50)
    pub page_size: u32,

    /// Per-request timeout
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Directory receiving videos.csv and transcripts/
    pub output_dir: PathBuf,

    /// Transcript languages in order of preference
    pub languages: Vec<String>,

    /// Maximum transcripts fetched at once
    pub transcript_concurrency: usize,

    /// Trust the provider to return uploads newest first
    pub assume_descending: bool,

    /// Hide progress indicators
    pub quiet: bool,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://www.googleapis.com/youtube/v3/".to_string(),
            page_size: 50,
            request_timeout_secs: 30,
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            languages: vec!["cs".to_string()],
            transcript_concurrency: 1,
            assume_descending: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Load configuration from the optional config file and the process environment
    pub fn load() -> Result<Self, HarvestError> {
        let mut config = match Self::config_path() {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                let content = fs_err::read_to_string(&path).map_err(|e| {
                    HarvestError::Configuration(format!("failed to read config file: {}", e))
                })?;
                Self::from_yaml_str(&content)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a YAML config document; missing keys fall back to defaults
    pub fn from_yaml_str(content: &str) -> Result<Self, HarvestError> {
        serde_yaml::from_str(content).map_err(|e| {
            HarvestError::Configuration(format!("failed to parse config file: {}", e))
        })
    }

    /// Apply environment values through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.youtube.api_key = key.trim().to_string();
        }

        if let Some(base_url) = lookup(API_BASE_URL_ENV) {
            self.youtube.api_base_url = base_url;
        }
    }

    /// Apply command line overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(output) = &cli.output {
            self.harvest.output_dir = output.clone();
        }

        if !cli.languages.is_empty() {
            self.harvest.languages = cli.languages.clone();
        }

        if let Some(concurrency) = cli.concurrency {
            self.harvest.transcript_concurrency = concurrency;
        }

        self.harvest.assume_descending |= cli.assume_descending;
        self.harvest.quiet |= cli.quiet;
    }

    /// Validate configuration and normalize derived values
    pub fn validate(&mut self) -> Result<(), HarvestError> {
        if self.youtube.api_key.is_empty() {
            return Err(HarvestError::Configuration(format!(
                "{} environment variable not set",
                API_KEY_ENV
            )));
        }

        if !self.youtube.api_base_url.ends_with('/') {
            self.youtube.api_base_url.push('/');
        }
        Url::parse(&self.youtube.api_base_url).map_err(|e| {
            HarvestError::Configuration(format!(
                "invalid API base URL '{}': {}",
                self.youtube.api_base_url, e
            ))
        })?;

        if !(1..=50).contains(&self.youtube.page_size) {
            return Err(HarvestError::Configuration(format!(
                "page_size must be between 1 and 50, got {}",
                self.youtube.page_size
            )));
        }

        if self.harvest.transcript_concurrency == 0 {
            return Err(HarvestError::Configuration(
                "transcript concurrency must be at least 1".to_string(),
            ));
        }

        self.harvest.languages = normalize_languages(&self.harvest.languages);
        if self.harvest.languages.is_empty() {
            return Err(HarvestError::Configuration(
                "at least one transcript language is required".to_string(),
            ));
        }

        Ok(())
    }

    /// Config file location, if one exists
    fn config_path() -> Option<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("channel-harvest").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }
}
