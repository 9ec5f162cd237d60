use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Configuration for runfilter, stored in `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    /// Fields that survive "clear all" and can never be removed by the user
    #[serde(default = "default_pinned_fields")]
    pub pinned_fields: Vec<String>,

    /// Fields whose filters cannot be removed (e.g. `result` on a failures view)
    #[serde(default)]
    pub block_remove: Vec<String>,

    /// Fields that are sent to the backend but never written to the URL
    #[serde(default)]
    pub hidden_fields: Vec<String>,

    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Quiet period after the last change before a fetch is issued
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Extra fields for the numeric family, on top of the built-in catalog
    #[serde(default)]
    pub numeric_fields: Vec<String>,

    #[serde(default)]
    pub array_fields: Vec<String>,

    #[serde(default)]
    pub boolean_fields: Vec<String>,

    /// Project every view is scoped to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

fn default_pinned_fields() -> Vec<String> {
    vec!["project_id".to_string()]
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            pinned_fields: default_pinned_fields(),
            block_remove: Vec::new(),
            hidden_fields: Vec::new(),
            default_page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            numeric_fields: Vec::new(),
            array_fields: Vec::new(),
            boolean_fields: Vec::new(),
            project_id: None,
        }
    }
}

impl FilterConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: FilterConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(FilterError::Config(
                "default_page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
