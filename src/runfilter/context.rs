//! Per-view filter context.
//!
//! Everything the filter set and query composer need to know about their
//! surroundings lives in one [`FilterContext`]. A view creates one and lends
//! it to the components it builds; there is no shared global state.

use crate::config::FilterConfig;
use crate::fields::FieldCatalog;
use std::time::Duration;

/// Which fields get special treatment by the active filter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPolicy {
    /// Kept by "clear all" and never removable.
    pub pinned: Vec<String>,
    /// Never removable, but cleared by "clear all".
    pub block_remove: Vec<String>,
    /// Left out of the URL.
    pub hidden_from_url: Vec<String>,
}

impl FilterPolicy {
    pub fn is_pinned(&self, field: &str) -> bool {
        self.pinned.iter().any(|f| f == field)
    }

    pub fn is_remove_blocked(&self, field: &str) -> bool {
        self.is_pinned(field) || self.block_remove.iter().any(|f| f == field)
    }

    pub fn is_hidden(&self, field: &str) -> bool {
        self.hidden_from_url.iter().any(|f| f == field)
    }
}

#[derive(Debug, Clone)]
pub struct FilterContext {
    pub catalog: FieldCatalog,
    pub policy: FilterPolicy,
    /// Project the view is scoped to.
    pub project_id: Option<String>,
    pub default_page_size: u32,
    /// Quiet period before a filter change triggers a fetch.
    pub debounce: Duration,
}

impl Default for FilterContext {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

impl FilterContext {
    pub fn from_config(config: &FilterConfig) -> Self {
        let catalog = FieldCatalog::default().extend(
            config.numeric_fields.clone(),
            config.array_fields.clone(),
            config.boolean_fields.clone(),
        );
        Self {
            catalog,
            policy: FilterPolicy {
                pinned: config.pinned_fields.clone(),
                block_remove: config.block_remove.clone(),
                hidden_from_url: config.hidden_fields.clone(),
            },
            project_id: config.project_id.clone(),
            default_page_size: config.default_page_size,
            debounce: Duration::from_millis(config.debounce_ms),
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_block_remove<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.block_remove = fields.into_iter().map(Into::into).collect();
        self
    }
}
