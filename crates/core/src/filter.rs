//! Declarative visibility rules for pages and databases.
//!
//! A [`FilterRules`] set is evaluated by [`should_filter`] in a fixed order,
//! first match wins:
//!
//! 1. Title contains an excluded keyword (case-insensitive)
//! 2. Id is in the exclude list for its kind
//! 3. The include-only list for its kind is non-empty and lacks the id
//!
//! An empty include-only list means "no restriction".

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of Notion object the rules distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Page,
    Database,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Page => f.write_str("page"),
            ItemKind::Database => f.write_str("database"),
        }
    }
}

/// Rules for hiding items from listing results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilterRules {
    /// Hide items whose title contains any of these (case-insensitive).
    #[serde(default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,

    #[serde(default)]
    pub exclude_page_ids: Vec<String>,

    #[serde(default)]
    pub exclude_database_ids: Vec<String>,

    /// When non-empty, only these pages are shown.
    #[serde(default)]
    pub include_only_page_ids: Vec<String>,

    /// When non-empty, only these databases are shown.
    #[serde(default)]
    pub include_only_database_ids: Vec<String>,
}

fn default_exclude_keywords() -> Vec<String> {
    vec!["deprecated".into(), "depricated".into()]
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            exclude_keywords: default_exclude_keywords(),
            exclude_page_ids: Vec::new(),
            exclude_database_ids: Vec::new(),
            include_only_page_ids: Vec::new(),
            include_only_database_ids: Vec::new(),
        }
    }
}

impl FilterRules {
    /// Rules that hide nothing.
    pub fn permissive() -> Self {
        Self { exclude_keywords: Vec::new(), ..Default::default() }
    }

    fn exclude_ids(&self, kind: ItemKind) -> &[String] {
        match kind {
            ItemKind::Page => &self.exclude_page_ids,
            ItemKind::Database => &self.exclude_database_ids,
        }
    }

    fn include_only_ids(&self, kind: ItemKind) -> &[String] {
        match kind {
            ItemKind::Page => &self.include_only_page_ids,
            ItemKind::Database => &self.include_only_database_ids,
        }
    }

    /// Method form of [`should_filter`].
    pub fn should_filter(&self, title: &str, id: &str, kind: ItemKind) -> bool {
        should_filter(self, title, id, kind)
    }
}

/// Decide whether an item must be suppressed from a result list.
pub fn should_filter(rules: &FilterRules, title: &str, id: &str, kind: ItemKind) -> bool {
    let title_lower = title.to_lowercase();
    if rules
        .exclude_keywords
        .iter()
        .any(|keyword| title_lower.contains(&keyword.to_lowercase()))
    {
        return true;
    }

    if rules.exclude_ids(kind).iter().any(|excluded| excluded == id) {
        return true;
    }

    let include_only = rules.include_only_ids(kind);
    !include_only.is_empty() && !include_only.iter().any(|included| included == id)
}
