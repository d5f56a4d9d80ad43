//! Declarative filters supplied by the toolbar collaborator. Empty fields
//! mean "no restriction".

use crate::types::{FactRecord, Platform};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridFilters {
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tag: String,
}

impl GridFilters {
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty() && self.title.is_empty() && self.tag.is_empty()
    }

    /// Platform membership first, then case-insensitive substring matches
    /// on title and tag.
    pub fn matches(&self, record: &FactRecord) -> bool {
        if !self.platforms.is_empty() && !self.platforms.contains(&record.platform) {
            return false;
        }
        if !self.title.is_empty()
            && !record
                .title
                .to_lowercase()
                .contains(&self.title.to_lowercase())
        {
            return false;
        }
        if !self.tag.is_empty() && !record.tag.to_lowercase().contains(&self.tag.to_lowercase()) {
            return false;
        }
        true
    }
}
