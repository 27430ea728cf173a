use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{nullable_string, parse_timestamp, Attachment, Category, Id};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    #[serde(default)]
    pub id: Id,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,
    #[serde(default)]
    pub category_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub likes_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Note {
    /// Create a bare note (for testing or import)
    pub fn with_id(id: impl Into<Id>, title: &str) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            content: String::new(),
            content_preview: None,
            category_id: None,
            category: None,
            likes_count: None,
            created_at: None,
            updated_at: None,
            attachments: Vec::new(),
        }
    }

    /// Like count, with an absent counter read as zero
    pub fn likes(&self) -> u64 {
        self.likes_count.unwrap_or(0)
    }

    /// Record one confirmed like
    pub fn add_like(&mut self) {
        self.likes_count = Some(self.likes() + 1);
    }

    /// `updated_at` if present and non-blank, else `created_at`, else the
    /// Unix epoch. Unparseable timestamps also fall back to the epoch.
    pub fn effective_timestamp(&self) -> DateTime<Utc> {
        non_blank(&self.updated_at)
            .or_else(|| non_blank(&self.created_at))
            .and_then(parse_timestamp)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// `folded_query` must already be trimmed and lowercased.
    pub fn matches_query(&self, folded_query: &str) -> bool {
        self.title.to_lowercase().contains(folded_query)
            || self.content.to_lowercase().contains(folded_query)
    }

    pub fn in_category(&self, category: &Id) -> bool {
        self.category_id
            .as_ref()
            .is_some_and(|id| id.loosely_eq(category))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
