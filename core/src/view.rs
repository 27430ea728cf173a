//! The filtered and sorted projection of the note collection.

use feruca::Collator;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::{Id, Note};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Title,
    Likes,
}

impl SortKey {
    pub fn next(self) -> Self {
        match self {
            SortKey::Date => SortKey::Title,
            SortKey::Title => SortKey::Likes,
            SortKey::Likes => SortKey::Date,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Title => "title",
            SortKey::Likes => "likes",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "title" => Ok(SortKey::Title),
            "likes" => Ok(SortKey::Likes),
            other => Err(Error::InvalidInput(format!("unknown sort key: {}", other))),
        }
    }
}

/// User-controlled inputs of the list view.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub search_query: String,
    pub selected_category: Option<Id>,
    pub sort_by: SortKey,
    /// Set between a delete confirmation request and its resolution.
    pub pending_delete_target: Option<Note>,
}

/// Title ordering by the Unicode Collation Algorithm with the CLDR root
/// tailoring: accents and case are secondary and tertiary differences, so
/// "Árbol" sorts before "Mesa" and "a" before "A".
pub fn compare_titles(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b)
}

fn compare_notes(collator: &mut Collator, a: &Note, b: &Note, sort_by: SortKey) -> Ordering {
    match sort_by {
        SortKey::Title => compare_titles(collator, &a.title, &b.title),
        SortKey::Likes => b.likes().cmp(&a.likes()),
        SortKey::Date => b.effective_timestamp().cmp(&a.effective_timestamp()),
    }
}

/// Derive the visible list from the collection and the view inputs.
///
/// Borrows from `notes` and never reorders it.
pub fn filtered_notes<'a>(notes: &'a [Note], view: &ViewState) -> Vec<&'a Note> {
    let query = view.search_query.trim().to_lowercase();

    let mut filtered: Vec<&Note> = notes
        .iter()
        .filter(|note| query.is_empty() || note.matches_query(&query))
        .filter(|note| {
            view.selected_category
                .as_ref()
                .map_or(true, |category| note.in_category(category))
        })
        .collect();

    // stable: ties keep collection order
    let mut collator = Collator::default();
    filtered.sort_by(|a, b| compare_notes(&mut collator, a, b, view.sort_by));
    filtered
}
