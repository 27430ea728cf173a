//! Loading the notes and categories payloads the server embeds in its page.

use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::models::{Category, Note};
use crate::{Error, Result};

pub const NOTES_ELEMENT: &str = "notes-data";
pub const CATEGORIES_ELEMENT: &str = "categories-data";

/// Somewhere the embedded JSON payloads can be read from, keyed by element id.
pub trait PageSource {
    fn element_text(&self, id: &str) -> Option<String>;
}

/// Payloads held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    elements: HashMap<String, String>,
}

impl StaticPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, id: &str, text: &str) -> Self {
        self.elements.insert(id.to_string(), text.to_string());
        self
    }
}

impl PageSource for StaticPage {
    fn element_text(&self, id: &str) -> Option<String> {
        self.elements.get(id).cloned()
    }
}

/// Payloads saved as `<dir>/<element-id>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryPage {
    dir: PathBuf,
}

impl DirectoryPage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PageSource for DirectoryPage {
    fn element_text(&self, id: &str) -> Option<String> {
        let path = self.dir.join(format!("{}.json", id));
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!("Could not read {}: {}", path.display(), err);
                None
            }
        }
    }
}

/// Paging metadata the listing endpoint wraps around its items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub pages: Option<u64>,
    #[serde(default)]
    pub has_prev: bool,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub prev_num: Option<u64>,
    #[serde(default)]
    pub next_num: Option<u64>,
}

/// Everything the list view is initialized from.
#[derive(Debug, Clone, Default)]
pub struct PageData {
    pub notes: Vec<Note>,
    pub categories: Vec<Category>,
    pub pagination: Option<Pagination>,
}

/// Parse the notes payload: either a bare array, or an object whose `items`
/// field holds the array (a missing `items` reads as empty).
pub fn parse_notes_payload(text: &str) -> Result<(Vec<Note>, Option<Pagination>)> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(_) => Ok((serde_json::from_value(value)?, None)),
        Value::Object(mut map) => {
            let items = match map.remove("items") {
                Some(Value::Null) | None => Vec::new(),
                Some(items) => serde_json::from_value(items)?,
            };
            let pagination = serde_json::from_value(Value::Object(map))?;
            Ok((items, Some(pagination)))
        }
        other => Err(Error::InvalidInput(format!(
            "notes payload must be an array or an object, got {}",
            json_kind(&other)
        ))),
    }
}

pub fn parse_categories_payload(text: &str) -> Result<Vec<Category>> {
    Ok(serde_json::from_str(text)?)
}

/// Distinct categories embedded in the notes, in first-seen order.
pub fn categories_from_notes(notes: &[Note]) -> Vec<Category> {
    let mut seen = HashSet::new();
    notes
        .iter()
        .filter_map(|note| note.category.as_ref())
        .filter(|category| seen.insert(category.id.clone()))
        .cloned()
        .collect()
}

/// Drop notes whose id was already seen; the first occurrence wins.
pub fn dedup_notes(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    notes
        .into_iter()
        .filter(|note| {
            let fresh = seen.insert(note.id.clone());
            if !fresh {
                warn!("Dropping duplicate note id {}", note.id);
            }
            fresh
        })
        .collect()
}

fn try_load(source: &dyn PageSource) -> Result<PageData> {
    let notes_text = source
        .element_text(NOTES_ELEMENT)
        .ok_or_else(|| Error::MissingElement(NOTES_ELEMENT.to_string()))?;
    let categories_text = source
        .element_text(CATEGORIES_ELEMENT)
        .ok_or_else(|| Error::MissingElement(CATEGORIES_ELEMENT.to_string()))?;

    let (notes, pagination) = parse_notes_payload(&notes_text)?;
    let categories = parse_categories_payload(&categories_text)?;

    Ok(PageData {
        notes: dedup_notes(notes),
        categories,
        pagination,
    })
}

/// Load both payloads. Never fails: any missing element or parse error is
/// logged and yields empty collections.
pub fn load_page_data(source: &dyn PageSource) -> PageData {
    match try_load(source) {
        Ok(data) => data,
        Err(err) => {
            error!("Failed to load page data: {}", err);
            PageData::default()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Id;
    use std::fs;
    use tempfile::TempDir;

    const CATEGORIES: &str = r##"[{"id": 1, "name": "Work", "color": "#336699"}]"##;

    #[test]
    fn test_load_bare_array() {
        let page = StaticPage::new()
            .with_element(NOTES_ELEMENT, r#"[{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]"#)
            .with_element(CATEGORIES_ELEMENT, CATEGORIES);

        let data = load_page_data(&page);
        assert_eq!(data.notes.len(), 2);
        assert_eq!(data.categories.len(), 1);
        assert!(data.pagination.is_none());
    }

    #[test]
    fn test_load_unwraps_items() {
        let page = StaticPage::new()
            .with_element(
                NOTES_ELEMENT,
                r#"{"items": [{"id": 5, "title": "Wrapped"}], "total": 13, "page": 1, "pages": 2, "has_prev": false, "has_next": true, "prev_num": null, "next_num": 2}"#,
            )
            .with_element(CATEGORIES_ELEMENT, CATEGORIES);

        let data = load_page_data(&page);
        assert_eq!(data.notes.len(), 1);
        assert_eq!(data.notes[0].id, Id::Int(5));

        let pagination = data.pagination.unwrap();
        assert_eq!(pagination.total, Some(13));
        assert!(pagination.has_next);
        assert_eq!(pagination.next_num, Some(2));
    }

    #[test]
    fn test_object_without_items_is_empty() {
        let (notes, pagination) = parse_notes_payload(r#"{"total": 0}"#).unwrap();
        assert!(notes.is_empty());
        assert_eq!(pagination.unwrap().total, Some(0));
    }

    #[test]
    fn test_scalar_payload_is_rejected() {
        assert!(matches!(parse_notes_payload("42"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_missing_element_fails_soft() {
        let page = StaticPage::new().with_element(NOTES_ELEMENT, r#"[{"id": 1}]"#);
        let data = load_page_data(&page);
        assert!(data.notes.is_empty());
        assert!(data.categories.is_empty());
    }

    #[test]
    fn test_malformed_json_fails_soft() {
        let page = StaticPage::new()
            .with_element(NOTES_ELEMENT, "[{\"id\": 1,")
            .with_element(CATEGORIES_ELEMENT, CATEGORIES);
        let data = load_page_data(&page);
        assert!(data.notes.is_empty());
        assert!(data.categories.is_empty());
    }

    #[test]
    fn test_duplicate_ids_dropped() {
        let page = StaticPage::new()
            .with_element(
                NOTES_ELEMENT,
                r#"[{"id": 1, "title": "first"}, {"id": 1, "title": "second"}, {"id": 2}]"#,
            )
            .with_element(CATEGORIES_ELEMENT, "[]");
        let data = load_page_data(&page);
        assert_eq!(data.notes.len(), 2);
        assert_eq!(data.notes[0].title, "first");
    }

    #[test]
    fn test_directory_page() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes-data.json"), r#"[{"id": "n1", "title": "From disk"}]"#).unwrap();
        fs::write(dir.path().join("categories-data.json"), CATEGORIES).unwrap();

        let data = load_page_data(&DirectoryPage::new(dir.path()));
        assert_eq!(data.notes[0].title, "From disk");
        assert_eq!(data.categories[0].name, "Work");
    }

    #[test]
    fn test_categories_from_notes() {
        let (notes, _) = parse_notes_payload(
            r##"[
                {"id": 1, "category_id": 2, "category": {"id": 2, "name": "Home", "color": null}},
                {"id": 2, "category_id": 2, "category": {"id": 2, "name": "Home", "color": null}},
                {"id": 3, "category_id": null, "category": null},
                {"id": 4, "category_id": 5, "category": {"id": 5, "name": "Work", "color": "#000"}}
            ]"##,
        )
        .unwrap();

        let categories = categories_from_notes(&notes);
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Home", "Work"]);
    }
}
