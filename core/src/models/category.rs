use serde::{Deserialize, Serialize};

use super::{nullable_string, Id};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(default)]
    pub id: Id,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<Id>, name: &str, color: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            color: color.map(str::to_string),
            icon: None,
        }
    }
}
