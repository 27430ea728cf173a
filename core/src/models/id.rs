use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier, sent either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Text(String),
}

impl Id {
    /// Numeric and textual forms of the same value compare equal (`7 == "7"`).
    pub fn loosely_eq(&self, other: &Id) -> bool {
        match (self, other) {
            (Id::Int(a), Id::Int(b)) => a == b,
            (Id::Text(a), Id::Text(b)) => a == b,
            (Id::Int(n), Id::Text(s)) | (Id::Text(s), Id::Int(n)) => {
                s.trim().parse::<i64>().map(|parsed| parsed == *n).unwrap_or(false)
            }
        }
    }

    /// An id is usable unless it is `0` or the empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            Id::Int(n) => *n != 0,
            Id::Text(s) => !s.is_empty(),
        }
    }
}

impl Default for Id {
    fn default() -> Self {
        Id::Text(String::new())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Int(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}
