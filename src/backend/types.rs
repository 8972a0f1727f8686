//! Shared types for backend communication

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::tags::split_tags;

/// Maximum number of reason tags shown on a recommendation card
pub const MAX_REASON_TAGS: usize = 8;

/// Item identifier as emitted by the backend.
///
/// The backend uses integer primary keys, but strings are accepted too. The
/// value is echoed back unchanged in feedback events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{}", id),
            ItemId::Text(id) => f.write_str(id),
        }
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(id) => ItemId::Int(id),
            Err(_) => ItemId::Text(value.to_string()),
        }
    }
}

/// Publication year; numeric columns may arrive as floats (`1999.0`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Int(y) => write!(f, "{}", y),
            Year::Float(y) if y.fract() == 0.0 => write!(f, "{}", *y as i64),
            Year::Float(y) => write!(f, "{}", y),
            Year::Text(y) => f.write_str(y.trim()),
        }
    }
}

/// Search result from `/api/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: ItemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<Year>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl SearchItem {
    /// Display tags: `tags` when present and non-empty, otherwise `subject`
    pub fn display_tags(&self) -> Vec<String> {
        let raw = non_blank(self.tags.as_deref()).or(non_blank(self.subject.as_deref()));
        raw.map(split_tags).unwrap_or_default()
    }

    pub fn display_author(&self) -> &str {
        non_blank(self.author.as_deref()).unwrap_or("Unknown author")
    }

    pub fn display_year(&self) -> Option<String> {
        self.year
            .as_ref()
            .map(|y| y.to_string())
            .filter(|y| !y.is_empty())
    }

    pub fn display_availability(&self) -> Option<&str> {
        non_blank(self.availability.as_deref())
    }

    pub fn is_available(&self) -> bool {
        self.display_availability()
            .map(|a| a.to_lowercase().contains("avail"))
            .unwrap_or(false)
    }

    pub fn display_abstract(&self) -> Option<&str> {
        non_blank(self.abstract_text.as_deref())
    }
}

/// Scored candidate from `/api/recommend`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "reason_list")]
    pub reason: Vec<String>,
}

impl Recommendation {
    pub fn display_author(&self) -> &str {
        non_blank(self.author.as_deref()).unwrap_or("Unknown author")
    }

    pub fn display_score(&self) -> String {
        format!("score {:.3}", self.score)
    }

    pub fn reason_tags(&self) -> &[String] {
        let end = self.reason.len().min(MAX_REASON_TAGS);
        &self.reason[..end]
    }
}

/// Body of `POST /api/feedback`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub uid: String,
    pub item_id: ItemId,
    pub action: String,
}

/// `null` decodes like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Anything but an array yields no reasons; non-string entries are rendered as text
fn reason_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let reasons = match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(reasons)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
