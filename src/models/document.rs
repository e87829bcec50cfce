use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Media collection a document belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Collection {
    Stock,
    Sport,
    /// Any other raw value, trimmed and lower-cased. The value doubles as the
    /// thumbnail path segment and the `db` filter term, which must have a
    /// single spelling per collection.
    Other(String),
}

impl Collection {
    /// Map a raw or short-code value (`st`, `stock`, `SP`, ...) to a collection.
    /// Empty values fall back to stock so media URLs stay resolvable.
    pub fn from_raw(raw: &str) -> Self {
        let value = raw.trim().to_lowercase();
        match value.as_str() {
            "" | "st" | "stock" => Collection::Stock,
            "sp" | "sport" => Collection::Sport,
            _ => Collection::Other(value),
        }
    }

    /// Value stored in the index `db` field
    pub fn index_value(&self) -> &str {
        match self {
            Collection::Stock => "stock",
            Collection::Sport => "sport",
            Collection::Other(v) => v,
        }
    }

    /// Short code used in URLs and API payloads
    pub fn short_code(&self) -> &str {
        match self {
            Collection::Stock => "st",
            Collection::Sport => "sp",
            Collection::Other(v) => v,
        }
    }
}

impl From<String> for Collection {
    fn from(value: String) -> Self {
        Collection::from_raw(&value)
    }
}

impl From<Collection> for String {
    fn from(collection: Collection) -> Self {
        collection.short_code().to_string()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_code())
    }
}

/// A search hit mapped into the canonical document shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDocument {
    /// Index document id
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "db")]
    pub collection: Collection,

    pub media_id: String,

    /// `media_id` digits, left-padded with zeros to exactly 10 characters
    #[serde(rename = "paddedMediaId")]
    pub zero_padded_media_id: String,

    pub thumbnail_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Full raw source for anything not promoted to a named field
    #[serde(rename = "raw", default)]
    pub raw_fields: Map<String, Value>,
}
