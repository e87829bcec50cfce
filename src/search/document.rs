//! Mapping raw index hits into `NormalizedDocument`s.
//!
//! Index documents come from several schema generations with inconsistent
//! key names, so each canonical field is read from an ordered list of
//! candidate keys.

use serde_json::{Map, Value};

use crate::models::{Collection, NormalizedDocument};
use crate::search::RawHit;

/// Width of a zero-padded media id
pub const PADDED_MEDIA_ID_LEN: usize = 10;

const TITLE_KEYS: &[&str] = &["title", "headline", "caption", "Title", "Headline", "titel"];
const FULLTEXT_KEYS: &[&str] = &["suchtext"];
const DESCRIPTION_KEYS: &[&str] = &["description", "abstract", "summary", "captionLong", "Description"];
const COLLECTION_KEYS: &[&str] = &["db", "DB", "database"];
const PRIMARY_MEDIA_ID_KEYS: &[&str] = &["bildnummer"];
const FALLBACK_MEDIA_ID_KEYS: &[&str] = &["media_id", "mediaId", "image_id", "imageId", "id"];
const PRIMARY_DATE_KEYS: &[&str] = &["datum"];
const FALLBACK_DATE_KEYS: &[&str] = &["date", "createdAt", "created_at", "captureDate", "Date"];

const UNTITLED: &str = "Untitled";

/// Non-empty trimmed string, or a number rendered as a string
fn as_non_empty_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-empty value among `keys`
fn pick_string(source: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| source.get(*key))
        .find_map(as_non_empty_string)
}

/// Left-pad the digits of `media_id` with zeros to exactly
/// `PADDED_MEDIA_ID_LEN` characters. Longer digit runs keep their last
/// `PADDED_MEDIA_ID_LEN` digits.
pub fn pad_media_id(media_id: &str) -> String {
    let digits: String = media_id.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= PADDED_MEDIA_ID_LEN {
        digits[digits.len() - PADDED_MEDIA_ID_LEN..].to_string()
    } else {
        format!("{:0>width$}", digits, width = PADDED_MEDIA_ID_LEN)
    }
}

/// Thumbnail URL for a media item
pub fn thumbnail_url(base_url: &str, collection: &Collection, media_id: &str) -> String {
    format!(
        "{}/bild/{}/{}/s.jpg",
        base_url.trim_end_matches('/'),
        collection.short_code(),
        pad_media_id(media_id)
    )
}

/// Maps raw hits into canonical documents
#[derive(Debug, Clone)]
pub struct DocumentNormalizer {
    base_url: String,
}

impl DocumentNormalizer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn normalize(&self, hit: &RawHit) -> NormalizedDocument {
        let empty = Map::new();
        let source = hit.source.as_ref().unwrap_or(&empty);

        let title = pick_string(source, TITLE_KEYS)
            .or_else(|| pick_string(source, FULLTEXT_KEYS))
            .unwrap_or_else(|| UNTITLED.to_string());

        let description = pick_string(source, DESCRIPTION_KEYS);

        let collection = pick_string(source, COLLECTION_KEYS)
            .map(|raw| Collection::from_raw(&raw))
            .unwrap_or(Collection::Stock);

        let media_id = pick_string(source, PRIMARY_MEDIA_ID_KEYS)
            .or_else(|| pick_string(source, FALLBACK_MEDIA_ID_KEYS))
            .unwrap_or_else(|| hit.id.clone());

        let date = pick_string(source, PRIMARY_DATE_KEYS)
            .or_else(|| pick_string(source, FALLBACK_DATE_KEYS));

        NormalizedDocument {
            id: hit.id.clone(),
            title,
            description,
            thumbnail_url: thumbnail_url(&self.base_url, &collection, &media_id),
            zero_padded_media_id: pad_media_id(&media_id),
            collection,
            media_id,
            date,
            raw_fields: source.clone(),
        }
    }
}
