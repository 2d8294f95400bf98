//! Portfolio catalog model.
//!
//! The catalog is a static JSON document:
//!
//! ```json
//! {
//!   "items": [{ "id": "p01", "src": "img/p01.webp", "alt": "Moth", "featured": true }],
//!   "groups": [{ "name": "Free patterns", "ids": ["p01"] }]
//! }
//! ```
//!
//! Featured items become carousel slides; items listed in the free-patterns
//! group become promotional slides.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use url::Url;

/// Alt text for items that carry none.
pub const DEFAULT_ALT: &str = "Tattoo by Lexie";

/// Shown in place of the carousel when nothing is featured.
pub const EMPTY_TEXT: &str = "No work to show yet. Add some to data/portfolio.json.";

/// Shown in place of the carousel when the catalog cannot be loaded.
pub const ERROR_TEXT: &str = "Could not load the gallery (check the paths and the JSON).";

/// Accepted spellings of the free-patterns group name, compared after
/// lowercasing and turning `-`/`_` into spaces.
const FREE_PATTERN_GROUPS: [&str; 2] = ["free patterns", "wolne wzory"];

/// Errors while loading the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The request did not complete
    #[error("Catalog request failed: {0}")]
    Fetch(String),

    /// The server answered with a non-success status
    #[error("Catalog request returned HTTP {status}")]
    Status { status: u16 },

    /// The body is not a valid catalog
    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch(message.into())
    }
}

/// Ids may be written as strings or numbers.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_to_id(&Value::deserialize(deserializer)?))
}

fn id_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.iter().map(value_to_id).filter(|id| !id.is_empty()).collect())
}

/// Text fields of any other type read as empty.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Flags follow JavaScript truthiness: `0`, `""` and `null` are false,
/// objects and arrays are true.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// A list whose unreadable records are dropped instead of failing the
/// whole document.
fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping catalog record: {e}");
                None
            }
        })
        .collect())
}

fn value_to_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// One portfolio image.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    /// Empty when missing; such items are never shown.
    #[serde(default, deserialize_with = "text")]
    pub src: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub featured: bool,
}

/// A named list of item ids.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogGroup {
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "id_list")]
    pub ids: Vec<String>,
}

impl CatalogGroup {
    /// Whether this is the free-patterns group.
    pub fn is_free_patterns(&self) -> bool {
        let name = self.name.trim().to_lowercase().replace(['-', '_'], " ");
        FREE_PATTERN_GROUPS.contains(&name.as_str())
    }
}

/// The whole catalog document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default, deserialize_with = "skip_invalid")]
    pub items: Vec<CatalogItem>,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub groups: Vec<CatalogGroup>,
}

/// A carousel slide built from a featured item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub id: String,
    pub src: String,
    pub alt: String,
    pub promotional: bool,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Ids of items in the free-patterns group.
    pub fn free_pattern_ids(&self) -> HashSet<&str> {
        self.groups
            .iter()
            .filter(|group| group.is_free_patterns())
            .flat_map(|group| group.ids.iter().map(String::as_str))
            .collect()
    }

    /// Featured slides, at most `limit`, with sources resolved against
    /// `base` (the URL the catalog was fetched from).
    pub fn featured_slides(&self, base: Option<&str>, limit: usize) -> Vec<Slide> {
        let base = base.and_then(|b| Url::parse(b).ok());
        let free = self.free_pattern_ids();

        self.items
            .iter()
            .filter(|item| item.featured && !item.src.trim().is_empty())
            .take(limit)
            .map(|item| Slide {
                id: item.id.clone(),
                src: resolve_src(&item.src, base.as_ref()),
                alt: item
                    .alt
                    .as_deref()
                    .map(str::trim)
                    .filter(|alt| !alt.is_empty())
                    .unwrap_or(DEFAULT_ALT)
                    .to_string(),
                promotional: !item.id.is_empty() && free.contains(item.id.as_str()),
            })
            .collect()
    }
}

/// Resolve a possibly relative image source. Unresolvable sources are kept
/// as written and left to the browser.
pub fn resolve_src(src: &str, base: Option<&Url>) -> String {
    match base.map(|b| b.join(src)) {
        Some(Ok(url)) => url.to_string(),
        _ => src.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "items": [
            { "id": "p01", "src": "img/p01.webp", "alt": "Moth", "featured": true },
            { "id": 2, "src": "img/p02.webp", "featured": true },
            { "id": "p03", "src": "img/p03.webp", "alt": "Hidden", "featured": false },
            { "id": "p04", "src": "https://cdn.example/p04.webp", "alt": "  ", "featured": true }
        ],
        "groups": [
            { "name": "Flash", "ids": ["p01"] },
            { "name": "FREE-patterns", "ids": ["p04", 2] }
        ]
    }"#;

    const BASE: &str = "https://lexie.example/data/portfolio.json";

    #[test]
    fn test_featured_slides() {
        let catalog = Catalog::from_json(SAMPLE).expect("valid catalog");
        let slides = catalog.featured_slides(Some(BASE), 12);

        let ids: Vec<&str> = slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["p01", "2", "p04"]);

        assert_eq!(slides[0].src, "https://lexie.example/data/img/p01.webp");
        assert_eq!(slides[0].alt, "Moth");
        assert!(!slides[0].promotional);

        assert_eq!(slides[1].alt, DEFAULT_ALT);
        assert!(slides[1].promotional, "numeric ids cross-reference");

        assert_eq!(slides[2].src, "https://cdn.example/p04.webp");
        assert_eq!(slides[2].alt, DEFAULT_ALT);
        assert!(slides[2].promotional);
    }

    #[test]
    fn test_limit() {
        let catalog = Catalog::from_json(SAMPLE).expect("valid catalog");
        assert_eq!(catalog.featured_slides(None, 2).len(), 2);
    }

    #[test]
    fn test_without_base_keeps_relative_src() {
        let catalog = Catalog::from_json(SAMPLE).expect("valid catalog");
        let slides = catalog.featured_slides(None, 12);
        assert_eq!(slides[0].src, "img/p01.webp");
    }

    #[test]
    fn test_group_name_matching() {
        for name in ["Free patterns", "free_patterns", " FREE PATTERNS ", "Wolne wzory"] {
            let group = CatalogGroup {
                name: name.to_string(),
                ids: vec![],
            };
            assert!(group.is_free_patterns(), "{name}");
        }
        let group = CatalogGroup {
            name: "Patterns".into(),
            ids: vec![],
        };
        assert!(!group.is_free_patterns());
    }

    #[test]
    fn test_missing_sections_default() {
        let catalog = Catalog::from_json("{}").expect("empty object is valid");
        assert!(catalog.featured_slides(None, 12).is_empty());
    }

    #[test]
    fn test_item_without_src_is_skipped() {
        let json = r#"{"items": [
            { "id": "a", "src": "img/a.webp", "featured": true },
            { "id": "b", "featured": true },
            { "id": "c", "src": null, "featured": true },
            { "id": "d", "src": "img/d.webp", "featured": true }
        ]}"#;
        let catalog = Catalog::from_json(json).expect("missing src is tolerated");
        let ids: Vec<String> = catalog
            .featured_slides(None, 12)
            .into_iter()
            .map(|slide| slide.id)
            .collect();
        assert_eq!(ids, ["a", "d"]);
    }

    #[test]
    fn test_featured_is_truthy() {
        let json = r#"{"items": [
            { "id": "one", "src": "1.webp", "featured": 1 },
            { "id": "yes", "src": "2.webp", "featured": "yes" },
            { "id": "obj", "src": "3.webp", "featured": {} },
            { "id": "zero", "src": "4.webp", "featured": 0 },
            { "id": "blank", "src": "5.webp", "featured": "" },
            { "id": "null", "src": "6.webp", "featured": null }
        ]}"#;
        let catalog = Catalog::from_json(json).expect("non-bool flags are tolerated");
        let ids: Vec<String> = catalog
            .featured_slides(None, 12)
            .into_iter()
            .map(|slide| slide.id)
            .collect();
        assert_eq!(ids, ["one", "yes", "obj"]);
    }

    #[test]
    fn test_group_without_name_keeps_catalog() {
        let json = r#"{
            "items": [{ "id": "p1", "src": "p1.webp", "featured": true }],
            "groups": [{ "ids": ["p1"] }, { "name": "Free patterns", "ids": ["p1"] }]
        }"#;
        let catalog = Catalog::from_json(json).expect("nameless group is tolerated");
        assert_eq!(catalog.groups.len(), 2);
        assert!(!catalog.groups[0].is_free_patterns());

        let slides = catalog.featured_slides(None, 12);
        assert_eq!(slides.len(), 1);
        assert!(slides[0].promotional);
    }

    #[test]
    fn test_malformed_records_are_dropped() {
        let json = r#"{
            "items": [
                "not a record",
                { "id": "ok", "src": "ok.webp", "alt": 42, "featured": true }
            ],
            "groups": [7]
        }"#;
        let catalog = Catalog::from_json(json).expect("bad records are skipped");
        assert_eq!(catalog.items.len(), 1);
        assert!(catalog.groups.is_empty());

        let slides = catalog.featured_slides(None, 12);
        assert_eq!(slides[0].alt, DEFAULT_ALT);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Catalog::from_json("{\"items\": 3}"),
            Err(CatalogError::Json(_))
        ));
    }
}
