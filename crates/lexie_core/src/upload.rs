//! Upload widget payload normalisation and URL collection.
//!
//! The upload widget reports files through DOM events whose `detail` shape
//! differs between widget versions. Every recognised shape is listed here:
//!
//! | Concern | Fields tried, in order |
//! |---------|------------------------|
//! | file id | `uuid`, `fileId`, `id` |
//! | file URL | `cdnUrl`, `url`, `fileUrl`, `uuid` (expanded to a CDN URL), `cdnUrlModifiers` |
//! | bulk list | `files`, `allEntries`, `entries` |
//!
//! Anything else is ignored.

use serde_json::Value;

/// CDN host used to expand a bare file UUID.
pub const CDN_BASE: &str = "https://ucarecdn.com";

/// DOM event announcing a finished upload.
pub const EVENT_UPLOAD_SUCCESS: &str = "file-upload-success";
/// DOM event announcing a removed file.
pub const EVENT_UPLOAD_REMOVE: &str = "file-upload-remove";
/// DOM event carrying the full file list.
pub const EVENT_CHANGE: &str = "change";

/// Custom elements whose presence means the widget is used on the page.
pub const WIDGET_ELEMENTS: [&str; 2] = ["uc-upload-ctx-provider", "uc-file-uploader-minimal"];

const ID_FIELDS: [&str; 3] = ["uuid", "fileId", "id"];
const LIST_FIELDS: [&str; 3] = ["files", "allEntries", "entries"];

/// Where a file URL was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    CdnUrl,
    Url,
    FileUrl,
    Uuid,
    CdnUrlModifiers,
}

impl UrlSource {
    /// Lookup order.
    pub const ALL: [UrlSource; 5] = [
        UrlSource::CdnUrl,
        UrlSource::Url,
        UrlSource::FileUrl,
        UrlSource::Uuid,
        UrlSource::CdnUrlModifiers,
    ];

    /// Payload field name.
    pub fn field(&self) -> &'static str {
        match self {
            UrlSource::CdnUrl => "cdnUrl",
            UrlSource::Url => "url",
            UrlSource::FileUrl => "fileUrl",
            UrlSource::Uuid => "uuid",
            UrlSource::CdnUrlModifiers => "cdnUrlModifiers",
        }
    }
}

/// Errors from the upload integration.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Event detail could not be decoded
    #[error("Invalid upload payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The widget script failed to load or register
    #[error("Upload widget failed to load: {0}")]
    LoadFailed(String),

    /// The widget element has no usable API
    #[error("Upload widget API unavailable: {0}")]
    ApiUnavailable(String),
}

/// Read a field as a non-empty string. Numbers are stringified.
fn text_field(entry: &Value, field: &str) -> Option<String> {
    match entry.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolve the URL of one file descriptor.
pub fn resolve_url(entry: &Value) -> Option<(UrlSource, String)> {
    if !entry.is_object() {
        return None;
    }
    UrlSource::ALL.iter().find_map(|source| {
        let value = text_field(entry, source.field())?;
        let url = match source {
            UrlSource::Uuid => format!("{CDN_BASE}/{value}/"),
            _ => value,
        };
        Some((*source, url))
    })
}

/// Provider-assigned id of one file descriptor.
pub fn entry_id(entry: &Value) -> Option<String> {
    ID_FIELDS.iter().find_map(|field| text_field(entry, field))
}

/// Bulk file list carried by a change event, if any.
pub fn entry_list(detail: &Value) -> Option<&Vec<Value>> {
    LIST_FIELDS
        .iter()
        .find_map(|field| detail.get(field).and_then(Value::as_array))
}

/// A widget event with its decoded detail.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Added(Value),
    Removed(Value),
    Changed(Value),
}

impl UploadEvent {
    /// Decode a DOM event. Unknown event types yield `None`; a missing
    /// detail is treated as an empty object.
    pub fn from_dom(event_type: &str, detail_json: Option<&str>) -> Result<Option<Self>, UploadError> {
        let detail = match detail_json {
            Some(json) if !json.is_empty() && json != "undefined" => serde_json::from_str(json)?,
            _ => Value::Null,
        };
        let detail = if detail.is_null() {
            Value::Object(Default::default())
        } else {
            detail
        };

        Ok(match event_type {
            EVENT_UPLOAD_SUCCESS => Some(Self::Added(detail)),
            EVENT_UPLOAD_REMOVE => Some(Self::Removed(detail)),
            EVENT_CHANGE => Some(Self::Changed(detail)),
            _ => None,
        })
    }
}

/// Uploaded file URLs keyed by file id, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct UploadCollection {
    entries: Vec<(String, String)>,
    anon_seq: u64,
}

impl UploadCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collected URLs in collection order.
    pub fn urls(&self) -> Vec<String> {
        self.entries.iter().map(|(_, url)| url.clone()).collect()
    }

    fn anonymous_id(&mut self) -> String {
        self.anon_seq += 1;
        format!("anon-{}", self.anon_seq)
    }

    /// Insert or replace in place, keeping the original position.
    fn upsert(&mut self, id: String, url: String) {
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(slot) => slot.1 = url,
            None => self.entries.push((id, url)),
        }
    }

    /// Apply one widget event.
    pub fn apply(&mut self, event: &UploadEvent) {
        match event {
            UploadEvent::Added(detail) => {
                let Some((_, url)) = resolve_url(detail) else {
                    log::debug!("Upload event without a usable URL: {detail}");
                    return;
                };
                let id = entry_id(detail).unwrap_or_else(|| self.anonymous_id());
                self.upsert(id, url);
            }
            UploadEvent::Removed(detail) => {
                if let Some(id) = entry_id(detail) {
                    self.entries.retain(|(key, _)| *key != id);
                }
            }
            UploadEvent::Changed(detail) => {
                if let Some(list) = entry_list(detail) {
                    let list = list.clone();
                    self.rebuild(&list);
                }
            }
        }
    }

    /// Replace the collection with a full file list.
    pub fn rebuild(&mut self, files: &[Value]) {
        self.entries.clear();
        for file in files {
            if let Some((_, url)) = resolve_url(file) {
                let id = entry_id(file).unwrap_or_else(|| self.anonymous_id());
                self.upsert(id, url);
            }
        }
    }

    /// Rebuild from the widget API's output collection state
    /// (`{ files: [...] }`). Returns `false` when the state has no list.
    pub fn sync_from_state(&mut self, state: &Value) -> bool {
        match state.get("files").and_then(Value::as_array) {
            Some(files) => {
                let files = files.clone();
                self.rebuild(&files);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_resolve_each_shape() {
        let cases = [
            (json!({"cdnUrl": "https://cdn/a/"}), UrlSource::CdnUrl, "https://cdn/a/"),
            (json!({"url": "https://x/b.png"}), UrlSource::Url, "https://x/b.png"),
            (json!({"fileUrl": "https://x/c.png"}), UrlSource::FileUrl, "https://x/c.png"),
            (json!({"uuid": "1234-abcd"}), UrlSource::Uuid, "https://ucarecdn.com/1234-abcd/"),
            (
                json!({"cdnUrlModifiers": "-/resize/500/"}),
                UrlSource::CdnUrlModifiers,
                "-/resize/500/",
            ),
        ];
        for (entry, source, url) in cases {
            assert_eq!(resolve_url(&entry), Some((source, url.to_string())), "{entry}");
        }
    }

    #[test]
    fn test_resolve_prefers_cdn_url_over_uuid() {
        let entry = json!({"uuid": "u1", "cdnUrl": "https://cdn/u1/-/preview/"});
        assert_eq!(
            resolve_url(&entry).map(|(s, _)| s),
            Some(UrlSource::CdnUrl)
        );
    }

    #[test]
    fn test_resolve_skips_empty_and_non_objects() {
        assert_eq!(resolve_url(&json!({"cdnUrl": "", "url": "https://x/"})).map(|(s, _)| s), Some(UrlSource::Url));
        assert_eq!(resolve_url(&json!({})), None);
        assert_eq!(resolve_url(&json!("https://x/")), None);
        assert_eq!(resolve_url(&Value::Null), None);
    }

    #[test]
    fn test_entry_id_fallbacks() {
        assert_eq!(entry_id(&json!({"uuid": "a", "id": "b"})), Some("a".into()));
        assert_eq!(entry_id(&json!({"fileId": "f"})), Some("f".into()));
        assert_eq!(entry_id(&json!({"id": 7})), Some("7".into()));
        assert_eq!(entry_id(&json!({"url": "x"})), None);
    }

    #[test]
    fn test_entry_list_fields() {
        for field in ["files", "allEntries", "entries"] {
            let mut map = serde_json::Map::new();
            map.insert(field.to_string(), json!([{"uuid": "a"}]));
            let detail = Value::Object(map);
            assert_eq!(entry_list(&detail).map(Vec::len), Some(1), "{field}");
        }
        assert!(entry_list(&json!({"files": "nope"})).is_none());
    }

    #[test]
    fn test_from_dom() {
        let event = UploadEvent::from_dom(EVENT_UPLOAD_SUCCESS, Some(r#"{"uuid":"a"}"#))
            .expect("valid json");
        assert_eq!(event, Some(UploadEvent::Added(json!({"uuid": "a"}))));

        let event = UploadEvent::from_dom(EVENT_UPLOAD_REMOVE, None).expect("no detail");
        assert_eq!(event, Some(UploadEvent::Removed(json!({}))));

        assert!(UploadEvent::from_dom("click", Some("{}")).expect("json").is_none());
        assert!(UploadEvent::from_dom(EVENT_CHANGE, Some("{oops")).is_err());
    }

    #[test]
    fn test_collection_add_remove_keeps_order() {
        let mut uploads = UploadCollection::new();
        uploads.apply(&UploadEvent::Added(json!({"uuid": "a"})));
        uploads.apply(&UploadEvent::Added(json!({"uuid": "b", "cdnUrl": "https://cdn/b/"})));
        uploads.apply(&UploadEvent::Added(json!({"uuid": "c"})));
        uploads.apply(&UploadEvent::Removed(json!({"uuid": "b"})));

        assert_eq!(
            uploads.urls(),
            vec!["https://ucarecdn.com/a/", "https://ucarecdn.com/c/"]
        );
    }

    #[test]
    fn test_collection_replace_in_place() {
        let mut uploads = UploadCollection::new();
        uploads.apply(&UploadEvent::Added(json!({"uuid": "a"})));
        uploads.apply(&UploadEvent::Added(json!({"uuid": "b"})));
        uploads.apply(&UploadEvent::Added(json!({"uuid": "a", "cdnUrl": "https://cdn/a-edited/"})));

        assert_eq!(uploads.urls()[0], "https://cdn/a-edited/");
        assert_eq!(uploads.len(), 2);
    }

    #[test]
    fn test_collection_anonymous_entries_do_not_collide() {
        let mut uploads = UploadCollection::new();
        uploads.apply(&UploadEvent::Added(json!({"url": "https://x/1"})));
        uploads.apply(&UploadEvent::Added(json!({"url": "https://x/2"})));
        assert_eq!(uploads.len(), 2);
    }

    #[test]
    fn test_change_event_rebuilds() {
        let mut uploads = UploadCollection::new();
        uploads.apply(&UploadEvent::Added(json!({"uuid": "old"})));
        uploads.apply(&UploadEvent::Changed(json!({
            "allEntries": [{"uuid": "x"}, {"nothing": true}, {"fileId": "y", "url": "https://x/y"}]
        })));
        assert_eq!(uploads.urls(), vec!["https://ucarecdn.com/x/", "https://x/y"]);

        // A change without a list leaves the collection alone.
        uploads.apply(&UploadEvent::Changed(json!({"status": "idle"})));
        assert_eq!(uploads.len(), 2);
    }

    #[test]
    fn test_sync_from_state() {
        let mut uploads = UploadCollection::new();
        assert!(uploads.sync_from_state(&json!({"files": [{"cdnUrl": "https://cdn/1/"}]})));
        assert_eq!(uploads.urls(), vec!["https://cdn/1/"]);
        assert!(!uploads.sync_from_state(&json!({"status": "ok"})));
        assert_eq!(uploads.len(), 1);
    }
}
