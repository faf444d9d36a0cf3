//! # Record Store
//!
//! Owns the captured records for one session and the id index used to
//! resolve references to them.
//!
//! Records are immutable once loaded. The store hands them out as
//! `Arc<Record>` so the grid, the detail pane, and the overview panel can
//! all hold the same entry without copying it.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-phase timings for a single request, in milliseconds.
///
/// `None` means the capture did not report that phase (HAR encodes an
/// unreported phase as a negative value).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timings {
    pub blocked: Option<f64>,
    pub dns: Option<f64>,
    pub connect: Option<f64>,
    pub send: Option<f64>,
    pub wait: Option<f64>,
    pub receive: Option<f64>,
}

/// A single captured request/response pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Stable identifier assigned at load time (`"r1"`, `"r2"`, ...).
    pub id: String,
    pub url: String,
    pub method: String,
    /// HTTP status code; 0 when the request never completed.
    pub status: u16,
    pub status_text: String,
    pub mime_type: String,
    pub started_at: DateTime<Utc>,
    /// Total request time in milliseconds.
    pub duration_ms: f64,
    pub request_headers: Vec<(String, String)>,
    pub response_headers: Vec<(String, String)>,
    pub response_body: Option<String>,
    /// Response body size in bytes; -1 when the capture did not record it.
    pub response_size: i64,
    pub timings: Timings,
}

impl Record {
    /// True for requests that never completed or came back 4xx/5xx.
    pub fn is_failure(&self) -> bool {
        self.status == 0 || self.status >= 400
    }

    /// Status column text, e.g. `200 OK` or `(failed)`.
    pub fn status_display(&self) -> String {
        if self.status == 0 {
            "(failed)".to_string()
        } else if self.status_text.is_empty() {
            self.status.to_string()
        } else {
            format!("{} {}", self.status, self.status_text)
        }
    }

    /// Size column text in B / kB / MB, or `-` when unknown.
    pub fn size_display(&self) -> String {
        if self.response_size < 0 {
            return "-".to_string();
        }
        let size = self.response_size as f64;
        if size >= 1_048_576.0 {
            format!("{:.1} MB", size / 1_048_576.0)
        } else if size >= 1024.0 {
            format!("{:.1} kB", size / 1024.0)
        } else {
            format!("{} B", self.response_size)
        }
    }
}

/// A reference to a record supplied by link-like UI elements elsewhere in
/// the app.
///
/// Resolution prefers the id; the URL is the fallback for callers that
/// only know what they linked to, not which capture entry it was.
#[derive(Debug, Clone, Default)]
pub struct Anchor {
    pub request_id: Option<String>,
    pub href: Option<String>,
}

impl Anchor {
    pub fn for_id(id: &str) -> Self {
        Self {
            request_id: Some(id.to_string()),
            href: None,
        }
    }

    pub fn for_href(href: &str) -> Self {
        Self {
            request_id: None,
            href: Some(href.to_string()),
        }
    }
}

/// Owns the loaded records and the id index.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Arc<Record>>,
    by_id: HashMap<String, Arc<Record>>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        let records: Vec<Arc<Record>> = records.into_iter().map(Arc::new).collect();
        let by_id = records
            .iter()
            .map(|record| (record.id.clone(), Arc::clone(record)))
            .collect();

        Self { records, by_id }
    }

    /// All records in capture order.
    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn record_by_id(&self, id: &str) -> Option<Arc<Record>> {
        self.by_id.get(id).map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record. Views holding an `Arc` keep their copy alive,
    /// but lookups miss from here on.
    pub fn clear(&mut self) {
        self.records.clear();
        self.by_id.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(id: &str, url: &str) -> Record {
        Record {
            id: id.to_string(),
            url: url.to_string(),
            method: "GET".to_string(),
            status: 200,
            status_text: "OK".to_string(),
            mime_type: "text/html".to_string(),
            started_at: Utc::now(),
            duration_ms: 42.0,
            request_headers: Vec::new(),
            response_headers: Vec::new(),
            response_body: None,
            response_size: 1024,
            timings: Timings::default(),
        }
    }

    #[test]
    fn test_store_preserves_capture_order() {
        let store = RecordStore::new(vec![
            make_record("r1", "https://a.example/"),
            make_record("r2", "https://b.example/"),
            make_record("r3", "https://c.example/"),
        ]);

        let ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_record_by_id_hit_and_miss() {
        let store = RecordStore::new(vec![make_record("r1", "https://a.example/")]);

        let found = store.record_by_id("r1").expect("record exists");
        assert_eq!(found.url, "https://a.example/");
        assert!(store.record_by_id("r99").is_none());
    }

    #[test]
    fn test_clear_empties_store_and_index() {
        let mut store = RecordStore::new(vec![make_record("r1", "https://a.example/")]);
        let held = store.record_by_id("r1").expect("record exists");

        store.clear();

        assert!(store.is_empty());
        assert!(store.record_by_id("r1").is_none());
        // The shared handle stays valid after the store lets go.
        assert_eq!(held.id, "r1");
    }

    #[test]
    fn test_is_failure() {
        let mut record = make_record("r1", "https://a.example/");
        assert!(!record.is_failure());

        record.status = 404;
        assert!(record.is_failure());

        record.status = 500;
        assert!(record.is_failure());

        record.status = 0;
        assert!(record.is_failure());

        record.status = 304;
        assert!(!record.is_failure());
    }

    #[test]
    fn test_status_display() {
        let mut record = make_record("r1", "https://a.example/");
        assert_eq!(record.status_display(), "200 OK");

        record.status_text = String::new();
        assert_eq!(record.status_display(), "200");

        record.status = 0;
        assert_eq!(record.status_display(), "(failed)");
    }

    #[test]
    fn test_size_display() {
        let mut record = make_record("r1", "https://a.example/");
        record.response_size = 512;
        assert_eq!(record.size_display(), "512 B");

        record.response_size = 5_310;
        assert_eq!(record.size_display(), "5.2 kB");

        record.response_size = 2_097_152;
        assert_eq!(record.size_display(), "2.0 MB");

        record.response_size = -1;
        assert_eq!(record.size_display(), "-");
    }

    #[test]
    fn test_anchor_constructors() {
        let by_id = Anchor::for_id("r1");
        assert_eq!(by_id.request_id.as_deref(), Some("r1"));
        assert!(by_id.href.is_none());

        let by_href = Anchor::for_href("https://a.example/");
        assert!(by_href.request_id.is_none());
        assert_eq!(by_href.href.as_deref(), Some("https://a.example/"));
    }
}
