//! # Capture Loading
//!
//! Reads HAR exports into [`Record`]s.
//!
//! A capture can come from a single `.har` file or from a directory scan
//! that picks up every `.har` file two levels deep. Malformed entries are
//! skipped with a warning instead of failing the whole load, because real
//! exports routinely contain a few truncated entries.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::record::store::{Record, Timings};

/// Top level of a HAR export.
#[derive(Debug, Deserialize)]
struct Har {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    #[serde(default)]
    entries: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarEntry {
    started_date_time: String,
    #[serde(default)]
    time: f64,
    request: HarRequest,
    response: HarResponse,
    timings: Option<HarTimings>,
}

#[derive(Debug, Deserialize)]
struct HarRequest {
    method: String,
    url: String,
    #[serde(default)]
    headers: Vec<HarHeader>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarResponse {
    status: u16,
    #[serde(default)]
    status_text: String,
    #[serde(default)]
    headers: Vec<HarHeader>,
    content: Option<HarContent>,
}

#[derive(Debug, Deserialize)]
struct HarHeader {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarContent {
    #[serde(default)]
    size: Option<i64>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HarTimings {
    #[serde(default)]
    blocked: Option<f64>,
    #[serde(default)]
    dns: Option<f64>,
    #[serde(default)]
    connect: Option<f64>,
    #[serde(default)]
    send: Option<f64>,
    #[serde(default)]
    wait: Option<f64>,
    #[serde(default)]
    receive: Option<f64>,
}

/// HAR reports an absent timing phase as a negative number.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v >= 0.0)
}

fn header_pairs(headers: Vec<HarHeader>) -> Vec<(String, String)> {
    headers.into_iter().map(|h| (h.name, h.value)).collect()
}

fn record_from_entry(entry: HarEntry, id: String) -> Result<Record> {
    let started_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&entry.started_date_time)
        .with_context(|| format!("Invalid startedDateTime: {}", entry.started_date_time))?
        .with_timezone(&Utc);

    let content = entry.response.content;
    let mime_type = content
        .as_ref()
        .and_then(|c| c.mime_type.clone())
        .unwrap_or_default();
    let response_size = content.as_ref().and_then(|c| c.size).unwrap_or(-1);
    let response_body = content.and_then(|c| c.text);

    let timings = entry.timings.map_or_else(Timings::default, |t| Timings {
        blocked: positive(t.blocked),
        dns: positive(t.dns),
        connect: positive(t.connect),
        send: positive(t.send),
        wait: positive(t.wait),
        receive: positive(t.receive),
    });

    Ok(Record {
        id,
        url: entry.request.url,
        method: entry.request.method,
        status: entry.response.status,
        status_text: entry.response.status_text,
        mime_type,
        started_at,
        duration_ms: entry.time,
        request_headers: header_pairs(entry.request.headers),
        response_headers: header_pairs(entry.response.headers),
        response_body,
        response_size,
        timings,
    })
}

/// Parse one HAR file, assigning ids from `next_id` onward.
///
/// A file that is not valid JSON or has no `log` object is an error;
/// individual entries that fail to parse are skipped with a warning so one
/// bad entry cannot sink the rest of the capture.
fn parse_capture_file(path: &Path, next_id: &mut usize) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read capture file: {}", path.display()))?;
    let har: Har = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse HAR file: {}", path.display()))?;

    let mut records = Vec::new();
    for value in har.log.entries {
        let entry: HarEntry = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!("Warning: Skipping malformed entry in {}: {}", path.display(), e);
                continue;
            }
        };

        let id = format!("r{}", *next_id);
        match record_from_entry(entry, id) {
            Ok(record) => {
                records.push(record);
                *next_id += 1;
            }
            Err(e) => {
                eprintln!("Warning: Skipping entry in {}: {}", path.display(), e);
            }
        }
    }

    Ok(records)
}

/// Load a single `.har` file.
pub fn load_capture_file(path: &Path) -> Result<Vec<Record>> {
    let mut next_id = 1;
    parse_capture_file(path, &mut next_id)
}

/// Scan `dir` for `.har` files (up to two levels deep) and load them all.
///
/// Files are visited in path order so ids are stable across runs. A file
/// that fails to parse is skipped with a warning; a missing directory
/// yields an empty capture.
pub fn load_capture_dir(dir: &Path) -> Result<Vec<Record>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    if !dir.is_dir() {
        bail!("Path '{}' exists but is not a directory", dir.display());
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).max_depth(2).into_iter().filter_map(|e| match e {
        Ok(entry) => Some(entry),
        Err(err) => {
            eprintln!("Warning: Skipping unreadable path: {err}");
            None
        }
    }) {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let extension = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_lowercase(),
            None => continue,
        };

        if extension != "har" {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();

    let mut records = Vec::new();
    let mut next_id = 1;
    for file in files {
        match parse_capture_file(&file, &mut next_id) {
            Ok(mut loaded) => records.append(&mut loaded),
            Err(e) => {
                eprintln!("Warning: Skipping capture file {}: {}", file.display(), e);
            }
        }
    }

    Ok(records)
}

fn demo_record(
    base: DateTime<Utc>,
    offset_ms: i64,
    id: &str,
    method: &str,
    url: &str,
    status: u16,
    status_text: &str,
    mime_type: &str,
    duration_ms: f64,
    response_size: i64,
) -> Record {
    Record {
        id: id.to_string(),
        url: url.to_string(),
        method: method.to_string(),
        status,
        status_text: status_text.to_string(),
        mime_type: mime_type.to_string(),
        started_at: base + Duration::milliseconds(offset_ms),
        duration_ms,
        request_headers: vec![
            ("Host".to_string(), "app.example".to_string()),
            ("Accept".to_string(), "*/*".to_string()),
        ],
        response_headers: vec![("Server".to_string(), "nginx".to_string())],
        response_body: None,
        response_size,
        timings: Timings::default(),
    }
}

/// Built-in capture used by `--demo` and for trying the UI without a HAR
/// export at hand.
pub fn demo_records() -> Vec<Record> {
    let base = Utc::now() - Duration::seconds(30);

    let mut records = vec![
        demo_record(base, 0, "r1", "GET", "https://app.example/", 200, "OK", "text/html", 182.4, 5_214),
        demo_record(base, 210, "r2", "GET", "https://app.example/assets/main.css", 200, "OK", "text/css", 34.1, 18_660),
        demo_record(base, 224, "r3", "GET", "https://app.example/assets/main.js", 200, "OK", "application/javascript", 96.8, 214_771),
        demo_record(base, 430, "r4", "GET", "https://app.example/api/v1/session", 200, "OK", "application/json", 121.9, 412),
        demo_record(base, 1460, "r5", "POST", "https://app.example/api/v1/events", 201, "Created", "application/json", 88.2, 31),
        demo_record(base, 1510, "r6", "GET", "https://cdn.example/logo.svg", 304, "Not Modified", "image/svg+xml", 12.5, 0),
        demo_record(base, 2380, "r7", "GET", "https://app.example/api/v1/export", 500, "Internal Server Error", "application/json", 644.0, 97),
        demo_record(base, 2395, "r8", "GET", "https://cdn.example/fonts/inter.woff2", 404, "Not Found", "text/plain", 41.7, 19),
        demo_record(base, 2710, "r9", "GET", "https://telemetry.example/beacon", 0, "", "", 30_000.0, -1),
    ];

    // Flesh out one record so the detail tabs have something to show.
    if let Some(session) = records.iter_mut().find(|r| r.id == "r4") {
        session.request_headers = vec![
            ("Host".to_string(), "app.example".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), "Bearer redacted".to_string()),
        ];
        session.response_headers = vec![
            ("Server".to_string(), "nginx".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Cache-Control".to_string(), "no-store".to_string()),
        ];
        session.response_body = Some(
            "{\n  \"user\": \"demo\",\n  \"expires_in\": 3600,\n  \"scopes\": [\"read\", \"write\"]\n}"
                .to_string(),
        );
        session.timings = Timings {
            blocked: Some(1.2),
            dns: Some(8.4),
            connect: Some(22.0),
            send: Some(0.3),
            wait: Some(84.6),
            receive: Some(5.4),
        };
    }

    records
}
