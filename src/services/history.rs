// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Watch-history import.
//!
//! Normalizes a Takeout-style history export (a bare array or an object with
//! an `items` array) or a pasted list of URLs into [`ImportedHistoryItem`]s.
//! Imported history is kept in memory for the session only.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::Config;
use crate::error::AppError;
use crate::models::ImportedHistoryItem;
use crate::time_utils::format_utc_rfc3339;

/// Marker a URL must contain to be treated as a watch page.
const WATCH_URL_MARKER: &str = "youtube.com/watch";
const UNKNOWN_TITLE: &str = "Unknown Video";
const MANUAL_TITLE: &str = "Manually Added Video";
pub const MAX_TITLE_CHARS: usize = 200;

/// Trim, cap at `max_len` characters, then strip `<script ...>...</script>`
/// blocks (case-insensitive).
pub fn sanitize_input(input: &str, max_len: usize) -> String {
    let capped: String = input.trim().chars().take(max_len).collect();
    strip_script_blocks(&capped)
}

fn strip_script_blocks(input: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `input`.
    let lower = input.to_ascii_lowercase();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(rel_start) = lower[pos..].find("<script") {
        let start = pos + rel_start;
        let after_open = match lower[start..].find('>') {
            Some(i) => start + i + 1,
            None => break,
        };
        let end = match lower[after_open..].find("</script>") {
            Some(i) => after_open + i + "</script>".len(),
            None => break,
        };
        out.push_str(&input[pos..start]);
        pos = end;
    }

    out.push_str(&input[pos..]);
    out
}

/// Value of the first `v` query parameter, up to the next `&`.
pub fn extract_video_id(url: &str) -> Option<&str> {
    let bytes = url.as_bytes();
    let mut search_from = 0;

    while let Some(rel) = url[search_from..].find("v=") {
        let at = search_from + rel;
        if at > 0 && matches!(bytes[at - 1], b'?' | b'&') {
            let rest = &url[at + 2..];
            let id = rest.split('&').next().unwrap_or_default();
            if !id.is_empty() {
                return Some(id);
            }
        }
        search_from = at + 2;
    }

    None
}

/// Decode a history upload body.
pub fn parse_payload(body: &str) -> Result<Value, AppError> {
    serde_json::from_str(body).map_err(|e| AppError::MalformedJson(e.to_string()))
}

pub struct HistoryImporter {
    max_items: usize,
    items: Vec<ImportedHistoryItem>,
}

impl HistoryImporter {
    pub fn new(config: &Config) -> Self {
        Self {
            max_items: config.max_import_items,
            items: Vec::new(),
        }
    }

    /// Import a structured history export.
    ///
    /// Only the first `max_import_items` entries are considered. Entries
    /// that are not watch-page URLs or carry no video id are skipped.
    /// Returns the newly added items.
    pub fn import_bulk(&mut self, payload: &Value, now: DateTime<Utc>) -> Vec<ImportedHistoryItem> {
        let entries: &[Value] = match payload {
            Value::Array(entries) => entries,
            Value::Object(map) => match map.get("items") {
                Some(Value::Array(entries)) => entries,
                _ => &[],
            },
            _ => &[],
        };

        let considered = entries.len().min(self.max_items);
        let imported_at = format_utc_rfc3339(now);

        let processed: Vec<ImportedHistoryItem> = entries[..considered]
            .iter()
            .filter_map(|entry| {
                let url = entry.get("titleUrl")?.as_str()?;
                if !url.contains(WATCH_URL_MARKER) {
                    return None;
                }
                let video_id = extract_video_id(url)?;
                let title = match entry.get("title").and_then(Value::as_str) {
                    Some(t) if !t.is_empty() => t,
                    _ => UNKNOWN_TITLE,
                };
                let watched_at = match entry.get("time").and_then(Value::as_str) {
                    Some(t) if !t.is_empty() => t.to_string(),
                    _ => imported_at.clone(),
                };

                Some(ImportedHistoryItem {
                    video_id: video_id.to_string(),
                    title: sanitize_input(title, MAX_TITLE_CHARS),
                    source_url: url.to_string(),
                    watched_at,
                })
            })
            .collect();

        tracing::info!(
            entries = entries.len(),
            considered,
            imported = processed.len(),
            "History export imported"
        );

        self.items.extend(processed.iter().cloned());
        processed
    }

    /// Import newline-separated watch URLs.
    pub fn import_urls(
        &mut self,
        raw_text: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ImportedHistoryItem>, AppError> {
        let urls: Vec<&str> = raw_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && line.contains(WATCH_URL_MARKER))
            .collect();

        if urls.is_empty() {
            return Err(AppError::NothingToImport(
                "Please enter valid YouTube URLs".to_string(),
            ));
        }

        let watched_at = format_utc_rfc3339(now);
        let imported: Vec<ImportedHistoryItem> = urls
            .into_iter()
            .filter_map(|url| {
                extract_video_id(url).map(|id| ImportedHistoryItem {
                    video_id: id.to_string(),
                    title: MANUAL_TITLE.to_string(),
                    source_url: url.to_string(),
                    watched_at: watched_at.clone(),
                })
            })
            .collect();

        tracing::info!(imported = imported.len(), "Manual URLs imported");
        self.items.extend(imported.iter().cloned());
        Ok(imported)
    }

    pub fn items(&self) -> &[ImportedHistoryItem] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn importer() -> HistoryImporter {
        HistoryImporter::new(&Config::default())
    }

    fn watch_entry(n: usize) -> Value {
        json!({
            "title": format!("Watched video {n}"),
            "titleUrl": format!("https://www.youtube.com/watch?v=vid{n}"),
            "time": "2024-02-01T12:00:00.000Z"
        })
    }

    #[test]
    fn test_bulk_import_truncates() {
        let mut importer = importer();
        let entries: Vec<Value> = (0..150).map(watch_entry).collect();

        let imported = importer.import_bulk(&Value::Array(entries), Utc::now());
        assert_eq!(imported.len(), 100);
        assert_eq!(imported[0].video_id, "vid0");
        assert_eq!(imported[99].video_id, "vid99");
        assert_eq!(importer.items().len(), 100);
    }

    #[test]
    fn test_bulk_import_items_wrapper() {
        let mut importer = importer();
        let payload = json!({ "items": [watch_entry(1), watch_entry(2)] });
        assert_eq!(importer.import_bulk(&payload, Utc::now()).len(), 2);
    }

    #[test]
    fn test_non_watch_urls_are_skipped() {
        let mut importer = importer();
        let payload = json!([
            { "title": "Elsewhere", "titleUrl": "https://vimeo.com/123" },
            { "title": "Channel", "titleUrl": "https://www.youtube.com/channel/abc" },
            { "title": "No url" },
            "not an object"
        ]);
        assert!(importer.import_bulk(&payload, Utc::now()).is_empty());
        assert!(importer.items().is_empty());
    }

    #[test]
    fn test_unrecognized_payload_imports_nothing() {
        let mut importer = importer();
        assert!(importer.import_bulk(&json!({"videos": []}), Utc::now()).is_empty());
        assert!(importer.import_bulk(&json!(42), Utc::now()).is_empty());
    }

    #[test]
    fn test_bulk_defaults_and_sanitizing() {
        let mut importer = importer();
        let now = Utc::now();
        let payload = json!([
            { "titleUrl": "https://www.youtube.com/watch?v=abc&t=10" },
            {
                "title": "  Hello <SCRIPT type=x>alert(1)</script>world  ",
                "titleUrl": "https://www.youtube.com/watch?feature=share&v=def"
            },
            { "title": "No id", "titleUrl": "https://www.youtube.com/watch?list=L1" }
        ]);

        let imported = importer.import_bulk(&payload, now);
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].video_id, "abc");
        assert_eq!(imported[0].title, "Unknown Video");
        assert_eq!(imported[0].watched_at, format_utc_rfc3339(now));
        assert_eq!(imported[1].video_id, "def");
        assert_eq!(imported[1].title, "Hello world");
    }

    #[test]
    fn test_manual_urls() {
        let mut importer = importer();
        let text = "https://www.youtube.com/watch?v=one\n\n   https://youtube.com/watch?v=two&list=x  \nhttps://example.com/?v=three\n";

        let imported = importer.import_urls(text, Utc::now()).unwrap();
        let ids: Vec<&str> = imported.iter().map(|i| i.video_id.as_str()).collect();
        assert_eq!(ids, vec!["one", "two"]);
        assert!(imported.iter().all(|i| i.title == "Manually Added Video"));
    }

    #[test]
    fn test_manual_urls_empty_selection() {
        let mut importer = importer();
        let err = importer.import_urls("https://example.com\n \n", Utc::now());
        assert!(matches!(err, Err(AppError::NothingToImport(_))));
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(extract_video_id("https://youtube.com/watch?v=abc"), Some("abc"));
        assert_eq!(extract_video_id("https://youtube.com/watch?x=1&v=abc&t=3"), Some("abc"));
        assert_eq!(extract_video_id("https://youtube.com/watch?dev=1"), None);
        assert_eq!(extract_video_id("https://youtube.com/watch?v="), None);
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("  plain  ", 200), "plain");
        assert_eq!(sanitize_input("abcdef", 3), "abc");
        assert_eq!(sanitize_input("a<script>x</script>b<script>y</script>c", 200), "abc");
        assert_eq!(sanitize_input("unterminated <script>x", 200), "unterminated <script>x");
        assert_eq!(sanitize_input("é".repeat(300).as_str(), 200).chars().count(), 200);
    }

    #[test]
    fn test_parse_payload_rejects_garbage() {
        assert!(matches!(parse_payload("{not json"), Err(AppError::MalformedJson(_))));
        assert!(parse_payload("[]").is_ok());
    }
}
