// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Watch-history import entry points.

use chrono::Utc;
use std::path::Path;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::{enforce_rate_limit, require_auth};
use crate::models::ImportedHistoryItem;
use crate::services::history::parse_payload;
use crate::services::rate_limit::actions;
use crate::EngineState;

use super::reported;

/// Only MIME type accepted for history uploads.
pub const JSON_MIME: &str = "application/json";

const BYTES_PER_KB: u64 = 1024;
const BYTES_PER_MB: u64 = 1024 * 1024;

/// Human-readable upload cap, in the largest unit that divides it exactly.
fn describe_size(bytes: u64) -> String {
    if bytes % BYTES_PER_MB == 0 {
        format!("{}MB", bytes / BYTES_PER_MB)
    } else if bytes % BYTES_PER_KB == 0 {
        format!("{}KB", bytes / BYTES_PER_KB)
    } else {
        format!("{bytes} bytes")
    }
}

fn authorize_import(state: &EngineState) -> Result<()> {
    require_auth(state)?;
    enforce_rate_limit(state, actions::IMPORT)
}

fn check_upload(config: &Config, is_json: bool, size: u64) -> Result<()> {
    if !is_json {
        return Err(AppError::BadRequest("Please upload a JSON file".to_string()));
    }
    if size > config.max_upload_bytes {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {}",
            describe_size(config.max_upload_bytes)
        )));
    }
    Ok(())
}

fn import_body(state: &mut EngineState, body: &str) -> Result<Vec<ImportedHistoryItem>> {
    let payload = parse_payload(body)?;
    Ok(state.history.import_bulk(&payload, Utc::now()))
}

fn finish_bulk_import(
    state: &mut EngineState,
    outcome: Result<Vec<ImportedHistoryItem>>,
) -> Result<Vec<ImportedHistoryItem>> {
    let imported = reported(state, outcome)?;
    state.notifier.success(format!(
        "Successfully imported {} videos from your watch history!",
        imported.len()
    ));
    Ok(imported)
}

/// Import an uploaded history export held in memory.
pub fn import_history_upload(
    state: &mut EngineState,
    mime: &str,
    body: &[u8],
) -> Result<Vec<ImportedHistoryItem>> {
    let outcome = authorize_import(state)
        .and_then(|()| check_upload(&state.config, mime == JSON_MIME, body.len() as u64))
        .and_then(|()| {
            std::str::from_utf8(body).map_err(|e| AppError::MalformedJson(e.to_string()))
        })
        .and_then(|text| import_body(state, text));

    finish_bulk_import(state, outcome)
}

/// Read a history export from disk and import it.
///
/// The read is the only suspension point; decoding and storing the items
/// happen after it without yielding.
pub async fn import_history_file(
    state: &mut EngineState,
    path: &Path,
) -> Result<Vec<ImportedHistoryItem>> {
    let outcome = read_history_file(state, path).await;
    let outcome = outcome.and_then(|text| import_body(state, &text));
    finish_bulk_import(state, outcome)
}

async fn read_history_file(state: &EngineState, path: &Path) -> Result<String> {
    authorize_import(state)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Unable to stat history file");
        AppError::BadRequest("Error reading file".to_string())
    })?;
    check_upload(&state.config, is_json, metadata.len())?;

    tokio::fs::read_to_string(path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Unable to read history file");
        AppError::BadRequest("Error reading file".to_string())
    })
}

/// Import pasted watch URLs, one per line.
pub fn import_urls(state: &mut EngineState, raw_text: &str) -> Result<Vec<ImportedHistoryItem>> {
    let outcome = authorize_import(state);
    reported(state, outcome)?;

    let outcome = state.history.import_urls(raw_text, Utc::now());
    let imported = reported(state, outcome)?;

    state
        .notifier
        .success(format!("Successfully imported {} videos!", imported.len()));
    Ok(imported)
}
