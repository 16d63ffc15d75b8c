// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity assertion decoding.
//!
//! This decodes the payload of a compact, three-segment ID token and reads
//! the identity claims. It does NOT verify the signature, issuer, audience or
//! expiry: the caller must only pass assertions that a verifying identity
//! provider has already accepted.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::Identity;

/// Claims read from the assertion payload. Unknown claims are ignored.
#[derive(Debug, Deserialize)]
struct IdentityClaims {
    sub: Option<String>,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
    email_verified: Option<bool>,
}

/// Decode the identity carried by an assertion.
pub fn decode_identity_assertion(assertion: &str) -> Result<Identity, AppError> {
    let segments: Vec<&str> = assertion.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(AppError::InvalidAssertion(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = decode_segment(segments[1])?;

    let claims: IdentityClaims = serde_json::from_slice(&payload)
        .map_err(|e| AppError::InvalidAssertion(format!("payload is not valid JSON: {e}")))?;

    let subject_id = claims
        .sub
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidAssertion("missing sub claim".to_string()))?;

    Ok(Identity {
        subject_id,
        display_name: claims.name.unwrap_or_default(),
        email: claims.email,
        picture_url: claims.picture,
        email_verified: claims.email_verified.unwrap_or(false),
    })
}

/// Base64url-decode one segment, tolerating padding and the standard
/// alphabet's `+` and `/`.
fn decode_segment(segment: &str) -> Result<Vec<u8>, AppError> {
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    if normalized.is_empty() {
        return Err(AppError::InvalidAssertion("empty payload segment".to_string()));
    }

    URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| AppError::InvalidAssertion(format!("payload is not base64url: {e}")))
}
