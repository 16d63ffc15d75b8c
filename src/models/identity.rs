// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed-in identity and session models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Identity decoded from an external identity assertion.
///
/// Field names on the wire follow the identity provider's claim names so an
/// export reads the same as the assertion it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Identity {
    /// Stable subject identifier (`sub` claim); namespaces persisted data
    #[serde(rename = "sub")]
    pub subject_id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub email: Option<String>,
    #[serde(rename = "picture")]
    pub picture_url: Option<String>,
    #[serde(rename = "verified_email")]
    pub email_verified: bool,
}

impl Identity {
    /// Name used when greeting the user.
    pub fn greeting_name(&self) -> &str {
        if !self.display_name.is_empty() {
            &self.display_name
        } else if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            email
        } else {
            &self.subject_id
        }
    }
}

/// An authenticated session. Exists only while signed in.
#[derive(Clone)]
pub struct Session {
    pub identity: Identity,
    /// 64 random bytes, hex-encoded; fresh for every sign-in
    pub session_token: String,
    /// Process-lifetime CSRF token, shared by every session of this engine
    pub csrf_token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("session_token", &"<redacted>")
            .field("csrf_token", &"<redacted>")
            .finish()
    }
}
