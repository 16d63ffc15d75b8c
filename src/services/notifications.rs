// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification boundary between the engine and the UI.
//!
//! The engine never renders anything; it queues `(message, severity)` pairs
//! that the UI drains and displays.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Queue of notifications waiting to be shown.
#[derive(Debug, Default)]
pub struct Notifier {
    pending: Vec<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Error => {
                tracing::warn!(message = %notification.message, "Notify error")
            }
            Severity::Warning => {
                tracing::info!(message = %notification.message, "Notify warning")
            }
            Severity::Success | Severity::Info => {
                tracing::debug!(message = %notification.message, severity = ?notification.severity, "Notify")
            }
        }
        self.pending.push(notification);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, Severity::Success));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, Severity::Warning));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, Severity::Info));
    }

    /// Take every queued notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }
}
