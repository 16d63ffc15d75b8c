// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - engine components.

pub mod consent;
pub mod history;
pub mod identity;
pub mod notifications;
pub mod privacy;
pub mod rate_limit;
pub mod ratings;
pub mod session;
pub mod tokens;

pub use consent::ConsentStore;
pub use history::HistoryImporter;
pub use identity::decode_identity_assertion;
pub use notifications::{Notification, Notifier, Severity};
pub use privacy::PrivacyPolicy;
pub use rate_limit::RateLimiter;
pub use ratings::RatingStore;
pub use session::{AuthPhase, LoggingRevoker, SessionManager, SessionRevoker};
pub use tokens::TokenGenerator;
