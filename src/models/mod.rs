// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the engine.

pub mod consent;
pub mod export;
pub mod history;
pub mod identity;
pub mod rating;

pub use consent::{ConsentRecord, ConsentSettings, PrivacyFlag, PrivacySettings};
pub use export::UserDataExport;
pub use history::ImportedHistoryItem;
pub use identity::{Identity, Session};
pub use rating::{RatingRecord, RatingRequest, RatingStats};
