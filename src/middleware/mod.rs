// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Guards run by handlers before touching engine components.

pub mod auth;
pub mod rate_limit;

pub use auth::{require_auth, AuthUser};
pub use rate_limit::enforce_rate_limit;
