// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cryptographically random identifiers.

use chrono::{DateTime, Utc};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::AppError;

/// Bytes of entropy in a CSRF token.
pub const CSRF_TOKEN_BYTES: usize = 32;
/// Bytes of entropy in a session token.
pub const SESSION_TOKEN_BYTES: usize = 64;

const RATING_ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Token source backed by the operating system CSPRNG.
#[derive(Clone)]
pub struct TokenGenerator {
    rng: SystemRandom,
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    fn fill(&self, buf: &mut [u8]) -> Result<(), AppError> {
        self.rng
            .fill(buf)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG unavailable")))
    }

    /// `byte_len` random bytes as lowercase hex (`2 * byte_len` chars).
    pub fn generate_token(&self, byte_len: usize) -> Result<String, AppError> {
        let mut bytes = vec![0u8; byte_len];
        self.fill(&mut bytes)?;
        Ok(hex::encode(bytes))
    }

    pub fn csrf_token(&self) -> Result<String, AppError> {
        self.generate_token(CSRF_TOKEN_BYTES)
    }

    pub fn session_token(&self) -> Result<String, AppError> {
        self.generate_token(SESSION_TOKEN_BYTES)
    }

    /// Rating id of the form `rating_<unix millis>_<9 base36 chars>`.
    ///
    /// Unique in practice, not guaranteed.
    pub fn generate_rating_id(&self, now: DateTime<Utc>) -> Result<String, AppError> {
        let mut bytes = [0u8; RATING_ID_SUFFIX_LEN];
        self.fill(&mut bytes)?;

        // Slight modulo bias; acceptable for an identifier.
        let suffix: String = bytes
            .iter()
            .map(|b| BASE36[(*b as usize) % BASE36.len()] as char)
            .collect();

        Ok(format!("rating_{}_{}", now.timestamp_millis(), suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_length_and_alphabet() {
        let tokens = TokenGenerator::new();

        let csrf = tokens.csrf_token().unwrap();
        assert_eq!(csrf.len(), 64);
        assert!(csrf.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let session = tokens.session_token().unwrap();
        assert_eq!(session.len(), 128);

        assert_eq!(tokens.generate_token(0).unwrap(), "");
    }

    #[test]
    fn test_tokens_differ() {
        let tokens = TokenGenerator::new();
        let seen: HashSet<String> = (0..32).map(|_| tokens.csrf_token().unwrap()).collect();
        assert_eq!(seen.len(), 32);
    }

    #[test]
    fn test_rating_id_format() {
        let tokens = TokenGenerator::new();
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let id = tokens.generate_rating_id(now).unwrap();

        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "rating");
        assert_eq!(parts[1], "1700000000123");
        assert_eq!(parts[2].len(), RATING_ID_SUFFIX_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
