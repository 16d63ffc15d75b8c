// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication state.
//!
//! `SignedOut -> Authenticating -> SignedIn -> SignedOut`. There is no
//! locked or banned state; every exit leads back to `SignedOut`.
//!
//! The process CSRF token is generated here but never checked by the
//! engine's own handlers, which are called in-process. It is exposed through
//! [`SessionManager::csrf_token`] and [`SessionManager::verify_csrf`] for a UI
//! collaborator that submits forms across a request boundary.

use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::models::{Identity, Session};
use crate::services::identity::decode_identity_assertion;
use crate::services::tokens::TokenGenerator;

/// Observable authentication phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    SignedOut,
    Authenticating,
    SignedIn,
}

#[derive(Debug)]
enum SessionState {
    SignedOut,
    Authenticating,
    SignedIn(Session),
}

/// Boundary notified when a session ends.
pub trait SessionRevoker: Send + Sync {
    fn revoke(&self, session: &Session);
}

/// Revoker that only records the revocation in the log.
#[derive(Debug, Default)]
pub struct LoggingRevoker;

impl SessionRevoker for LoggingRevoker {
    fn revoke(&self, session: &Session) {
        tracing::info!(
            user_id = %session.identity.subject_id,
            "Session revoked"
        );
    }
}

pub struct SessionManager {
    csrf_token: String,
    state: SessionState,
    revoker: Box<dyn SessionRevoker>,
}

impl SessionManager {
    /// Create a signed-out manager. The CSRF token is generated here and
    /// lives as long as the manager.
    pub fn new(tokens: &TokenGenerator) -> Result<Self, AppError> {
        Ok(Self {
            csrf_token: tokens.csrf_token()?,
            state: SessionState::SignedOut,
            revoker: Box::new(LoggingRevoker),
        })
    }

    pub fn with_revoker(mut self, revoker: Box<dyn SessionRevoker>) -> Self {
        self.revoker = revoker;
        self
    }

    pub fn phase(&self) -> AuthPhase {
        match self.state {
            SessionState::SignedOut => AuthPhase::SignedOut,
            SessionState::Authenticating => AuthPhase::Authenticating,
            SessionState::SignedIn(_) => AuthPhase::SignedIn,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self.state, SessionState::SignedIn(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session().map(|s| &s.identity)
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Constant-time check of a CSRF token presented by the UI.
    pub fn verify_csrf(&self, candidate: &str) -> bool {
        bool::from(self.csrf_token.as_bytes().ct_eq(candidate.as_bytes()))
    }

    /// Sign in with an identity assertion.
    ///
    /// The assertion is decoded, not verified. A failed attempt leaves the
    /// manager as it was: signed out, or still in the existing session. A
    /// successful one revokes and replaces any existing session.
    pub fn sign_in(
        &mut self,
        assertion: &str,
        tokens: &TokenGenerator,
    ) -> Result<&Session, AppError> {
        let previous = std::mem::replace(&mut self.state, SessionState::Authenticating);

        let session = match Self::authenticate(assertion, tokens, &self.csrf_token) {
            Ok(session) => session,
            Err(e) => {
                self.state = match previous {
                    SessionState::SignedIn(session) => SessionState::SignedIn(session),
                    _ => SessionState::SignedOut,
                };
                tracing::warn!(error = %e, "Sign-in failed");
                return Err(e);
            }
        };

        if let SessionState::SignedIn(previous) = previous {
            tracing::info!(
                user_id = %previous.identity.subject_id,
                "Replacing existing session"
            );
            self.revoker.revoke(&previous);
        }

        tracing::info!(
            user_id = %session.identity.subject_id,
            email_verified = session.identity.email_verified,
            "Signed in"
        );

        self.state = SessionState::SignedIn(session);
        self.session().ok_or(AppError::Unauthorized)
    }

    fn authenticate(
        assertion: &str,
        tokens: &TokenGenerator,
        csrf_token: &str,
    ) -> Result<Session, AppError> {
        let identity = decode_identity_assertion(assertion)?;
        Ok(Session {
            identity,
            session_token: tokens.session_token()?,
            csrf_token: csrf_token.to_string(),
        })
    }

    /// End the current session, if any, and notify the revocation boundary.
    ///
    /// Returns the identity that was signed out.
    pub fn sign_out(&mut self) -> Option<Identity> {
        match std::mem::replace(&mut self.state, SessionState::SignedOut) {
            SessionState::SignedIn(session) => {
                self.revoker.revoke(&session);
                tracing::info!(user_id = %session.identity.subject_id, "Signed out");
                Some(session.identity)
            }
            _ => None,
        }
    }
}
