//! Transport-agnostic login endpoints.
//!
//! The service validates payloads, checks the identity directory and hands
//! the rest to [`Authenticator`]. Every authentication failure produces the
//! same response; the specific reason only reaches the logs.

use std::sync::Arc;

use verifier::VerifierMode;

use crate::directory::IdentityDirectory;
use crate::error::AuthError;
use crate::orchestrator::Authenticator;
use crate::wire::{ChallengeRequest, ChallengeResponse, LoginRequest, LoginResponse};

pub struct LoginService {
    authenticator: Authenticator,
    directory: Arc<dyn IdentityDirectory>,
}

impl LoginService {
    pub fn new(authenticator: Authenticator, directory: Arc<dyn IdentityDirectory>) -> Self {
        Self {
            authenticator,
            directory,
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Issue a challenge for a registered key.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for a malformed public key
    /// - `NotFound` if the key is not registered
    /// - `EntropyUnavailable` if no challenge could be generated (fatal)
    pub fn challenge(&self, request: &ChallengeRequest) -> Result<ChallengeResponse, AuthError> {
        let subject = request.subject_key()?;
        if !self.directory.exists(&subject) {
            tracing::warn!(subject = %subject, "challenge requested for unknown identity");
            return Err(AuthError::NotFound);
        }

        let nonce = self.authenticator.begin_login(&subject)?;
        Ok(ChallengeResponse {
            challenge_hex: nonce.to_hex(),
        })
    }

    /// Complete a login.
    ///
    /// Malformed payloads and unknown identities are errors and leave any
    /// outstanding challenge untouched. Everything past that point consumes
    /// the challenge and yields either success or the generic failure.
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let login = request.validate()?;

        let expected = self.authenticator.mode();
        let offered = match request {
            LoginRequest::Schnorr(_) => VerifierMode::Schnorr,
            LoginRequest::Ecdsa(_) => VerifierMode::Ecdsa,
        };
        if offered != expected {
            return Err(AuthError::invalid(format!(
                "{offered} proof offered, server accepts {expected}"
            )));
        }

        let Some(username) = self.directory.display_name(&login.subject) else {
            tracing::warn!(subject = %login.subject, "login attempted for unknown identity");
            return Err(AuthError::NotFound);
        };

        let outcome = self.authenticator.complete_login(
            &login.subject,
            &login.claimed_challenge_hex,
            &login.proof,
        );

        if outcome.is_valid() {
            tracing::info!(subject = %login.subject, user = %username, "login successful");
            Ok(LoginResponse::success(Some(username)))
        } else {
            Ok(LoginResponse::failure())
        }
    }
}
