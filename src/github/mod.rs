//! GitHub App credential issuance.
//!
//! This module provides:
//! - Minting of the short-lived app assertion (an RS256 JWT) that proves
//!   the app's identity to GitHub
//! - Exchange of an app assertion for an installation-scoped access token
//! - Webhook payload signature verification
//!
//! Credentials are resolved through [`crate::secrets`]; nothing here
//! caches tokens or assertions, so every exchange mints fresh material.

pub mod assertion;
pub mod tokens;
pub mod webhook;

pub use assertion::{AssertionClaims, AssertionMinter};
pub use tokens::{InstallationToken, TokenExchanger};
pub use webhook::{verify_signature, WebhookVerifier};

use thiserror::Error;

/// Errors from the credential subsystem.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// A required secret is empty or unusable (including a private key
    /// that fails to parse). Fatal to the current operation; fix the
    /// configuration rather than retrying.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The caller passed a missing or non-positive installation id.
    /// Caught before any secret resolution or network I/O.
    #[error("Invalid installation id: {0}")]
    InvalidArgument(i64),

    /// The remote token exchange failed. The original cause is preserved
    /// for diagnostics; retry and backoff belong to the caller.
    #[error("Token exchange failed for installation {installation_id}: {source}")]
    TokenExchange {
        installation_id: i64,
        #[source]
        source: anyhow::Error,
    },

    /// A webhook payload signature did not verify.
    #[error("Webhook signature mismatch")]
    SignatureMismatch,
}
