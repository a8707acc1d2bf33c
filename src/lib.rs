//! Credential issuance for a GitHub App. Secrets resolve through a
//! vault-then-environment chain; a short-lived signed assertion built
//! from them is exchanged for an installation-scoped access token.

pub mod config;
pub mod github;
pub mod observe;
pub mod secrets;

#[cfg(test)]
pub mod test_support;

pub use config::Config;
pub use github::{AssertionMinter, CredentialError, InstallationToken, TokenExchanger};
pub use secrets::{SecretResolver, Secrets};
