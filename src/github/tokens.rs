//! Installation access token exchange.
//!
//! Presents a freshly minted app assertion to GitHub as a bearer
//! credential and exchanges it for a token scoped to one installation.
//! Tokens are not cached or refreshed here; callers re-invoke the
//! exchange per logical session or on an observed authorization failure.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use super::{AssertionMinter, CredentialError};
use crate::config::GithubConfig;
use crate::observe::{CredentialEvent, CredentialObserver};

/// Pinned GitHub REST API version sent with every request.
const API_VERSION: &str = "2022-11-28";

/// GitHub's JSON media type.
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Wire shape of GitHub's installation access token response.
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Access token scoped to one installation.
///
/// The server-defined expiry (about one hour) is carried for callers to
/// inspect but is not tracked here.
#[derive(Debug, Clone)]
pub struct InstallationToken {
    pub installation_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Exchanges app assertions for installation access tokens.
pub struct TokenExchanger {
    client: reqwest::Client,
    api_base: String,
    user_agent: String,
    minter: AssertionMinter,
    observer: Arc<dyn CredentialObserver>,
}

impl TokenExchanger {
    pub fn new(
        config: &GithubConfig,
        minter: AssertionMinter,
        observer: Arc<dyn CredentialObserver>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            minter,
            observer,
        }
    }

    /// Exchange a fresh app assertion for an installation access token.
    ///
    /// A new assertion is minted on every call; assertions are never
    /// reused. Minting errors propagate unchanged. Remote failures are
    /// reported with the installation id (never the token, the
    /// assertion, or any secret) and surface as
    /// [`CredentialError::TokenExchange`] with the original cause
    /// preserved. No retry happens at this layer.
    pub async fn exchange(
        &self,
        installation_id: i64,
    ) -> Result<InstallationToken, CredentialError> {
        if installation_id <= 0 {
            return Err(CredentialError::InvalidArgument(installation_id));
        }

        self.observer
            .record(&CredentialEvent::ExchangeStarted { installation_id });

        let assertion = self.minter.mint().await?;

        match self.request_token(&assertion, installation_id).await {
            Ok(response) => {
                self.observer
                    .record(&CredentialEvent::ExchangeSucceeded { installation_id });
                Ok(InstallationToken {
                    installation_id,
                    token: response.token,
                    expires_at: response.expires_at,
                })
            }
            Err(source) => {
                self.observer.record(&CredentialEvent::ExchangeFailed {
                    installation_id,
                    reason: source.to_string(),
                });
                Err(CredentialError::TokenExchange {
                    installation_id,
                    source,
                })
            }
        }
    }

    /// Like [`TokenExchanger::exchange`], returning only the token string.
    pub async fn exchange_token(&self, installation_id: i64) -> Result<String, CredentialError> {
        Ok(self.exchange(installation_id).await?.token)
    }

    async fn request_token(
        &self,
        assertion: &str,
        installation_id: i64,
    ) -> Result<AccessTokenResponse> {
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_base, installation_id
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", assertion))
            .header("Accept", GITHUB_JSON)
            .header("User-Agent", &self.user_agent)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .context("Failed to request installation access token")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "GitHub API error getting installation token: {} - {}",
                status,
                body
            );
        }

        response
            .json()
            .await
            .context("Failed to parse installation token response")
    }
}
