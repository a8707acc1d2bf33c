//! HTTP client for the project-scoped secret vault.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{SecretOrigin, SecretSource};
use crate::config::VaultConfig;

/// Long-lived, read-only handle to the vault HTTP API.
///
/// Constructed once per process and shared through the resolver. The
/// inner client is reference-counted, so concurrent reads are safe.
#[derive(Clone)]
pub struct VaultClient {
    client: reqwest::Client,
    base_url: String,
    project: String,
    environment: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct VaultSecret {
    #[allow(dead_code)]
    name: String,
    value: String,
}

impl VaultClient {
    /// Create a vault client scoped to the configured project/environment
    /// pair. The bearer token comes from the config file, or from the
    /// VAULT_TOKEN environment variable when the file has none.
    pub fn new(config: &VaultConfig) -> Self {
        let token = config
            .token
            .clone()
            .or_else(|| std::env::var("VAULT_TOKEN").ok())
            .unwrap_or_default();

        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project: config.project.clone(),
            environment: config.environment.clone(),
            token,
        }
    }

    /// Read one secret from the configured scope.
    ///
    /// Any failure is an error here, including an unknown secret name.
    /// The resolver treats them all the same way: warn and fall through
    /// to the next source.
    pub async fn get(&self, name: &str) -> Result<String> {
        let url = format!(
            "{}/v1/projects/{}/environments/{}/secrets/{}",
            self.base_url, self.project, self.environment, name
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .context("Failed to reach the secret vault")?;

        if !response.status().is_success() {
            anyhow::bail!("Vault returned {} for {}", response.status(), name);
        }

        let secret: VaultSecret = response
            .json()
            .await
            .context("Failed to parse vault response")?;
        Ok(secret.value)
    }
}

/// Resolution-chain adapter for [`VaultClient`].
pub struct VaultSource {
    client: VaultClient,
}

impl VaultSource {
    pub fn new(client: VaultClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretSource for VaultSource {
    fn origin(&self) -> SecretOrigin {
        SecretOrigin::Vault
    }

    async fn fetch(&self, name: &str) -> Result<Option<String>> {
        self.client.get(name).await.map(Some)
    }
}
