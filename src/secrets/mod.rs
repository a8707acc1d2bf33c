//! Layered secret resolution for GitHub App credentials.
//!
//! This module provides:
//! - A [`SecretSource`] trait with an ordered chain of strategies: the
//!   project-scoped vault first, then process environment variables
//! - A [`SecretResolver`] that never fails: the first successful,
//!   non-empty value wins. Source failures fall through to the next
//!   source; a secret absent everywhere degrades to an empty string
//! - Typed [`Secrets`] accessors for the fixed secret names this
//!   integration uses
//!
//! Missing-credential failures surface at the consumer that actually
//! requires a non-empty value, not here. Every source failure and final
//! miss is reported through the injected [`CredentialObserver`].

mod vault;

pub use vault::{VaultClient, VaultSource};

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::observe::{CredentialEvent, CredentialObserver};

/// Which source in the resolution chain produced a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretOrigin {
    Vault,
    Environment,
    Missing,
}

impl SecretOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretOrigin::Vault => "vault",
            SecretOrigin::Environment => "environment",
            SecretOrigin::Missing => "missing",
        }
    }
}

/// A secret value together with the origin that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedSecret {
    pub value: String,
    pub origin: SecretOrigin,
}

/// One strategy in the resolution chain.
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// The origin this source represents in resolution results.
    fn origin(&self) -> SecretOrigin;

    /// Fetch `name`, returning `Ok(None)` when this source does not have
    /// it. An `Err` means the source itself failed and the resolver
    /// should fall through to the next one.
    async fn fetch(&self, name: &str) -> Result<Option<String>>;
}

/// Source backed by process environment variables.
pub struct EnvSource;

#[async_trait]
impl SecretSource for EnvSource {
    fn origin(&self) -> SecretOrigin {
        SecretOrigin::Environment
    }

    async fn fetch(&self, name: &str) -> Result<Option<String>> {
        Ok(std::env::var(name).ok())
    }
}

/// Resolves named secrets through an ordered chain of sources.
///
/// Resolution never raises: callers always get a string back, possibly
/// empty. Degraded resolution (a source failure, or a secret missing
/// from every source) is observable through the injected observer and
/// through [`SecretResolver::resolve_with_origin`].
pub struct SecretResolver {
    sources: Vec<Arc<dyn SecretSource>>,
    observer: Arc<dyn CredentialObserver>,
}

impl SecretResolver {
    pub fn new(sources: Vec<Arc<dyn SecretSource>>, observer: Arc<dyn CredentialObserver>) -> Self {
        Self { sources, observer }
    }

    /// Resolve `name`, degrading to an empty string when no source has it.
    pub async fn resolve(&self, name: &str) -> String {
        self.resolve_with_origin(name).await.value
    }

    /// Resolve `name` along with the origin that produced the value.
    pub async fn resolve_with_origin(&self, name: &str) -> ResolvedSecret {
        for source in &self.sources {
            match source.fetch(name).await {
                Ok(Some(value)) if !value.is_empty() => {
                    self.observer.record(&CredentialEvent::SecretResolved {
                        secret: name.to_string(),
                        origin: source.origin(),
                    });
                    return ResolvedSecret {
                        value,
                        origin: source.origin(),
                    };
                }
                // Not present in this source; try the next one.
                Ok(_) => {}
                Err(err) => {
                    self.observer.record(&CredentialEvent::SecretFallback {
                        secret: name.to_string(),
                        source: source.origin(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        self.observer.record(&CredentialEvent::SecretMissing {
            secret: name.to_string(),
        });
        ResolvedSecret {
            value: String::new(),
            origin: SecretOrigin::Missing,
        }
    }
}

/// Typed accessors for the secrets the GitHub App integration needs.
///
/// Accessors do not validate non-emptiness: an empty secret is only
/// fatal in context, and the consumer that needs it enforces that.
#[derive(Clone)]
pub struct Secrets {
    resolver: Arc<SecretResolver>,
}

impl Secrets {
    pub const APP_ID: &'static str = "GITHUB_APP_ID";
    pub const PRIVATE_KEY: &'static str = "GITHUB_APP_PRIVATE_KEY";
    pub const CLIENT_ID: &'static str = "GITHUB_CLIENT_ID";
    pub const CLIENT_SECRET: &'static str = "GITHUB_CLIENT_SECRET";
    pub const WEBHOOK_SECRET: &'static str = "GITHUB_WEBHOOK_SECRET";

    /// Every secret name this integration resolves.
    pub const ALL: [&'static str; 5] = [
        Self::APP_ID,
        Self::PRIVATE_KEY,
        Self::CLIENT_ID,
        Self::CLIENT_SECRET,
        Self::WEBHOOK_SECRET,
    ];

    pub fn new(resolver: Arc<SecretResolver>) -> Self {
        Self { resolver }
    }

    pub async fn app_id(&self) -> String {
        self.resolver.resolve(Self::APP_ID).await
    }

    pub async fn private_key(&self) -> String {
        self.resolver.resolve(Self::PRIVATE_KEY).await
    }

    pub async fn client_id(&self) -> String {
        self.resolver.resolve(Self::CLIENT_ID).await
    }

    pub async fn client_secret(&self) -> String {
        self.resolver.resolve(Self::CLIENT_SECRET).await
    }

    pub async fn webhook_secret(&self) -> String {
        self.resolver.resolve(Self::WEBHOOK_SECRET).await
    }
}
