//! Credential lifecycle observability.
//!
//! The secret resolver and token exchanger report what they are doing
//! through an injected [`CredentialObserver`] instead of logging directly.
//! Production wiring uses [`TracingObserver`], which maps events onto the
//! normal `tracing` levels; tests capture events in memory and assert on
//! them without parsing log output.
//!
//! Events carry secret *names* and installation ids only. Secret values,
//! signed assertions, and issued tokens never appear in an event.

use crate::secrets::SecretOrigin;

/// Sink for credential lifecycle events.
///
/// Thread-safe and shared behind `Arc<dyn CredentialObserver>`.
pub trait CredentialObserver: Send + Sync {
    /// Record a discrete lifecycle event.
    fn record(&self, event: &CredentialEvent);
}

/// Discrete events emitted by the credential subsystem.
#[derive(Debug, Clone)]
pub enum CredentialEvent {
    /// A secret was resolved; `origin` names the source that produced it.
    SecretResolved {
        secret: String,
        origin: SecretOrigin,
    },

    /// A source failed and resolution fell through to the next one.
    SecretFallback {
        secret: String,
        source: SecretOrigin,
        reason: String,
    },

    /// No source produced a value; the resolver degraded to empty.
    SecretMissing { secret: String },

    /// A token exchange began for an installation.
    ExchangeStarted { installation_id: i64 },

    /// The remote API issued an installation access token.
    ExchangeSucceeded { installation_id: i64 },

    /// The remote API call failed.
    ExchangeFailed {
        installation_id: i64,
        reason: String,
    },
}

/// Observer that forwards events to `tracing`.
///
/// Fallback and missing secrets log as warnings, exchange failures as
/// errors, successful exchanges as info, and per-attempt detail as debug.
pub struct TracingObserver;

impl CredentialObserver for TracingObserver {
    fn record(&self, event: &CredentialEvent) {
        match event {
            CredentialEvent::SecretResolved { secret, origin } => {
                tracing::debug!(secret = %secret, origin = origin.as_str(), "Secret resolved");
            }
            CredentialEvent::SecretFallback {
                secret,
                source,
                reason,
            } => {
                tracing::warn!(
                    secret = %secret,
                    source = source.as_str(),
                    reason = %reason,
                    "Secret source failed, falling back"
                );
            }
            CredentialEvent::SecretMissing { secret } => {
                tracing::warn!(secret = %secret, "Secret not found in any source");
            }
            CredentialEvent::ExchangeStarted { installation_id } => {
                tracing::debug!(installation_id, "Requesting installation access token");
            }
            CredentialEvent::ExchangeSucceeded { installation_id } => {
                tracing::info!(installation_id, "Installation access token issued");
            }
            CredentialEvent::ExchangeFailed {
                installation_id,
                reason,
            } => {
                tracing::error!(
                    installation_id,
                    reason = %reason,
                    "Installation token exchange failed"
                );
            }
        }
    }
}

/// Observer that discards all events.
pub struct NoopObserver;

impl CredentialObserver for NoopObserver {
    #[inline(always)]
    fn record(&self, _event: &CredentialEvent) {}
}

/// Observer that stores events in memory for test assertions.
#[cfg(test)]
#[derive(Default)]
pub struct CaptureObserver {
    events: std::sync::Mutex<Vec<CredentialEvent>>,
}

#[cfg(test)]
impl CaptureObserver {
    /// Snapshot of the events recorded so far, in order.
    pub fn events(&self) -> Vec<CredentialEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of recorded source-failure fallback events.
    pub fn fallback_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, CredentialEvent::SecretFallback { .. }))
            .count()
    }
}

#[cfg(test)]
impl CredentialObserver for CaptureObserver {
    fn record(&self, event: &CredentialEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
