//! Webhook payload signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::CredentialError;
use crate::secrets::Secrets;

type HmacSha256 = Hmac<Sha256>;

/// Verify a GitHub webhook signature (X-Hub-Signature-256 header).
///
/// Fails closed: a missing `sha256=` prefix, non-hex digest, or MAC
/// mismatch all return false.
pub fn verify_signature(secret: &str, signature_header: &str, payload: &[u8]) -> bool {
    // Signature format: sha256=<hex>
    let signature = match signature_header.strip_prefix("sha256=") {
        Some(sig) => sig,
        None => return false,
    };

    let expected = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(payload);

    // Constant-time comparison
    mac.verify_slice(&expected).is_ok()
}

/// Verifies inbound webhook payloads against the resolved webhook secret.
pub struct WebhookVerifier {
    secrets: Secrets,
}

impl WebhookVerifier {
    pub fn new(secrets: Secrets) -> Self {
        Self { secrets }
    }

    /// Verify `payload` against a `sha256=<hex>` signature header.
    ///
    /// A webhook secret that resolves to empty is tolerable for flows
    /// that never verify signatures, but fatal here, so it surfaces as
    /// [`CredentialError::Configuration`]. The payload is never logged.
    pub async fn verify(
        &self,
        signature_header: &str,
        payload: &[u8],
    ) -> Result<(), CredentialError> {
        let secret = self.secrets.webhook_secret().await;
        if secret.is_empty() {
            return Err(CredentialError::Configuration(
                "GitHub webhook secret is not configured".to_string(),
            ));
        }

        if verify_signature(&secret, signature_header, payload) {
            Ok(())
        } else {
            Err(CredentialError::SignatureMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::static_secrets;

    fn sign(secret: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_valid_signature_verifies() {
        let payload = br#"{"action":"opened"}"#;
        let header = sign("hook-secret", payload);
        assert!(verify_signature("hook-secret", &header, payload));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let header = sign("hook-secret", b"original");
        assert!(!verify_signature("hook-secret", &header, b"tampered"));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let payload = b"payload";
        let header = sign("hook-secret", payload);
        assert!(!verify_signature("other-secret", &header, payload));
    }

    #[test]
    fn test_missing_prefix_fails() {
        let payload = b"payload";
        let header = sign("hook-secret", payload);
        let bare = header.strip_prefix("sha256=").unwrap();
        assert!(!verify_signature("hook-secret", bare, payload));
    }

    #[test]
    fn test_non_hex_digest_fails() {
        assert!(!verify_signature("hook-secret", "sha256=zzzz", b"payload"));
    }

    #[test]
    fn test_verifier_accepts_correctly_signed_payload() {
        let secrets = static_secrets(&[(Secrets::WEBHOOK_SECRET, "hook-secret")]);
        let verifier = WebhookVerifier::new(secrets);
        let payload = br#"{"action":"opened"}"#;
        let header = sign("hook-secret", payload);

        tokio_test::block_on(verifier.verify(&header, payload)).unwrap();
    }

    #[test]
    fn test_verifier_rejects_bad_signature() {
        let secrets = static_secrets(&[(Secrets::WEBHOOK_SECRET, "hook-secret")]);
        let verifier = WebhookVerifier::new(secrets);

        let err = tokio_test::block_on(verifier.verify("sha256=00ff", b"payload")).unwrap_err();
        assert!(matches!(err, CredentialError::SignatureMismatch));
    }

    #[test]
    fn test_verifier_requires_a_configured_secret() {
        let verifier = WebhookVerifier::new(static_secrets(&[]));

        let err = tokio_test::block_on(verifier.verify("sha256=00ff", b"payload")).unwrap_err();
        assert!(matches!(err, CredentialError::Configuration(_)));
    }
}
