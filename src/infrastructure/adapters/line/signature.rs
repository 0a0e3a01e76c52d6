//! LINE webhook signature check

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::traits::SignatureVerifier;

type HmacSha256 = Hmac<Sha256>;

/// Header LINE puts the body signature in
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verifies `base64(HMAC-SHA256(channel_secret, body))`
pub struct LineSignatureVerifier {
    channel_secret: String,
}

impl LineSignatureVerifier {
    pub fn new(channel_secret: impl Into<String>) -> Self {
        Self {
            channel_secret: channel_secret.into(),
        }
    }

    /// Compute the signature LINE would send for `body`
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.mac();
        mac.update(body);
        BASE64.encode(mac.finalize().into_bytes())
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length
        HmacSha256::new_from_slice(self.channel_secret.as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC key of any size is valid"))
    }
}

impl SignatureVerifier for LineSignatureVerifier {
    fn verify(&self, raw_body: &[u8], signature: &str) -> bool {
        let Ok(expected) = BASE64.decode(signature.trim()) else {
            return false;
        };

        let mut mac = self.mac();
        mac.update(raw_body);
        // Constant-time comparison
        mac.verify_slice(&expected).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"destination":"U0","events":[]}"#;

    #[test]
    fn accepts_own_signature() {
        let verifier = LineSignatureVerifier::new("secret");
        let signature = verifier.sign(BODY);
        assert!(verifier.verify(BODY, &signature));
    }

    #[test]
    fn matches_known_digest() {
        // base64(HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog"))
        let verifier = LineSignatureVerifier::new("key");
        assert_eq!(
            verifier.sign(b"The quick brown fox jumps over the lazy dog"),
            "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg="
        );
    }

    #[test]
    fn rejects_tampered_body() {
        let verifier = LineSignatureVerifier::new("secret");
        let signature = verifier.sign(BODY);
        assert!(!verifier.verify(br#"{"destination":"U1","events":[]}"#, &signature));
    }

    #[test]
    fn rejects_other_secret() {
        let signature = LineSignatureVerifier::new("other").sign(BODY);
        assert!(!LineSignatureVerifier::new("secret").verify(BODY, &signature));
    }

    #[test]
    fn rejects_non_base64_signature() {
        let verifier = LineSignatureVerifier::new("secret");
        assert!(!verifier.verify(BODY, "not base64 !!"));
        assert!(!verifier.verify(BODY, ""));
    }
}
