/// Checks that a webhook body was signed by the messaging platform.
///
/// Implementations hold the shared secret themselves.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, raw_body: &[u8], signature: &str) -> bool;
}
