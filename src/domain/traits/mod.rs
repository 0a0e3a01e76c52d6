//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod verifier;

pub use bot::{ReplySender, WebhookParser};
pub use verifier::SignatureVerifier;
