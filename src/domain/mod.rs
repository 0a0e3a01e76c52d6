//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (RecommendationTable, InboundEvent, OutboundReply)
//! - Traits: Abstractions for infrastructure (ReplySender, SignatureVerifier)

pub mod entities;
pub mod traits;
