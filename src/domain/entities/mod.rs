//! Domain entities - Core business objects with no external dependencies

pub mod message;
pub mod recommendation;

pub use message::{InboundEvent, OutboundReply};
pub use recommendation::{CommandEntries, RecommendationEntry, RecommendationTable};
