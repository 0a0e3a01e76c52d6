//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Command resolution and webhook orchestration
//! - Errors: Domain-specific errors

pub mod errors;
pub mod services;
