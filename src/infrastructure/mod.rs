//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (LINE)
//! - Http: Webhook server

pub mod config;
pub mod adapters;
pub mod http;
