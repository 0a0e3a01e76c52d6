//! LINE food recommendation bot
//!
//! Layers follow the usual split:
//! - `domain`: recommendation table and the platform seams
//! - `application`: command resolution and webhook orchestration
//! - `infrastructure`: LINE adapter, configuration, HTTP server

pub mod domain;
pub mod application;
pub mod infrastructure;
