//! Platform adapters

pub mod line;
