//! Shared utilities

pub mod cookies;
pub mod time;
