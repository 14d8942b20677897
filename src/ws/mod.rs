//! Realtime gateway

pub mod handler;
pub mod protocol;
