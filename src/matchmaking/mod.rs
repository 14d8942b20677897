//! Session management

pub mod registry;
pub mod slot;

pub use registry::{JoinableGame, SessionRegistry};
pub use slot::GameSlot;
