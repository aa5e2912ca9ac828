//! Local persistence

pub mod handles;

pub use handles::{HandleStore, PendingVerification};
