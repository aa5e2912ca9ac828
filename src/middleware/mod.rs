//! HTTP middleware

pub mod identity;
pub mod logging;

pub use identity::ActingUser;
pub use logging::logging_middleware;
