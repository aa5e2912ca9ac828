//! Utility functions

pub mod time;
pub mod validation;

pub use time::{Clock, SystemClock, now_utc};
pub use validation::{sanitize_string, validate_handle};
