//! Input validation utilities

use crate::constants::{MAX_HANDLE_LENGTH, MIN_HANDLE_LENGTH};

/// Validate Codeforces handle format
pub fn validate_handle(handle: &str) -> Result<(), &'static str> {
    let len = handle.len() as u64;
    if len < MIN_HANDLE_LENGTH {
        return Err("Handle must be at least 3 characters");
    }
    if len > MAX_HANDLE_LENGTH {
        return Err("Handle must be at most 24 characters");
    }
    if !handle
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err("Handle can only contain letters, numbers, underscores, hyphens, and dots");
    }
    Ok(())
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
