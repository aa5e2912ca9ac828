//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// CODEFORCES API
// =============================================================================

/// Default Codeforces API base URL (trailing slash required)
pub const DEFAULT_CODEFORCES_API_BASE: &str = "https://codeforces.com/api/";

/// Default base URL for human-readable problem links
pub const DEFAULT_CODEFORCES_PROBLEMSET_URL: &str = "https://codeforces.com/problemset/problem";

/// Default request timeout against the Codeforces API
pub const DEFAULT_CODEFORCES_TIMEOUT_SECONDS: u64 = 15;

/// Number of recent submissions scanned when resolving a round
pub const DEFAULT_SUBMISSION_COUNT: u32 = 20;

/// Number of recent submissions scanned when verifying a handle
pub const DEFAULT_VERIFY_SUBMISSION_COUNT: u32 = 50;

/// Verdict strings reported by Codeforces
pub mod verdicts {
    pub const ACCEPTED: &str = "OK";
    pub const COMPILATION_ERROR: &str = "COMPILATION_ERROR";
}

// =============================================================================
// DUEL DEFAULTS
// =============================================================================

/// Minimum number of rounds in a duel
pub const DEFAULT_MIN_PROBLEMS: u32 = 1;

/// Maximum number of rounds in a duel
pub const DEFAULT_MAX_PROBLEMS: u32 = 10;

/// Points awarded for a round whose problem carries no rating
pub const DEFAULT_ROUND_POINTS: u32 = 1000;

/// Only problems from contests starting at or after this instant are eligible
pub const DEFAULT_RECENCY_CUTOFF: &str = "2020-01-01T00:00:00Z";

/// Upper bound on the per-round time limit
pub const DEFAULT_MAX_MINUTES_PER_ROUND: u32 = 180;

// =============================================================================
// PROBLEMS
// =============================================================================

/// Allowed distance from the requested rating when suggesting a problem
pub const PROBLEM_RATING_TOLERANCE: i32 = 100;

/// Highest rating of a problem handed out for handle verification
pub const VERIFICATION_MAX_RATING: i32 = 1000;

// =============================================================================
// STORAGE
// =============================================================================

/// Default location of the user id to handle mapping
pub const DEFAULT_USER_DATA_FILE: &str = "data/user_data.json";

/// Default location of pending handle verifications
pub const DEFAULT_PENDING_AUTH_FILE: &str = "data/pending_auth.json";

// =============================================================================
// API
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

/// Header carrying the acting user's id
pub const USER_ID_HEADER: &str = "x-user-id";

// =============================================================================
// VALIDATION
// =============================================================================

/// Codeforces handle minimum length
pub const MIN_HANDLE_LENGTH: u64 = 3;

/// Codeforces handle maximum length
pub const MAX_HANDLE_LENGTH: u64 = 24;

/// Highest problem rating Codeforces assigns
pub const MAX_PROBLEM_RATING: i32 = 4000;
