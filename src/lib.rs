//! cpduel - Codeforces duel engine
//!
//! Two users race through the same sequence of Codeforces problems. The first to get
//! each one accepted takes its rating in points.
//!
//! # Architecture
//!
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Duel lifecycle, problem selection, race resolution, handle linking
//! - **Source**: Read-only access to Codeforces behind the `ProblemSource` trait
//! - **Storage**: File-backed handle links
//! - **Models**: Domain types

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod source;
pub mod state;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
