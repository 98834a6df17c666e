//! Command handlers for CLI operations
//!
//! This module contains handlers for different CLI commands,
//! separating command execution logic from parsing and validation.

pub mod check;
pub mod once;
pub mod run;

pub use check::CheckCommandHandler;
pub use once::OnceCommandHandler;
pub use run::RunCommandHandler;

/// Starting cursor: the given timestamp, or the current time.
pub fn resolve_cursor(from_date: Option<i64>) -> i64 {
    from_date.unwrap_or_else(|| jiff::Timestamp::now().as_second())
}
