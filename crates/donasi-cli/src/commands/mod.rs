//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `clean` - Clean and merge both exports into the canonical CSV
//! - `core` - Session, filter parsing and the schema command
//! - `export` - Report table export (CSV or JSON)
//! - `reports` - Dashboard report commands

pub mod clean;
pub mod core;
pub mod export;
pub mod reports;

// Re-export command functions for main.rs
pub use clean::*;
pub use core::*;
pub use export::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
