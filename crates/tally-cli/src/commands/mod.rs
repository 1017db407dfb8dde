//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_session, output format, argument parsing)
//! - `bills` - Upcoming and overdue bills
//! - `insights` - Rule-based insights
//! - `profile` - Profile reconciliation and snapshot checks
//! - `reports` - Category summary and trend reports
//! - `transactions` - Transaction listing

pub mod bills;
pub mod core;
pub mod insights;
pub mod profile;
pub mod reports;
pub mod transactions;

// Re-export command functions for main.rs
pub use bills::*;
pub use core::*;
pub use insights::*;
pub use profile::*;
pub use reports::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
