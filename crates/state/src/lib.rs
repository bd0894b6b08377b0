//! Application state for the skills dashboard.
//!
//! The detection crates are pure: every scan is a fresh, authoritative read of
//! the filesystem. This crate owns everything that changes between scans (the
//! current report and skill list, the user's selection, pending update
//! records and the output log) and the actions that drive the external tool
//! and reconcile its effects.

pub mod actions;
pub mod reconcile;
pub mod state;
pub mod updates;

pub use {
    actions::{check_updates, refresh, run_mutation},
    reconcile::{Selection, apply_update_flags, prune_pending, prune_selection},
    state::AppState,
    updates::{UpdateRecord, parse_update_output},
};
