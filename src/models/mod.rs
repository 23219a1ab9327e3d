//! Data models for the Ossi contribution backend.
//!
//! Field names and enumeration values match the Slack-facing JSON exactly.

mod contribution;
mod rollback_id;
mod slack;

pub use contribution::*;
pub use rollback_id::*;
pub use slack::*;
