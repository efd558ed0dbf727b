//! Utility modules: evaluation trace sink, JSON helpers.
pub mod devlog;
pub mod json;
