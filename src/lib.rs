// ABOUTME: Library root for pagelift - exposes public types for testing.
// ABOUTME: The Lambda bootstrap binary is in main.rs.

pub mod archive;
pub mod content_type;
pub mod deploy;
pub mod error;
pub mod event;
pub mod handler;
pub mod report;
pub mod request;
pub mod store;
pub mod types;
