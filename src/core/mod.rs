pub mod client;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod item;
pub mod pipeline;
pub mod session;

/// Extension of downloaded archives.
pub const ARCHIVE_EXTENSION: &str = "zip";
