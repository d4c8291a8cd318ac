//! shelfdl library
//!
//! Logs in to the audiobook store, lists the items on the user's shelf, downloads one
//! as a zip archive and unpacks it, refusing entries that would land outside the
//! extraction directory.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::core::extract::Extractor;
pub use crate::core::fetch::Fetcher;
pub use crate::core::item::{DownloadTarget, ExtractedEntry, ShelfItem, Summary};
pub use crate::core::pipeline::Pipeline;
pub use crate::core::session::{Resource, Session};
pub use crate::error::{Result, ShelfError};
