//! Input file discovery
//!
//! This module finds the files that make up a batch.

pub mod listing;

// Re-export commonly used items
pub use listing::{DirectoryListing, FileDiscovery};
