//! General-purpose utility modules.

pub mod error;
pub mod file_path;

// Re-export commonly used items
pub use error::{Result, WvtError};
