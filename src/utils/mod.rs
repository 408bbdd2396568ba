//! Utility modules for the repo copy tool.

pub mod errors;
pub mod hash;
pub mod logger;

pub use errors::{CopyError, Result};
