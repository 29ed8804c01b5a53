//! Utilities - terminal styling and progress reporting

mod progress;
mod styling;

pub use progress::*;
pub use styling::*;
