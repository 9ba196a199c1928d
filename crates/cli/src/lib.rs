//! Terminal plumbing for the pixcut binary
//!
//! Provides shared CLI functionality:
//! - Status messages and batch summaries
//! - The batch progress bar
//! - Log subscriber setup

#![warn(missing_docs)]

pub mod logging;
pub mod output;
pub mod progress;
