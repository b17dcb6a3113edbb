//! Output module for run reports and record statistics
//!
//! This module handles:
//! - The one-line summary printed after every run
//! - Statistics over the image record store

pub mod stats;

pub use stats::{load_statistics, print_statistics, ImageStatistics};

use std::fmt;

/// Outcome of one harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Images downloaded and committed
    pub saved: usize,

    /// 0 for a clean run, 1 when the run was aborted by an error
    pub errors: usize,
}

impl RunReport {
    pub fn saved(saved: usize) -> Self {
        Self { saved, errors: 0 }
    }

    pub fn failed() -> Self {
        Self {
            saved: 0,
            errors: 1,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Saved images number: {}, errors: {}",
            self.saved, self.errors
        )
    }
}
