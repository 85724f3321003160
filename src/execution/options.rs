//! Pipeline options.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Cap on the default worker count. More partitions stop paying off for
/// per-pixel compositing well before typical core counts.
pub const MAX_DEFAULT_WORKERS: usize = 6;

/// Default worker count: `min(6, available cores)`, at least 1.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .clamp(1, MAX_DEFAULT_WORKERS)
}

/// Options passed to every filter stage and to the compositor.
///
/// Deserializes with missing fields filled from [`Options::default`], so it
/// can be embedded in a host application's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Upper bound on concurrent row partitions. `0` means "use the default".
    pub workers: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

impl Options {
    /// Options with the default worker count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of concurrent row partitions.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Replace an unset worker count with the default.
    pub fn resolved(self) -> Self {
        if self.workers < 1 {
            Self::default()
        } else {
            self
        }
    }
}
