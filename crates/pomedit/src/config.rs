//! Parser limits

use std::fmt;

/// Maximum element nesting depth (64); real descriptors rarely exceed 10
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Maximum input size (16MB) to prevent memory exhaustion
pub const DEFAULT_MAX_SIZE: usize = 16 * 1024 * 1024;

/// Configuration for parser limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting depth of elements
    pub max_depth: usize,
    /// Maximum input size in bytes
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ max_depth: {}, max_size: {} }}",
            self.max_depth, self.max_size
        )
    }
}

impl Config {
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }
}
