//! Reader configuration.

use serde::{Deserialize, Serialize};

/// What a collection view does with a top-level item that fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvalidItemPolicy {
    /// Yield the error; the traversal ends there.
    #[default]
    Fail,
    /// Log the error, record the item as skipped, and continue.
    Skip,
}

/// Options controlling how a [`Document`](crate::Document) exposes its collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderOptions {
    /// Memoize parsed top-level items so repeated traversals never reparse them.
    pub cache: bool,

    /// Handling of top-level items that fail to parse.
    pub on_invalid: InvalidItemPolicy,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            cache: true,
            on_invalid: InvalidItemPolicy::default(),
        }
    }
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with memoization disabled; every traversal reparses.
    pub fn uncached() -> Self {
        Self {
            cache: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_cache(mut self, enable: bool) -> Self {
        self.cache = enable;
        self
    }

    #[must_use]
    pub fn with_invalid_policy(mut self, policy: InvalidItemPolicy) -> Self {
        self.on_invalid = policy;
        self
    }
}
