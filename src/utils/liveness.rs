// src/utils/liveness.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "still mounted" flag.
///
/// A view hands out clones to anything that runs in the background on its
/// behalf. Results that come back after `teardown()` are discarded by the
/// holder instead of being applied.
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Marks every clone as torn down. Irreversible.
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teardown_is_visible_to_clones() {
        let liveness = Liveness::new();
        let handle = liveness.clone();
        assert!(handle.is_alive());

        liveness.teardown();
        assert!(!handle.is_alive());
    }
}
