//! Shutdown coordination between the signal listener and the engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Coordinator for cooperative shutdown.
///
/// A cloneable handle around a write-once flag. The signal listener sets it;
/// the engine reads it at loop boundaries. It carries no data, only the
/// one-way stop signal; actual wake-up of the engine happens through the
/// command channel.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    /// Create a new shutdown coordinator with the flag unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown flag.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_is_visible_to_clones() {
        let shutdown = Shutdown::new();
        let observer = shutdown.clone();
        assert!(!observer.is_triggered());

        shutdown.trigger();
        assert!(observer.is_triggered());
    }
}
