//! Cooperative cancellation shared by every engine. Cheap to clone and
//! check; engines poll it between generations/iterations/ants rather
//! than on every candidate, since checking an `Ordering::Relaxed` load
//! per-candidate would dwarf the actual work on small problems.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
