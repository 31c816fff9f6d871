use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Process-wide reference count behind the page-level loading indicator.
///
/// The indicator shows while the count is above zero. Overlapping operations
/// each hold one reference, so the count returns to zero only when the last
/// of them settles. Clones share the same counter; handing a clone to every
/// form session gives them one shared signal.
#[derive(Debug, Clone, Default)]
pub struct BusyCoordinator {
    count: Arc<AtomicUsize>,
}

impl BusyCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one more operation in flight. Every `raise` must be matched by
    /// exactly one `lower`; prefer [`BusyCoordinator::begin`], which pairs
    /// them automatically.
    pub fn raise(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    /// Mark one operation settled. An unmatched `lower` is a caller bug, but
    /// it clamps at zero rather than taking the indicator down with it.
    pub fn lower(&self) {
        let _ = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                count.checked_sub(1)
            });
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Raise now, lower when the returned guard drops. The drop runs on
    /// every exit path, including unwinding.
    pub fn begin(&self) -> BusyGuard {
        self.raise();
        BusyGuard {
            coordinator: self.clone(),
        }
    }
}

/// Guard holding one raised reference on a [`BusyCoordinator`].
#[must_use = "dropping the guard immediately lowers the busy count"]
#[derive(Debug)]
pub struct BusyGuard {
    coordinator: BusyCoordinator,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.coordinator.lower();
    }
}
