//! Debug-only reentrancy guard.
//!
//! Tables call into user code (`Hash`, `Eq`, `Equivalent`) while walking a
//! chain. If that code reaches back into the same table the walk would
//! observe a table it is in the middle of inspecting. In debug builds the
//! guard panics on nested entry and names both operations; in release
//! builds it compiles to a zero-sized no-op.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table reentrancy tracker. Guard entry points that run user code with
/// `let _g = self.reentrancy.enter("find");`.
///
/// Keeps the owning table `Send` but `!Sync` in every build profile.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    _not_sync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _not_sync: PhantomData,
        }
    }

    /// Enter a guarded section labelled `op`. In debug builds, panics if
    /// another guarded section of the same table is still open.
    #[inline]
    pub fn enter(&self, op: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant call to `{}` while `{}` is running", op, outer);
            }
            self.active.set(Some(op));
            ReentrancyGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            ReentrancyGuard { _z: PhantomData }
        }
    }

    /// Name of the operation currently holding the guard.
    #[cfg(all(test, debug_assertions))]
    pub fn active(&self) -> Option<&'static str> {
        self.active.get()
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DebugReentrancy {
    // A cloned table starts outside any guarded section.
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn sequential_sections_are_ok() {
        let r = DebugReentrancy::new();
        {
            let _g = r.enter("find");
        }
        let _g = r.enter("insert");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn guard_tracks_active_operation() {
        let r = DebugReentrancy::new();
        assert_eq!(r.active(), None);
        {
            let _g = r.enter("remove");
            assert_eq!(r.active(), Some("remove"));
        }
        assert_eq!(r.active(), None);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_entry_panics_with_both_names() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = r.enter("find");
            let _inner = r.enter("count");
        }));
        let payload = res.expect_err("expected reentrancy to panic in debug builds");
        let msg = payload
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_default();
        assert!(msg.contains("`count`") && msg.contains("`find`"), "{}", msg);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_entry_is_noop_in_release() {
        let r = DebugReentrancy::new();
        let _g1 = r.enter("find");
        let _g2 = r.enter("count");
    }
}
