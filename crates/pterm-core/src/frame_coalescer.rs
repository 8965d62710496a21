#![forbid(unsafe_code)]

//! Per-frame coalescing for continuous pointer input.
//!
//! Pointer moves during a drag or resize arrive far faster than the display
//! refreshes. [`FrameCoalescer`] keeps only the most recent value and tells
//! the caller when a frame callback must be requested, so that at most one
//! state commit happens per animation frame.
//!
//! # Usage
//!
//! ```
//! use pterm_core::frame_coalescer::FrameCoalescer;
//!
//! let mut coalescer = FrameCoalescer::new();
//!
//! // The first push asks for a frame; later pushes only replace the value.
//! assert!(coalescer.push((10, 10)));
//! assert!(!coalescer.push((20, 20)));
//!
//! // The frame callback takes the latest value.
//! assert_eq!(coalescer.take(), Some((20, 20)));
//! assert_eq!(coalescer.take(), None);
//! assert_eq!(coalescer.coalesced_total(), 1);
//! ```

/// Latest-wins buffer committing at most once per frame.
///
/// Not thread-safe; owned by a single reducer instance.
#[derive(Debug, Clone)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    frame_requested: bool,
    coalesced: u64,
}

impl<T> FrameCoalescer<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: None,
            frame_requested: false,
            coalesced: 0,
        }
    }

    /// Store `value`, replacing any pending one.
    ///
    /// Returns `true` when the caller must request an animation frame.
    pub fn push(&mut self, value: T) -> bool {
        if self.pending.replace(value).is_some() {
            self.coalesced = self.coalesced.saturating_add(1);
        }
        if self.frame_requested {
            false
        } else {
            self.frame_requested = true;
            true
        }
    }

    /// Take the pending value at frame time.
    pub fn take(&mut self) -> Option<T> {
        self.frame_requested = false;
        self.pending.take()
    }

    /// Drop any pending value without committing it.
    pub fn clear(&mut self) {
        self.pending = None;
        self.frame_requested = false;
    }

    /// Whether a value is waiting for the next frame.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of values replaced before they were committed.
    #[must_use]
    pub const fn coalesced_total(&self) -> u64 {
        self.coalesced
    }
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_frame_request_per_burst() {
        let mut c = FrameCoalescer::new();
        let requests = (0..50).filter(|i| c.push(*i)).count();
        assert_eq!(requests, 1);
        assert_eq!(c.take(), Some(49));
        assert_eq!(c.coalesced_total(), 49);
    }

    #[test]
    fn take_rearms_frame_request() {
        let mut c = FrameCoalescer::new();
        assert!(c.push(1));
        assert_eq!(c.take(), Some(1));
        assert!(c.push(2));
    }

    proptest::proptest! {
        #[test]
        fn latest_value_wins(values in proptest::collection::vec(proptest::prelude::any::<i32>(), 1..64)) {
            let mut c = FrameCoalescer::new();
            let mut requests = 0;
            for v in &values {
                if c.push(*v) {
                    requests += 1;
                }
            }
            proptest::prop_assert_eq!(requests, 1);
            proptest::prop_assert_eq!(c.take(), values.last().copied());
            proptest::prop_assert_eq!(c.coalesced_total(), values.len() as u64 - 1);
        }
    }

    #[test]
    fn clear_drops_pending() {
        let mut c = FrameCoalescer::new();
        c.push(1);
        c.clear();
        assert!(!c.is_pending());
        assert_eq!(c.take(), None);
        assert!(c.push(3));
    }
}
