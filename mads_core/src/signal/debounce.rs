//! Consecutive-cycle mismatch debouncing.
//!
//! [`MismatchCounter`] counts cycles in which a signal disagrees with its
//! trusted reference and fires on every disagreeing cycle once the count
//! has reached the threshold. It never resets itself on firing; the caller
//! owns that policy. [`AccMainFilter`] is the ACC-main instantiation and does reset,
//! since it adopts the raw value on firing.

use tracing::warn;

/// Counter of consecutive disagreeing cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MismatchCounter {
    count: u32,
    threshold: u32,
}

impl MismatchCounter {
    pub const fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold,
        }
    }

    /// Observe one cycle.
    ///
    /// Returns `true` on every disagreeing cycle at or past the threshold.
    /// An agreeing cycle resets the count to 0.
    #[inline]
    pub fn observe(&mut self, disagreement: bool) -> bool {
        if disagreement {
            self.count = self.count.saturating_add(1);
            self.count >= self.threshold
        } else {
            self.count = 0;
            false
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.count = 0;
    }

    #[inline]
    pub const fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }
}

// ─── ACC-Main Filter ────────────────────────────────────────────────

/// Debounced ACC-main value.
///
/// Holds the adopted (trusted) value and switches to the raw hardware
/// value only after it has disagreed for `threshold` consecutive cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccMainFilter {
    adopted: bool,
    mismatches: MismatchCounter,
}

impl AccMainFilter {
    pub const fn new(threshold: u32) -> Self {
        Self {
            adopted: false,
            mismatches: MismatchCounter::new(threshold),
        }
    }

    /// Feed one raw sample; returns the adopted value for this cycle.
    pub fn filter(&mut self, raw: bool) -> bool {
        if self.mismatches.observe(raw != self.adopted) {
            warn!(
                raw,
                cycles = self.mismatches.count(),
                "ACC main mismatch persisted, adopting raw value"
            );
            self.adopted = raw;
            self.mismatches.reset();
        }
        self.adopted
    }

    #[inline]
    pub const fn adopted(&self) -> bool {
        self.adopted
    }

    #[inline]
    pub const fn mismatches(&self) -> u32 {
        self.mismatches.count()
    }
}
