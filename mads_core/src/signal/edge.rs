//! Edge detection over boolean and tri-state samples.
//!
//! [`classify`] is pure. The tracking records own the "previous sample"
//! bookkeeping and advance it exactly once per `update`, after the
//! transition has been computed.

use mads_common::mads::state::{ButtonState, EdgeTransition};

/// Classify `current` against `previous`.
#[inline]
pub const fn classify(current: bool, previous: bool) -> EdgeTransition {
    match (current, previous) {
        (true, false) => EdgeTransition::Rising,
        (false, true) => EdgeTransition::Falling,
        _ => EdgeTransition::NoChange,
    }
}

// ─── Boolean Signal ─────────────────────────────────────────────────

/// Tracking record for a boolean signal.
///
/// `available` latches the first time any transition is observed and
/// stays set until the record is re-initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinaryStateTracking {
    current: bool,
    previous: bool,
    transition: EdgeTransition,
    available: bool,
}

impl BinaryStateTracking {
    /// "No signal yet" record: all `false`, no transition.
    pub const fn new() -> Self {
        Self {
            current: false,
            previous: false,
            transition: EdgeTransition::NoChange,
            available: false,
        }
    }

    /// Push a new sample and classify it against the previous one.
    pub fn update(&mut self, sample: bool) -> EdgeTransition {
        self.current = sample;
        self.transition = classify(sample, self.previous);
        if self.transition != EdgeTransition::NoChange {
            self.available = true;
        }
        self.previous = sample;
        self.transition
    }

    /// Cycle without a sample: no transition, history untouched.
    pub fn hold(&mut self) {
        self.transition = EdgeTransition::NoChange;
    }

    #[inline]
    pub const fn current(&self) -> bool {
        self.current
    }

    #[inline]
    pub const fn previous(&self) -> bool {
        self.previous
    }

    #[inline]
    pub const fn transition(&self) -> EdgeTransition {
        self.transition
    }

    #[inline]
    pub const fn available(&self) -> bool {
        self.available
    }

    #[inline]
    pub fn is_rising(&self) -> bool {
        self.transition == EdgeTransition::Rising
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.transition == EdgeTransition::Falling
    }
}

// ─── Tri-State Button ───────────────────────────────────────────────

/// Tracking record for a tri-state button.
///
/// `last` starts as `Unavailable`, which classifies like "not pressed", so
/// the first `Pressed` sample after a missing button is a rising edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonStateTracking {
    current: ButtonState,
    last: ButtonState,
    transition: EdgeTransition,
}

impl ButtonStateTracking {
    pub const fn new() -> Self {
        Self {
            current: ButtonState::Unavailable,
            last: ButtonState::Unavailable,
            transition: EdgeTransition::NoChange,
        }
    }

    /// Push a new sample.
    ///
    /// An `Unavailable` sample forces `NoChange` and leaves `last` as is.
    pub fn update(&mut self, sample: ButtonState) -> EdgeTransition {
        self.current = sample;
        if !sample.is_available() {
            self.transition = EdgeTransition::NoChange;
            return self.transition;
        }
        self.transition = classify(sample.is_pressed(), self.last.is_pressed());
        self.last = sample;
        self.transition
    }

    #[inline]
    pub const fn current(&self) -> ButtonState {
        self.current
    }

    #[inline]
    pub const fn last(&self) -> ButtonState {
        self.last
    }

    #[inline]
    pub const fn transition(&self) -> EdgeTransition {
        self.transition
    }
}
