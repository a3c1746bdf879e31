//! Disengage reason ledger.
//!
//! Pure record-keeping: the ledger never touches `controls_allowed_lat`.
//! [`DisengageLedger::record`] tells the engine whether the withdrawal took
//! effect, and the engine clears the flag.

use heapless::Deque;
use mads_common::consts::DISENGAGE_HISTORY_LEN;
use mads_common::mads::state::DisengageReason;
use serde::Serialize;

/// One reason slot of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DisengageRecord {
    pub reason: DisengageReason,
}

/// Withdrawal stamped with the cycle it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisengageEvent {
    pub cycle: u64,
    pub reason: DisengageReason,
}

/// Current and previous disengage reason, plus a bounded history.
#[derive(Debug, Clone)]
pub struct DisengageLedger {
    current: DisengageRecord,
    previous: DisengageRecord,
    history: Deque<DisengageEvent, DISENGAGE_HISTORY_LEN>,
}

impl DisengageLedger {
    pub const fn new() -> Self {
        Self {
            current: DisengageRecord {
                reason: DisengageReason::None,
            },
            previous: DisengageRecord {
                reason: DisengageReason::None,
            },
            history: Deque::new(),
        }
    }

    /// Stamp a withdrawal.
    ///
    /// Only effective while control is allowed. Returns `true` if the
    /// reason was recorded and the caller must clear `controls_allowed_lat`.
    pub fn record(&mut self, controls_allowed: bool, reason: DisengageReason, cycle: u64) -> bool {
        if !controls_allowed {
            return false;
        }
        self.previous = self.current;
        self.current.reason = reason;

        if self.history.is_full() {
            self.history.pop_front();
        }
        let pushed = self.history.push_back(DisengageEvent { cycle, reason }).is_ok();
        debug_assert!(pushed, "history slot freed above when full");
        true
    }

    /// Roll the record over when control is re-granted.
    pub fn clear_on_regrant(&mut self) {
        self.previous = self.current;
        self.current.reason = DisengageReason::None;
    }

    #[inline]
    pub const fn current_reason(&self) -> DisengageReason {
        self.current.reason
    }

    #[inline]
    pub const fn previous_reason(&self) -> DisengageReason {
        self.previous.reason
    }

    /// Withdrawals, oldest first. Holds at most `DISENGAGE_HISTORY_LEN`.
    pub fn history(&self) -> impl Iterator<Item = &DisengageEvent> {
        self.history.iter()
    }

    /// Most recent withdrawal, if any.
    pub fn last_event(&self) -> Option<&DisengageEvent> {
        self.history.back()
    }
}

impl Default for DisengageLedger {
    fn default() -> Self {
        Self::new()
    }
}
