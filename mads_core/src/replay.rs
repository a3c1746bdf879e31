//! Drive trace replay.
//!
//! Runs one session over a recorded sequence of [`CycleInputs`] frames and
//! accumulates statistics. Traces are JSON lines, one frame per line; blank
//! lines and lines starting with `#` are skipped.
//!
//! A replay fails when the lateral decision ever breaks a session invariant:
//! allowed while the system is disabled, or allowed without a request.

use std::collections::BTreeMap;
use std::io::BufRead;

use mads_common::mads::inputs::CycleInputs;
use mads_common::mads::state::DisengageReason;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::arbitration::engine::Mads;

/// Replay failure.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("trace line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Aggregate counters over a replayed trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    pub cycles: u64,
    /// Cycles ending with lateral control allowed.
    pub lat_allowed_cycles: u64,
    /// Cycles where the supervisory echo was allowed but lateral was denied.
    pub echo_mismatch_cycles: u64,
    pub grants: u64,
    pub withdrawals: BTreeMap<DisengageReason, u64>,
    pub invariant_violations: u64,
}

impl ReplayStats {
    #[inline]
    pub fn passed(&self) -> bool {
        self.invariant_violations == 0
    }

    pub fn withdrawals_for(&self, reason: DisengageReason) -> u64 {
        self.withdrawals.get(&reason).copied().unwrap_or(0)
    }
}

/// One session driven frame by frame.
#[derive(Debug, Clone)]
pub struct Replay {
    engine: Mads,
    stats: ReplayStats,
}

impl Replay {
    pub fn new(engine: Mads) -> Self {
        Self {
            engine,
            stats: ReplayStats::default(),
        }
    }

    /// Run one cycle and fold it into the statistics.
    pub fn step(&mut self, inputs: CycleInputs) {
        self.engine.update(inputs);
        let cycle = self.engine.cycle();
        let stats = &mut self.stats;

        stats.cycles += 1;
        stats.grants = self.engine.grants();
        if self.engine.decision() {
            stats.lat_allowed_cycles += 1;
        }
        if inputs.controls_allowed_echo == Some(true) && !self.engine.decision() {
            stats.echo_mismatch_cycles += 1;
        }
        for event in self.engine.disengage_history().filter(|e| e.cycle == cycle) {
            *stats.withdrawals.entry(event.reason).or_insert(0) += 1;
        }

        let allowed = self.engine.controls_allowed_lat();
        if allowed && (!self.engine.session().enabled || !self.engine.controls_requested_lat()) {
            stats.invariant_violations += 1;
            warn!(cycle, snapshot = ?self.engine.snapshot(), "lateral invariant violated");
        }
    }

    #[inline]
    pub fn engine(&self) -> &Mads {
        &self.engine
    }

    #[inline]
    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    pub fn finish(self) -> ReplayStats {
        self.stats
    }
}

/// Parse a JSON-lines trace lazily.
pub fn parse_trace<R: BufRead>(reader: R) -> impl Iterator<Item = Result<CycleInputs, ReplayError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line_no = idx + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(ReplayError::Io(e))),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            Some(
                serde_json::from_str::<CycleInputs>(trimmed).map_err(|e| ReplayError::Parse {
                    line: line_no,
                    reason: e.to_string(),
                }),
            )
        })
}

/// Replay a whole trace through `engine`.
///
/// Stops at the first unreadable or malformed line.
pub fn replay_trace<R: BufRead>(engine: Mads, reader: R) -> Result<ReplayStats, ReplayError> {
    let mut replay = Replay::new(engine);
    for frame in parse_trace(reader) {
        replay.step(frame?);
    }
    debug!(cycles = replay.stats().cycles, "trace replay finished");
    Ok(replay.finish())
}
