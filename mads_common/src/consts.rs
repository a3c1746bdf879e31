//! Workspace-wide constants.
//!
//! Single source of truth for mismatch thresholds, their bounds and
//! default paths. Imported by all crates; do not duplicate them locally.

/// Consecutive cycles the raw ACC-main signal must disagree with the
/// adopted value before the raw value is adopted.
pub const ACC_MAIN_MISMATCH_THRESHOLD: u32 = 25;

/// Consecutive cycles the heartbeat engagement claim may disagree with the
/// local lateral decision before lateral control is withdrawn.
pub const HEARTBEAT_MISMATCH_THRESHOLD: u32 = 3;

/// Lower bound for any configured mismatch threshold [cycles].
pub const MISMATCH_THRESHOLD_MIN: u32 = 1;

/// Upper bound for any configured mismatch threshold [cycles].
pub const MISMATCH_THRESHOLD_MAX: u32 = 1000;

/// Capacity of the bounded disengage history kept by the ledger.
pub const DISENGAGE_HISTORY_LEN: usize = 16;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/mads.toml";

static_assertions::const_assert!(ACC_MAIN_MISMATCH_THRESHOLD >= MISMATCH_THRESHOLD_MIN);
static_assertions::const_assert!(ACC_MAIN_MISMATCH_THRESHOLD <= MISMATCH_THRESHOLD_MAX);
static_assertions::const_assert!(HEARTBEAT_MISMATCH_THRESHOLD >= MISMATCH_THRESHOLD_MIN);
static_assertions::const_assert!(HEARTBEAT_MISMATCH_THRESHOLD <= MISMATCH_THRESHOLD_MAX);
