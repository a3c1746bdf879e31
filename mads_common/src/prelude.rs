//! Prelude module for common re-exports.
//!
//! ```rust
//! use mads_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::mads::config::{ButtonScheme, MadsConfig, MismatchThresholds, SessionConfig};

// ─── Signals & Reasons ──────────────────────────────────────────────
pub use crate::mads::inputs::CycleInputs;
pub use crate::mads::state::{ButtonState, DisengageReason, EdgeTransition, StateFlags};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{ACC_MAIN_MISMATCH_THRESHOLD, HEARTBEAT_MISMATCH_THRESHOLD};
