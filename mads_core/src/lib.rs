//! # MADS Core
//!
//! Deterministic lateral-control arbitration for a driving-assistance safety
//! gatekeeper. Once per control cycle the engine consumes sampled driver and
//! vehicle signals and decides whether steering actuation is permitted,
//! recording why control was most recently withdrawn.
//!
//! ## Layers
//!
//! 1. **signal::edge**: rising/falling classification of sampled inputs
//! 2. **signal::debounce**: consecutive-cycle mismatch filters
//! 3. **arbitration::ledger**: current/previous disengage reason
//! 4. **arbitration::engine**: the state machine ([`Mads`])
//!
//! ## Zero-Allocation Cycle
//!
//! All session state is fixed-size and owned by one [`Mads`] value. `update`
//! performs no heap allocation and never blocks.

#![deny(clippy::disallowed_types)]

pub mod arbitration;
pub mod config;
pub mod replay;
pub mod signal;

pub use arbitration::engine::{Mads, MadsSnapshot};
