//! MADS shared types.
//!
//! Signal classifications, disengage reasons, session configuration and the
//! per-cycle input frame exchanged between the bus decoder and the engine.

pub mod config;
pub mod inputs;
pub mod state;
