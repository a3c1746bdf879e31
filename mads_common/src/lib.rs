//! MADS Common Library
//!
//! Shared types, constants and configuration loading for the lateral-control
//! arbitration workspace. Kept free of cycle logic so that collaborators
//! (bus decoders, replay tooling, telemetry) can depend on it without
//! pulling in the engine.
//!
//! # Module Structure
//!
//! - [`consts`] - Thresholds, bounds and default paths
//! - [`config`] - Configuration loading traits and types
//! - [`mads`] - Signal, reason and session configuration types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use mads_common::prelude::*;
//!
//! let inputs = CycleInputs {
//!     acc_main: true,
//!     ..CycleInputs::default()
//! };
//! assert_eq!(inputs.button, ButtonState::Unavailable);
//! ```

pub mod config;
pub mod consts;
pub mod mads;
pub mod prelude;
