//! Lateral-control arbitration module root.
//!
//! The engine owns the session state and evaluates the transition rules
//! once per cycle; the ledger records why control was last withdrawn.

pub mod engine;
pub mod ledger;
