//! Signal conditioning module root.
//!
//! Edge classification of sampled inputs and consecutive-cycle mismatch
//! debouncing. Both operate on caller-owned records and never allocate.

pub mod debounce;
pub mod edge;
