//! Per-cycle input frame.
//!
//! Sampled by the bus-decoding collaborator and handed to the engine by
//! value once per control cycle. Required signals are plain fields, so a
//! frame can never be built with them missing.

use serde::{Deserialize, Serialize};

use super::state::ButtonState;

/// Signals consumed by one `update` call.
///
/// Deserializes from one line of a drive trace:
///
/// ```json
/// {"vehicle_moving": true, "acc_main": true, "braking": false, "button": "pressed"}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleInputs {
    pub vehicle_moving: bool,
    /// Raw (or externally filtered) ACC-main engagement.
    pub acc_main: bool,
    pub braking: bool,
    /// Lateral-control button, or main-cruise button under
    /// [`ButtonScheme::MainButton`](super::config::ButtonScheme::MainButton).
    #[serde(default)]
    pub button: ButtonState,
    /// Supervisory computer's "controls allowed" echo, if decoded.
    #[serde(default)]
    pub controls_allowed_echo: Option<bool>,
    /// Supervisory heartbeat claim that lateral control is engaged, if decoded.
    #[serde(default)]
    pub heartbeat_engaged: Option<bool>,
}
