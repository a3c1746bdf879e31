//! Session configuration for the arbitration engine.
//!
//! All config types use `serde::Deserialize` for TOML loading. Optional
//! fields use `#[serde(default)]` so older files keep loading when new
//! switches are added. Numeric parameters are bounded by the `*_MIN` /
//! `*_MAX` constants in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::config::SharedConfig;
use crate::consts::{
    ACC_MAIN_MISMATCH_THRESHOLD, HEARTBEAT_MISMATCH_THRESHOLD, MISMATCH_THRESHOLD_MAX,
    MISMATCH_THRESHOLD_MIN,
};

// ─── Button Semantics ───────────────────────────────────────────────

/// Which button drives the lateral request, and how.
///
/// A deployment picks exactly one scheme; the engine never evaluates two
/// button rules against the same sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonScheme {
    /// Dedicated lateral button: rising edge requests lateral control.
    #[default]
    LateralButton,
    /// Dedicated lateral button: rising edge toggles the request,
    /// cancelling with [`DisengageReason::Button`](super::state::DisengageReason::Button).
    LateralButtonToggle,
    /// Main-cruise button on vehicles without a usable ACC-main signal:
    /// falling edge toggles the request.
    MainButton,
}

// ─── Session Flags ──────────────────────────────────────────────────

/// System-level enable flags, set once per drive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Master switch. Lateral control is never allowed while `false`.
    pub enabled: bool,

    /// Withdraw lateral control on brake press / braking while moving.
    #[serde(default = "default_true")]
    pub disengage_on_brake: bool,

    /// ACC-main rising edge requests lateral control.
    #[serde(default = "default_true")]
    pub main_cruise_allowed: bool,

    #[serde(default)]
    pub button_scheme: ButtonScheme,

    /// Rising edge of the supervisory "controls allowed" echo requests
    /// lateral control.
    #[serde(default)]
    pub engage_with_cruise: bool,

    /// Debounce the raw ACC-main signal before edge detection.
    #[serde(default)]
    pub filter_acc_main: bool,
}

fn default_true() -> bool {
    true
}

impl SessionConfig {
    /// Flags with the remaining switches at their defaults.
    pub const fn new(enabled: bool, disengage_on_brake: bool, main_cruise_allowed: bool) -> Self {
        Self {
            enabled,
            disengage_on_brake,
            main_cruise_allowed,
            button_scheme: ButtonScheme::LateralButton,
            engage_with_cruise: false,
            filter_acc_main: false,
        }
    }

    pub const fn with_button_scheme(mut self, scheme: ButtonScheme) -> Self {
        self.button_scheme = scheme;
        self
    }

    pub const fn with_engage_with_cruise(mut self, on: bool) -> Self {
        self.engage_with_cruise = on;
        self
    }

    pub const fn with_filter_acc_main(mut self, on: bool) -> Self {
        self.filter_acc_main = on;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(false, true, true)
    }
}

// ─── Mismatch Thresholds ────────────────────────────────────────────

/// Debounce thresholds for the two mismatch filters [cycles].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchThresholds {
    /// Raw ACC-main vs adopted value (default: 25).
    #[serde(default = "default_acc_main_mismatch")]
    pub acc_main_mismatch: u32,

    /// Heartbeat claim vs local decision (default: 3).
    #[serde(default = "default_heartbeat_mismatch")]
    pub heartbeat_mismatch: u32,
}

fn default_acc_main_mismatch() -> u32 {
    ACC_MAIN_MISMATCH_THRESHOLD
}
fn default_heartbeat_mismatch() -> u32 {
    HEARTBEAT_MISMATCH_THRESHOLD
}

impl Default for MismatchThresholds {
    fn default() -> Self {
        Self {
            acc_main_mismatch: ACC_MAIN_MISMATCH_THRESHOLD,
            heartbeat_mismatch: HEARTBEAT_MISMATCH_THRESHOLD,
        }
    }
}

impl MismatchThresholds {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("acc_main_mismatch", self.acc_main_mismatch),
            ("heartbeat_mismatch", self.heartbeat_mismatch),
        ] {
            if !(MISMATCH_THRESHOLD_MIN..=MISMATCH_THRESHOLD_MAX).contains(&value) {
                return Err(format!(
                    "{name} {value} out of range [{MISMATCH_THRESHOLD_MIN}, {MISMATCH_THRESHOLD_MAX}]"
                ));
            }
        }
        Ok(())
    }
}

// ─── Top-Level Config ───────────────────────────────────────────────

/// Complete MADS configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MadsConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub thresholds: MismatchThresholds,
}

impl MadsConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.shared.validate().map_err(|e| e.to_string())?;
        self.thresholds.validate()?;
        Ok(())
    }
}
