//! Signal and decision enums for lateral-control arbitration.
//!
//! All enums carry an explicit `#[repr]` so their raw values can be exported
//! as telemetry integers, and a `from_*` constructor returning `None` for
//! values that do not map to a variant.

use core::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ─── Edge Classification ────────────────────────────────────────────

/// Change of a sampled signal relative to its previous sample.
///
/// Derived every cycle from a tracking record; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EdgeTransition {
    #[default]
    NoChange = 0,
    Rising = 1,
    Falling = 2,
}

impl EdgeTransition {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::NoChange),
            1 => Some(Self::Rising),
            2 => Some(Self::Falling),
            _ => None,
        }
    }
}

// ─── Button Sample ──────────────────────────────────────────────────

/// Tri-state button sample.
///
/// `Unavailable` means no button is fitted or no sample has arrived yet;
/// edge detection is suppressed while the current sample is `Unavailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i8)]
pub enum ButtonState {
    #[default]
    Unavailable = -1,
    NotPressed = 0,
    Pressed = 1,
}

impl ButtonState {
    #[inline]
    pub const fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Self::Unavailable),
            0 => Some(Self::NotPressed),
            1 => Some(Self::Pressed),
            _ => None,
        }
    }

    /// Build a sample from a decoded bus boolean.
    #[inline]
    pub const fn from_pressed(pressed: bool) -> Self {
        if pressed { Self::Pressed } else { Self::NotPressed }
    }

    #[inline]
    pub const fn is_pressed(&self) -> bool {
        matches!(self, Self::Pressed)
    }

    #[inline]
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

// ─── Disengage Reason ───────────────────────────────────────────────

/// Cause recorded whenever lateral control authority is withdrawn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DisengageReason {
    #[default]
    None = 0,
    /// Actuation lag reported by the steering path.
    Lag = 1,
    Brake = 2,
    Button = 3,
    /// Driver switched adaptive cruise off entirely.
    AccMainOff = 4,
    /// Supervisory heartbeat kept disagreeing with the local decision.
    HeartbeatEngagedMismatch = 5,
}

impl DisengageReason {
    /// Every reason, in raw-value order.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Lag,
        Self::Brake,
        Self::Button,
        Self::AccMainOff,
        Self::HeartbeatEngagedMismatch,
    ];

    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Lag),
            2 => Some(Self::Brake),
            3 => Some(Self::Button),
            4 => Some(Self::AccMainOff),
            5 => Some(Self::HeartbeatEngagedMismatch),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Lag => "lag",
            Self::Brake => "brake",
            Self::Button => "button",
            Self::AccMainOff => "acc_main_off",
            Self::HeartbeatEngagedMismatch => "heartbeat_engaged_mismatch",
        }
    }
}

impl fmt::Display for DisengageReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Latched Availability ───────────────────────────────────────────

bitflags! {
    /// Signals observed at least once during the current session.
    ///
    /// Bits are only ever set between re-initializations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u8 {
        const BUTTON_AVAILABLE    = 1 << 0;
        const HEARTBEAT_AVAILABLE = 1 << 1;
        const ECHO_AVAILABLE      = 1 << 2;
    }
}
