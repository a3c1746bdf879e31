//! Lateral-control arbitration engine.
//!
//! Decides, once per control cycle, whether lateral (steering) actuation is
//! permitted. The externally visible decision has two states:
//!
//! - `Denied` (initial) → `Allowed`: only through [`Mads::update`]'s
//!   re-engagement step, while a request is outstanding and no blocking
//!   condition is asserted. The ledger rolls over on every grant.
//! - `Allowed` → `Denied`: only through [`Mads::exit_controls`], which
//!   stamps the reason into the ledger first.
//!
//! ## Cycle Order
//!
//! 1. Push samples into their tracking records (edge detection).
//! 2. ACC-main rule.
//! 3. Button rule (one [`ButtonScheme`] per session).
//! 4. Cruise-echo rule (`engage_with_cruise` only).
//! 5. Brake rule (`disengage_on_brake` only).
//! 6. Re-engagement attempt.
//! 7. Heartbeat watchdog.
//!
//! A [`Mads`] handle only exists once configured, so `update` can never run
//! against an uninitialized session. Re-initialization takes `&mut self` and
//! therefore cannot overlap an in-flight cycle.

use mads_common::mads::config::{ButtonScheme, MadsConfig, MismatchThresholds, SessionConfig};
use mads_common::mads::inputs::CycleInputs;
use mads_common::mads::state::{ButtonState, DisengageReason, EdgeTransition, StateFlags};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::ledger::{DisengageEvent, DisengageLedger};
use crate::signal::debounce::{AccMainFilter, MismatchCounter};
use crate::signal::edge::{BinaryStateTracking, ButtonStateTracking};

/// Session-owned arbitration state.
#[derive(Debug, Clone)]
pub struct Mads {
    session: SessionConfig,
    thresholds: MismatchThresholds,
    flags: StateFlags,

    acc_main: BinaryStateTracking,
    button: ButtonStateTracking,
    braking: BinaryStateTracking,
    echo: BinaryStateTracking,
    vehicle_moving: bool,
    heartbeat_engaged: Option<bool>,

    acc_main_filter: AccMainFilter,
    heartbeat_watchdog: MismatchCounter,

    controls_requested_lat: bool,
    controls_allowed_lat: bool,
    /// Request was withdrawn by the brake rule and may be re-armed on release.
    resume_after_brake: bool,
    ledger: DisengageLedger,

    cycle: u64,
    grants: u64,
}

impl Mads {
    /// Start a session with the three core enable flags.
    pub fn configure(enabled: bool, disengage_on_brake: bool, main_cruise_allowed: bool) -> Self {
        Self::with_config(
            SessionConfig::new(enabled, disengage_on_brake, main_cruise_allowed),
            MismatchThresholds::default(),
        )
    }

    /// Start a session from a loaded configuration file.
    pub fn from_config(config: &MadsConfig) -> Self {
        Self::with_config(config.session, config.thresholds)
    }

    /// Start a session. All tracking records begin at "no signal yet".
    pub fn with_config(session: SessionConfig, thresholds: MismatchThresholds) -> Self {
        info!(
            enabled = session.enabled,
            disengage_on_brake = session.disengage_on_brake,
            main_cruise_allowed = session.main_cruise_allowed,
            button_scheme = ?session.button_scheme,
            "MADS session configured"
        );
        Self {
            session,
            thresholds,
            flags: StateFlags::empty(),
            acc_main: BinaryStateTracking::new(),
            button: ButtonStateTracking::new(),
            braking: BinaryStateTracking::new(),
            echo: BinaryStateTracking::new(),
            vehicle_moving: false,
            heartbeat_engaged: None,
            acc_main_filter: AccMainFilter::new(thresholds.acc_main_mismatch),
            heartbeat_watchdog: MismatchCounter::new(thresholds.heartbeat_mismatch),
            controls_requested_lat: false,
            controls_allowed_lat: false,
            resume_after_brake: false,
            ledger: DisengageLedger::new(),
            cycle: 0,
            grants: 0,
        }
    }

    /// Re-initialize between cycles (session or configuration change).
    pub fn reconfigure(&mut self, session: SessionConfig, thresholds: MismatchThresholds) {
        *self = Self::with_config(session, thresholds);
    }

    // ─── Cycle ──────────────────────────────────────────────────────

    /// Advance the state machine by one control cycle.
    pub fn update(&mut self, inputs: CycleInputs) {
        self.cycle += 1;
        self.track_inputs(&inputs);

        self.apply_acc_main_rule();
        self.apply_button_rule();
        self.apply_echo_rule();
        if self.session.disengage_on_brake {
            self.apply_brake_rule();
        }
        self.try_allow_controls_lat();
        self.run_heartbeat_watchdog();
    }

    fn track_inputs(&mut self, inputs: &CycleInputs) {
        self.vehicle_moving = inputs.vehicle_moving;

        let acc_main = if self.session.filter_acc_main {
            self.acc_main_filter.filter(inputs.acc_main)
        } else {
            inputs.acc_main
        };
        self.acc_main.update(acc_main);
        self.button.update(inputs.button);
        self.braking.update(inputs.braking);

        match inputs.controls_allowed_echo {
            Some(echo) => {
                self.echo.update(echo);
                self.flags |= StateFlags::ECHO_AVAILABLE;
            }
            None => self.echo.hold(),
        }

        self.heartbeat_engaged = inputs.heartbeat_engaged;
        if inputs.heartbeat_engaged.is_some() {
            self.flags |= StateFlags::HEARTBEAT_AVAILABLE;
        }
        if inputs.button != ButtonState::Unavailable {
            self.flags |= StateFlags::BUTTON_AVAILABLE;
        }
    }

    fn apply_acc_main_rule(&mut self) {
        match self.acc_main.transition() {
            EdgeTransition::Rising if self.session.main_cruise_allowed => {
                self.controls_requested_lat = true;
            }
            EdgeTransition::Falling => {
                self.cancel_request();
                self.exit_controls(DisengageReason::AccMainOff);
            }
            _ => {}
        }
    }

    fn apply_button_rule(&mut self) {
        match self.session.button_scheme {
            ButtonScheme::LateralButton => {
                if self.button.transition() == EdgeTransition::Rising {
                    self.controls_requested_lat = true;
                }
            }
            ButtonScheme::LateralButtonToggle => {
                if self.button.transition() == EdgeTransition::Rising {
                    self.toggle_request();
                }
            }
            ButtonScheme::MainButton => {
                if self.button.transition() == EdgeTransition::Falling
                    && !self.acc_main.available()
                {
                    self.toggle_request();
                }
            }
        }
    }

    /// Outstanding request: the driver cancels. Otherwise: the driver starts.
    fn toggle_request(&mut self) {
        if self.controls_requested_lat {
            self.cancel_request();
            self.exit_controls(DisengageReason::Button);
        } else {
            self.controls_requested_lat = true;
        }
    }

    fn apply_echo_rule(&mut self) {
        if self.session.engage_with_cruise && self.echo.is_rising() {
            self.controls_requested_lat = true;
        }
    }

    fn apply_brake_rule(&mut self) {
        let braking = self.braking.current();
        if self.braking.is_rising() || (braking && self.vehicle_moving) {
            let was_allowed = self.controls_allowed_lat;
            self.controls_requested_lat = false;
            self.exit_controls(DisengageReason::Brake);
            if was_allowed {
                self.resume_after_brake = true;
            }
        } else if self.resume_after_brake
            && self.ledger.current_reason() == DisengageReason::Brake
            && !braking
        {
            self.resume_after_brake = false;
            self.controls_requested_lat = true;
        }
    }

    fn cancel_request(&mut self) {
        self.controls_requested_lat = false;
        self.resume_after_brake = false;
    }

    /// Reason-aware re-engagement guard.
    fn can_allow_controls_lat(&self) -> bool {
        if !self.session.enabled {
            return false;
        }
        match self.ledger.current_reason() {
            DisengageReason::Brake => !self.braking.current(),
            DisengageReason::HeartbeatEngagedMismatch => self.heartbeat_engaged != Some(false),
            DisengageReason::None
            | DisengageReason::Lag
            | DisengageReason::Button
            | DisengageReason::AccMainOff => true,
        }
    }

    fn try_allow_controls_lat(&mut self) {
        if self.controls_requested_lat && !self.controls_allowed_lat && self.can_allow_controls_lat()
        {
            self.controls_allowed_lat = true;
            self.resume_after_brake = false;
            self.ledger.clear_on_regrant();
            self.grants += 1;
            debug!(
                cycle = self.cycle,
                previous_reason = %self.ledger.previous_reason(),
                "lateral control granted"
            );
        }
    }

    fn run_heartbeat_watchdog(&mut self) {
        let Some(engaged) = self.heartbeat_engaged else {
            return;
        };
        if self
            .heartbeat_watchdog
            .observe(self.controls_allowed_lat && !engaged)
        {
            warn!(
                cycle = self.cycle,
                mismatches = self.heartbeat_watchdog.count(),
                "heartbeat disagrees with lateral decision"
            );
            self.exit_controls(DisengageReason::HeartbeatEngagedMismatch);
        }
    }

    // ─── Public Hooks ───────────────────────────────────────────────

    /// Withdraw lateral control, stamping `reason`.
    ///
    /// No-op on the decision while already denied. `AccMainOff` also
    /// clears the request. `None` is not a withdrawal reason and is ignored.
    pub fn exit_controls(&mut self, reason: DisengageReason) {
        if reason == DisengageReason::None {
            debug!(cycle = self.cycle, "exit_controls without a reason ignored");
            return;
        }
        if reason == DisengageReason::AccMainOff {
            self.cancel_request();
        }
        if self
            .ledger
            .record(self.controls_allowed_lat, reason, self.cycle)
        {
            self.controls_allowed_lat = false;
            debug!(cycle = self.cycle, %reason, "lateral control withdrawn");
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────

    /// Current allowed/denied decision.
    #[inline]
    pub const fn decision(&self) -> bool {
        self.session.enabled && self.controls_allowed_lat
    }

    #[inline]
    pub const fn current_disengage_reason(&self) -> DisengageReason {
        self.ledger.current_reason()
    }

    #[inline]
    pub const fn previous_disengage_reason(&self) -> DisengageReason {
        self.ledger.previous_reason()
    }

    #[inline]
    pub const fn controls_requested_lat(&self) -> bool {
        self.controls_requested_lat
    }

    /// Raw allowed flag, before the `enabled` gate of [`Mads::decision`].
    #[inline]
    pub const fn controls_allowed_lat(&self) -> bool {
        self.controls_allowed_lat
    }

    #[inline]
    pub const fn session(&self) -> &SessionConfig {
        &self.session
    }

    #[inline]
    pub const fn thresholds(&self) -> &MismatchThresholds {
        &self.thresholds
    }

    #[inline]
    pub const fn state_flags(&self) -> StateFlags {
        self.flags
    }

    #[inline]
    pub const fn acc_main(&self) -> &BinaryStateTracking {
        &self.acc_main
    }

    #[inline]
    pub const fn button(&self) -> &ButtonStateTracking {
        &self.button
    }

    #[inline]
    pub const fn braking(&self) -> &BinaryStateTracking {
        &self.braking
    }

    #[inline]
    pub const fn controls_allowed_echo(&self) -> &BinaryStateTracking {
        &self.echo
    }

    #[inline]
    pub const fn heartbeat_mismatches(&self) -> u32 {
        self.heartbeat_watchdog.count()
    }

    #[inline]
    pub const fn acc_main_mismatches(&self) -> u32 {
        self.acc_main_filter.mismatches()
    }

    /// Cycles executed since the session started.
    #[inline]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// `Denied → Allowed` transitions since the session started.
    #[inline]
    pub const fn grants(&self) -> u64 {
        self.grants
    }

    pub fn disengage_history(&self) -> impl Iterator<Item = &DisengageEvent> {
        self.ledger.history()
    }

    pub fn snapshot(&self) -> MadsSnapshot {
        MadsSnapshot {
            cycle: self.cycle,
            enabled: self.session.enabled,
            controls_requested_lat: self.controls_requested_lat,
            controls_allowed_lat: self.controls_allowed_lat,
            decision: self.decision(),
            current_reason: self.ledger.current_reason(),
            previous_reason: self.ledger.previous_reason(),
            acc_main: self.acc_main.current(),
            acc_main_available: self.acc_main.available(),
            button: self.button.current(),
            braking: self.braking.current(),
            acc_main_mismatches: self.acc_main_filter.mismatches(),
            heartbeat_mismatches: self.heartbeat_watchdog.count(),
            state_flags: self.flags.bits(),
            grants: self.grants,
        }
    }
}

/// Point-in-time diagnostic view of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MadsSnapshot {
    pub cycle: u64,
    pub enabled: bool,
    pub controls_requested_lat: bool,
    pub controls_allowed_lat: bool,
    pub decision: bool,
    pub current_reason: DisengageReason,
    pub previous_reason: DisengageReason,
    pub acc_main: bool,
    pub acc_main_available: bool,
    pub button: ButtonState,
    pub braking: bool,
    pub acc_main_mismatches: u32,
    pub heartbeat_mismatches: u32,
    pub state_flags: u8,
    pub grants: u64,
}

// ─── Tests ──────────────────────────────────────────────────────────
