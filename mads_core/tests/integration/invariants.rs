//! Integration test: session invariants over long input sequences.
//!
//! Drives every button scheme and flag combination with a deterministic
//! pseudo-random input stream and checks, after every cycle:
//! - decision ⇒ system enabled
//! - allowed ⇒ requested, and allowed ⇒ no outstanding disengage reason
//! - lateral never stays allowed against a "not engaged" heartbeat for
//!   the watchdog threshold or more (missing claims neither break nor
//!   extend a run)
//! - ACC-main availability never drops once set
//! - tracking transitions describe only the latest sample pair

use mads_common::mads::config::{ButtonScheme, MismatchThresholds, SessionConfig};
use mads_common::mads::inputs::CycleInputs;
use mads_common::mads::state::{ButtonState, DisengageReason, EdgeTransition};
use mads_core::Mads;
use mads_core::signal::edge::classify;

const CYCLES: usize = 5_000;

/// Small xorshift generator so runs are reproducible without extra crates.
struct Xorshift(u64);

impl Xorshift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// `true` with probability 1/`one_in`.
    fn chance(&mut self, one_in: u64) -> bool {
        self.next() % one_in == 0
    }
}

/// Signals that flip rarely, like a real drive.
struct Drive {
    rng: Xorshift,
    frame: CycleInputs,
}

impl Drive {
    fn new(seed: u64) -> Self {
        Self {
            rng: Xorshift(seed),
            frame: CycleInputs {
                button: ButtonState::NotPressed,
                ..CycleInputs::default()
            },
        }
    }

    fn next_frame(&mut self) -> CycleInputs {
        let f = &mut self.frame;
        if self.rng.chance(40) {
            f.vehicle_moving = !f.vehicle_moving;
        }
        if self.rng.chance(60) {
            f.acc_main = !f.acc_main;
        }
        if self.rng.chance(15) {
            f.braking = !f.braking;
        }
        if self.rng.chance(10) {
            f.button = match self.rng.next() % 3 {
                0 => ButtonState::Unavailable,
                1 => ButtonState::NotPressed,
                _ => ButtonState::Pressed,
            };
        }
        if self.rng.chance(30) {
            f.controls_allowed_echo = match self.rng.next() % 3 {
                0 => None,
                1 => Some(false),
                _ => Some(true),
            };
        }
        if self.rng.chance(8) {
            f.heartbeat_engaged = match self.rng.next() % 4 {
                0 => None,
                1 => Some(false),
                _ => Some(true),
            };
        }
        *f
    }
}

fn sessions() -> Vec<SessionConfig> {
    let mut out = Vec::new();
    for enabled in [true, false] {
        for brake in [true, false] {
            for main in [true, false] {
                for scheme in [
                    ButtonScheme::LateralButton,
                    ButtonScheme::LateralButtonToggle,
                    ButtonScheme::MainButton,
                ] {
                    for extras in [false, true] {
                        out.push(
                            SessionConfig::new(enabled, brake, main)
                                .with_button_scheme(scheme)
                                .with_engage_with_cruise(extras)
                                .with_filter_acc_main(extras),
                        );
                    }
                }
            }
        }
    }
    out
}

#[test]
fn invariants_hold_for_all_sessions() {
    for (i, session) in sessions().into_iter().enumerate() {
        let thresholds = MismatchThresholds {
            acc_main_mismatch: 4,
            heartbeat_mismatch: 3,
        };
        let mut mads = Mads::with_config(session, thresholds);
        let mut drive = Drive::new(0x9E37_79B9_7F4A_7C15 ^ (i as u64 + 1));
        let mut acc_main_seen = false;
        let mut prev_braking = false;
        let mut heartbeat_run = 0u32;

        for cycle in 0..CYCLES {
            let frame = drive.next_frame();
            mads.update(frame);
            if mads.decision() {
                assert!(session.enabled, "decision without enable: session {i} cycle {cycle}");
            }
            if mads.controls_allowed_lat() {
                assert!(mads.controls_requested_lat(), "allowed without request: session {i} cycle {cycle}");
                assert_eq!(
                    mads.current_disengage_reason(),
                    DisengageReason::None,
                    "allowed with outstanding reason: session {i} cycle {cycle}"
                );
            }

            match frame.heartbeat_engaged {
                Some(false) if mads.controls_allowed_lat() => heartbeat_run += 1,
                Some(_) => heartbeat_run = 0,
                None if !mads.controls_allowed_lat() => heartbeat_run = 0,
                None => {}
            }
            assert!(
                heartbeat_run < thresholds.heartbeat_mismatch,
                "allowed against heartbeat for {heartbeat_run} cycles: session {i} cycle {cycle}"
            );

            if acc_main_seen {
                assert!(mads.acc_main().available(), "availability dropped: session {i} cycle {cycle}");
            }
            acc_main_seen = mads.acc_main().available();

            assert_eq!(
                mads.braking().transition(),
                classify(frame.braking, prev_braking),
                "brake transition not per-cycle: session {i} cycle {cycle}"
            );
            prev_braking = frame.braking;

            if frame.button == ButtonState::Unavailable {
                assert_eq!(mads.button().transition(), EdgeTransition::NoChange, "session {i} cycle {cycle}");
            }
        }
    }
}

#[test]
fn disabled_session_never_grants() {
    let mut mads = Mads::configure(false, true, true);
    let mut drive = Drive::new(7);
    for _ in 0..CYCLES {
        mads.update(drive.next_frame());
        assert!(!mads.decision());
        assert!(!mads.controls_allowed_lat());
    }
    assert_eq!(mads.grants(), 0);
    assert_eq!(mads.disengage_history().count(), 0);
}

#[test]
fn identical_inputs_do_not_regrant() {
    let mut mads = Mads::configure(true, true, true);
    let steady = CycleInputs {
        vehicle_moving: true,
        acc_main: true,
        button: ButtonState::NotPressed,
        heartbeat_engaged: Some(true),
        ..CycleInputs::default()
    };
    mads.update(steady);
    assert_eq!(mads.grants(), 1);
    for _ in 0..1000 {
        mads.update(steady);
    }
    assert!(mads.decision());
    assert_eq!(mads.grants(), 1);
    assert_eq!(mads.cycle(), 1001);
}
