//! Integration test: config file + drive trace replay.
//!
//! Loads a TOML config from disk, builds a session from it and replays a
//! JSON-lines trace file, as the `mads_replay` binary does.

use std::fs::File;
use std::io::{BufReader, Write};

use mads_common::mads::config::ButtonScheme;
use mads_common::mads::inputs::CycleInputs;
use mads_common::mads::state::{ButtonState, DisengageReason};
use mads_core::Mads;
use mads_core::config::load_config;
use mads_core::replay::{Replay, replay_trace};
use tempfile::NamedTempFile;

const CONFIG_TOML: &str = r#"
[shared]
log_level = "warn"
service_name = "replay-it"

[session]
enabled = true
disengage_on_brake = true
main_cruise_allowed = true
button_scheme = "lateral_button_toggle"

[thresholds]
heartbeat_mismatch = 2
"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn to_jsonl(frames: &[CycleInputs]) -> String {
    frames
        .iter()
        .map(|f| serde_json::to_string(f).unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn replay_from_files() {
    let config_file = write_temp(CONFIG_TOML);
    let config = load_config(config_file.path()).unwrap();
    assert_eq!(config.session.button_scheme, ButtonScheme::LateralButtonToggle);

    let cruise = CycleInputs {
        vehicle_moving: true,
        acc_main: true,
        button: ButtonState::NotPressed,
        controls_allowed_echo: Some(true),
        heartbeat_engaged: Some(true),
        ..CycleInputs::default()
    };
    let frames = [
        cruise,
        // Button toggle: cancel.
        CycleInputs {
            button: ButtonState::Pressed,
            ..cruise
        },
        cruise,
        // Toggle back on.
        CycleInputs {
            button: ButtonState::Pressed,
            ..cruise
        },
        cruise,
        // Heartbeat drops for two cycles.
        CycleInputs {
            heartbeat_engaged: Some(false),
            ..cruise
        },
        CycleInputs {
            heartbeat_engaged: Some(false),
            ..cruise
        },
        cruise,
    ];
    let trace_file = write_temp(&to_jsonl(&frames));

    let stats = replay_trace(
        Mads::from_config(&config),
        BufReader::new(File::open(trace_file.path()).unwrap()),
    )
    .unwrap();

    assert_eq!(stats.cycles, 8);
    assert_eq!(stats.withdrawals_for(DisengageReason::Button), 1);
    assert_eq!(stats.withdrawals_for(DisengageReason::HeartbeatEngagedMismatch), 1);
    assert_eq!(stats.grants, 3);
    // Denied while the echo reported allowed: after the cancel (2), after
    // the watchdog (1).
    assert_eq!(stats.echo_mismatch_cycles, 3);
    assert_eq!(stats.lat_allowed_cycles, 5);
    assert!(stats.passed());
}

#[test]
fn step_api_matches_engine_state() {
    let mut replay = Replay::new(Mads::configure(true, true, true));
    replay.step(CycleInputs {
        vehicle_moving: true,
        acc_main: true,
        ..CycleInputs::default()
    });
    assert!(replay.engine().decision());
    assert_eq!(replay.stats().lat_allowed_cycles, 1);

    replay.step(CycleInputs {
        vehicle_moving: true,
        acc_main: true,
        braking: true,
        ..CycleInputs::default()
    });
    let stats = replay.finish();
    assert_eq!(stats.withdrawals_for(DisengageReason::Brake), 1);
    assert_eq!(stats.cycles, 2);
}

#[test]
fn bundled_config_and_demo_drive() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let config = load_config(&root.join(mads_common::consts::DEFAULT_CONFIG_PATH)).unwrap();
    let trace = File::open(root.join("demos/drive.jsonl")).unwrap();

    let stats = replay_trace(Mads::from_config(&config), BufReader::new(trace)).unwrap();
    assert_eq!(stats.cycles, 10);
    assert_eq!(stats.grants, 2);
    assert_eq!(stats.lat_allowed_cycles, 5);
    assert_eq!(stats.withdrawals_for(DisengageReason::Brake), 1);
    assert_eq!(stats.withdrawals_for(DisengageReason::AccMainOff), 1);
    assert!(stats.passed());
}
