//! Integration tests for gainstage-plugin.
//!
//! Exercise a plugin instance the way a host adapter does: construct,
//! activate, automate, process, save and restore.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use gainstage_config::EngineConfig;
use gainstage_core::{ProcessSpec, RampState};
use gainstage_plugin::{GAIN_PARAM_ID, GainPlugin, StateDocument, StateError};

/// Host sets +6 dB, then one 50 ms block of unity input at 48 kHz.
#[test]
fn test_six_db_scenario() {
    let plugin = GainPlugin::with_default_config().unwrap();
    let mut audio = plugin.activate(ProcessSpec::stereo(48000.0, 2400));

    plugin.main_thread().set_value(GAIN_PARAM_ID, 6.0);

    let mut left = vec![1.0_f32; 2400];
    let mut right = vec![1.0_f32; 2400];
    audio.process_block(&mut [&mut left[..], &mut right[..]]);

    for channel in [&left, &right] {
        assert!((channel[0] - (1.0 + 0.9953 / 2400.0)).abs() < 1e-4);
        assert!((channel[2399] - 1.9953).abs() < 1e-3);
        for pair in channel.windows(2) {
            assert!(pair[1] >= pair[0], "ramp up must be monotonic");
        }
    }
    assert_eq!(audio.gain_stage().state(), RampState::Settled);
}

/// State saved from one instance restores into a fresh one.
#[test]
fn test_state_between_instances() {
    let source = GainPlugin::with_default_config().unwrap();
    source.main_thread().set_value(GAIN_PARAM_ID, -7.3);
    let blob = source.main_thread().save_state().unwrap();

    let target = GainPlugin::with_default_config().unwrap();
    assert_eq!(target.main_thread().load_state(&blob).unwrap(), 1);
    assert_eq!(target.main_thread().get_value(GAIN_PARAM_ID), Some(-7.3));
}

/// State from an older layout restores what it can.
#[test]
fn test_state_with_extra_and_missing_parameters() {
    let config = EngineConfig::from_toml(
        r#"
[[parameters]]
id = "gain"
unit = "db"
min = -60.0
max = 12.0
default = 0.0

[[parameters]]
id = "mix"
min = 0.0
max = 1.0
default = 1.0
"#,
    )
    .unwrap();
    let plugin = GainPlugin::new(config).unwrap();
    plugin.main_thread().set_value("mix", 0.25);

    let mut params = std::collections::BTreeMap::new();
    params.insert(GAIN_PARAM_ID.to_string(), 40.0);
    params.insert("retired".to_string(), 1.0);
    let blob = StateDocument::new("Parameters", params).to_blob().unwrap();

    assert_eq!(plugin.main_thread().load_state(&blob).unwrap(), 1);
    assert_eq!(plugin.main_thread().get_value(GAIN_PARAM_ID), Some(12.0));
    assert_eq!(plugin.main_thread().get_value("mix"), Some(0.25));
}

/// Corrupt blobs are rejected without touching any value.
#[test]
fn test_corrupt_state_rejected() {
    let plugin = GainPlugin::with_default_config().unwrap();
    let main = plugin.main_thread();
    main.set_value(GAIN_PARAM_ID, 2.0);
    let good = main.save_state().unwrap();

    let cases: Vec<Vec<u8>> = vec![
        Vec::new(),
        good[..good.len() / 2].to_vec(),
        b"XXXX\x02\x00\x00\x00{}".to_vec(),
        {
            let mut b = good.clone();
            let last = b.len() - 1;
            b[last] = b'!';
            b
        },
    ];

    for blob in &cases {
        assert!(main.load_state(blob).is_err(), "accepted {blob:?}");
        assert_eq!(main.get_value(GAIN_PARAM_ID), Some(2.0));
    }

    let mut other = StateDocument::from_blob(&good).unwrap();
    other.tag = "Preset".to_string();
    assert!(matches!(
        main.load_state(&other.to_blob().unwrap()),
        Err(StateError::TagMismatch { .. })
    ));
}

/// Automation from a control thread while the audio thread processes.
#[test]
fn test_concurrent_automation() {
    let plugin = GainPlugin::with_default_config().unwrap();
    let mut audio = plugin.activate(ProcessSpec::stereo(48000.0, 128));
    let shared = plugin.shared().clone();
    let done = Arc::new(AtomicBool::new(false));

    let automation = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut db = -60.0_f32;
            while !done.load(Ordering::Acquire) {
                shared.store().set(GAIN_PARAM_ID, db);
                db = if db >= 12.0 { -60.0 } else { db + 0.5 };
            }
        })
    };

    for _ in 0..500 {
        let mut left = [0.5_f32; 128];
        let mut right = [0.5_f32; 128];
        audio.process_block(&mut [&mut left[..], &mut right[..]]);
        assert!(left.iter().chain(&right).all(|s| s.is_finite() && s.abs() <= 0.5 * 3.99));
    }
    done.store(true, Ordering::Release);
    automation.join().unwrap();
}

/// Re-activating at a new rate keeps the wall-clock ramp time.
#[test]
fn test_reactivate_at_new_rate() {
    let plugin = GainPlugin::with_default_config().unwrap();
    let mut audio = plugin.activate(ProcessSpec::stereo(48000.0, 512));
    plugin.main_thread().set_value(GAIN_PARAM_ID, -6.0);

    let mut mono = [1.0_f32; 512];
    audio.process_block(&mut [&mut mono[..]]);
    audio.prepare(ProcessSpec::stereo(96000.0, 512));
    assert_eq!(audio.gain_stage().ramp_samples(), 4800);

    // The interrupted ramp finished at prepare; the value holds.
    let mut mono = [1.0_f32; 512];
    audio.process_block(&mut [&mut mono[..]]);
    let expected = 10.0_f32.powf(-6.0 / 20.0);
    assert!(mono.iter().all(|&s| (s - expected).abs() < 1e-5));
}
