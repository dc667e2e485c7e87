use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use appliance_panel::animation::AnimationState;
use appliance_panel::ui;
use appliance_panel::{AnimationEngine, Appliance, Color, Controller, StateStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

const BG: Color = Color::new(0xf0, 0xf0, 0xf0);
const ON: Color = Color::new(0x4c, 0xaf, 0x50);

fn controller(dir: &TempDir) -> Controller {
    let engine = AnimationEngine::with_rng(BG, ON, &BTreeMap::new(), StdRng::seed_from_u64(11));
    Controller::with_parts(
        StateStore::new(dir.path().join("appliance_states.json")),
        engine,
    )
}

#[test]
fn toggling_twice_restores_state_and_timers() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = controller(&dir);
    let now = Instant::now();

    for appliance in Appliance::all() {
        let before = panel.is_on(appliance);
        panel.toggle(appliance, now);
        assert!(panel.engine().is_running(appliance));
        panel.toggle(appliance, now);

        assert_eq!(panel.is_on(appliance), before);
        assert_eq!(panel.engine().is_running(appliance), before);
        assert_eq!(panel.engine().active_timers(), 0, "{appliance}");
    }
}

#[test]
fn restarting_a_running_animation_keeps_one_timer() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = controller(&dir);
    let now = Instant::now();

    panel.toggle(Appliance::LivingRoomFan, now);
    let first = panel.engine().timer(Appliance::LivingRoomFan);
    let second = panel
        .engine_mut()
        .start(Appliance::LivingRoomFan, now + Duration::from_millis(10));

    assert_eq!(panel.engine().active_timers(), 1);
    assert_ne!(first, Some(second));
    assert_eq!(panel.engine().timer(Appliance::LivingRoomFan), Some(second));
}

#[test]
fn kitchen_light_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = controller(&dir);
    let now = Instant::now();

    assert!(panel.toggle_by_name("Kitchen Light", now).unwrap());
    assert!(panel.is_on(Appliance::KitchenLight));
    assert!(panel.engine().is_running(Appliance::KitchenLight));
    assert_eq!(
        panel.next_deadline(),
        Some(now + Duration::from_millis(100))
    );

    let AnimationState::Light(light) = panel.engine().state(Appliance::KitchenLight) else {
        panic!("kitchen light should animate as a light");
    };
    assert!((light.brightness - 0.05).abs() < 1e-9);
    assert!(!panel.engine().surface(Appliance::KitchenLight).is_blank());

    // Nothing is due before the interval elapses.
    assert_eq!(panel.poll(now + Duration::from_millis(99)), 0);
    assert_eq!(panel.poll(now + Duration::from_millis(100)), 1);
    let AnimationState::Light(light) = panel.engine().state(Appliance::KitchenLight) else {
        unreachable!();
    };
    assert!((light.brightness - 0.10).abs() < 1e-9);
}

#[test]
fn radio_on_then_off_within_one_interval() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = controller(&dir);
    let now = Instant::now();

    panel.toggle(Appliance::Radio, now);
    panel.toggle(Appliance::Radio, now + Duration::from_millis(50));

    assert!(!panel.is_on(Appliance::Radio));
    assert!(panel.engine().surface(Appliance::Radio).is_blank());
    assert_eq!(panel.next_deadline(), None);
    assert_eq!(panel.poll(now + Duration::from_secs(5)), 0);
    assert!(panel.engine().surface(Appliance::Radio).is_blank());
}

#[test]
fn loading_a_partial_file_starts_only_listed_appliances() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("appliance_states.json"), r#"{"TV": true}"#).unwrap();

    let mut panel = controller(&dir);
    panel.load(Instant::now());

    assert!(panel.status().current().ends_with("Configuration loaded"));
    for appliance in Appliance::all() {
        let expected = appliance == Appliance::Tv;
        assert_eq!(panel.is_on(appliance), expected, "{appliance}");
        assert_eq!(panel.engine().is_running(appliance), expected, "{appliance}");
    }
    assert!(!panel.engine().surface(Appliance::Tv).is_blank());
    assert_eq!(panel.engine().active_timers(), 1);
}

#[test]
fn missing_file_reports_and_keeps_everything_off() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = controller(&dir);
    panel.load(Instant::now());

    assert!(panel
        .status()
        .current()
        .ends_with("No saved configuration found"));
    assert_eq!(panel.registry().count_on(), 0);
    assert_eq!(panel.engine().active_timers(), 0);
}

#[test]
fn corrupt_file_reports_error_and_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("appliance_states.json"), "not json").unwrap();

    let mut panel = controller(&dir);
    panel.load(Instant::now());

    assert!(panel
        .status()
        .current()
        .contains("Error loading configuration:"));
    assert_eq!(panel.registry().count_on(), 0);
}

#[test]
fn toggles_are_persisted_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let now = Instant::now();
    {
        let mut panel = controller(&dir);
        panel.toggle(Appliance::BedroomFan, now);
        panel.toggle(Appliance::Speaker, now);
        panel.toggle(Appliance::Speaker, now);
        panel.toggle(Appliance::AirConditioner, now);
        assert!(panel
            .status()
            .current()
            .ends_with("Configuration saved"));
    }

    let mut reloaded = controller(&dir);
    reloaded.load(now);
    for appliance in Appliance::all() {
        let expected = matches!(appliance, Appliance::BedroomFan | Appliance::AirConditioner);
        assert_eq!(reloaded.is_on(appliance), expected, "{appliance}");
    }
    assert_eq!(reloaded.engine().active_timers(), 2);
}

#[test]
fn toggle_messages_follow_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = controller(&dir);
    let now = Instant::now();

    panel.toggle(Appliance::Tv, now);
    let history: Vec<_> = panel.status().history().collect();
    assert!(history.iter().any(|line| line.ends_with("TV turned ON")));

    panel.toggle(Appliance::Tv, now);
    let history: Vec<_> = panel.status().history().collect();
    assert!(history.iter().any(|line| line.ends_with("TV turned OFF")));
}

#[test]
fn unknown_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = controller(&dir);

    let err = panel.toggle_by_name("Toaster", Instant::now()).unwrap_err();
    assert!(err.to_string().contains("Toaster"));
    assert_eq!(panel.registry().count_on(), 0);
    assert_eq!(panel.engine().active_timers(), 0);
}

#[test]
fn failed_write_does_not_undo_toggle() {
    let dir = tempfile::tempdir().unwrap();
    let engine = AnimationEngine::with_rng(BG, ON, &BTreeMap::new(), StdRng::seed_from_u64(3));
    let mut panel = Controller::with_parts(
        StateStore::new(dir.path().join("missing").join("state.json")),
        engine,
    );

    assert!(panel.toggle(Appliance::BedroomLight, Instant::now()));
    assert!(panel.is_on(Appliance::BedroomLight));
    assert!(panel.engine().is_running(Appliance::BedroomLight));
    assert!(panel
        .status()
        .current()
        .contains("Error saving configuration:"));
    assert!(panel.save().unwrap_err().is_write());
}

#[test]
fn ticks_stop_once_appliance_is_off() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = controller(&dir);
    let start = Instant::now();

    panel.toggle(Appliance::LivingRoomFan, start);
    let mut now = start;
    for _ in 0..5 {
        now += Duration::from_millis(50);
        assert_eq!(panel.poll(now), 1);
    }
    let AnimationState::Fan(fan) = panel.engine().state(Appliance::LivingRoomFan) else {
        panic!("fan family expected");
    };
    assert_eq!(fan.angle, 60);

    panel.toggle(Appliance::LivingRoomFan, now);
    assert_eq!(panel.poll(now + Duration::from_secs(1)), 0);
    assert!(panel.engine().surface(Appliance::LivingRoomFan).is_blank());
}

#[test]
fn save_shortcut_writes_file_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = controller(&dir);
    panel.toggle(Appliance::Speaker, Instant::now());
    std::fs::remove_file(dir.path().join("appliance_states.json")).unwrap();

    let target = ui::key_target("s").unwrap();
    ui::dispatch(&mut panel, target, Instant::now());

    assert!(panel.status().current().ends_with("Configuration saved"));
    let raw = std::fs::read_to_string(dir.path().join("appliance_states.json")).unwrap();
    assert!(raw.contains(r#""Speaker":true"#));
}

#[test]
fn save_shortcut_reports_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let engine = AnimationEngine::with_rng(BG, ON, &BTreeMap::new(), StdRng::seed_from_u64(5));
    let mut panel = Controller::with_parts(
        StateStore::new(dir.path().join("missing").join("state.json")),
        engine,
    );

    ui::dispatch(&mut panel, ui::Target::Save, Instant::now());
    assert!(panel
        .status()
        .current()
        .contains("Error saving configuration:"));
}
