//! Integration tests for settings persistence.
//!
//! Each test works in its own scratch directory so the suite can run in
//! parallel without touching the real `eyetrack_settings.json`.

use std::path::PathBuf;

use etvr_config::{
    CaptureSource, ConfigPaths, ConfigSource, EyeId, RootConfig, SettingsConfig,
};
use uuid::Uuid;

/// Scratch directory removed on drop.
struct Scratch {
    dir: PathBuf,
    paths: ConfigPaths,
}

impl Scratch {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("etvr_persistence_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        let paths = ConfigPaths::in_dir(&dir);
        Self { dir, paths }
    }

    fn write_primary(&self, content: &str) {
        std::fs::write(&self.paths.primary, content).expect("write primary");
    }

    fn write_backup(&self, content: &str) {
        std::fs::write(&self.paths.backup, content).expect("write backup");
    }

    fn read_primary(&self) -> String {
        std::fs::read_to_string(&self.paths.primary).expect("read primary")
    }

    fn read_backup(&self) -> String {
        std::fs::read_to_string(&self.paths.backup).expect("read backup")
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

fn customised_config() -> RootConfig {
    let mut cfg = RootConfig::default();
    cfg.eye_display_id = EyeId::Left;
    cfg.right_eye.capture_source = CaptureSource::SourcePath("http://192.168.0.42:4442".into());
    cfg.right_eye.roi_window_x = 12;
    cfg.right_eye.roi_window_w = 200;
    cfg.left_eye.capture_source = CaptureSource::DeviceIndex(1);
    cfg.left_eye.rotation_angle = 270;
    cfg.left_eye.gui_circular_crop = true;
    cfg.settings = SettingsConfig {
        gui_hsrac: false,
        gui_blob: true,
        gui_osc_port: 9100,
        gui_blob_maxsize: 31.5,
        gui_speed_coefficient: "0.75".to_string(),
        ..SettingsConfig::default()
    };
    cfg
}

#[test]
fn test_no_file_loads_defaults_with_hsrac_and_right_eye() {
    let scratch = Scratch::new();

    let cfg = RootConfig::load(&scratch.paths).expect("load");

    assert_eq!(cfg, RootConfig::default());
    assert!(cfg.settings.gui_hsrac);
    assert_eq!(cfg.eye_display_id, EyeId::Right);
}

#[test]
fn test_partial_primary_overrides_only_threshold() {
    // Arrange
    let scratch = Scratch::new();
    scratch.write_primary(r#"{"settings": {"gui_threshold": 99}}"#);

    // Act
    let outcome = RootConfig::load_from(&scratch.paths).expect("load");

    // Assert
    assert_eq!(outcome.source, ConfigSource::Primary);
    assert_eq!(outcome.config.settings.gui_threshold, 99);
    let mut expected = RootConfig::default();
    expected.settings.gui_threshold = 99;
    assert_eq!(outcome.config, expected);
}

#[test]
fn test_empty_document_is_all_defaults() {
    let scratch = Scratch::new();
    scratch.write_primary("{}");

    let cfg = RootConfig::load(&scratch.paths).expect("load");

    assert_eq!(cfg, RootConfig::default());
}

#[test]
fn test_save_then_load_round_trips() {
    // Arrange
    let scratch = Scratch::new();
    let original = customised_config();

    // Act
    original.save_to(&scratch.paths).expect("save");
    let loaded = RootConfig::load(&scratch.paths).expect("load");

    // Assert
    assert_eq!(loaded, original);
}

#[test]
fn test_malformed_primary_recovers_from_backup() {
    // Arrange: a valid backup and a truncated primary (as after a crash mid-write)
    let scratch = Scratch::new();
    let backup = customised_config();
    scratch.write_backup(&backup.to_json_string().unwrap());
    let truncated = backup.to_json_string().unwrap();
    scratch.write_primary(&truncated[..truncated.len() / 2]);

    // Act
    let outcome = RootConfig::load_from(&scratch.paths).expect("load must not fail");

    // Assert
    assert_eq!(outcome.source, ConfigSource::Backup);
    assert_eq!(outcome.config, backup);
}

#[test]
fn test_malformed_primary_without_backup_falls_back_to_defaults() {
    let scratch = Scratch::new();
    scratch.write_primary("{\"settings\": ");

    let outcome = RootConfig::load_from(&scratch.paths).expect("load must not fail");

    assert_eq!(outcome.source, ConfigSource::Defaults);
    assert_eq!(outcome.config, RootConfig::default());
}

#[test]
fn test_save_over_malformed_primary_leaves_backup_untouched() {
    // Arrange
    let scratch = Scratch::new();
    let previous_backup = r#"{"settings": {"gui_threshold": 12}}"#;
    scratch.write_backup(previous_backup);
    scratch.write_primary("this is not json");
    let cfg = customised_config();

    // Act
    cfg.save_to(&scratch.paths).expect("save");

    // Assert
    assert_eq!(scratch.read_backup(), previous_backup);
    assert_eq!(
        RootConfig::from_json_str(&scratch.read_primary()).unwrap(),
        cfg
    );
}

#[test]
fn test_save_over_malformed_primary_without_backup_creates_none() {
    let scratch = Scratch::new();
    scratch.write_primary("[");

    RootConfig::default().save_to(&scratch.paths).expect("save");

    assert!(!scratch.paths.backup.exists());
}

#[test]
fn test_backup_lags_primary_by_one_save() {
    // Arrange: an initial on-disk file, then two successive saves
    let scratch = Scratch::new();
    let initial = r#"{"settings": {"gui_threshold": 40}}"#;
    scratch.write_primary(initial);

    let mut first = RootConfig::default();
    first.settings.gui_threshold = 50;
    let mut second = RootConfig::default();
    second.settings.gui_threshold = 60;

    // Act / Assert: first save backs up the initial file
    first.save_to(&scratch.paths).expect("first save");
    assert_eq!(scratch.read_backup(), initial);

    // Second save backs up the first save's output, not the initial file
    second.save_to(&scratch.paths).expect("second save");
    let backup = RootConfig::from_json_str(&scratch.read_backup()).unwrap();
    assert_eq!(backup, first);
    assert_eq!(RootConfig::load(&scratch.paths).unwrap(), second);
}

#[test]
fn test_backup_is_byte_copy_of_previous_primary() {
    // Unknown keys survive in the backup because it is a file copy.
    let scratch = Scratch::new();
    let hand_edited = "{\n  \"version\": 1,\n  \"legacy_key\": true\n}\n";
    scratch.write_primary(hand_edited);

    RootConfig::default().save_to(&scratch.paths).expect("save");

    assert_eq!(scratch.read_backup(), hand_edited);
}

#[test]
fn test_recovered_config_can_be_saved_back() {
    // Arrange: corrupt primary, good backup
    let scratch = Scratch::new();
    let good = customised_config();
    scratch.write_backup(&good.to_json_string().unwrap());
    scratch.write_primary("\u{0}\u{0}\u{0}");

    // Act: load recovers from the backup, then the app saves
    let recovered = RootConfig::load(&scratch.paths).expect("load");
    recovered.save_to(&scratch.paths).expect("save");

    // Assert: primary is healthy again, backup still holds the good copy
    assert_eq!(RootConfig::load(&scratch.paths).unwrap(), good);
    assert_eq!(
        RootConfig::from_json_str(&scratch.read_backup()).unwrap(),
        good
    );
}

#[test]
fn test_numeric_string_capture_source_loads_as_device_index() {
    let scratch = Scratch::new();
    scratch.write_primary(r#"{"right_eye": {"capture_source": "0"}, "left_eye": {"capture_source": "COM4"}}"#);

    let cfg = RootConfig::load(&scratch.paths).expect("load");

    assert_eq!(cfg.right_eye.capture_source, CaptureSource::DeviceIndex(0));
    assert_eq!(
        cfg.left_eye.capture_source,
        CaptureSource::SourcePath("COM4".to_string())
    );
}

#[test]
fn test_loosely_typed_file_loads_and_saves() {
    // Arrange: values written as strings and floats, as older releases did
    let scratch = Scratch::new();
    let loose = r#"{"settings": {"gui_threshold": "99", "gui_HSRAC": 1, "gui_min_cutoff": 0.0004, "gui_osc_port": 9000.0}}"#;
    scratch.write_primary(loose);

    // Act
    let cfg = RootConfig::load(&scratch.paths).expect("load");
    cfg.save_to(&scratch.paths).expect("save");

    // Assert: values coerced, original text kept as the backup
    assert_eq!(cfg.settings.gui_threshold, 99);
    assert!(cfg.settings.gui_hsrac);
    assert_eq!(cfg.settings.gui_min_cutoff, "0.0004");
    assert_eq!(cfg.settings.gui_osc_port, 9000);
    assert_eq!(scratch.read_backup(), loose);
    assert_eq!(RootConfig::load(&scratch.paths).unwrap(), cfg);
}

#[test]
fn test_unsavable_config_does_not_poison_later_saves() {
    // Arrange
    let scratch = Scratch::new();
    let mut broken = RootConfig::default();
    broken.settings.gui_blob_maxsize = f64::INFINITY;

    // Act
    let first = broken.save_to(&scratch.paths);
    let second = customised_config().save_to(&scratch.paths);

    // Assert
    assert!(matches!(first, Err(etvr_config::ConfigError::Unsavable(_))));
    assert!(second.is_ok());
    assert!(!scratch.paths.backup.exists());
    assert_eq!(RootConfig::load(&scratch.paths).unwrap(), customised_config());
}
