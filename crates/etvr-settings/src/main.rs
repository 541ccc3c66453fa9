//! EyeTrackVR settings tool — entry point.
//!
//! Inspects and maintains the `eyetrack_settings.json` /
//! `eyetrack_settings.backup` pair without starting the tracker.  Every
//! command goes through the same load/save routines the application uses, so
//! fallback and backup behaviour is identical.
//!
//! # Usage
//!
//! ```text
//! etvr-settings [--dir <DIR>] <COMMAND>
//!
//! Commands:
//!   show        Print the effective settings as JSON
//!   check       Report the state of the settings file and its backup
//!   reset       Overwrite the settings with defaults (backing up the old file)
//!   set-source  Set an eye's camera capture source
//!   paths       Print the settings and backup file paths
//! ```
//!
//! The directory can also be given through `ETVR_CONFIG_DIR`.  Log verbosity
//! is controlled by `RUST_LOG` (default `info`).

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use etvr_config::{
    inspect_file, CameraConfig, CaptureSource, ConfigPaths, EyeId, FileStatus, RootConfig,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and maintain EyeTrackVR settings files.
#[derive(Debug, Parser)]
#[command(
    name = "etvr-settings",
    about = "Inspect and maintain EyeTrackVR settings files",
    version
)]
struct Cli {
    /// Directory holding eyetrack_settings.json and its backup.
    #[arg(long, default_value = ".", env = "ETVR_CONFIG_DIR")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the effective settings (after fallback) as JSON.
    Show {
        /// Indent the output.
        #[arg(long)]
        pretty: bool,
    },
    /// Report whether the settings file and its backup are usable.
    ///
    /// Exits with status 1 if the settings file is malformed or invalid.
    Check,
    /// Replace the settings with defaults.
    Reset,
    /// Set the capture source of one eye.
    ///
    /// An integer selects a local device index, any other text is a stream
    /// URI or path, and an empty string clears the source.
    SetSource {
        #[arg(value_enum)]
        eye: Eye,
        value: String,
    },
    /// Print the settings and backup file paths.
    Paths,
}

/// Camera-backed eyes, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Eye {
    Right,
    Left,
}

/// The camera record for `eye`; every [`Eye`] names a camera.
fn camera_for(config: &mut RootConfig, eye: Eye) -> &mut CameraConfig {
    match eye {
        Eye::Right => &mut config.right_eye,
        Eye::Left => &mut config.left_eye,
    }
}

impl From<Eye> for EyeId {
    fn from(eye: Eye) -> Self {
        match eye {
            Eye::Right => EyeId::Right,
            Eye::Left => EyeId::Left,
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn show(paths: &ConfigPaths, pretty: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let outcome = RootConfig::load_from(paths).context("failed to load settings")?;
    info!(source = ?outcome.source, "loaded settings");

    let json = if pretty {
        outcome.config.to_json_pretty()?
    } else {
        outcome.config.to_json_string()?
    };
    writeln!(out, "{json}")?;
    Ok(())
}

/// Returns `true` when the primary file is usable (or absent).
fn check(paths: &ConfigPaths, out: &mut impl Write) -> anyhow::Result<bool> {
    let mut primary_ok = true;
    for (label, path, is_primary) in [
        ("settings", &paths.primary, true),
        ("backup", &paths.backup, false),
    ] {
        let status = inspect_file(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let summary = match &status {
            FileStatus::Missing => "missing".to_string(),
            FileStatus::Valid(cfg) => format!("valid (version {})", cfg.version),
            FileStatus::Malformed(e) => format!("malformed JSON: {e}"),
            FileStatus::Invalid(e) => format!("invalid: {e}"),
        };
        if is_primary && matches!(status, FileStatus::Malformed(_) | FileStatus::Invalid(_)) {
            primary_ok = false;
        }
        writeln!(out, "{label:<8} {}: {summary}", path.display())?;
    }
    Ok(primary_ok)
}

fn reset(paths: &ConfigPaths) -> anyhow::Result<()> {
    RootConfig::default()
        .save_to(paths)
        .context("failed to save default settings")?;
    info!(path = %paths.primary.display(), "settings reset to defaults");
    Ok(())
}

fn set_source(paths: &ConfigPaths, eye: Eye, value: &str) -> anyhow::Result<()> {
    let mut config = RootConfig::load(paths).context("failed to load settings")?;
    let source = CaptureSource::parse(value);
    info!(eye = %EyeId::from(eye), %source, "updating capture source");
    camera_for(&mut config, eye).capture_source = source;
    config.save_to(paths).context("failed to save settings")?;
    Ok(())
}

fn print_paths(paths: &ConfigPaths, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "settings {}", paths.primary.display())?;
    writeln!(out, "backup   {}", paths.backup.display())?;
    Ok(())
}

/// Runs one command.  Returns `false` when the process should exit non-zero.
fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<bool> {
    let paths = ConfigPaths::in_dir(&cli.dir);
    match cli.command {
        Command::Show { pretty } => show(&paths, pretty, out)?,
        Command::Check => return check(&paths, out),
        Command::Reset => reset(&paths)?,
        Command::SetSource { eye, value } => set_source(&paths, eye, &value)?,
        Command::Paths => print_paths(&paths, out)?,
    }
    Ok(true)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so `show` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let ok = run(cli, &mut stdout.lock())?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("etvr_settings_cli_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn run_in(dir: &std::path::Path, args: &[&str]) -> (bool, String) {
        let mut argv = vec!["etvr-settings", "--dir", dir.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::parse_from(argv);
        let mut out = Vec::new();
        let ok = run(cli, &mut out).expect("command must succeed");
        (ok, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cli_default_dir_is_current_directory() {
        let cli = Cli::parse_from(["etvr-settings", "paths"]);
        assert_eq!(cli.dir, PathBuf::from("."));
    }

    #[test]
    fn test_cli_parses_set_source() {
        let cli = Cli::parse_from(["etvr-settings", "set-source", "left", "http://eye:4442"]);
        match cli.command {
            Command::SetSource { eye, value } => {
                assert_eq!(eye, Eye::Left);
                assert_eq!(value, "http://eye:4442");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_non_camera_eye() {
        assert!(Cli::try_parse_from(["etvr-settings", "set-source", "both", "0"]).is_err());
    }

    #[test]
    fn test_show_without_file_prints_defaults() {
        let dir = scratch_dir();

        let (_, out) = run_in(&dir, &["show"]);

        let shown = RootConfig::from_json_str(out.trim()).unwrap();
        assert_eq!(shown, RootConfig::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_camera_for_selects_matching_eye() {
        let mut cfg = RootConfig::default();
        camera_for(&mut cfg, Eye::Left).focal_length = 12;
        camera_for(&mut cfg, Eye::Right).rotation_angle = 90;

        assert_eq!(cfg.left_eye.focal_length, 12);
        assert_eq!(cfg.right_eye.rotation_angle, 90);
        assert_eq!(cfg.right_eye.focal_length, 30);
    }

    #[test]
    fn test_set_source_persists_device_index() {
        // Arrange
        let dir = scratch_dir();

        // Act
        run_in(&dir, &["set-source", "right", "2"]);

        // Assert
        let cfg = RootConfig::load(&ConfigPaths::in_dir(&dir)).unwrap();
        assert_eq!(cfg.right_eye.capture_source, CaptureSource::DeviceIndex(2));
        assert_eq!(cfg.left_eye.capture_source, CaptureSource::Unset);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reset_backs_up_previous_file() {
        let dir = scratch_dir();
        let paths = ConfigPaths::in_dir(&dir);
        std::fs::write(&paths.primary, r#"{"settings": {"gui_threshold": 5}}"#).unwrap();

        run_in(&dir, &["reset"]);

        assert_eq!(RootConfig::load(&paths).unwrap(), RootConfig::default());
        let backup = RootConfig::from_json_str(&std::fs::read_to_string(&paths.backup).unwrap())
            .unwrap();
        assert_eq!(backup.settings.gui_threshold, 5);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_check_fails_on_malformed_primary() {
        let dir = scratch_dir();
        let paths = ConfigPaths::in_dir(&dir);
        std::fs::write(&paths.primary, "{oops").unwrap();

        let (ok, out) = run_in(&dir, &["check"]);

        assert!(!ok);
        assert!(out.contains("malformed JSON"));
        assert!(out.contains("missing"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_check_passes_on_valid_primary() {
        let dir = scratch_dir();
        RootConfig::default()
            .save_to(&ConfigPaths::in_dir(&dir))
            .unwrap();

        let (ok, out) = run_in(&dir, &["check"]);

        assert!(ok);
        assert!(out.contains("valid (version 1)"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_paths_lists_both_files() {
        let dir = scratch_dir();

        let (_, out) = run_in(&dir, &["paths"]);

        assert!(out.contains("eyetrack_settings.json"));
        assert!(out.contains("eyetrack_settings.backup"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
