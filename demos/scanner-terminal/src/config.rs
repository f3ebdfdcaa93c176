use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use thiserror::Error;

use emotion_scanner_core::{FacingMode, ScannerConfig};

/// Terminal host for the emotion scanner.
///
/// Every flag can also be set through its `SCANNER_*` environment variable.
/// Scanner settings start from the optional TOML file; flags override it.
#[derive(Debug, Parser)]
#[command(name = "scanner-terminal", version)]
pub struct Cli {
    /// TOML file with scanner settings.
    #[arg(long, env = "SCANNER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Open this camera index instead of choosing by facing mode.
    #[arg(long, env = "SCANNER_DEVICE_INDEX")]
    pub device_index: Option<u32>,

    #[arg(long, env = "SCANNER_FACING", value_enum)]
    pub facing: Option<Facing>,

    /// Requested capture width in pixels.
    #[arg(long, env = "SCANNER_WIDTH", requires = "height",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Requested capture height in pixels.
    #[arg(long, env = "SCANNER_HEIGHT", requires = "width",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Simulated display refresh rate; one tick per refresh.
    #[arg(long, env = "SCANNER_REFRESH_HZ", default_value_t = 60.0,
          value_parser = parse_refresh_hz)]
    pub refresh_hz: f64,

    /// Print the projection every N refreshes while scanning.
    #[arg(long, env = "SCANNER_PRINT_EVERY", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub print_every: u64,

    /// Also print every single result.
    #[arg(long, env = "SCANNER_VERBOSE",
          value_parser = clap::builder::FalseyValueParser::new())]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Facing {
    User,
    Environment,
}

impl From<Facing> for FacingMode {
    fn from(facing: Facing) -> Self {
        match facing {
            Facing::User => FacingMode::User,
            Facing::Environment => FacingMode::Environment,
        }
    }
}

fn parse_refresh_hz(raw: &str) -> Result<f64, String> {
    let hz: f64 = raw.parse().map_err(|e| format!("{}: {}", raw, e))?;
    if hz > 0.0 && hz.is_finite() {
        Ok(hz)
    } else {
        Err(format!("refresh rate must be positive, got {}", raw))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid scanner configuration: {0}")]
    Invalid(String),
}

/// Resolved host settings.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    pub refresh_hz: f64,
    pub print_every: u64,
    pub verbose_results: bool,
    pub scanner: ScannerConfig,
}

impl TerminalConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let mut scanner = match cli.config {
            Some(ref path) => load_scanner_config(path)?,
            None => ScannerConfig::default(),
        };

        if let Some(index) = cli.device_index {
            scanner.device_index = Some(index);
        }
        if let Some(facing) = cli.facing {
            scanner.facing_mode = facing.into();
        }
        if let (Some(width), Some(height)) = (cli.width, cli.height) {
            scanner.resolution = Some((width, height));
        }
        scanner.validate().map_err(ConfigError::Invalid)?;

        Ok(Self {
            refresh_hz: cli.refresh_hz,
            print_every: cli.print_every,
            verbose_results: cli.verbose,
            scanner,
        })
    }
}

pub fn load_scanner_config(path: &Path) -> Result<ScannerConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("scanner-terminal").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_flags() {
        let c = TerminalConfig::from_cli(parse(&[]).unwrap()).unwrap();
        assert_eq!(c.refresh_hz, 60.0);
        assert_eq!(c.print_every, 30);
        assert!(!c.verbose_results);
        assert_eq!(c.scanner, ScannerConfig::default());
    }

    #[test]
    fn flags_override_scanner_settings() {
        let cli = parse(&[
            "--device-index",
            "2",
            "--facing",
            "environment",
            "--width",
            "640",
            "--height",
            "480",
            "--refresh-hz",
            "30",
        ])
        .unwrap();
        let c = TerminalConfig::from_cli(cli).unwrap();
        assert_eq!(c.scanner.device_index, Some(2));
        assert_eq!(c.scanner.facing_mode, FacingMode::Environment);
        assert_eq!(c.scanner.resolution, Some((640, 480)));
        assert_eq!(c.refresh_hz, 30.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse(&["--refresh-hz=-5"]).is_err());
        assert!(parse(&["--device-index", "front"]).is_err());
        assert!(parse(&["--width", "abc", "--height", "480"]).is_err());
        assert!(parse(&["--width", "0", "--height", "480"]).is_err());
        assert!(parse(&["--print-every", "0"]).is_err());
    }

    #[test]
    fn width_requires_height() {
        assert!(parse(&["--width", "640"]).is_err());
    }

    #[test]
    fn scanner_settings_from_toml() {
        let scanner: ScannerConfig = toml::from_str(
            r#"
            facing_mode = "environment"
            resolution = [320, 240]
            acquisition_error_message = "Camera blocked."
            "#,
        )
        .unwrap();
        assert_eq!(scanner.facing_mode, FacingMode::Environment);
        assert_eq!(scanner.resolution, Some((320, 240)));
        assert_eq!(scanner.acquisition_error_message, "Camera blocked.");
        assert_eq!(scanner.device_index, None);
    }

    #[test]
    fn flags_layer_over_file() {
        let path = std::env::temp_dir().join(format!(
            "scanner-terminal-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "device_index = 1\nfacing_mode = \"environment\"\n").unwrap();

        let cli = parse(&["--config", path.to_str().unwrap(), "--device-index", "3"]).unwrap();
        let c = TerminalConfig::from_cli(cli).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(c.scanner.device_index, Some(3));
        assert_eq!(c.scanner.facing_mode, FacingMode::Environment);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let cli = parse(&["--config", "/nonexistent/scanner.toml"]).unwrap();
        assert!(matches!(
            TerminalConfig::from_cli(cli),
            Err(ConfigError::Read { .. })
        ));
    }
}
