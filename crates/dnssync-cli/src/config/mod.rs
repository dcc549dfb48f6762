//! Configuration management.
//!
//! Settings come from an optional TOML file, overridden by command-line
//! flags. Everything ends up in an immutable [`Settings`] value built once
//! per run.

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use dnssync_core::{DisplayMode, Range, SerialArithmetic, Thresholds};
use dnssync_probe::{ProbeOptions, QueryMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::args::Cli;
use crate::output::OutputFormat;

/// Query backend
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Run the dig tool and parse its answers
    #[default]
    Dig,
    /// Query nameservers directly
    Resolver,
}

/// File configuration; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Query backend
    pub backend: Option<Backend>,

    /// Path to the dig executable
    pub dig: Option<PathBuf>,

    /// Per-query timeout in seconds
    pub timeout: Option<u64>,

    /// Whole-probe timeout in seconds
    pub probe_timeout: Option<u64>,

    /// Maximum queries in flight
    pub concurrency: Option<usize>,

    /// DNS port for the resolver backend
    pub port: Option<u16>,

    /// Warning range
    pub warning: Option<Range>,

    /// Critical range
    pub critical: Option<Range>,

    /// Serial comparison mode
    pub serial_arithmetic: Option<SerialArithmetic>,

    /// Default output format
    pub output: Option<OutputFormat>,
}

impl Config {
    /// Default config file path.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "dnssync", "check_dns_sync")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}

/// Everything one run needs, resolved from flags, file and defaults
#[derive(Debug, Clone)]
pub struct Settings {
    /// Zone under test
    pub zone: String,

    /// Which servers to ask
    pub mode: QueryMode,

    /// Query backend
    pub backend: Backend,

    /// dig executable
    pub dig: PathBuf,

    /// DNS port for the resolver backend
    pub port: u16,

    /// Timeouts and fan-out
    pub probe: ProbeOptions,

    /// Lag thresholds
    pub thresholds: Thresholds,

    /// Serial comparison mode
    pub arithmetic: SerialArithmetic,

    /// Summary rendering
    pub display: DisplayMode,

    /// Output format
    pub output: OutputFormat,

    /// Verbosity, 0 to 3
    pub verbosity: u8,
}

impl Settings {
    /// Merge command-line flags over file configuration.
    pub fn resolve(cli: &Cli, config: Config) -> Self {
        let defaults = ProbeOptions::default();
        let seconds = |flag: Option<u64>, file: Option<u64>, default: Duration| {
            flag.or(file).map_or(default, Duration::from_secs)
        };

        let mode = if cli.from_authority() {
            QueryMode::Authority
        } else {
            QueryMode::Explicit(cli.nameservers.clone())
        };

        let default_thresholds = Thresholds::default();
        let thresholds = Thresholds {
            warning: cli.warning.or(config.warning),
            critical: cli
                .critical
                .or(config.critical)
                .or(default_thresholds.critical),
        };

        Self {
            zone: cli.zone.clone(),
            mode,
            backend: cli.backend.or(config.backend).unwrap_or_default(),
            dig: cli
                .dig
                .clone()
                .or(config.dig)
                .unwrap_or_else(|| PathBuf::from(dnssync_probe::dig::DEFAULT_DIG)),
            port: cli.port.or(config.port).unwrap_or(53),
            probe: ProbeOptions {
                query_timeout: seconds(cli.timeout, config.timeout, defaults.query_timeout),
                probe_timeout: seconds(
                    cli.probe_timeout,
                    config.probe_timeout,
                    defaults.probe_timeout,
                ),
                concurrency: cli
                    .concurrency
                    .or(config.concurrency)
                    .unwrap_or(defaults.concurrency),
            },
            thresholds,
            arithmetic: cli
                .serial_arithmetic
                .or(config.serial_arithmetic)
                .unwrap_or_default(),
            display: if cli.metric {
                DisplayMode::Metric
            } else {
                DisplayMode::Aggregate
            },
            output: cli.output.or(config.output).unwrap_or_default(),
            verbosity: cli.verbosity(),
        }
    }
}
