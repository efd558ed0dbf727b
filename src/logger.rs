//! log4rs wiring for hosts that embed the evaluator.
//!
//! The library itself only logs through the `log` facade; nothing here runs implicitly.

use crate::errors::AggError;
use crate::utils::devlog::EVAL_TARGET;
use log::LevelFilter;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;

/// Initializes logging from `log4rs.yaml` in the working directory.
///
/// # Errors
/// Returns an error if the file is missing or invalid.
pub fn init() -> Result<(), AggError> {
    init_path(Path::new("log4rs.yaml"))
}

/// Initializes logging from a specific config file.
///
/// # Errors
/// Returns an error if the file is missing or invalid.
pub fn init_path(path: &Path) -> Result<(), AggError> {
    log4rs::init_file(path, log4rs::config::Deserializers::default())
        .map_err(|e| AggError::Config(format!("log4rs {}: {e}", path.display())))
}

#[must_use]
pub fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling(base: &Path, stem: &str, keep: u32) -> Result<RollingFileAppender, AggError> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{stem}.{{}}.log")).display()), keep)
        .map_err(|e| AggError::Config(e.to_string()))?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(base.join(format!("{stem}.log")), Box::new(policy))
        .map_err(|e| AggError::Io(e.to_string()))
}

/// Builds the rolling-file config: `agg.log` for everything, `eval.log` for evaluation traces.
///
/// # Errors
/// Returns an error if an appender cannot be created.
pub fn build_config(dir: &Path, level: LevelFilter, retention: usize) -> Result<Config, AggError> {
    let keep = u32::try_from(retention).unwrap_or(u32::MAX);
    let app = rolling(dir, "agg", keep)?;
    let eval = rolling(dir, "eval", keep)?;
    Config::builder()
        .appender(Appender::builder().build("app", Box::new(app)))
        .appender(Appender::builder().build("eval", Box::new(eval)))
        .logger(Logger::builder().appender("eval").additive(false).build(EVAL_TARGET, level))
        .build(Root::builder().appender("app").build(level))
        .map_err(|e| AggError::Config(e.to_string()))
}

/// Configure logging globally for the process.
/// - dir: base directory for logs; if None, current directory.
/// - level: off|error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
///
/// # Errors
/// Returns an error if the directory or appenders cannot be created, or a logger is
/// already installed.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
) -> Result<(), AggError> {
    let base = dir
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    std::fs::create_dir_all(&base).map_err(|e| AggError::Io(e.to_string()))?;
    let config = build_config(&base, parse_level(level), retention.unwrap_or(7))?;
    log4rs::init_config(config).map_err(|e| AggError::Config(e.to_string()))?;
    Ok(())
}

/// Configure logging from environment variables if present:
/// - NEXUS_AGG_LOG_DIR
/// - NEXUS_AGG_LOG_LEVEL
/// - NEXUS_AGG_LOG_RETENTION
///
/// # Errors
/// See `configure_logging`.
pub fn configure_from_env() -> Result<(), AggError> {
    let dir = std::env::var("NEXUS_AGG_LOG_DIR").ok().map(PathBuf::from);
    let level = std::env::var("NEXUS_AGG_LOG_LEVEL").ok();
    let retention =
        std::env::var("NEXUS_AGG_LOG_RETENTION").ok().and_then(|s| s.parse::<usize>().ok());
    configure_logging(dir.as_deref(), level.as_deref(), retention)
}
