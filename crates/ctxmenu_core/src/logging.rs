//! Logging for menu replays and host applications.
//!
//! Interactive runs log to the console. Detached runs also write a daily log
//! file so a replay can be inspected afterwards. The filter is chosen from, in
//! order: the configured filter, `CTXMENU_LOG`, `RUST_LOG`, then a default that
//! names the engine's own targets. Filters that fail to parse are skipped.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter for the menu engine.
pub const LOG_ENV: &str = "CTXMENU_LOG";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    ConsoleAndFile,
}

/// Which setting supplied the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    Config,
    CtxmenuLog,
    RustLog,
    Default,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory for replay log files.
    pub log_dir: PathBuf,
    /// Prefix of the rotated file names.
    pub file_prefix: String,
    /// Stdout is a terminal.
    pub is_pty: bool,
    /// Filter taking precedence over the environment.
    pub log_filter: Option<String>,
}

impl LogConfig {
    /// Create a new logging configuration writing under `log_dir`.
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            log_dir,
            file_prefix: "ctxmenu".to_string(),
            is_pty: atty::is(atty::Stream::Stdout),
            log_filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Output used when the log directory is writable.
    pub fn output(&self) -> LogOutput {
        if self.is_pty {
            LogOutput::Console
        } else {
            LogOutput::ConsoleAndFile
        }
    }
}

/// Keeps the file writer alive. Dropping it flushes pending lines.
pub struct LoggingGuard {
    output: LogOutput,
    filter_source: FilterSource,
    _worker_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Where log lines actually go, after any fallback.
    pub fn output(&self) -> LogOutput {
        self.output
    }

    pub fn filter_source(&self) -> FilterSource {
        self.filter_source
    }
}

/// Install the global subscriber.
///
/// Falls back to the console when the log directory cannot be used.
pub fn init_logging(config: LogConfig) -> LoggingGuard {
    let (filter, filter_source) = select_filter(config.log_filter.as_deref(), |key| std::env::var(key).ok());

    if config.output() == LogOutput::Console {
        init_console(&filter);
        return LoggingGuard { output: LogOutput::Console, filter_source, _worker_guard: None };
    }

    match init_file(&config, &filter) {
        Ok(guard) => LoggingGuard { output: LogOutput::ConsoleAndFile, filter_source, _worker_guard: Some(guard) },
        Err(e) => {
            eprintln!("Warning: cannot log to {}: {}. Using console only.", config.log_dir.display(), e);
            init_console(&filter);
            LoggingGuard { output: LogOutput::Console, filter_source, _worker_guard: None }
        }
    }
}

fn init_console(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_ansi(true)
        .with_target(false)
        .init();
}

fn init_file(config: &LogConfig, filter: &str) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&config.log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.file_prefix.as_str())
        .filename_suffix("log")
        .build(&config.log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Item state dumps stay in the file
    let stdout = std::io::stdout.with_max_level(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .with_writer(stdout.and(non_blocking))
        .with_env_filter(EnvFilter::new(filter))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(guard)
}

/// Pick the first parseable filter. `lookup` reads environment variables.
pub fn select_filter(custom: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> (String, FilterSource) {
    let candidates = [
        (custom.map(str::to_string), FilterSource::Config),
        (lookup(LOG_ENV), FilterSource::CtxmenuLog),
        (lookup("RUST_LOG"), FilterSource::RustLog),
    ];

    candidates
        .into_iter()
        .find_map(|(filter, source)| {
            let filter = filter?;
            if filter.trim().is_empty() || EnvFilter::try_new(&filter).is_err() {
                return None;
            }
            Some((filter, source))
        })
        .unwrap_or_else(|| (default_log_filter().to_string(), FilterSource::Default))
}

/// Default filter by build type.
///
/// Debug builds trace gesture and fade bookkeeping. Release builds keep the
/// engine at `info` and adapters at `warn`.
pub fn default_log_filter() -> &'static str {
    #[cfg(debug_assertions)]
    {
        "info,ctxmenu=debug,ctxmenu_core::menu=debug,ctxmenu_core::trigger=trace,ctxmenu_core::fade=trace,ctxmenu_core::models=debug,ctxmenu_ui=debug"
    }
    #[cfg(not(debug_assertions))]
    {
        "warn,ctxmenu=info,ctxmenu_core::menu=info,ctxmenu_ui=warn"
    }
}

/// Default log directory.
///
/// Debug builds log next to the working directory.
pub fn log_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from("./ctxmenu_data/logs")
    }

    #[cfg(not(debug_assertions))]
    {
        dirs::data_dir()
            .map(|d| d.join("ctxmenu"))
            .unwrap_or_else(|| PathBuf::from("./ctxmenu_data"))
            .join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_ctxmenu_log_beats_rust_log() {
        let (filter, source) = select_filter(None, env(&[(LOG_ENV, "ctxmenu_core=trace"), ("RUST_LOG", "warn")]));
        assert_eq!(filter, "ctxmenu_core=trace");
        assert_eq!(source, FilterSource::CtxmenuLog);
    }

    #[test]
    fn test_configured_filter_beats_environment() {
        let (filter, source) = select_filter(Some("error"), env(&[(LOG_ENV, "trace")]));
        assert_eq!(filter, "error");
        assert_eq!(source, FilterSource::Config);
    }

    #[test]
    fn test_unparseable_filter_is_skipped() {
        let (filter, source) = select_filter(None, env(&[(LOG_ENV, "ctxmenu=loud"), ("RUST_LOG", "info")]));
        assert_eq!(filter, "info");
        assert_eq!(source, FilterSource::RustLog);

        let (filter, source) = select_filter(None, env(&[(LOG_ENV, "  ")]));
        assert_eq!(filter, default_log_filter());
        assert_eq!(source, FilterSource::Default);
    }

    #[test]
    fn test_default_filter_names_engine_targets() {
        let filter = default_log_filter();
        assert!(filter.contains("ctxmenu_core::menu"));
        assert!(filter.contains("ctxmenu_ui"));
        assert!(EnvFilter::try_new(filter).is_ok());
    }

    #[test]
    fn test_output_follows_terminal() {
        let mut config = LogConfig::new(PathBuf::from("/tmp/logs")).with_file_prefix("replay");
        config.is_pty = true;
        assert_eq!(config.output(), LogOutput::Console);
        config.is_pty = false;
        assert_eq!(config.output(), LogOutput::ConsoleAndFile);
        assert_eq!(config.file_prefix, "replay");
    }
}
