// Logging for the cacti runtime
//
// The runtime emits structured `tracing` events: system lifecycle at INFO,
// worker and spawn activity at DEBUG, per-step scheduling at TRACE, and
// fatal conditions at ERROR right before the process exits. Nothing is
// printed unless the application installs a subscriber, which the helpers
// below do.
//
// ```rust
// use cacti::logging;
//
// // INFO level, human-readable console output
// logging::init_default();
//
// // Or pick the settings explicitly
// let config = logging::LogConfig {
//     level: tracing::Level::DEBUG,
//     ..Default::default()
// };
// logging::init(config);
// ```
//
// `RUST_LOG` is honoured on top of the configured level, e.g.
// `RUST_LOG=cacti::thread::scheduler=trace`.
//
// Console output goes to stderr by default, so program output on stdout
// stays clean.

use std::fs::OpenOptions;
use std::io;
use std::sync::Once;

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, registry::LookupSpan, EnvFilter, Layer};

/// Stream the console layer writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
}

impl LogOutput {
    fn make_writer(self) -> BoxMakeWriter {
        match self {
            LogOutput::Stdout => BoxMakeWriter::new(io::stdout),
            LogOutput::Stderr => BoxMakeWriter::new(io::stderr),
        }
    }

    fn is_tty(self) -> bool {
        match self {
            LogOutput::Stdout => atty::is(atty::Stream::Stdout),
            LogOutput::Stderr => atty::is(atty::Stream::Stderr),
        }
    }
}

/// Configuration for the cacti logging setup.
///
/// ```rust
/// use cacti::logging::{LogConfig, LogOutput};
/// use tracing::Level;
///
/// let config = LogConfig {
///     level: Level::DEBUG,
///     output: LogOutput::Stderr,
///     json_format: false,
///     show_file_line: true,
///     show_thread_info: true,
///     show_time: false,
///     target_filters: Some("cacti::thread::system=trace".to_string()),
/// };
/// assert!(config.target_filters.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: Level,
    pub output: LogOutput,
    /// Emit one JSON object per event
    pub json_format: bool,
    /// Include file and line of the event
    pub show_file_line: bool,
    /// Include thread name and id; worker threads are named after the pool
    pub show_thread_info: bool,
    pub show_time: bool,
    /// Extra directives, "target=level,target2=level2"
    pub target_filters: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            output: LogOutput::default(),
            json_format: false,
            show_file_line: true,
            show_thread_info: true,
            show_time: true,
            target_filters: None,
        }
    }
}

static INIT: Once = Once::new();

fn env_filter(config: &LogConfig) -> EnvFilter {
    let mut filter = EnvFilter::from_default_env().add_directive(config.level.into());
    if let Some(filters) = &config.target_filters {
        for directive in filters.split(',').filter(|d| !d.trim().is_empty()) {
            match directive.trim().parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => eprintln!("Ignoring log directive {:?}: {}", directive, err),
            }
        }
    }
    filter
}

fn console_layer<S>(config: &LogConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if config.json_format {
        return fmt::layer()
            .with_writer(config.output.make_writer())
            .json()
            .flatten_event(true)
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .with_thread_names(config.show_thread_info)
            .with_thread_ids(config.show_thread_info)
            .boxed();
    }

    let layer = fmt::layer()
        .with_writer(config.output.make_writer())
        .with_ansi(config.output.is_tty())
        .with_file(config.show_file_line)
        .with_line_number(config.show_file_line)
        .with_thread_names(config.show_thread_info)
        .with_thread_ids(config.show_thread_info);
    if config.show_time {
        layer.boxed()
    } else {
        layer.without_time().boxed()
    }
}

fn set_global_subscriber<S>(subscriber: S)
where
    S: Subscriber + Send + Sync + 'static,
{
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error setting global tracing subscriber: {}", err);
    }
}

/// Install the global subscriber. Only the first call in a process (of this
/// or any other `init*` function) takes effect.
pub fn init(config: LogConfig) {
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::registry()
            .with(env_filter(&config))
            .with(console_layer(&config));
        set_global_subscriber(subscriber);
    });
}

/// Open `path` for appending, creating it if needed.
pub fn file_writer(path: &str) -> io::Result<Box<dyn io::Write + Send + Sync + 'static>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Box::new(file))
}

/// Like [`init`], additionally writing plain-text events to `log_file`.
///
/// Fails if the file cannot be opened; the subscriber is then left
/// uninstalled.
pub fn init_with_file(config: LogConfig, log_file: &str) -> io::Result<()> {
    // Open once up front so an unusable path is reported to the caller.
    file_writer(log_file)?;

    INIT.call_once(|| {
        let log_file_path = log_file.to_string();
        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(move || match file_writer(&log_file_path) {
                Ok(writer) => writer,
                Err(_) => Box::new(io::stderr()),
            })
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true)
            .with_thread_ids(true);

        let subscriber = tracing_subscriber::registry()
            .with(env_filter(&config))
            .with(console_layer(&config))
            .with(file_layer);
        set_global_subscriber(subscriber);
    });
    Ok(())
}

/// INFO level, human-readable console output.
pub fn init_default() {
    init(LogConfig::default());
}

/// DEBUG for the whole crate, TRACE for the scheduler internals.
pub fn init_development() {
    init(LogConfig {
        level: Level::DEBUG,
        target_filters: Some("cacti=debug,cacti::thread=trace".to_string()),
        ..LogConfig::default()
    });
}

/// JSON lines at INFO, without source locations.
pub fn init_production() {
    init(LogConfig {
        level: Level::INFO,
        output: LogOutput::Stderr,
        json_format: true,
        show_file_line: false,
        show_thread_info: true,
        show_time: true,
        target_filters: None,
    });
}

/// WARN and above, compact, for test binaries.
pub fn init_test() {
    init(LogConfig {
        level: Level::WARN,
        output: LogOutput::Stderr,
        json_format: false,
        show_file_line: true,
        show_thread_info: false,
        show_time: false,
        target_filters: None,
    });
}

pub use tracing::{debug, error, info, trace, warn};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_skips_bad_directives() {
        let config = LogConfig {
            target_filters: Some("cacti=debug,,not a directive=".to_string()),
            ..LogConfig::default()
        };
        let filter = env_filter(&config);
        assert!(filter.to_string().contains("cacti=debug"));
    }

    #[test]
    fn test_console_output_defaults_to_stderr() {
        assert_eq!(LogConfig::default().output, LogOutput::Stderr);
    }

    #[test]
    fn test_console_layer_builds_for_each_output() {
        for output in [LogOutput::Stdout, LogOutput::Stderr] {
            for json_format in [false, true] {
                let config = LogConfig {
                    output,
                    json_format,
                    show_time: false,
                    ..LogConfig::default()
                };
                let subscriber = tracing_subscriber::registry().with(console_layer(&config));
                tracing::subscriber::with_default(subscriber, || {
                    tracing::debug!(?output, json_format, "console layer check");
                });
            }
        }
    }

    #[test]
    fn test_init_with_file_reports_bad_path() {
        let result = init_with_file(LogConfig::default(), "/nonexistent-dir/cacti/run.log");
        assert!(result.is_err());
    }
}
