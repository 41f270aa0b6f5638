//! Log setup shared by the binaries.

use clap::ValueEnum;
use log::LevelFilter;

/// Verbosity as accepted on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    /// Everything, including per-frame chatter.
    Lowdebug,
    #[default]
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Lowdebug => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error | LogLevel::Critical => LevelFilter::Error,
        }
    }
}

/// Initialize `env_logger`. `RUST_LOG` takes precedence over `level`;
/// `detail` adds the log target to every line.
pub fn init_logging(level: LogLevel, detail: bool) {
    let res = env_logger::Builder::new()
        .filter_level(level.level_filter())
        .format_target(detail)
        .parse_default_env()
        .try_init();
    if let Err(err) = res {
        log::warn!("logger already initialized: {err}");
    }
}
