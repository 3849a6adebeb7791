//! A minimal, zero-dependency logging crate for the plinth foundation layer.
//!
//! Containers and the text engine report growth, rehashing and contract
//! violations through these macros. Output goes to stderr, prefixed with the
//! level and the module path of the call site.
//!
//! The minimum level defaults to [`Level::Info`]. It can be changed in code
//! with [`set_level`] or taken from the `PLINTH_LOG` environment variable with
//! [`init_from_env`].
//!
//! # Example
//!
//! ```
//! use plinth_log::{debug, info, warn, Level};
//!
//! plinth_log::set_level(Level::Debug);
//!
//! let buckets = 16;
//! info!("rehashed into {} buckets", buckets);
//! debug!("slots: {:?}", vec![0, 1, 2]);
//! warn!("pool is getting large");
//! ```

use std::fmt::{self, Arguments};
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable read by [`init_from_env`].
pub const ENV_VAR: &str = "PLINTH_LOG";

/// Log levels, ordered from most severe (`Error`) to least severe (`Trace`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Contract violations and unrecoverable failures.
    Error = 0,
    /// Suspicious but recoverable situations.
    Warn = 1,
    /// Coarse lifecycle events.
    Info = 2,
    /// Container maintenance such as rehashing.
    Debug = 3,
    /// Per-operation detail such as reallocations.
    Trace = 4,
}

impl Level {
    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Returns the upper-case name of this level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid log level: {}", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses a level name, ignoring ASCII case.
    ///
    /// ```
    /// use plinth_log::Level;
    ///
    /// assert_eq!("error".parse::<Level>(), Ok(Level::Error));
    /// assert_eq!("INFO".parse::<Level>(), Ok(Level::Info));
    /// assert!("verbose".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// The global logger.
///
/// Only holds the minimum level; the level is read with a relaxed load on
/// every macro invocation so disabled levels cost one atomic read.
pub struct Logger {
    level: AtomicU8,
}

impl Logger {
    const fn new(level: Level) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
        }
    }

    /// Sets the minimum level.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current minimum level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Whether a message at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, initializing it at [`Level::Info`].
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Info))
}

/// Sets the minimum level of the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the minimum level from a level name.
///
/// # Errors
///
/// Returns [`ParseLevelError`] when `s` is not a level name; the current
/// level is left unchanged.
pub fn set_level_from_str(s: &str) -> Result<(), ParseLevelError> {
    set_level(s.parse()?);
    Ok(())
}

/// Configures the global logger from the `PLINTH_LOG` environment variable.
///
/// Returns the level in effect afterwards. An unset variable keeps the
/// current level; an unparsable one is reported at warn level and ignored.
pub fn init_from_env() -> Level {
    if let Ok(value) = std::env::var(ENV_VAR) {
        if let Err(err) = set_level_from_str(&value) {
            crate::warn!("{ENV_VAR}: {err}");
        }
    }
    get_logger().level()
}

#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments) {
    const RESET: &str = "\x1b[0m";

    if !get_logger().enabled(level) {
        return;
    }

    let color = level.color_code();
    eprintln!("{color}[{level}]{RESET} {target}: {args}");
}

/// Logs a message at an explicit level, capturing the caller's module path.
///
/// ```
/// use plinth_log::{log, Level};
///
/// log!(level: Level::Info, "reserved {} slots", 64);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    module_path!(),
                    format_args!($($arg)*)
                );
            }
        }
    };
}

/// Logs at [`Level::Error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs at [`Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs at [`Level::Info`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs at [`Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs at [`Level::Trace`].
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}
