//! Logging knobs for validation passes and subscriber setup for hosts.
//!
//! The library only emits `tracing` events. [`LogConfig`] decides how chatty
//! the per-attribute events are, and [`setup`] offers a ready-made
//! `tracing-subscriber` pipeline for applications that have none.

use tracing::Level;

/// Verbosity of the events emitted while validating records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Lowest level the per-attribute debug events are emitted at
    pub base_level: Level,
    /// Whether to log a summary of each restriction evaluation
    pub log_restriction_details: bool,
    /// Maximum length of raw values copied into log fields
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_restriction_details: false,
            max_field_length: 64,
        }
    }
}

impl LogConfig {
    /// Logs every decision, with long raw values.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_restriction_details: true,
            max_field_length: 256,
        }
    }

    /// Lowest overhead: warnings only.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_restriction_details: false,
            max_field_length: 32,
        }
    }
}

/// Emits a debug event only when the config's base level allows it.
#[macro_export]
macro_rules! perf_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.base_level >= tracing::Level::DEBUG {
            tracing::debug!($($arg)*);
        }
    };
}

/// Emits a debug event only when restriction details are enabled.
#[macro_export]
macro_rules! log_restriction {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_restriction_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Truncates `value` to at most `max_length` bytes on a character boundary.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let end = value
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= max_length)
        .last()
        .unwrap_or(0);
    format!("{}...(truncated)", &value[..end])
}

/// Subscriber setup for applications embedding the validator.
pub mod setup {
    use tracing::Level;

    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Level for everything outside this crate
        pub level: Level,
        /// Level for `timeliness` events
        pub timeliness_level: Level,
        /// Emit JSON lines instead of the human format
        pub json_format: bool,
        /// Full `EnvFilter` directive, overriding both levels
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                timeliness_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                timeliness_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                timeliness_level: Level::TRACE,
                json_format: false,
                env_filter: None,
            }
        }

        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        pub fn with_timeliness_level(mut self, level: Level) -> Self {
            self.timeliness_level = level;
            self
        }

        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter directive.
        pub fn env_filter(&self) -> String {
            match &self.env_filter {
                Some(filter) => filter.clone(),
                None => format!(
                    "{},timeliness={}",
                    self.level.as_str().to_lowercase(),
                    self.timeliness_level.as_str().to_lowercase()
                ),
            }
        }
    }

    /// Installs a global `tracing` subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured filter.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use timeliness::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}
