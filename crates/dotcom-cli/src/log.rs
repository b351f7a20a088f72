use std::fmt;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Verbosity of the `dotcom` crates. Other crates stay silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> String {
        format!("dotcom={self},dotcom_client={self}")
    }

    fn env_filter(self) -> EnvFilter {
        EnvFilter::new(self.directive())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.to_possible_value().ok_or(fmt::Error)?;
        f.write_str(value.get_name())
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogStyle {
    /// Standard text
    #[default]
    Text,
    /// JSON objects
    Json,
}

/// Installs the global subscriber. Logs go to stderr so stdout stays parseable.
pub(crate) fn init(level: LogLevel, style: LogStyle) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(level.env_filter())
        .with_writer(std::io::stderr);

    match style {
        LogStyle::Text => builder.init(),
        LogStyle::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_both_crates() {
        assert_eq!(LogLevel::Info.directive(), "dotcom=info,dotcom_client=info");
        assert_eq!(LogLevel::Off.directive(), "dotcom=off,dotcom_client=off");
    }

    #[test]
    fn level_names_are_lowercase() {
        let names: Vec<_> = LogLevel::value_variants().iter().map(ToString::to_string).collect();
        assert_eq!(names, ["off", "error", "warn", "info", "debug", "trace"]);
    }
}
