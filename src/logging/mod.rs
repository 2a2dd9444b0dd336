//! Multi-channel run logging.
//!
//! Each developer gets six file-backed channels (app, results,
//! visualizations, optimization, errors, debug), created once per process
//! through a [`LoggerRegistry`] and reused on every subsequent lookup.
//! Records are plain `key: value | key: value` text by design; this module
//! does not produce machine-parseable output.

mod channel;
mod registry;

pub use channel::Channel;
pub use registry::{DeveloperChannels, LoggerRegistry};

use strum::{Display, EnumIter, EnumString};

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Names of the per-developer log channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ChannelName {
    App,
    Results,
    Visualizations,
    Optimization,
    Errors,
    Debug,
}

impl ChannelName {
    /// Minimum severity this channel persists
    pub fn floor(self) -> Severity {
        match self {
            ChannelName::App | ChannelName::Debug => Severity::Debug,
            ChannelName::Results | ChannelName::Visualizations | ChannelName::Optimization => {
                Severity::Info
            }
            ChannelName::Errors => Severity::Warning,
        }
    }

    /// Whether the channel mirrors Warning+ records to the console stream
    pub fn console_echo(self) -> bool {
        matches!(self, ChannelName::App)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_channel_floors() {
        assert_eq!(ChannelName::App.floor(), Severity::Debug);
        assert_eq!(ChannelName::Results.floor(), Severity::Info);
        assert_eq!(ChannelName::Visualizations.floor(), Severity::Info);
        assert_eq!(ChannelName::Optimization.floor(), Severity::Info);
        assert_eq!(ChannelName::Errors.floor(), Severity::Warning);
        assert_eq!(ChannelName::Debug.floor(), Severity::Debug);
    }

    #[test]
    fn test_only_app_echoes_to_console() {
        assert!(ChannelName::App.console_echo());
        assert!(!ChannelName::Results.console_echo());
        assert!(!ChannelName::Errors.console_echo());
    }

    #[test]
    fn test_channel_name_parsing() {
        assert_eq!(ChannelName::from_str("results").unwrap(), ChannelName::Results);
        assert_eq!(ChannelName::Optimization.to_string(), "optimization");
        assert!(ChannelName::from_str("metrics").is_err());
    }
}
