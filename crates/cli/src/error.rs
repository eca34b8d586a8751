//! CLI error types.

use std::fmt;

use error_stack::Report;
use trusted_server_vast::VastError;

#[derive(Debug)]
pub enum CliError {
    /// Settings file error
    Config(String),
    /// Input could not be accepted
    Input(String),
    /// Decoding error from the codec
    Vast(String),
    /// IO error
    Io(std::io::Error),
    /// JSON parsing or serialization error
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Input(msg) => write!(f, "Input error: {}", msg),
            CliError::Vast(msg) => write!(f, "VAST error: {}", msg),
            CliError::Io(err) => write!(f, "IO error: {}", err),
            CliError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(err) => Some(err),
            CliError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err)
    }
}

impl From<Report<VastError>> for CliError {
    fn from(report: Report<VastError>) -> Self {
        log::debug!("{report:?}");
        match report.current_context() {
            VastError::Configuration { .. } => CliError::Config(report.to_string()),
            _ => CliError::Vast(report.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_cli_error_display() {
        assert_eq!(
            format!("{}", CliError::Config("test".into())),
            "Configuration error: test"
        );
        assert_eq!(
            format!("{}", CliError::Input("test".into())),
            "Input error: test"
        );
        assert_eq!(
            format!("{}", CliError::Vast("test".into())),
            "VAST error: test"
        );
    }

    #[test]
    fn test_cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io(_)));
        assert!(cli_err.source().is_some());
    }

    #[test]
    fn test_cli_error_from_report() {
        let report = Report::new(VastError::MalformedAttribute {
            name: "fallback_index".into(),
            value: "abc".into(),
        });
        let cli_err: CliError = report.into();
        assert!(matches!(cli_err, CliError::Vast(_)));
        assert!(cli_err.source().is_none());
        assert!(cli_err.to_string().contains("fallback_index"));

        let report = Report::new(VastError::Configuration {
            message: "bad".into(),
        });
        assert!(matches!(CliError::from(report), CliError::Config(_)));
    }
}
