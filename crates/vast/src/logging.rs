//! Logger installation for binaries.

use error_stack::Report;
use log::LevelFilter;

use crate::error::VastError;

/// Installs the global logger, writing timestamped lines to stderr.
///
/// Should be called once at the start of `main()`.
///
/// # Errors
///
/// Returns [`VastError::Configuration`] if a logger is already installed.
pub fn init_logger(level: LevelFilter) -> Result<(), Report<VastError>> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}  {} {}",
                chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .map_err(|e| {
            Report::new(VastError::Configuration {
                message: format!("failed to initialize logger: {e}"),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_only_once() {
        let _ = init_logger(LevelFilter::Debug);
        let err = init_logger(LevelFilter::Debug).unwrap_err();
        assert!(matches!(
            err.current_context(),
            VastError::Configuration { .. }
        ));
        log::debug!("logger installed");
    }
}
