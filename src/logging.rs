use flexi_logger::{FileSpec, FlexiLoggerError, Logger, LoggerHandle};
use std::path::PathBuf;

const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
    "debug"
} else {
    "info"
};

/// Where log records go
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum LogTarget {
    Stderr,
    File(PathBuf),
    /// Logging to the terminal would garble the full-screen UI
    Nowhere,
}

impl LogTarget {
    pub(crate) fn choose(log_file: Option<PathBuf>, interactive: bool) -> LogTarget {
        match log_file {
            Some(path) => LogTarget::File(path),
            None if interactive => LogTarget::Nowhere,
            None => LogTarget::Stderr,
        }
    }
}

/// Starts the global logger.  The level can be overridden with `RUST_LOG`.
/// Logging stops once the returned handle is dropped.
pub(crate) fn init(target: LogTarget) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;
    let logger = match target {
        LogTarget::Stderr => logger.log_to_stderr(),
        LogTarget::File(path) => logger.log_to_file(FileSpec::try_from(path)?).print_message(),
        LogTarget::Nowhere => logger.do_not_log(),
    };
    logger.start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose() {
        let path = PathBuf::from("/tmp/monthgrid.log");
        assert_eq!(
            LogTarget::choose(Some(path.clone()), true),
            LogTarget::File(path.clone())
        );
        assert_eq!(
            LogTarget::choose(Some(path.clone()), false),
            LogTarget::File(path)
        );
        assert_eq!(LogTarget::choose(None, true), LogTarget::Nowhere);
        assert_eq!(LogTarget::choose(None, false), LogTarget::Stderr);
    }
}
