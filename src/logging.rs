//! One-shot `env_logger` installation for hosts that want decoder diagnostics.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Once;

use log::LevelFilter;

use crate::error::BundleError;

static INIT_LOGGER: Once = Once::new();

/// Installs a process-wide logger printing `[LEVEL] message` lines at `Info`
/// and above, to stderr or appended to `log_file`.
///
/// Only the first call installs anything; later calls are no-ops, and so is the
/// first call if another logger is already registered.
///
/// # Errors
/// Returns `BundleError::Io` if `log_file` cannot be opened for appending.
pub fn enable_verbose_logging(log_file: Option<PathBuf>) -> Result<(), BundleError> {
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);

        builder.format(|buf, record| {
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unopenable_log_file_is_an_io_error() {
        let path = std::env::temp_dir()
            .join("npz_bundle_missing_dir")
            .join("nested")
            .join("decoder.log");
        assert!(matches!(
            enable_verbose_logging(Some(path)),
            Err(BundleError::Io(_))
        ));
    }

    #[test]
    fn test_repeated_enable_is_harmless() {
        assert!(enable_verbose_logging(None).is_ok());
        assert!(enable_verbose_logging(None).is_ok());
    }
}
