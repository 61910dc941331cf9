//! Routes records from the [`log`](::log) facade into the default manager, so
//! dependencies that log through `log::info!` and friends end up in the same
//! handlers as the rest of the process.
//!
//! The threshold stays with the manager; the facade's max level is opened
//! fully and every record is gated by [`LogMgr::is_enabled`](super::logmgr::LogMgr::is_enabled).

use super::callsite::Callsite;
use super::error::LogError;
use super::level::Level;
use super::logmgr::{default_mgr, with_default};

struct Bridge;

static BRIDGE: Bridge = Bridge;

impl From<::log::Level> for Level {
    fn from(level: ::log::Level) -> Self {
        match level {
            ::log::Level::Error => Level::Error,
            ::log::Level::Warn => Level::Warn,
            ::log::Level::Info => Level::Info,
            ::log::Level::Debug => Level::Debug,
            ::log::Level::Trace => Level::Trace,
        }
    }
}

impl ::log::Log for Bridge {
    fn enabled(&self, metadata: &::log::Metadata<'_>) -> bool {
        with_default(|mgr| mgr.is_enabled(metadata.level().into()))
    }

    fn log(&self, record: &::log::Record<'_>) {
        let callsite = match (record.file(), record.line()) {
            (Some(file), Some(line)) => Callsite::new(file.to_string(), line),
            _ => Callsite::unknown(),
        };
        // Arguments are already bound; there are no placeholders left to fill.
        let message = record.args().to_string();
        // No `with_default` closure here: its shim frame would end the skipped machinery run.
        default_mgr().dispatch(record.level().into(), callsite, &message, &[]);
    }

    fn flush(&self) {}
}

/// # Init Log Bridge
///
/// Installs the bridge as the process's `log` facade logger.
///
/// # Errors
/// [`LogError::BridgeInstalled`] when some logger, this one included, was
/// installed before.
pub fn init_log_bridge() -> Result<(), LogError> {
    ::log::set_logger(&BRIDGE).map_err(|_| LogError::BridgeInstalled)?;
    ::log::set_max_level(::log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loggers::logmgr::log;
    use crate::loggers::test_support::Capture;

    #[test]
    fn maps_facade_levels() {
        assert_eq!(Level::from(::log::Level::Error), Level::Error);
        assert_eq!(Level::from(::log::Level::Warn), Level::Warn);
        assert_eq!(Level::from(::log::Level::Trace), Level::Trace);
    }

    #[test]
    fn facade_records_reach_handlers_once_installed() {
        let (capture, seen) = Capture::new("test-log-bridge");
        log().add_handler(Box::new(capture));

        // Other tests may race to install; only the first call succeeds.
        let _ = init_log_bridge();
        assert!(matches!(init_log_bridge(), Err(LogError::BridgeInstalled)));

        let expected_site = format!("bridge.rs:{} : ", line!() + 1);
        ::log::info!("bridge marker {}", 5);
        // Dropped by the default `Info` threshold.
        ::log::warn!("bridge marker hidden");

        let seen = seen.lock().unwrap();
        let mine: Vec<_> = seen.iter().filter(|c| c.line.contains("bridge marker")).collect();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].level, Level::Info);
        assert!(mine[0].line.contains(&expected_site), "{}", mine[0].line);
        assert!(mine[0].line.ends_with("bridge marker 5"));
    }
}
