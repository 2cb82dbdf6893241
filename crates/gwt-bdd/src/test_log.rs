//! Capturing `log` backend for unit tests.
//!
//! The logger is installed once per process, but records are kept per
//! thread, so each test only sees what its own thread logged.

use std::cell::RefCell;
use std::sync::Once;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CapturedRecord {
    pub(crate) level: log::Level,
    pub(crate) target: String,
    pub(crate) message: String,
}

struct CapturingLogger;

impl log::Log for CapturingLogger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let captured = CapturedRecord {
            level: record.level(),
            target: record.target().to_owned(),
            message: record.args().to_string(),
        };
        CAPTURED.with(|records| records.borrow_mut().push(captured));
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static INIT_LOGGER: Once = Once::new();

thread_local! {
    static CAPTURED: RefCell<Vec<CapturedRecord>> = const { RefCell::new(Vec::new()) };
}

/// Install the logger and discard anything this thread logged before.
pub(crate) fn install() {
    INIT_LOGGER.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Debug);
    });
    CAPTURED.with(|records| records.borrow_mut().clear());
}

/// Remove and return the records logged on this thread.
pub(crate) fn take() -> Vec<CapturedRecord> {
    CAPTURED.with(|records| records.borrow_mut().drain(..).collect())
}
