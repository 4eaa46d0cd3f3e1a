//! Side-effect capabilities injected into the pipeline: hard navigation and
//! user-visible notifications. Production code uses the console
//! implementations; tests substitute recording fakes.

use parking_lot::Mutex;
use std::io::{self, Write};
use tracing::{debug, info};

/// Full top-level navigation that bypasses the guarded router.
pub trait Navigator: Send + Sync {
    fn force_to(&self, path: &str);
}

/// Single channel for user-visible failure messages.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Records the forced destination so the caller can act on it once the
/// current command unwinds.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    location: Mutex<Option<String>>,
}

impl ConsoleNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last destination forced by the pipeline, if any.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        self.location.lock().clone()
    }
}

impl Navigator for ConsoleNavigator {
    fn force_to(&self, path: &str) {
        info!(path, "forcing navigation");
        *self.location.lock() = Some(path.to_string());
    }
}

/// Writes one `error: <message>` line per notification, to stderr by default.
pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }

    #[must_use]
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn error(&self, message: &str) {
        let mut out = self.out.lock();
        if let Err(err) = writeln!(out, "error: {message}").and_then(|()| out.flush()) {
            debug!("failed to write notification: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn console_notifier_writes_each_message_once() {
        let buffer = Buffer::default();
        let notifier = ConsoleNotifier::with_writer(buffer.clone());
        notifier.error("Session expired, please log in again");
        notifier.error("bad");

        let written = String::from_utf8(buffer.0.lock().clone()).unwrap_or_default();
        assert_eq!(
            written,
            "error: Session expired, please log in again\nerror: bad\n"
        );
    }

    #[test]
    fn console_navigator_keeps_last_destination() {
        let navigator = ConsoleNavigator::new();
        assert_eq!(navigator.location(), None);
        navigator.force_to("/login");
        assert_eq!(navigator.location().as_deref(), Some("/login"));
    }
}
