use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use super::error::LogError;
use super::level::Level;
use super::loghandle::LogHandler;
use super::logrecord::Logrecord;

/// In-memory writer whose clones share one buffer.
#[derive(Clone, Default)]
pub(crate) struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// What a [`Capture`] saw for one record.
#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub(crate) level: Level,
    pub(crate) line: String,
    pub(crate) stack_len: Option<usize>,
}

/// Handler that keeps every record it receives.
pub(crate) struct Capture {
    name: String,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl Capture {
    pub(crate) fn new(name: &str) -> (Self, Arc<Mutex<Vec<Captured>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let capture = Self {
            name: name.to_string(),
            seen: Arc::clone(&seen),
        };
        (capture, seen)
    }
}

impl LogHandler for Capture {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, record: &Logrecord<'_>) -> Result<(), LogError> {
        self.seen.lock().unwrap().push(Captured {
            level: record.level(),
            line: record.format_line(),
            stack_len: record.stack().map(<[_]>::len),
        });
        Ok(())
    }
}
