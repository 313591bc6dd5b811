//! Shared fixtures for unit tests.

use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use crate::io::Console;

/// Clonable in-memory writer so a test can read back what the VM printed.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A console fed by `input` whose output is captured.
pub fn console(input: &str) -> (Console, Capture) {
    let out = Capture::default();
    (Console::new(Cursor::new(input.to_string()), out.clone()), out)
}
