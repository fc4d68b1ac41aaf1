// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Diagnostic output shared by worker and reporter threads.
//!
//! A [`DiagnosticSink`] serializes line-oriented messages onto one writer so
//! concurrent threads never interleave partial lines. Writing is best
//! effort; a failing diagnostic stream must not take down an analysis run.

use std::io::{self, Write};
use std::sync::Mutex;

pub struct DiagnosticSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl DiagnosticSink {
    /// Sink writing to standard error.
    pub fn stderr() -> Self {
        DiagnosticSink::new(io::stderr())
    }

    pub fn new(out: impl Write + Send + 'static) -> Self {
        DiagnosticSink {
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Write one line.
    pub fn line(&self, message: &str) {
        let mut out = self.out.lock().expect("sink lock poisoned");
        if let Err(e) = writeln!(out, "{}", message) {
            log::warn!("diagnostic write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Clone)]
    struct SharedBuffer(Arc<StdMutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lines_are_whole() {
        let buffer = SharedBuffer(Arc::new(StdMutex::new(Vec::new())));
        let sink = DiagnosticSink::new(buffer.clone());
        sink.line("first");
        sink.line("second");
        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "first\nsecond\n");
    }
}
