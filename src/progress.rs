use console::Term;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Receives the live progress line of one transfer.
pub trait ProgressReporter {
    /// Replaces the currently displayed line.
    fn update(&mut self, line: &str);
    /// Leaves the last line on screen and moves to the next one.
    fn finish(&mut self);
}

/// One line overwritten in place with `\r`, drawn on every update.
///
/// Writes go straight to the writer, so redirected output keeps every line.
pub struct ConsoleReporter<W: Write = Term> {
    out: W,
}

impl ConsoleReporter<Term> {
    pub fn new() -> Self {
        Self::with_writer(Term::stdout())
    }
}

impl Default for ConsoleReporter<Term> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressReporter for ConsoleReporter<W> {
    fn update(&mut self, line: &str) {
        // A closed console must not abort the transfer.
        let _ = write!(self.out, "\r{line}").and_then(|_| self.out.flush());
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out).and_then(|_| self.out.flush());
    }
}

/// Keeps every line it is handed. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    lines: Arc<Mutex<Vec<String>>>,
    finished: Arc<Mutex<bool>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn finished(&self) -> bool {
        self.finished.lock().map(|f| *f).unwrap_or(false)
    }
}

impl ProgressReporter for RecordingReporter {
    fn update(&mut self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }

    fn finish(&mut self) {
        if let Ok(mut finished) = self.finished.lock() {
            *finished = true;
        }
    }
}
