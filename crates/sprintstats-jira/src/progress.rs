//! Remote-fetch progress side-channel.

use std::io::{self, IsTerminal, Write};

/// Observer ticked once per remote fetch. Purely a side-channel; nothing in
/// the data path depends on it.
pub trait ProgressSink {
    fn tick(&self);
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ProgressSink for Silent {
    fn tick(&self) {}
}

/// Writes one dot per fetch to stderr, but only when stderr is attached to
/// a terminal, so piped output stays clean.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrDots;

impl ProgressSink for StderrDots {
    fn tick(&self) {
        let mut stderr = io::stderr();
        if stderr.is_terminal() {
            let _ = write!(stderr, ".");
            let _ = stderr.flush();
        }
    }
}
