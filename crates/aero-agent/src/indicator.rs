//! Status LED indicator.
//!
//! A side effect, not a decision point: the loop sets it busy while a
//! tick is being serviced and clears it before sleeping. Failures are
//! absorbed — a broken LED never affects the publish path.

use std::path::PathBuf;

/// Busy/idle indicator driven by the publish loop.
pub trait StatusIndicator: Send {
    fn busy(&mut self);
    fn idle(&mut self);
}

impl<T: StatusIndicator + ?Sized> StatusIndicator for Box<T> {
    fn busy(&mut self) {
        (**self).busy();
    }

    fn idle(&mut self) {
        (**self).idle();
    }
}

/// Sysfs LED-class indicator (writes the brightness attribute).
pub struct SysfsLed {
    path: PathBuf,
    warned: bool,
}

impl SysfsLed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            warned: false,
        }
    }

    fn set(&mut self, value: &str) {
        if let Err(e) = std::fs::write(&self.path, value) {
            if !self.warned {
                tracing::warn!(path = %self.path.display(), error = %e, "status LED unavailable");
                self.warned = true;
            }
        }
    }
}

impl StatusIndicator for SysfsLed {
    fn busy(&mut self) {
        self.set("1");
    }

    fn idle(&mut self) {
        self.set("0");
    }
}

/// No-op indicator for hosts without an LED.
pub struct NullIndicator;

impl StatusIndicator for NullIndicator {
    fn busy(&mut self) {}

    fn idle(&mut self) {}
}

/// Records busy/idle transitions for test assertions.
#[derive(Default)]
pub struct RecordingIndicator {
    transitions: Vec<bool>,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The transition history: `true` for busy, `false` for idle.
    pub fn transitions(&self) -> &[bool] {
        &self.transitions
    }
}

impl StatusIndicator for RecordingIndicator {
    fn busy(&mut self) {
        self.transitions.push(true);
    }

    fn idle(&mut self) {
        self.transitions.push(false);
    }
}
