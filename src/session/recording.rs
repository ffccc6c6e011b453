// SPDX-License-Identifier: GPL-3.0-only

//! Recording state and elapsed-time tracking

use std::path::PathBuf;
use std::time::Instant;

/// Elapsed-time counter for an active recording
///
/// Driven by a one-second tick from the session. Seconds carry into minutes
/// and minutes into hours at sixty, so the label is always well formed no
/// matter how long a recording runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordTimer {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl RecordTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one second, carrying into minutes and hours
    pub fn tick(&mut self) {
        self.seconds += 1;
        if self.seconds == 60 {
            self.seconds = 0;
            self.minutes += 1;
            if self.minutes == 60 {
                self.minutes = 0;
                self.hours += 1;
            }
        }
    }

    /// Back to zero for the next recording
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Elapsed time in `HH:MM:SS` form
    pub fn label(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }

    /// Total elapsed seconds
    pub fn total_seconds(&self) -> u64 {
        (self.hours as u64) * 3600 + (self.minutes as u64) * 60 + self.seconds as u64
    }
}

/// Recording half of the session state
#[derive(Debug, Default)]
pub enum RecordingState {
    /// No recording in flight
    #[default]
    Idle,
    /// Frames are being written to `output_path`
    Recording {
        started_at: Instant,
        output_path: PathBuf,
        timer: RecordTimer,
    },
}

impl RecordingState {
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording { .. })
    }

    /// Advance the timer by one second
    ///
    /// # Returns
    /// * `Some(String)` - Updated `HH:MM:SS` label
    /// * `None` - Nothing is recording
    pub fn tick(&mut self) -> Option<String> {
        match self {
            RecordingState::Recording { timer, .. } => {
                timer.tick();
                Some(timer.label())
            }
            RecordingState::Idle => None,
        }
    }

    /// Current `HH:MM:SS` label without advancing
    pub fn timer_label(&self) -> Option<String> {
        match self {
            RecordingState::Recording { timer, .. } => Some(timer.label()),
            RecordingState::Idle => None,
        }
    }

    /// Path of the recording in flight
    pub fn output_path(&self) -> Option<&PathBuf> {
        match self {
            RecordingState::Recording { output_path, .. } => Some(output_path),
            RecordingState::Idle => None,
        }
    }
}
