//! Progress display that keeps every frame.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::progress::{PhaseStatus, ProgressDisplay};

const STATUSES: [PhaseStatus; 4] = [
    PhaseStatus::Pending,
    PhaseStatus::InProgress,
    PhaseStatus::Complete,
    PhaseStatus::Failed,
];

/// Records rendered frames for assertions. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    frames: Arc<Mutex<Vec<String>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every frame in the order it was drawn.
    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().clone()
    }

    /// The most recent frame.
    pub fn last_frame(&self) -> Option<String> {
        self.frames.lock().last().cloned()
    }

    /// `(extract, encode)` cells of every row, for every frame.
    ///
    /// Expects uncolored frames; continuation lines of long titles are skipped.
    pub fn frame_statuses(&self) -> Vec<Vec<(PhaseStatus, PhaseStatus)>> {
        self.frames().iter().map(|frame| parse_frame(frame)).collect()
    }
}

fn parse_frame(frame: &str) -> Vec<(PhaseStatus, PhaseStatus)> {
    frame
        .lines()
        .skip(2)
        .filter_map(|line| {
            let extract = parse_status(line.get(40..60)?)?;
            let encode = parse_status(line.get(60..)?)?;
            Some((extract, encode))
        })
        .collect()
}

fn parse_status(cell: &str) -> Option<PhaseStatus> {
    let cell = cell.trim();
    STATUSES.into_iter().find(|status| status.label() == cell)
}

impl ProgressDisplay for RecordingDisplay {
    fn refresh(&mut self, frame: &str) {
        self.frames.lock().push(frame.to_string());
    }
}
