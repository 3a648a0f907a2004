//! The shared progress tracker.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::display::ProgressDisplay;
use super::render::TableRenderer;
use super::types::{Phase, PhaseStatus, TitleProgress};
use crate::catalog::TitleId;
use crate::pipeline::PipelineError;
use crate::plan::PlannedTitle;

struct TrackerState {
    rows: Vec<TitleProgress>,
    error: Option<PipelineError>,
    display: Box<dyn ProgressDisplay>,
    renderer: TableRenderer,
}

impl TrackerState {
    fn redraw(&mut self) {
        let frame = self.renderer.render(&self.rows);
        self.display.refresh(&frame);
    }

    fn apply<F>(&mut self, id: TitleId, phase: Phase, transform: F) -> bool
    where
        F: FnOnce(PhaseStatus) -> PhaseStatus,
    {
        let Some(row) = self.rows.iter_mut().find(|r| r.id == id) else {
            warn!(title = %id, "Progress update for unknown title");
            return false;
        };

        let slot = row.phase_mut(phase);
        let current = *slot;
        let next = transform(current);
        if !current.can_transition_to(next) {
            warn!(
                title = %id,
                ?phase,
                from = %current,
                to = %next,
                "Rejected regressive progress update"
            );
            return false;
        }
        *slot = next;
        debug!(title = %id, ?phase, status = %next, "Progress updated");

        self.redraw();
        true
    }
}

/// Per-title status table plus the run's single error slot.
///
/// Shared between workers as `Arc<ProgressTracker>`. All mutation and every
/// redraw happen under one lock.
pub struct ProgressTracker {
    state: Mutex<TrackerState>,
}

impl ProgressTracker {
    /// Creates a tracker over the given rows.
    pub fn new(rows: Vec<TitleProgress>, display: Box<dyn ProgressDisplay>) -> Self {
        let renderer = TableRenderer::new(display.colors());
        Self {
            state: Mutex::new(TrackerState {
                rows,
                error: None,
                display,
                renderer,
            }),
        }
    }

    /// Creates a tracker with one pending row per planned title, in order.
    pub fn for_titles(titles: &[PlannedTitle], display: Box<dyn ProgressDisplay>) -> Self {
        let rows = titles
            .iter()
            .map(|t| TitleProgress::new(t.id(), t.title.file_name.clone()))
            .collect();
        Self::new(rows, display)
    }

    /// Applies `transform` to one phase of one title and redraws the table.
    ///
    /// Returns `false`, leaving the table untouched, if the title is unknown
    /// or the transform would move the phase backward.
    pub fn apply_change_and_display<F>(&self, id: TitleId, phase: Phase, transform: F) -> bool
    where
        F: FnOnce(PhaseStatus) -> PhaseStatus,
    {
        self.state.lock().apply(id, phase, transform)
    }

    /// Moves one phase of one title to `status`.
    pub fn advance(&self, id: TitleId, phase: Phase, status: PhaseStatus) -> bool {
        self.apply_change_and_display(id, phase, |_| status)
    }

    /// Moves one phase of one title to `InProgress` unless `cancel` has fired.
    ///
    /// The check and the change happen under the tracker lock, so `true`
    /// commits the caller to running that phase.
    pub fn start_unless_cancelled(
        &self,
        id: TitleId,
        phase: Phase,
        cancel: &CancellationToken,
    ) -> bool {
        let mut state = self.state.lock();
        if cancel.is_cancelled() {
            debug!(title = %id, ?phase, "Not starting, run cancelled");
            return false;
        }
        state.apply(id, phase, |_| PhaseStatus::InProgress)
    }

    /// Redraws the table without changing it.
    pub fn display(&self) {
        self.state.lock().redraw();
    }

    /// Consistent copy of every row.
    pub fn snapshot(&self) -> Vec<TitleProgress> {
        self.state.lock().rows.clone()
    }

    /// Current row for one title.
    pub fn get(&self, id: TitleId) -> Option<TitleProgress> {
        self.state.lock().rows.iter().find(|r| r.id == id).cloned()
    }

    /// Stores `err` if no error has been recorded yet.
    ///
    /// Returns whether this call stored the error.
    pub fn set_error(&self, err: PipelineError) -> bool {
        let mut state = self.state.lock();
        if let Some(ref existing) = state.error {
            debug!(existing = %existing, dropped = %err, "Error slot already set");
            return false;
        }
        state.error = Some(err);
        true
    }

    /// Whether an error has been recorded.
    pub fn has_error(&self) -> bool {
        self.state.lock().error.is_some()
    }

    /// Removes and returns the recorded error.
    pub fn take_error(&self) -> Option<PipelineError> {
        self.state.lock().error.take()
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ProgressTracker")
            .field("rows", &state.rows)
            .field("error", &state.error)
            .finish()
    }
}
