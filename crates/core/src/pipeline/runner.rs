//! Pipeline runner driving extraction and encoding workers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::types::{CompletedTitle, EncodeJob, RunSummary};
use crate::encoder::{EncodeParams, EncodeSettings, Encoder};
use crate::extractor::Extractor;
use crate::plan::{find_output_collision, PlannedTitle};
use crate::progress::{Phase, PhaseStatus, ProgressTracker};
use crate::workspace::RunDirectories;

/// State shared by every worker of one run.
struct RunContext<X, E> {
    extractor: Arc<X>,
    encoder: Arc<E>,
    settings: EncodeSettings,
    tracker: Arc<ProgressTracker>,
    cancel: CancellationToken,
    /// Handed to invokers once a row shows `InProgress`; never cancelled.
    started: CancellationToken,
    raw_root: PathBuf,
    encoded_root: PathBuf,
}

impl<X, E> RunContext<X, E> {
    /// Records `err` (first one wins) and cancels the run.
    fn fail(&self, err: PipelineError) {
        error!(error = %err, "Pipeline worker failed");
        self.tracker.set_error(err);
        self.cancel.cancel();
    }
}

/// Runs selected titles through extraction and encoding.
///
/// Generic over the extractor and encoder so tests can substitute mocks.
pub struct PipelineRunner<X, E>
where
    X: Extractor + 'static,
    E: Encoder + 'static,
{
    config: PipelineConfig,
    extractor: Arc<X>,
    encoder: Arc<E>,
    settings: EncodeSettings,
}

impl<X, E> PipelineRunner<X, E>
where
    X: Extractor + 'static,
    E: Encoder + 'static,
{
    pub fn new(config: PipelineConfig, extractor: X, encoder: E, settings: EncodeSettings) -> Self {
        Self {
            config,
            extractor: Arc::new(extractor),
            encoder: Arc::new(encoder),
            settings,
        }
    }

    /// Processes every planned title, returning the first error if any.
    ///
    /// `titles` must already be planned as a whole so that colliding names
    /// across units are qualified. Titles of the same unit are extracted in
    /// the order given. Fails before any work starts if two titles would
    /// write the same file.
    pub async fn run(
        &self,
        titles: Vec<PlannedTitle>,
        dirs: &RunDirectories,
        tracker: Arc<ProgressTracker>,
    ) -> Result<RunSummary, PipelineError> {
        if titles.is_empty() {
            return Err(PipelineError::NothingToProcess);
        }
        if let Some(collision) = find_output_collision(
            &titles,
            &dirs.raw,
            &dirs.encoded,
            &self.settings.output_format,
        ) {
            return Err(PipelineError::OutputCollision {
                first: collision.first,
                second: collision.second,
                path: collision.path,
            });
        }

        let started = Instant::now();
        let capacity = self.config.effective_capacity(titles.len());
        let groups = group_by_unit(titles);
        info!(
            units = groups.len(),
            capacity,
            unit_limit = ?self.config.unit_limit(),
            "Starting pipeline run"
        );

        let ctx = Arc::new(RunContext {
            extractor: Arc::clone(&self.extractor),
            encoder: Arc::clone(&self.encoder),
            settings: self.settings.clone(),
            tracker: Arc::clone(&tracker),
            cancel: CancellationToken::new(),
            started: CancellationToken::new(),
            raw_root: dirs.raw.clone(),
            encoded_root: dirs.encoded.clone(),
        });
        let limit = self.config.unit_limit().map(|n| Arc::new(Semaphore::new(n)));

        tracker.display();

        let (tx, rx) = mpsc::channel(capacity);
        let supervisor = tokio::spawn(supervise_extraction(Arc::clone(&ctx), groups, tx, limit));
        let encoding = tokio::spawn(encode_all(Arc::clone(&ctx), rx));

        if let Err(e) = supervisor.await {
            ctx.fail(PipelineError::WorkerPanicked(e.to_string()));
        }
        let items = match encoding.await {
            Ok(items) => items,
            Err(e) => {
                ctx.fail(PipelineError::WorkerPanicked(e.to_string()));
                Vec::new()
            }
        };

        if let Some(err) = tracker.take_error() {
            return Err(err);
        }

        let elapsed = started.elapsed();
        info!(titles = items.len(), elapsed_ms = elapsed.as_millis() as u64, "Pipeline run complete");
        Ok(RunSummary { items, elapsed })
    }
}

/// Groups titles by unit, keeping first-appearance order of units and the
/// given order within each unit.
fn group_by_unit(titles: Vec<PlannedTitle>) -> Vec<(u32, Vec<PlannedTitle>)> {
    let mut groups: Vec<(u32, Vec<PlannedTitle>)> = Vec::new();
    for planned in titles {
        let unit = planned.id().unit;
        match groups.iter_mut().find(|(u, _)| *u == unit) {
            Some((_, group)) => group.push(planned),
            None => groups.push((unit, vec![planned])),
        }
    }
    groups
}

/// Spawns one worker per unit and waits for all of them.
///
/// Each worker owns a clone of `tx`; the channel closes once the last
/// worker returns, which ends the encoding loop.
async fn supervise_extraction<X, E>(
    ctx: Arc<RunContext<X, E>>,
    groups: Vec<(u32, Vec<PlannedTitle>)>,
    tx: mpsc::Sender<EncodeJob>,
    limit: Option<Arc<Semaphore>>,
) where
    X: Extractor + 'static,
    E: Encoder + 'static,
{
    let mut workers = JoinSet::new();
    for (unit, titles) in groups {
        workers.spawn(extract_unit(
            Arc::clone(&ctx),
            unit,
            titles,
            tx.clone(),
            limit.clone(),
        ));
    }
    drop(tx);

    while let Some(result) = workers.join_next().await {
        if let Err(e) = result {
            ctx.fail(PipelineError::WorkerPanicked(e.to_string()));
        }
    }
    debug!("All extraction workers finished");
}

/// Extracts one unit's titles in order, handing each to the encoder.
async fn extract_unit<X, E>(
    ctx: Arc<RunContext<X, E>>,
    unit: u32,
    titles: Vec<PlannedTitle>,
    tx: mpsc::Sender<EncodeJob>,
    limit: Option<Arc<Semaphore>>,
) where
    X: Extractor + 'static,
    E: Encoder + 'static,
{
    let _permit = match limit {
        Some(semaphore) => {
            tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => return,
                permit = semaphore.acquire_owned() => match permit {
                    Ok(permit) => Some(permit),
                    Err(_) => return,
                },
            }
        }
        None => None,
    };
    debug!(unit, titles = titles.len(), "Extraction worker started");

    for planned in titles {
        let id = planned.id();
        if !ctx
            .tracker
            .start_unless_cancelled(id, Phase::Extraction, &ctx.cancel)
        {
            debug!(unit, "Extraction worker observed cancellation");
            return;
        }

        // A started row always reaches Complete or Failed.
        let dest_dir = planned.raw_dir(&ctx.raw_root);
        match ctx.extractor.extract(&planned.title, &dest_dir, &ctx.started).await {
            Ok(result) => {
                debug!(title = %id, duration_ms = result.duration_ms, "Extraction finished");
            }
            Err(source) => {
                ctx.tracker.advance(id, Phase::Extraction, PhaseStatus::Failed);
                ctx.fail(PipelineError::Extraction { id, source });
                return;
            }
        }
        ctx.tracker.advance(id, Phase::Extraction, PhaseStatus::Complete);

        let job = EncodeJob {
            id,
            params: EncodeParams {
                input: planned.raw_path(&ctx.raw_root),
                output: planned.encoded_path(&ctx.encoded_root, &ctx.settings.output_format),
                settings: ctx.settings.clone(),
            },
        };

        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => return,
            sent = tx.send(job) => {
                if sent.is_err() {
                    return;
                }
            }
        }
    }
}

/// Drains the handoff channel, encoding one title at a time.
async fn encode_all<X, E>(
    ctx: Arc<RunContext<X, E>>,
    mut rx: mpsc::Receiver<EncodeJob>,
) -> Vec<CompletedTitle>
where
    X: Extractor + 'static,
    E: Encoder + 'static,
{
    let mut completed = Vec::new();

    loop {
        let job = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => break,
            job = rx.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };

        let id = job.id;
        if !tokio::fs::try_exists(&job.params.input).await.unwrap_or(false) {
            ctx.tracker.advance(id, Phase::Encoding, PhaseStatus::Failed);
            ctx.fail(PipelineError::MissingEncodeInput {
                id,
                path: job.params.input,
            });
            break;
        }

        if !ctx
            .tracker
            .start_unless_cancelled(id, Phase::Encoding, &ctx.cancel)
        {
            break;
        }
        match ctx.encoder.encode(&job.params, &ctx.started).await {
            Ok(result) => {
                ctx.tracker.advance(id, Phase::Encoding, PhaseStatus::Complete);
                debug!(title = %id, bytes = result.output_size_bytes, "Encoding finished");
                completed.push(CompletedTitle {
                    id,
                    raw_path: job.params.input,
                    encoded_path: result.output_path,
                });
            }
            Err(source) => {
                ctx.tracker.advance(id, Phase::Encoding, PhaseStatus::Failed);
                ctx.fail(PipelineError::Encoding { id, source });
                break;
            }
        }
    }

    debug!(encoded = completed.len(), "Encoding worker finished");
    completed
}
