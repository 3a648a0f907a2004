//! Pipeline run integration tests.
//!
//! These tests drive the pipeline runner with mock extractor and encoder:
//! - Happy path across one and several discs
//! - Fail-fast behavior on extraction and encoding failures
//! - Output path disambiguation for colliding title names
//! - Handoff backpressure and bounded disc concurrency

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use ripline_core::{
    catalog::{Selection, Title, TitleCatalog, TitleId},
    encoder::EncodeSettings,
    pipeline::{PipelineConfig, PipelineError, PipelineRunner},
    plan::{plan_titles, PlannedTitle},
    progress::{PhaseStatus, ProgressTracker, TitleProgress},
    testing::{fixtures, MockCatalog, MockEncoder, MockExtractor, RecordingDisplay},
    workspace::{total_sizes, RunDirectories},
};

/// Test helper wiring a runner to mocks and temporary output roots.
struct TestHarness {
    runner: PipelineRunner<MockExtractor, MockEncoder>,
    extractor: MockExtractor,
    encoder: MockEncoder,
    display: RecordingDisplay,
    dirs: RunDirectories,
    _temp_dir: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        Self::with_config(PipelineConfig::default(), EncodeSettings::default()).await
    }

    async fn with_config(config: PipelineConfig, settings: EncodeSettings) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dirs = RunDirectories::new(
            temp_dir.path().join("raw"),
            temp_dir.path().join("encoded"),
        );

        let extractor = MockExtractor::new();
        let encoder = MockEncoder::new();
        extractor
            .set_extraction_duration(Duration::from_millis(10))
            .await;
        encoder.set_encoding_duration(Duration::from_millis(10)).await;

        let runner = PipelineRunner::new(config, extractor.clone(), encoder.clone(), settings);

        Self {
            runner,
            extractor,
            encoder,
            display: RecordingDisplay::new(),
            dirs,
            _temp_dir: temp_dir,
        }
    }

    fn tracker(&self, planned: &[PlannedTitle]) -> Arc<ProgressTracker> {
        Arc::new(ProgressTracker::for_titles(
            planned,
            Box::new(self.display.clone()),
        ))
    }

    async fn run(
        &self,
        titles: Vec<Title>,
    ) -> (
        Result<ripline_core::pipeline::RunSummary, PipelineError>,
        Arc<ProgressTracker>,
        Vec<PlannedTitle>,
    ) {
        let planned = plan_titles(titles);
        let tracker = self.tracker(&planned);
        let result = self
            .runner
            .run(planned.clone(), &self.dirs, Arc::clone(&tracker))
            .await;
        (result, tracker, planned)
    }
}

fn row(tracker: &ProgressTracker, unit: u32, index: u32) -> TitleProgress {
    tracker
        .get(TitleId::new(unit, index))
        .expect("title should be tracked")
}

fn statuses(row: &TitleProgress) -> (PhaseStatus, PhaseStatus) {
    (row.extraction, row.encoding)
}

/// Every drawn frame shows each cell equal to or ahead of the previous frame.
fn assert_frames_only_move_forward(display: &RecordingDisplay, rows: usize) {
    let frames = display.frame_statuses();
    assert!(!frames.is_empty(), "table was never drawn");

    let mut previous = vec![(PhaseStatus::Pending, PhaseStatus::Pending); rows];
    for (n, frame) in frames.into_iter().enumerate() {
        assert_eq!(frame.len(), rows, "frame {} lost rows", n);
        for (before, after) in previous.iter().zip(&frame) {
            assert!(
                before.0.can_transition_to(after.0) && before.1.can_transition_to(after.1),
                "frame {} moved {:?} back to {:?}",
                n,
                before,
                after
            );
        }
        previous = frame;
    }
}

/// A started phase always ends as Complete or Failed, even after cancellation.
fn assert_nothing_left_in_progress(tracker: &ProgressTracker) {
    for r in tracker.snapshot() {
        assert_ne!(r.extraction, PhaseStatus::InProgress, "{} stuck", r.id);
        assert_ne!(r.encoding, PhaseStatus::InProgress, "{} stuck", r.id);
    }
}

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn test_single_disc_all_titles_complete() {
    let harness = TestHarness::new().await;

    let (result, tracker, _) = harness.run(fixtures::disc_titles(0, 3)).await;

    let summary = result.expect("run should succeed");
    assert_eq!(summary.items.len(), 3);
    for r in tracker.snapshot() {
        assert_eq!(statuses(&r), (PhaseStatus::Complete, PhaseStatus::Complete));
    }
    assert!(tracker.take_error().is_none());

    for item in &summary.items {
        assert!(item.raw_path.starts_with(&harness.dirs.raw));
        assert!(item.encoded_path.starts_with(&harness.dirs.encoded));
        assert!(item.encoded_path.exists());
    }

    let last = harness.display.last_frame().expect("table was drawn");
    assert!(last.contains("title_t02"));
    assert_eq!(last.matches("Complete").count(), 6);
    assert_frames_only_move_forward(&harness.display, 3);
}

#[tokio::test]
async fn test_single_disc_extracts_and_encodes_in_catalog_order() {
    let harness = TestHarness::new().await;

    let (result, _, _) = harness.run(fixtures::disc_titles(0, 4)).await;
    result.expect("run should succeed");

    let extracted = harness.extractor.extracted_ids().await;
    assert_eq!(
        extracted,
        (0..4).map(|i| TitleId::new(0, i)).collect::<Vec<_>>()
    );

    let encoded: Vec<String> = harness
        .encoder
        .recorded_encodings()
        .await
        .iter()
        .map(|e| e.params.input.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        encoded,
        vec!["title_t00.mkv", "title_t01.mkv", "title_t02.mkv", "title_t03.mkv"]
    );
}

#[tokio::test]
async fn test_extractions_within_a_disc_never_overlap() {
    let harness = TestHarness::new().await;

    let mut titles = fixtures::disc_titles(0, 3);
    titles.extend(fixtures::disc_titles(1, 3));
    let (result, _, _) = harness.run(titles).await;
    result.expect("run should succeed");

    let recorded = harness.extractor.recorded_extractions().await;
    for unit in [0, 1] {
        let mut same_unit: Vec<_> = recorded.iter().filter(|e| e.id.unit == unit).collect();
        same_unit.sort_by_key(|e| e.started);
        for pair in same_unit.windows(2) {
            assert!(pair[0].finished <= pair[1].started);
            assert!(pair[0].id.index < pair[1].id.index);
        }
    }
    assert_eq!(harness.extractor.max_concurrent(), 2);
}

#[tokio::test]
async fn test_summary_sizes_and_output_format() {
    let settings = EncodeSettings {
        output_format: "mp4".to_string(),
        ..Default::default()
    };
    let harness = TestHarness::with_config(PipelineConfig::default(), settings).await;
    harness.extractor.set_file_size(10_000).await;

    let (result, _, _) = harness
        .run(vec![fixtures::title(0, 0, "My Movie.mkv")])
        .await;
    let summary = result.expect("run should succeed");

    assert_eq!(
        summary.items[0].encoded_path,
        harness.dirs.encoded.join("My_Movie.mp4")
    );

    let totals = total_sizes(&summary).await;
    assert_eq!(totals.raw_bytes, 10_000);
    assert_eq!(totals.encoded_bytes, 5_000);
    assert_eq!(totals.saved_bytes(), Some(5_000));
}

#[tokio::test]
async fn test_titles_selected_from_catalog_run_end_to_end() {
    let harness = TestHarness::new().await;
    let catalog = MockCatalog::new();
    catalog.set_titles(0, fixtures::disc_titles(0, 5)).await;

    let listed = catalog.list_titles(0).await.unwrap();
    let selected = Selection::Indexes(vec![1, 3]).apply(listed);
    let (result, tracker, _) = harness.run(selected).await;

    assert_eq!(result.unwrap().items.len(), 2);
    assert_eq!(tracker.snapshot().len(), 2);
    assert_eq!(
        harness.extractor.extracted_ids().await,
        vec![TitleId::new(0, 1), TitleId::new(0, 3)]
    );
}

// =============================================================================
// Disambiguation
// =============================================================================

#[tokio::test]
async fn test_colliding_names_across_discs_use_subdirectories() {
    let harness = TestHarness::new().await;

    let titles = vec![
        fixtures::title(0, 0, "Title1.mkv"),
        fixtures::title(1, 0, "Title1.mkv"),
        fixtures::title(1, 1, "Extras.mkv"),
    ];
    let (result, _, planned) = harness.run(titles).await;
    let summary = result.expect("run should succeed");

    assert!(planned[0].qualify_with_unit);
    assert!(planned[1].qualify_with_unit);
    assert!(!planned[2].qualify_with_unit);

    let raw = &harness.dirs.raw;
    let encoded = &harness.dirs.encoded;
    assert!(raw.join("disc_0").join("Title1.mkv").exists());
    assert!(raw.join("disc_1").join("Title1.mkv").exists());
    assert!(raw.join("Extras.mkv").exists());
    assert!(encoded.join("disc_0").join("Title1.mkv").exists());
    assert!(encoded.join("disc_1").join("Title1.mkv").exists());

    let mut outputs: Vec<_> = summary.items.iter().map(|i| i.encoded_path.clone()).collect();
    outputs.sort();
    outputs.dedup();
    assert_eq!(outputs.len(), 3);
}

#[tokio::test]
async fn test_names_equal_after_rewrite_rejected_before_work() {
    let harness = TestHarness::new().await;

    let titles = vec![
        fixtures::title(0, 0, "My Movie.mkv"),
        fixtures::title(1, 0, "My_Movie.mkv"),
    ];
    let (result, tracker, planned) = harness.run(titles).await;

    assert!(planned.iter().all(|p| !p.qualify_with_unit));
    match result {
        Err(PipelineError::OutputCollision {
            first,
            second,
            path,
        }) => {
            assert_eq!(first, TitleId::new(0, 0));
            assert_eq!(second, TitleId::new(1, 0));
            assert_eq!(path, harness.dirs.encoded.join("My_Movie.mkv"));
        }
        other => panic!("expected output collision, got {:?}", other),
    }

    assert!(harness.extractor.extracted_ids().await.is_empty());
    assert_eq!(harness.encoder.encoding_count().await, 0);
    assert!(harness.display.frames().is_empty());
    assert!(tracker.take_error().is_none());
}

#[tokio::test]
async fn test_names_equal_after_container_swap_rejected() {
    let settings = EncodeSettings {
        output_format: "mp4".to_string(),
        ..Default::default()
    };
    let harness = TestHarness::with_config(PipelineConfig::default(), settings).await;

    let titles = vec![
        fixtures::title(0, 0, "Feature.mkv"),
        fixtures::title(0, 1, "feature.MP4"),
    ];
    let (result, _, _) = harness.run(titles).await;

    assert!(matches!(
        result,
        Err(PipelineError::OutputCollision { second, .. }) if second == TitleId::new(0, 1)
    ));
    assert!(harness.extractor.extracted_ids().await.is_empty());
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn test_extraction_failure_stops_disc_and_surfaces_error() {
    let harness = TestHarness::new().await;
    harness
        .extractor
        .fail_on(TitleId::new(0, 1), "drive read error")
        .await;

    let (result, tracker, _) = harness.run(fixtures::disc_titles(0, 3)).await;

    match result {
        Err(PipelineError::Extraction { id, source }) => {
            assert_eq!(id, TitleId::new(0, 1));
            assert!(source.to_string().contains("drive read error"));
        }
        other => panic!("expected extraction error, got {:?}", other),
    }

    let first = row(&tracker, 0, 0);
    assert_eq!(first.extraction, PhaseStatus::Complete);
    assert_ne!(first.encoding, PhaseStatus::Failed);

    assert_eq!(
        statuses(&row(&tracker, 0, 1)),
        (PhaseStatus::Failed, PhaseStatus::Pending)
    );
    assert_eq!(
        statuses(&row(&tracker, 0, 2)),
        (PhaseStatus::Pending, PhaseStatus::Pending)
    );

    let extracted = harness.extractor.extracted_ids().await;
    assert!(!extracted.contains(&TitleId::new(0, 2)));
    assert_frames_only_move_forward(&harness.display, 3);
    assert_nothing_left_in_progress(&tracker);

    let encoded: Vec<_> = harness
        .encoder
        .recorded_encodings()
        .await
        .iter()
        .map(|e| e.params.input.clone())
        .collect();
    assert!(encoded.iter().all(|p| !p.ends_with("title_t01.mkv")));
}

#[tokio::test]
async fn test_encoding_failure_cancels_remaining_work() {
    let config = PipelineConfig {
        handoff_capacity: 1,
        ..Default::default()
    };
    let harness = TestHarness::with_config(config, EncodeSettings::default()).await;
    harness
        .encoder
        .fail_on("title_t00.mkv", "x265 [error]: invalid frame")
        .await;
    harness
        .extractor
        .set_extraction_duration(Duration::from_millis(30))
        .await;

    let (result, tracker, _) = harness.run(fixtures::disc_titles(0, 5)).await;

    let err = result.expect_err("run should fail");
    assert!(matches!(err, PipelineError::Encoding { id, .. } if id == TitleId::new(0, 0)));
    assert_eq!(err.captured_output(), Some("Encode failed (error 3)"));
    assert!(tracker.take_error().is_none());

    assert_eq!(harness.encoder.encoding_count().await, 1);
    assert_eq!(row(&tracker, 0, 0).encoding, PhaseStatus::Failed);

    let extracted = harness.extractor.extracted_ids().await;
    assert!(extracted.len() < 5);
    for r in tracker.snapshot().iter().skip(1) {
        assert_ne!(r.encoding, PhaseStatus::Complete);
    }
    assert_frames_only_move_forward(&harness.display, 5);
    assert_nothing_left_in_progress(&tracker);
}

#[tokio::test]
async fn test_failure_on_one_disc_cancels_other_disc() {
    let harness = TestHarness::new().await;
    harness
        .extractor
        .set_extraction_duration(Duration::from_millis(40))
        .await;
    harness
        .extractor
        .fail_on(TitleId::new(0, 0), "no disc")
        .await;

    let mut titles = fixtures::disc_titles(0, 2);
    titles.extend(fixtures::disc_titles(1, 4));
    let (result, tracker, _) = harness.run(titles).await;

    assert!(matches!(
        result,
        Err(PipelineError::Extraction { id, .. }) if id == TitleId::new(0, 0)
    ));

    // Whatever disc 1 had in flight may finish, nothing later starts.
    let disc_one: Vec<_> = harness
        .extractor
        .extracted_ids()
        .await
        .into_iter()
        .filter(|id| id.unit == 1)
        .collect();
    assert!(disc_one.len() <= 2);
    for index in [2, 3] {
        assert_eq!(
            statuses(&row(&tracker, 1, index)),
            (PhaseStatus::Pending, PhaseStatus::Pending)
        );
    }
    assert_frames_only_move_forward(&harness.display, 6);
    assert_nothing_left_in_progress(&tracker);
}

#[tokio::test]
async fn test_missing_raw_file_fails_encoding() {
    let harness = TestHarness::new().await;
    harness
        .extractor
        .skip_output_for(TitleId::new(0, 0))
        .await;

    let (result, tracker, _) = harness.run(fixtures::disc_titles(0, 1)).await;

    assert!(matches!(
        result,
        Err(PipelineError::MissingEncodeInput { id, .. }) if id == TitleId::new(0, 0)
    ));
    assert_eq!(harness.encoder.encoding_count().await, 0);
    assert_eq!(
        statuses(&row(&tracker, 0, 0)),
        (PhaseStatus::Complete, PhaseStatus::Failed)
    );
}

#[tokio::test]
async fn test_empty_selection_rejected() {
    let harness = TestHarness::new().await;

    let (result, _, _) = harness.run(Vec::new()).await;

    assert!(matches!(result, Err(PipelineError::NothingToProcess)));
    assert!(harness.display.frames().is_empty());
}

// =============================================================================
// Backpressure and concurrency
// =============================================================================

#[tokio::test]
async fn test_capacity_one_keeps_extraction_close_to_encoding() {
    let config = PipelineConfig {
        handoff_capacity: 1,
        ..Default::default()
    };
    let harness = TestHarness::with_config(config, EncodeSettings::default()).await;
    harness
        .encoder
        .set_encoding_duration(Duration::from_millis(150))
        .await;

    let (result, _, _) = harness.run(fixtures::disc_titles(0, 5)).await;
    result.expect("run should succeed");

    let extractions = harness.extractor.recorded_extractions().await;
    let encodings = harness.encoder.recorded_encodings().await;

    // With one slot, the fourth extraction waits until the first encode finished.
    assert!(extractions[3].started >= encodings[0].finished);
}

#[tokio::test]
async fn test_default_capacity_lets_extraction_run_ahead() {
    let harness = TestHarness::new().await;
    harness
        .encoder
        .set_encoding_duration(Duration::from_millis(150))
        .await;

    let (result, _, _) = harness.run(fixtures::disc_titles(0, 5)).await;
    result.expect("run should succeed");

    let extractions = harness.extractor.recorded_extractions().await;
    let encodings = harness.encoder.recorded_encodings().await;

    assert!(extractions
        .iter()
        .all(|e| e.finished <= encodings[1].started));
}

#[tokio::test]
async fn test_bounded_disc_concurrency() {
    let config = PipelineConfig {
        max_concurrent_units: 1,
        ..Default::default()
    };
    let harness = TestHarness::with_config(config, EncodeSettings::default()).await;

    let mut titles = Vec::new();
    for unit in 0..3 {
        titles.extend(fixtures::disc_titles(unit, 2));
    }
    let (result, _, _) = harness.run(titles).await;

    assert_eq!(result.unwrap().items.len(), 6);
    assert_eq!(harness.extractor.max_concurrent(), 1);
}

#[tokio::test]
async fn test_unbounded_discs_extract_concurrently() {
    let harness = TestHarness::new().await;
    harness
        .extractor
        .set_extraction_duration(Duration::from_millis(50))
        .await;

    let mut titles = Vec::new();
    for unit in 0..3 {
        titles.extend(fixtures::disc_titles(unit, 1));
    }
    let (result, _, _) = harness.run(titles).await;

    result.expect("run should succeed");
    assert_eq!(harness.extractor.max_concurrent(), 3);
}
