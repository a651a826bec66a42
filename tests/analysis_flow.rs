//! End-to-end flows through the controller with a scripted engine.

use async_trait::async_trait;
use deepfake_detector::app::{Controller, Event, Notification, PresentationState, Session, Severity};
use deepfake_detector::domain::{
    AnalysisResult, DetectorError, ErrorKind, FeatureScore, ImageHandle, ImageUpload, Result,
};
use deepfake_detector::engine::AnalysisEngine;
use deepfake_detector::ui::{render_to_string, PanelView, Theme};
use deepfake_detector::DEFAULT_MAX_BYTES;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays queued outcomes after a fixed delay and counts calls.
struct ScriptedEngine {
    delay: Duration,
    outcomes: Mutex<VecDeque<Result<AnalysisResult>>>,
    calls: AtomicUsize,
}

impl ScriptedEngine {
    fn new(outcomes: Vec<Result<AnalysisResult>>) -> Arc<Self> {
        Arc::new(Self {
            delay: Duration::from_millis(2500),
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(&self, _image: &ImageHandle) -> Result<AnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DetectorError::AnalysisFailure("script exhausted".into())))
    }
}

fn manipulated() -> AnalysisResult {
    AnalysisResult::new(
        0.82,
        0.91,
        vec![
            FeatureScore::new("Facial Inconsistencies", 0.8, "face"),
            FeatureScore::new("Texture Analysis", 0.7, "texture"),
            FeatureScore::new("Metadata Analysis", 0.6, "metadata"),
            FeatureScore::new("Color Consistency", 0.5, "color"),
        ],
    )
    .unwrap()
}

fn authentic() -> AnalysisResult {
    AnalysisResult::new(0.2, 0.88, vec![FeatureScore::new("Texture Analysis", 0.1, "texture")])
        .unwrap()
}

fn controller(engine: Arc<ScriptedEngine>) -> Controller<Vec<Notification>> {
    Controller::new(
        Session::new(DEFAULT_MAX_BYTES, Theme::default()),
        engine,
        Vec::new(),
    )
}

fn upload(name: &str, media_type: &str, size: usize) -> Event {
    Event::SelectImage(ImageUpload::new(Some(name.into()), media_type, vec![7; size]))
}

#[tokio::test(start_paused = true)]
async fn two_megabyte_png_is_flagged() {
    let engine = ScriptedEngine::new(vec![Ok(manipulated())]);
    let mut c = controller(engine.clone());

    assert!(c.dispatch(upload("face.png", "image/png", 2 * 1024 * 1024)));
    assert!(c.dispatch(Event::AnalyzeRequested));
    assert!(c.session().state().is_analyzing());
    assert!(matches!(
        c.session().compute_viewmodel().panel,
        PanelView::Loading(_)
    ));

    assert!(c.settle().await);

    let PresentationState::Resulted(image, result) = c.session().state() else {
        panic!("expected a result, got {:?}", c.session().state());
    };
    assert_eq!(image.display_name(), "face.png");
    assert_eq!(result.score_percent(), 82);
    assert_eq!(result.confidence_percent(), 91);

    let notices = c.notifier();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Alert);
    assert!(notices[0].description.contains("91%"));

    let PanelView::Result(view) = c.session().compute_viewmodel().panel else {
        panic!("result panel expected");
    };
    assert!(view.is_manipulated);
    assert_eq!(view.score_percent, 82);
    assert_eq!(view.features.len(), 4);

    let screen = render_to_string(c.session(), 80);
    assert!(screen.contains("82%"));
    assert!(screen.contains("91%"));
    assert_eq!(engine.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn text_file_is_refused_without_engine_call() {
    let engine = ScriptedEngine::new(vec![]);
    let mut c = controller(engine.clone());

    assert!(!c.dispatch(upload("notes.txt", "text/plain", 64)));
    assert_eq!(c.session().state(), &PresentationState::Idle);
    assert_eq!(c.notifier()[0].cause, Some(ErrorKind::InvalidImage));

    c.dispatch(Event::AnalyzeRequested);
    assert!(!c.settle().await);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn oversized_jpeg_is_refused() {
    let engine = ScriptedEngine::new(vec![]);
    let mut c = controller(engine.clone());

    assert!(!c.dispatch(upload("big.jpg", "image/jpeg", 11 * 1024 * 1024)));
    assert_eq!(c.session().state(), &PresentationState::Idle);
    assert_eq!(c.notifier().len(), 1);
    assert_eq!(c.notifier()[0].cause, Some(ErrorKind::InvalidImage));
    assert_eq!(engine.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn analyze_with_nothing_selected_warns() {
    let engine = ScriptedEngine::new(vec![]);
    let mut c = controller(engine.clone());

    c.dispatch(Event::AnalyzeRequested);

    assert_eq!(c.session().state(), &PresentationState::Idle);
    assert_eq!(c.notifier()[0].severity, Severity::Warning);
    assert_eq!(c.notifier()[0].title, "No image selected");
    assert!(c.pending_request().is_none());
    assert_eq!(engine.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn failure_then_retry_succeeds() {
    let engine = ScriptedEngine::new(vec![
        Err(DetectorError::AnalysisFailure("backend unavailable".into())),
        Ok(authentic()),
    ]);
    let mut c = controller(engine.clone());

    c.dispatch(upload("face.webp", "image/webp", 4096));
    c.dispatch(Event::AnalyzeRequested);
    c.settle().await;

    assert!(matches!(
        c.session().state(),
        PresentationState::Failed { kind: ErrorKind::AnalysisFailure, .. }
    ));
    assert_eq!(c.notifier()[0].title, "Analysis failed");

    assert!(c.dispatch(Event::AnalyzeRequested));
    c.settle().await;

    let result = c.session().state().result().expect("retry result");
    assert!(!result.is_manipulated());
    assert_eq!(c.notifier()[1].severity, Severity::Info);
    assert_eq!(engine.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn repeated_analyze_runs_once() {
    let engine = ScriptedEngine::new(vec![Ok(manipulated()), Ok(authentic())]);
    let mut c = controller(engine.clone());

    c.dispatch(upload("face.png", "image/png", 512));
    assert!(c.dispatch(Event::AnalyzeRequested));
    let first = c.pending_request();

    for _ in 0..3 {
        assert!(!c.dispatch(Event::AnalyzeRequested));
    }
    assert_eq!(c.pending_request(), first);

    c.settle().await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(engine.calls(), 1);
    assert_eq!(c.session().state().result().unwrap().score_percent(), 82);
    assert_eq!(c.notifier().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn replacing_image_mid_analysis_keeps_only_the_new_one() {
    let engine = ScriptedEngine::new(vec![Ok(manipulated()), Ok(authentic())]);
    let mut c = controller(engine.clone());

    c.dispatch(upload("a.png", "image/png", 512));
    c.dispatch(Event::AnalyzeRequested);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(c.dispatch(upload("b.png", "image/png", 512)));
    assert!(matches!(c.session().state(), PresentationState::ImageSelected(img) if img.display_name() == "b.png"));
    assert!(c.pending_request().is_none());

    c.dispatch(Event::AnalyzeRequested);
    c.settle().await;

    let PresentationState::Resulted(image, _) = c.session().state() else {
        panic!("expected a result for b.png");
    };
    assert_eq!(image.display_name(), "b.png");
    assert_eq!(c.notifier().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn results_after_clear_are_discarded() {
    let engine = ScriptedEngine::new(vec![Ok(manipulated())]);
    let mut c = controller(engine.clone());

    c.dispatch(upload("a.png", "image/png", 512));
    c.dispatch(Event::AnalyzeRequested);
    assert!(c.dispatch(Event::ClearImage));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!c.settle().await);

    assert_eq!(c.session().state(), &PresentationState::Idle);
    assert!(c.notifier().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_returns_to_selection_and_allows_rerun() {
    let engine = ScriptedEngine::new(vec![Ok(authentic())]);
    let mut c = controller(engine.clone());

    c.dispatch(upload("a.png", "image/png", 512));
    c.dispatch(Event::AnalyzeRequested);
    assert!(c.dispatch(Event::CancelAnalysis));
    assert!(matches!(c.session().state(), PresentationState::ImageSelected(_)));

    c.dispatch(Event::AnalyzeRequested);
    c.settle().await;

    assert!(c.session().state().result().is_some());
    assert_eq!(c.notifier().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn reset_returns_to_idle() {
    let engine = ScriptedEngine::new(vec![Ok(manipulated())]);
    let mut c = controller(engine);

    c.dispatch(upload("a.png", "image/png", 512));
    c.dispatch(Event::AnalyzeRequested);
    c.settle().await;

    assert!(c.dispatch(Event::Reset));
    assert_eq!(c.session().state(), &PresentationState::Idle);
    assert!(!c.dispatch(Event::Reset));
}
