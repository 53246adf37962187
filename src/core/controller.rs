use crate::core::config::Config;
use crate::core::display::{DisplayPublisher, DisplayState, TickOutcome};
use crate::core::estimator::GestureEstimator;
use crate::models::gesture::{GestureError, GestureResult};
use crate::platform::camera::{CameraSource, VideoFrame};
use crate::platform::pose::HandPoseModel;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

// ==============================================================================
// Gesture Controller
// ==============================================================================

/// Drives the per-tick pipeline: camera frame -> pose model -> estimator -> display.
///
/// Every tick runs as its own task. Results are published through a
/// [`DisplayPublisher`] keyed by the tick's sequence number, and ticks that
/// resolve after their session was stopped are dropped.
#[derive(Clone)]
pub struct GestureController {
    model: Arc<dyn HandPoseModel>,
    camera: Arc<dyn CameraSource>,
    estimator: Arc<GestureEstimator>,
    publisher: DisplayPublisher,
    tick_period: Duration,
    estimate_timeout: Duration,
    next_seq: Arc<AtomicU64>,
    current_session_id: Arc<RwLock<Option<Uuid>>>,
    loop_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl GestureController {
    pub fn new(
        model: Arc<dyn HandPoseModel>,
        camera: Arc<dyn CameraSource>,
        estimator: GestureEstimator,
        config: &Config,
    ) -> Self {
        Self {
            model,
            camera,
            estimator: Arc::new(estimator),
            publisher: DisplayPublisher::new(config.no_hand_policy),
            tick_period: config.tick_period(),
            estimate_timeout: config.estimate_timeout(),
            next_seq: Arc::new(AtomicU64::new(0)),
            current_session_id: Arc::new(RwLock::new(None)),
            loop_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Open a session and start the sampling loop
    pub async fn start(&self) -> GestureResult<Uuid> {
        let session_id = self.open_session().await?;

        let controller = self.clone();
        let handle = tokio::spawn(async move {
            controller.run_loop(session_id).await;
        });
        *self.loop_handle.lock().await = Some(handle);

        info!(
            "Started gesture tracking for session {} ({}, every {:?})",
            session_id,
            self.model.model_info(),
            self.tick_period
        );
        Ok(session_id)
    }

    /// Stop the sampling loop and close the session. In-flight ticks are discarded.
    pub async fn stop(&self) -> GestureResult<()> {
        let Some(session_id) = self.close_session().await else {
            return Ok(());
        };

        if let Some(handle) = self.loop_handle.lock().await.take() {
            handle.abort();
        }

        info!("Stopped gesture tracking for session {}", session_id);
        Ok(())
    }

    /// Open a session without scheduling ticks. `tick` may then be driven by hand.
    pub async fn open_session(&self) -> GestureResult<Uuid> {
        let mut current = self.current_session_id.write().await;
        if current.is_some() {
            return Err(GestureError::AlreadyRunning);
        }

        let session_id = Uuid::new_v4();
        *current = Some(session_id);
        Ok(session_id)
    }

    /// Close the current session and return the display to idle
    pub async fn close_session(&self) -> Option<Uuid> {
        let mut current = self.current_session_id.write().await;
        let session_id = current.take()?;
        self.publisher.reset();
        Some(session_id)
    }

    pub async fn is_running(&self) -> bool {
        self.current_session_id.read().await.is_some()
    }

    pub async fn session_id(&self) -> Option<Uuid> {
        *self.current_session_id.read().await
    }

    /// Run one tick. Returns `None` when there is no session or the camera is
    /// not ready; otherwise the handle of the spawned tick task.
    pub async fn tick(&self) -> Option<JoinHandle<()>> {
        let session_id = (*self.current_session_id.read().await)?;

        if !self.camera.is_ready() {
            trace!("Camera not ready, skipping tick");
            return None;
        }
        let frame = self.camera.current_frame()?;

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let controller = self.clone();
        Some(tokio::spawn(async move {
            controller.resolve_tick(seq, session_id, frame).await;
        }))
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.publisher.subscribe()
    }

    pub fn state(&self) -> DisplayState {
        self.publisher.current()
    }

    pub fn estimator(&self) -> &GestureEstimator {
        &self.estimator
    }

    async fn run_loop(&self, session_id: Uuid) {
        let mut interval = tokio::time::interval(self.tick_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if *self.current_session_id.read().await != Some(session_id) {
                break;
            }
            // Tick tasks run detached; ordering is settled at publish time
            let _ = self.tick().await;
        }
    }

    async fn resolve_tick(&self, seq: u64, session_id: Uuid, frame: VideoFrame) {
        let outcome = match tokio::time::timeout(
            self.estimate_timeout,
            self.model.estimate_hands(&frame),
        )
        .await
        {
            Ok(Ok(hands)) => match hands.into_iter().next() {
                Some(landmarks) => {
                    let estimate = self.estimator.estimate(&landmarks);
                    TickOutcome::Hand {
                        landmarks,
                        selection: estimate.selection,
                    }
                }
                None => TickOutcome::NoHand,
            },
            Ok(Err(e)) => {
                warn!("Hand pose estimate failed on tick {}: {}", seq, e);
                TickOutcome::NoHand
            }
            Err(_) => {
                warn!(
                    "Hand pose estimate on tick {} exceeded {:?}",
                    seq, self.estimate_timeout
                );
                TickOutcome::NoHand
            }
        };

        // Hold the session lock while publishing so a concurrent stop cannot interleave
        let current = self.current_session_id.read().await;
        if *current != Some(session_id) {
            debug!("Discarding tick {} from closed session {}", seq, session_id);
            return;
        }
        self.publisher.publish(seq, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::NoHandPolicy;
    use crate::core::display::TrackerState;
    use crate::core::fixtures::*;
    use crate::core::gesture_registry::{THUMBS_UP, VICTORY};
    use crate::models::gesture::SelectionResult;
    use crate::models::hand::LandmarkSet;
    use crate::platform::camera::SyntheticCamera;
    use crate::platform::pose::ReplayHandPose;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    type Reply = GestureResult<Vec<LandmarkSet>>;

    /// Answers each call with the next scripted reply
    struct ScriptedModel {
        replies: std::sync::Mutex<VecDeque<Reply>>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: std::sync::Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HandPoseModel for ScriptedModel {
        async fn estimate_hands(&self, _frame: &VideoFrame) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.replies.lock().unwrap().pop_front();
            reply.unwrap_or_else(|| Ok(vec![]))
        }

        fn model_info(&self) -> String {
            "scripted".to_string()
        }
    }

    /// Each call waits until the test releases its gate
    struct GatedModel {
        gates: std::sync::Mutex<VecDeque<oneshot::Receiver<Reply>>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HandPoseModel for GatedModel {
        async fn estimate_hands(&self, _frame: &VideoFrame) -> Reply {
            let gate = self.gates.lock().unwrap().pop_front();
            self.calls.fetch_add(1, Ordering::SeqCst);
            match gate {
                Some(rx) => rx.await.unwrap_or_else(|_| Ok(vec![])),
                None => Ok(vec![]),
            }
        }

        fn model_info(&self) -> String {
            "gated".to_string()
        }
    }

    /// Never answers within any reasonable timeout
    struct StuckModel;

    #[async_trait]
    impl HandPoseModel for StuckModel {
        async fn estimate_hands(&self, _frame: &VideoFrame) -> Reply {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(vec![])
        }

        fn model_info(&self) -> String {
            "stuck".to_string()
        }
    }

    fn build_controller(model: Arc<dyn HandPoseModel>, camera: Arc<dyn CameraSource>, config: Config) -> GestureController {
        let estimator = GestureEstimator::with_default_vocabulary(config.confidence_floor).unwrap();
        GestureController::new(model, camera, estimator, &config)
    }

    fn ready_camera() -> Arc<dyn CameraSource> {
        Arc::new(SyntheticCamera::ready(64, 48))
    }

    async fn wait_for_calls(calls: &AtomicUsize, n: usize) {
        while calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_thumbs_up_tick_publishes_detection() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(vec![thumbs_up_hand().build()])]));
        let controller = build_controller(model, ready_camera(), Config::default());
        controller.open_session().await.unwrap();

        controller.tick().await.unwrap().await.unwrap();

        let state = controller.state();
        assert_eq!(state.seq, 1);
        assert_eq!(state.tracker, TrackerState::Tracking);
        assert!(state.landmarks.is_some());
        match state.selection {
            SelectionResult::Detected(score) => {
                assert_eq!(score.name, THUMBS_UP);
                assert!((score.confidence - 10.0).abs() < 1e-4);
            }
            other => panic!("expected thumbs up, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_only_first_hand_is_used() {
        let hands = vec![victory_hand().build(), thumbs_up_hand().build()];
        let model = Arc::new(ScriptedModel::new(vec![Ok(hands)]));
        let controller = build_controller(model, ready_camera(), Config::default());
        controller.open_session().await.unwrap();

        controller.tick().await.unwrap().await.unwrap();
        assert_eq!(controller.state().selection.gesture_name(), Some(VICTORY));
    }

    #[tokio::test]
    async fn test_camera_not_ready_never_calls_model() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let camera = Arc::new(SyntheticCamera::new(64, 48));
        let controller = build_controller(model.clone(), camera.clone(), Config::default());
        controller.open_session().await.unwrap();

        assert!(controller.tick().await.is_none());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.state(), DisplayState::default());

        camera.set_ready(true);
        controller.tick().await.unwrap().await.unwrap();
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tick_without_session_does_nothing() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let controller = build_controller(model.clone(), ready_camera(), Config::default());

        assert!(controller.tick().await.is_none());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_hands_follows_policy() {
        for (policy, expect_retained) in [(NoHandPolicy::Retain, true), (NoHandPolicy::Clear, false)] {
            let model = Arc::new(ScriptedModel::new(vec![
                Ok(vec![okay_hand().build()]),
                Ok(vec![]),
            ]));
            let config = Config {
                no_hand_policy: policy,
                ..Config::default()
            };
            let controller = build_controller(model, ready_camera(), config);
            controller.open_session().await.unwrap();

            controller.tick().await.unwrap().await.unwrap();
            assert_eq!(controller.state().tracker, TrackerState::Tracking);

            controller.tick().await.unwrap().await.unwrap();
            let state = controller.state();
            assert_eq!(state.tracker, TrackerState::Idle);
            assert!(state.landmarks.is_none());
            assert_eq!(state.selection.is_detected(), expect_retained, "{:?}", policy);
        }
    }

    #[tokio::test]
    async fn test_model_failure_is_swallowed() {
        let model = Arc::new(ScriptedModel::new(vec![
            Err(GestureError::EstimateFailed("model not loaded".to_string())),
            Ok(vec![victory_hand().build()]),
        ]));
        let controller = build_controller(model, ready_camera(), Config::default());
        controller.open_session().await.unwrap();

        controller.tick().await.unwrap().await.unwrap();
        let state = controller.state();
        assert_eq!(state.seq, 1);
        assert_eq!(state.tracker, TrackerState::Idle);

        controller.tick().await.unwrap().await.unwrap();
        assert_eq!(controller.state().selection.gesture_name(), Some(VICTORY));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overdue_estimate_counts_as_no_hand() {
        let config = Config {
            estimate_timeout_ms: 100,
            ..Config::default()
        };
        let controller = build_controller(Arc::new(StuckModel), ready_camera(), config);
        controller.open_session().await.unwrap();

        controller.tick().await.unwrap().await.unwrap();
        let state = controller.state();
        assert_eq!(state.seq, 1);
        assert_eq!(state.tracker, TrackerState::Idle);
    }

    #[tokio::test]
    async fn test_out_of_order_resolution_keeps_newer_tick() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let model = Arc::new(GatedModel {
            gates: std::sync::Mutex::new(VecDeque::from([first_rx, second_rx])),
            calls: AtomicUsize::new(0),
        });
        let controller = build_controller(model.clone(), ready_camera(), Config::default());
        controller.open_session().await.unwrap();

        let first = controller.tick().await.unwrap();
        wait_for_calls(&model.calls, 1).await;
        let second = controller.tick().await.unwrap();
        wait_for_calls(&model.calls, 2).await;

        second_tx.send(Ok(vec![victory_hand().build()])).unwrap();
        second.await.unwrap();
        assert_eq!(controller.state().selection.gesture_name(), Some(VICTORY));

        first_tx.send(Ok(vec![thumbs_up_hand().build()])).unwrap();
        first.await.unwrap();

        let state = controller.state();
        assert_eq!(state.seq, 2);
        assert_eq!(state.selection.gesture_name(), Some(VICTORY));
    }

    #[tokio::test]
    async fn test_result_after_stop_is_discarded() {
        let (tx, rx) = oneshot::channel();
        let model = Arc::new(GatedModel {
            gates: std::sync::Mutex::new(VecDeque::from([rx])),
            calls: AtomicUsize::new(0),
        });
        let controller = build_controller(model.clone(), ready_camera(), Config::default());
        controller.open_session().await.unwrap();

        let pending = controller.tick().await.unwrap();
        wait_for_calls(&model.calls, 1).await;
        controller.stop().await.unwrap();

        tx.send(Ok(vec![thumbs_up_hand().build()])).unwrap();
        pending.await.unwrap();

        let state = controller.state();
        assert_eq!(state.seq, 0);
        assert_eq!(state.selection, SelectionResult::NoGesture);
        assert!(!controller.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sampling_loop_runs_until_stopped() {
        let model = Arc::new(ReplayHandPose::new(vec![vec![thumbs_up_hand().build()]]));
        let controller = build_controller(model, ready_camera(), Config::default());

        let session = controller.start().await.unwrap();
        assert_eq!(controller.session_id().await, Some(session));
        assert!(matches!(controller.start().await, Err(GestureError::AlreadyRunning)));

        tokio::time::sleep(Duration::from_millis(55)).await;
        let state = controller.state();
        assert!(state.seq >= 2, "seq {}", state.seq);
        assert_eq!(state.tracker, TrackerState::Tracking);
        assert_eq!(state.selection.gesture_name(), Some(THUMBS_UP));

        controller.stop().await.unwrap();
        let stopped_at = controller.state();
        assert_eq!(stopped_at.tracker, TrackerState::Idle);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(controller.state().seq, stopped_at.seq);

        // A fresh session can be opened after stopping
        assert_ne!(controller.start().await.unwrap(), session);
        controller.stop().await.unwrap();
    }
}
