//! Published display state shared between the sampling loop and renderers.
//!
//! Ticks may resolve out of order, so every update carries the sequence
//! number of the tick that produced it and is dropped unless it is newer than
//! what is already published.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::core::config::NoHandPolicy;
use crate::models::gesture::SelectionResult;
use crate::models::hand::LandmarkSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerState {
    /// No landmark data yet, or the hand is out of view
    Idle,
    /// A hand is currently detected
    Tracking,
}

/// What the rendering boundary should show
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    /// Sequence number of the tick that produced this state (0 = initial)
    pub seq: u64,
    pub tracker: TrackerState,
    pub selection: SelectionResult,
    pub landmarks: Option<LandmarkSet>,
    pub updated_at: i64,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            seq: 0,
            tracker: TrackerState::Idle,
            selection: SelectionResult::NoGesture,
            landmarks: None,
            updated_at: 0,
        }
    }
}

/// Result of one resolved tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    NoHand,
    Hand {
        landmarks: LandmarkSet,
        selection: SelectionResult,
    },
}

/// Single published value with last-writer-wins by tick sequence
#[derive(Clone)]
pub struct DisplayPublisher {
    tx: Arc<watch::Sender<DisplayState>>,
    policy: NoHandPolicy,
}

impl DisplayPublisher {
    pub fn new(policy: NoHandPolicy) -> Self {
        let (tx, _rx) = watch::channel(DisplayState::default());
        Self {
            tx: Arc::new(tx),
            policy,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> DisplayState {
        self.tx.borrow().clone()
    }

    /// Apply a tick's outcome. Returns false if a newer tick already published.
    pub fn publish(&self, seq: u64, outcome: TickOutcome) -> bool {
        let policy = self.policy;
        let now = chrono::Utc::now().timestamp_millis();

        self.tx.send_if_modified(|state| {
            if seq <= state.seq {
                debug!("Discarding stale tick {} (published {})", seq, state.seq);
                return false;
            }

            state.seq = seq;
            state.updated_at = now;
            match outcome {
                TickOutcome::Hand {
                    landmarks,
                    selection,
                } => {
                    state.tracker = TrackerState::Tracking;
                    state.landmarks = Some(landmarks);
                    state.selection = selection;
                }
                TickOutcome::NoHand => {
                    state.tracker = TrackerState::Idle;
                    state.landmarks = None;
                    if policy == NoHandPolicy::Clear {
                        state.selection = SelectionResult::NoGesture;
                    }
                }
            }
            true
        })
    }

    /// Return to the idle, empty display without rewinding the sequence
    pub fn reset(&self) {
        self.tx.send_if_modified(|state| {
            let cleared = DisplayState {
                seq: state.seq,
                updated_at: chrono::Utc::now().timestamp_millis(),
                ..DisplayState::default()
            };
            if state.tracker == cleared.tracker
                && state.selection == cleared.selection
                && state.landmarks.is_none()
            {
                return false;
            }
            *state = cleared;
            true
        });
    }
}
