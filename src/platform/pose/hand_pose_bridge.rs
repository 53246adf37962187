// Hand pose model bridge
// Abstracts the external model that turns a video frame into hand landmarks

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

use crate::models::gesture::{GestureError, GestureResult};
use crate::models::hand::LandmarkSet;
use crate::platform::camera::VideoFrame;

/// Hand pose model bridge trait.
/// Implementations may fail transiently; callers treat a failure as "no hands".
#[async_trait]
pub trait HandPoseModel: Send + Sync {
    /// Estimate zero or more hands in `frame`
    async fn estimate_hands(&self, frame: &VideoFrame) -> GestureResult<Vec<LandmarkSet>>;

    /// Get model info
    fn model_info(&self) -> String;
}

// ==============================================================================
// Replay Implementation (recorded landmarks)
// ==============================================================================

/// Replays a landmark recording, one recorded frame per estimate, looping at the end.
///
/// The recording is JSON: a list of frames, each a list of hands, each a list
/// of 21 `[x, y, z]` triples.
pub struct ReplayHandPose {
    frames: Vec<Vec<LandmarkSet>>,
    cursor: AtomicUsize,
}

impl ReplayHandPose {
    pub fn new(frames: Vec<Vec<LandmarkSet>>) -> Self {
        Self {
            frames,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn from_json(json: &str) -> GestureResult<Self> {
        let raw: Vec<Vec<Vec<[f32; 3]>>> = serde_json::from_str(json)
            .map_err(|e| GestureError::ReplayLoadFailed(format!("Failed to parse recording: {}", e)))?;

        let frames = raw
            .iter()
            .map(|hands| {
                hands
                    .iter()
                    .map(|triples| LandmarkSet::from_triples(triples))
                    .collect::<GestureResult<Vec<_>>>()
            })
            .collect::<GestureResult<Vec<_>>>()?;

        info!("Loaded landmark recording with {} frames", frames.len());
        Ok(Self::new(frames))
    }

    pub fn from_file(path: &Path) -> GestureResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GestureError::ReplayLoadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[async_trait]
impl HandPoseModel for ReplayHandPose {
    async fn estimate_hands(&self, _frame: &VideoFrame) -> GestureResult<Vec<LandmarkSet>> {
        if self.frames.is_empty() {
            return Ok(vec![]);
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % self.frames.len();
        Ok(self.frames[index].clone())
    }

    fn model_info(&self) -> String {
        format!("Landmark replay ({} recorded frames)", self.frames.len())
    }
}

// ==============================================================================
// Null Implementation
// ==============================================================================

/// Model that never sees a hand
pub struct NullHandPose;

#[async_trait]
impl HandPoseModel for NullHandPose {
    async fn estimate_hands(&self, _frame: &VideoFrame) -> GestureResult<Vec<LandmarkSet>> {
        Ok(vec![])
    }

    fn model_info(&self) -> String {
        "Null hand pose model (no inference - pass a landmark recording to replay)".to_string()
    }
}
