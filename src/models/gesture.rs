// Data models for gesture scores, selection results, and gesture errors

use serde::{Deserialize, Serialize};

/// Upper bound of the confidence scale
pub const MAX_CONFIDENCE: f32 = 10.0;

// ==============================================================================
// Scores
// ==============================================================================

/// Confidence of one registered gesture for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureScore {
    pub name: String,
    pub confidence: f32, // [0, 10]
}

impl GestureScore {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// The externally visible per-frame outcome of the estimation engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionResult {
    #[default]
    NoGesture,
    Detected(GestureScore),
}

impl SelectionResult {
    pub fn gesture_name(&self) -> Option<&str> {
        match self {
            SelectionResult::NoGesture => None,
            SelectionResult::Detected(score) => Some(score.name.as_str()),
        }
    }

    pub fn confidence(&self) -> Option<f32> {
        match self {
            SelectionResult::NoGesture => None,
            SelectionResult::Detected(score) => Some(score.confidence),
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, SelectionResult::Detected(_))
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    #[error("Malformed landmark set: expected {expected} points, got {actual}")]
    MalformedLandmarks { expected: usize, actual: usize },

    #[error("Gesture already registered: {0}")]
    DuplicateGesture(String),

    #[error("Gesture {gesture} has no accepted {aspect} for the {finger}")]
    IncompleteDescriptor {
        gesture: String,
        finger: &'static str,
        aspect: &'static str,
    },

    #[error("Invalid weight {weight} in gesture {gesture}")]
    InvalidWeight { gesture: String, weight: f32 },

    #[error("Gesture tracking already running")]
    AlreadyRunning,

    #[error("Hand pose estimate failed: {0}")]
    EstimateFailed(String),

    #[error("Failed to load landmark recording: {0}")]
    ReplayLoadFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Overlay render failed: {0}")]
    RenderFailed(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type GestureResult<T> = Result<T, GestureError>;
