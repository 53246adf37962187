// Gesture estimation: features -> scores -> selection for one hand

use serde::Serialize;
use tracing::debug;

use crate::core::feature_extractor::extract;
use crate::core::gesture_registry::GestureRegistry;
use crate::core::gesture_scorer::score;
use crate::core::selector::select;
use crate::models::gesture::{GestureError, GestureResult, GestureScore, SelectionResult, MAX_CONFIDENCE};
use crate::models::hand::{FingerFeatures, LandmarkSet};

/// Everything computed for one hand in one frame
#[derive(Debug, Clone, Serialize)]
pub struct GestureEstimate {
    pub features: FingerFeatures,
    pub scores: Vec<GestureScore>,
    pub selection: SelectionResult,
}

/// Immutable estimation engine shared by all ticks
#[derive(Debug, Clone)]
pub struct GestureEstimator {
    registry: GestureRegistry,
    floor: f32,
}

impl GestureEstimator {
    pub fn new(registry: GestureRegistry, floor: f32) -> GestureResult<Self> {
        if !(0.0..=MAX_CONFIDENCE).contains(&floor) {
            return Err(GestureError::InvalidConfig(format!(
                "Confidence floor {} must be between 0 and {}",
                floor, MAX_CONFIDENCE
            )));
        }
        Ok(Self { registry, floor })
    }

    /// Built-in vocabulary with the given floor
    pub fn with_default_vocabulary(floor: f32) -> GestureResult<Self> {
        Self::new(GestureRegistry::default_vocabulary()?, floor)
    }

    pub fn estimate(&self, landmarks: &LandmarkSet) -> GestureEstimate {
        let features = extract(landmarks);
        let scores = score(&features, &self.registry);
        let selection = select(&scores, self.floor);

        debug!(
            "curls={:?} directions={:?} selection={:?}",
            features.curls, features.directions, selection
        );

        GestureEstimate {
            features,
            scores,
            selection,
        }
    }

    pub fn registry(&self) -> &GestureRegistry {
        &self.registry
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }
}
