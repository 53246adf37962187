// Soft scoring of finger features against every registered gesture

use crate::core::gesture_registry::{GestureDescriptor, GestureRegistry};
use crate::models::gesture::{GestureScore, MAX_CONFIDENCE};
use crate::models::hand::{Finger, FingerFeatures};

/// Score the observed features against each descriptor, in registry order.
///
/// Each finger contributes the mean of its matched curl weight and matched
/// direction weight (zero for an unmatched aspect). The finger partials are
/// averaged using the descriptor's finger weights and scaled to [0, 10].
pub fn score(features: &FingerFeatures, registry: &GestureRegistry) -> Vec<GestureScore> {
    registry
        .iter()
        .map(|descriptor| GestureScore::new(descriptor.name(), score_descriptor(features, descriptor)))
        .collect()
}

fn score_descriptor(features: &FingerFeatures, descriptor: &GestureDescriptor) -> f32 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for finger in Finger::ALL {
        let constraint = descriptor.constraint(finger);
        let curl = constraint.curl_weight(features.curl(finger));
        let direction = constraint.direction_weight(features.direction(finger));

        weighted += constraint.weight * (curl + direction) / 2.0;
        total_weight += constraint.weight;
    }

    if total_weight <= 0.0 {
        return 0.0;
    }
    (MAX_CONFIDENCE * weighted / total_weight).clamp(0.0, MAX_CONFIDENCE)
}
