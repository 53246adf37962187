//! Gesture vocabulary: named templates of accepted finger curls and directions.
//!
//! A [`GestureDescriptor`] lists, for every finger, which curl states and
//! which pointing directions count as a match and how much each contributes.
//! The [`GestureRegistry`] is an ordered, append-only set of descriptors built
//! once at startup; its order is the tie-break order used by the selector.

use serde::Serialize;

use crate::models::gesture::{GestureError, GestureResult};
use crate::models::hand::{Finger, FingerCurl, FingerDirection, FINGER_COUNT};

/// Accepted states for a single finger within one descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FingerConstraint {
    pub curls: Vec<(FingerCurl, f32)>,
    pub directions: Vec<(FingerDirection, f32)>,
    /// Relative importance of this finger in the aggregate score
    pub weight: f32,
}

impl Default for FingerConstraint {
    fn default() -> Self {
        Self {
            curls: Vec::new(),
            directions: Vec::new(),
            weight: 1.0,
        }
    }
}

impl FingerConstraint {
    /// Weight of `curl` if accepted, otherwise zero
    pub fn curl_weight(&self, curl: FingerCurl) -> f32 {
        best_weight(&self.curls, curl)
    }

    /// Weight of `direction` if accepted, otherwise zero
    pub fn direction_weight(&self, direction: FingerDirection) -> f32 {
        best_weight(&self.directions, direction)
    }
}

fn best_weight<T: PartialEq + Copy>(accepted: &[(T, f32)], observed: T) -> f32 {
    accepted
        .iter()
        .filter(|(state, _)| *state == observed)
        .map(|(_, weight)| *weight)
        .fold(0.0, f32::max)
}

/// A named gesture template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureDescriptor {
    name: String,
    fingers: [FingerConstraint; FINGER_COUNT],
}

impl GestureDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fingers: Default::default(),
        }
    }

    pub fn curl(mut self, finger: Finger, curl: FingerCurl, weight: f32) -> Self {
        self.fingers[finger.index()].curls.push((curl, weight));
        self
    }

    pub fn direction(mut self, finger: Finger, direction: FingerDirection, weight: f32) -> Self {
        self.fingers[finger.index()].directions.push((direction, weight));
        self
    }

    /// Same curl for several fingers at once
    pub fn curls(mut self, fingers: &[Finger], curl: FingerCurl, weight: f32) -> Self {
        for finger in fingers {
            self = self.curl(*finger, curl, weight);
        }
        self
    }

    /// Same direction for several fingers at once
    pub fn directions(mut self, fingers: &[Finger], direction: FingerDirection, weight: f32) -> Self {
        for finger in fingers {
            self = self.direction(*finger, direction, weight);
        }
        self
    }

    pub fn finger_weight(mut self, finger: Finger, weight: f32) -> Self {
        self.fingers[finger.index()].weight = weight;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraint(&self, finger: Finger) -> &FingerConstraint {
        &self.fingers[finger.index()]
    }

    /// Every finger must accept at least one curl and one direction, and all
    /// weights must be positive (state weights at most 1.0).
    pub fn validate(&self) -> GestureResult<()> {
        for finger in Finger::ALL {
            let constraint = self.constraint(finger);
            if constraint.curls.is_empty() {
                return Err(self.incomplete(finger, "curl"));
            }
            if constraint.directions.is_empty() {
                return Err(self.incomplete(finger, "direction"));
            }

            let state_weights = constraint
                .curls
                .iter()
                .map(|(_, w)| *w)
                .chain(constraint.directions.iter().map(|(_, w)| *w));
            for weight in state_weights {
                if !(weight > 0.0 && weight <= 1.0) {
                    return Err(self.invalid_weight(weight));
                }
            }
            if !(constraint.weight > 0.0 && constraint.weight.is_finite()) {
                return Err(self.invalid_weight(constraint.weight));
            }
        }
        Ok(())
    }

    fn incomplete(&self, finger: Finger, aspect: &'static str) -> GestureError {
        GestureError::IncompleteDescriptor {
            gesture: self.name.clone(),
            finger: finger.as_str(),
            aspect,
        }
    }

    fn invalid_weight(&self, weight: f32) -> GestureError {
        GestureError::InvalidWeight {
            gesture: self.name.clone(),
            weight,
        }
    }
}

// ==============================================================================
// Registry
// ==============================================================================

/// Ordered, append-only collection of gesture descriptors
#[derive(Debug, Clone, Default)]
pub struct GestureRegistry {
    descriptors: Vec<GestureDescriptor>,
}

impl GestureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor, rejecting duplicate names and incomplete templates
    pub fn register(&mut self, descriptor: GestureDescriptor) -> GestureResult<()> {
        descriptor.validate()?;
        if self.get(descriptor.name()).is_some() {
            return Err(GestureError::DuplicateGesture(descriptor.name().to_string()));
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Chainable form of [`register`](Self::register)
    pub fn with(mut self, descriptor: GestureDescriptor) -> GestureResult<Self> {
        self.register(descriptor)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&GestureDescriptor> {
        self.descriptors.iter().find(|d| d.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureDescriptor> {
        self.descriptors.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// The six built-in gestures, in display priority order
    pub fn default_vocabulary() -> GestureResult<Self> {
        GestureRegistry::new()
            .with(thumbs_up())?
            .with(victory())?
            .with(i_love_you())?
            .with(point_left())?
            .with(point_right())?
            .with(okay())
    }
}

// ==============================================================================
// Built-in vocabulary
// ==============================================================================

use crate::models::hand::Finger::{Index, Middle, Pinky, Ring, Thumb};
use crate::models::hand::FingerCurl::{FullCurl, HalfCurl, NoCurl};
use crate::models::hand::FingerDirection::{
    DiagonalDownLeft, DiagonalDownRight, DiagonalUpLeft, DiagonalUpRight, Down, Left, Right, Up,
};

pub const THUMBS_UP: &str = "thumbs_up";
pub const VICTORY: &str = "victory";
pub const I_LOVE_YOU: &str = "i_love_you";
pub const POINT_LEFT: &str = "point_left";
pub const POINT_RIGHT: &str = "point_right";
pub const OKAY: &str = "okay";

/// Names of the built-in vocabulary in registration order
pub const DEFAULT_GESTURES: [&str; 6] = [THUMBS_UP, VICTORY, I_LOVE_YOU, POINT_LEFT, POINT_RIGHT, OKAY];

/// Curled fingers folded toward the palm, seen from the side
fn curled_sideways(d: GestureDescriptor, fingers: &[Finger]) -> GestureDescriptor {
    d.curls(fingers, FullCurl, 1.0)
        .curls(fingers, HalfCurl, 0.9)
        .directions(fingers, Left, 1.0)
        .directions(fingers, Right, 1.0)
        .directions(fingers, DiagonalUpLeft, 0.9)
        .directions(fingers, DiagonalUpRight, 0.9)
}

/// Curled fingers folded down over an upright palm
fn curled_down(d: GestureDescriptor, fingers: &[Finger]) -> GestureDescriptor {
    d.curls(fingers, FullCurl, 1.0)
        .curls(fingers, HalfCurl, 0.9)
        .directions(fingers, Down, 1.0)
        .directions(fingers, DiagonalDownLeft, 0.9)
        .directions(fingers, DiagonalDownRight, 0.9)
}

/// Straight fingers pointing up
fn extended_up(d: GestureDescriptor, fingers: &[Finger]) -> GestureDescriptor {
    d.curls(fingers, NoCurl, 1.0)
        .directions(fingers, Up, 1.0)
        .directions(fingers, DiagonalUpLeft, 0.9)
        .directions(fingers, DiagonalUpRight, 0.9)
}

/// Thumb held out to the side of the hand
fn thumb_out(d: GestureDescriptor) -> GestureDescriptor {
    d.direction(Thumb, Left, 1.0)
        .direction(Thumb, Right, 1.0)
        .direction(Thumb, DiagonalUpLeft, 0.9)
        .direction(Thumb, DiagonalUpRight, 0.9)
}

pub fn thumbs_up() -> GestureDescriptor {
    let d = GestureDescriptor::new(THUMBS_UP)
        .curl(Thumb, NoCurl, 1.0)
        .direction(Thumb, Up, 1.0)
        .direction(Thumb, DiagonalUpLeft, 0.9)
        .direction(Thumb, DiagonalUpRight, 0.9);
    curled_sideways(d, &[Index, Middle, Ring, Pinky])
}

pub fn victory() -> GestureDescriptor {
    let d = GestureDescriptor::new(VICTORY)
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, NoCurl, 0.5)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, DiagonalUpLeft, 1.0)
        .direction(Index, DiagonalUpRight, 1.0)
        .direction(Index, Up, 0.9)
        .curl(Middle, NoCurl, 1.0)
        .direction(Middle, Up, 1.0)
        .direction(Middle, DiagonalUpLeft, 0.9)
        .direction(Middle, DiagonalUpRight, 0.9)
        .finger_weight(Index, 2.0)
        .finger_weight(Middle, 2.0);
    curled_down(thumb_out(d), &[Ring, Pinky])
}

pub fn i_love_you() -> GestureDescriptor {
    let d = GestureDescriptor::new(I_LOVE_YOU).curl(Thumb, NoCurl, 1.0);
    let d = extended_up(thumb_out(d), &[Index, Pinky]);
    curled_down(d, &[Middle, Ring])
}

pub fn point_left() -> GestureDescriptor {
    GestureDescriptor::new(POINT_LEFT)
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, NoCurl, 0.8)
        .direction(Thumb, Left, 1.0)
        .direction(Thumb, DiagonalUpLeft, 1.0)
        .direction(Thumb, Up, 0.8)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, Left, 1.0)
        .direction(Index, DiagonalUpLeft, 0.8)
        .direction(Index, DiagonalDownLeft, 0.8)
        .finger_weight(Index, 2.0)
        .curls(&[Middle, Ring, Pinky], FullCurl, 1.0)
        .curls(&[Middle, Ring, Pinky], HalfCurl, 0.9)
        .directions(&[Middle, Ring, Pinky], Right, 1.0)
        .directions(&[Middle, Ring, Pinky], DiagonalDownRight, 0.9)
        .directions(&[Middle, Ring, Pinky], Down, 0.8)
}

pub fn point_right() -> GestureDescriptor {
    GestureDescriptor::new(POINT_RIGHT)
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, NoCurl, 0.8)
        .direction(Thumb, Right, 1.0)
        .direction(Thumb, DiagonalUpRight, 1.0)
        .direction(Thumb, Up, 0.8)
        .curl(Index, NoCurl, 1.0)
        .direction(Index, Right, 1.0)
        .direction(Index, DiagonalUpRight, 0.8)
        .direction(Index, DiagonalDownRight, 0.8)
        .finger_weight(Index, 2.0)
        .curls(&[Middle, Ring, Pinky], FullCurl, 1.0)
        .curls(&[Middle, Ring, Pinky], HalfCurl, 0.9)
        .directions(&[Middle, Ring, Pinky], Left, 1.0)
        .directions(&[Middle, Ring, Pinky], DiagonalDownLeft, 0.9)
        .directions(&[Middle, Ring, Pinky], Down, 0.8)
}

pub fn okay() -> GestureDescriptor {
    let d = GestureDescriptor::new(OKAY)
        .curl(Thumb, HalfCurl, 1.0)
        .curl(Thumb, NoCurl, 0.8)
        .direction(Thumb, Up, 1.0)
        .direction(Thumb, DiagonalUpLeft, 0.9)
        .direction(Thumb, DiagonalUpRight, 0.9)
        // Index bends over to meet the thumb tip
        .curl(Index, HalfCurl, 1.0)
        .curl(Index, FullCurl, 0.8)
        .direction(Index, Up, 1.0)
        .direction(Index, DiagonalUpLeft, 0.9)
        .direction(Index, DiagonalUpRight, 0.9)
        .direction(Index, Left, 0.7)
        .direction(Index, Right, 0.7)
        .finger_weight(Index, 2.0);
    extended_up(d, &[Middle, Ring, Pinky])
}
