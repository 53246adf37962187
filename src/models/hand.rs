// Data models for hand landmarks and the per-finger features derived from them

use serde::{Deserialize, Serialize};

use crate::models::gesture::{GestureError, GestureResult};

/// Number of landmarks in one hand skeleton
pub const LANDMARK_COUNT: usize = 21;

/// Number of fingers tracked per hand
pub const FINGER_COUNT: usize = 5;

// ==============================================================================
// Landmarks (21 keypoints per hand)
// ==============================================================================

/// A single 3D keypoint on the hand skeleton
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32, // Image space, grows to the right
    pub y: f32, // Image space, grows downward
    pub z: f32, // Depth relative to the wrist
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub(crate) fn sub(&self, other: &Landmark) -> [f32; 3] {
        [self.x - other.x, self.y - other.y, self.z - other.z]
    }
}

/// Hand landmark indices (21 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The full 21-point skeleton for one detected hand in one frame.
///
/// The fixed array makes a wrong point count unrepresentable; the only way in
/// from a dynamically sized source is [`LandmarkSet::try_from`], which rejects
/// anything that is not exactly 21 points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from raw `[x, y, z]` triples as produced by pose models
    pub fn from_triples(triples: &[[f32; 3]]) -> GestureResult<Self> {
        let points: Vec<Landmark> = triples
            .iter()
            .map(|[x, y, z]| Landmark::new(*x, *y, *z))
            .collect();
        Self::try_from(points)
    }

    pub fn get(&self, landmark: HandLandmark) -> &Landmark {
        &self.points[landmark.index()]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> &Landmark {
        self.get(HandLandmark::Wrist)
    }

    /// The four landmarks of a finger, base first, tip last
    pub fn finger(&self, finger: Finger) -> [Landmark; 4] {
        finger.joints().map(|j| self.points[j.index()])
    }
}

impl std::ops::Index<HandLandmark> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, landmark: HandLandmark) -> &Landmark {
        self.get(landmark)
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = GestureError;

    fn try_from(points: Vec<Landmark>) -> GestureResult<Self> {
        let actual = points.len();
        let points: [Landmark; LANDMARK_COUNT] =
            points
                .try_into()
                .map_err(|_| GestureError::MalformedLandmarks {
                    expected: LANDMARK_COUNT,
                    actual,
                })?;
        Ok(Self { points })
    }
}

impl From<LandmarkSet> for Vec<Landmark> {
    fn from(set: LandmarkSet) -> Self {
        set.points.to_vec()
    }
}

// ==============================================================================
// Fingers
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

impl Finger {
    pub const ALL: [Finger; FINGER_COUNT] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Landmarks along the finger from base to tip
    pub fn joints(self) -> [HandLandmark; 4] {
        use HandLandmark::*;
        match self {
            Finger::Thumb => [ThumbCmc, ThumbMcp, ThumbIp, ThumbTip],
            Finger::Index => [IndexFingerMcp, IndexFingerPip, IndexFingerDip, IndexFingerTip],
            Finger::Middle => [MiddleFingerMcp, MiddleFingerPip, MiddleFingerDip, MiddleFingerTip],
            Finger::Ring => [RingFingerMcp, RingFingerPip, RingFingerDip, RingFingerTip],
            Finger::Pinky => [PinkyMcp, PinkyPip, PinkyDip, PinkyTip],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }
}

// ==============================================================================
// Per-finger features
// ==============================================================================

/// Degree of finger flexion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerCurl {
    NoCurl,
    HalfCurl,
    FullCurl,
}

/// Quantized pointing direction in the image plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerDirection {
    Up,
    Down,
    Left,
    Right,
    DiagonalUpLeft,
    DiagonalUpRight,
    DiagonalDownLeft,
    DiagonalDownRight,
}

impl FingerDirection {
    /// Directions ordered counter-clockwise starting at Right, one per 45° sector
    pub const COMPASS: [FingerDirection; 8] = [
        FingerDirection::Right,
        FingerDirection::DiagonalUpRight,
        FingerDirection::Up,
        FingerDirection::DiagonalUpLeft,
        FingerDirection::Left,
        FingerDirection::DiagonalDownLeft,
        FingerDirection::Down,
        FingerDirection::DiagonalDownRight,
    ];
}

/// Curl and direction for all five fingers of one hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerFeatures {
    pub curls: [FingerCurl; FINGER_COUNT],
    pub directions: [FingerDirection; FINGER_COUNT],
}

impl FingerFeatures {
    pub fn curl(&self, finger: Finger) -> FingerCurl {
        self.curls[finger.index()]
    }

    pub fn direction(&self, finger: Finger) -> FingerDirection {
        self.directions[finger.index()]
    }
}
