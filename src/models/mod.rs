// Data models for hand landmarks, gesture scoring, and published display state

pub mod gesture;
pub mod hand;

pub use gesture::{GestureError, GestureResult, GestureScore, SelectionResult, MAX_CONFIDENCE};
pub use hand::{
    Finger, FingerCurl, FingerDirection, FingerFeatures, HandLandmark, Landmark, LandmarkSet,
    FINGER_COUNT, LANDMARK_COUNT,
};
