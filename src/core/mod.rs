pub mod config;

// Gesture estimation pipeline
pub mod gesture_registry;
pub mod feature_extractor;
pub mod gesture_scorer;
pub mod selector;
pub mod estimator;

// Sampling loop and published display state
pub mod display;
pub mod controller;

#[cfg(test)]
pub(crate) mod fixtures;
