// Collaborator boundaries: camera source, hand pose model, overlay rendering

pub mod camera;
pub mod pose;
pub mod render;
