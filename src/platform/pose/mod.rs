// Hand pose estimation platform integration
// Provides the pose model bridge and its built-in backends

pub mod hand_pose_bridge;

pub use hand_pose_bridge::{HandPoseModel, NullHandPose, ReplayHandPose};
