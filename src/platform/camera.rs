// Camera source boundary: readiness and the current video frame

use std::sync::atomic::{AtomicBool, Ordering};

/// One video frame handed to the pose model
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub timestamp: i64,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

/// Pixel format of camera frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    RGBA8,
    BGRA8,
}

/// Camera collaborator. The controller only asks for frames once the source
/// reports known dimensions.
pub trait CameraSource: Send + Sync {
    /// Frame dimensions, or `None` while the stream has not started
    fn dimensions(&self) -> Option<(u32, u32)>;

    /// The frame currently on screen
    fn current_frame(&self) -> Option<VideoFrame>;

    fn is_ready(&self) -> bool {
        self.dimensions().is_some()
    }
}

/// Camera producing blank frames of a fixed size, with a readiness switch.
/// Stands in for a real device when the pose model does not read pixels.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    ready: AtomicBool,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ready: AtomicBool::new(false),
        }
    }

    /// A camera whose stream is already running
    pub fn ready(width: u32, height: u32) -> Self {
        let camera = Self::new(width, height);
        camera.set_ready(true);
        camera
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }
}

impl CameraSource for SyntheticCamera {
    fn dimensions(&self) -> Option<(u32, u32)> {
        if self.ready.load(Ordering::SeqCst) {
            Some((self.width, self.height))
        } else {
            None
        }
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        let (width, height) = self.dimensions()?;
        Some(VideoFrame {
            timestamp: chrono::Utc::now().timestamp_millis(),
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
            format: PixelFormat::RGBA8,
        })
    }
}
