// Rendering boundary: landmark skeleton plus the icon of the selected gesture

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::display::DisplayState;
use crate::core::gesture_registry::GestureRegistry;
use crate::models::gesture::{GestureError, GestureResult, SelectionResult};
use crate::models::hand::LandmarkSet;

use crate::models::hand::HandLandmark::*;

/// Bone segments of the hand skeleton (parent, child), by landmark index
pub const HAND_BONES: [(usize, usize); 21] = [
    (Wrist as usize, ThumbCmc as usize),
    (ThumbCmc as usize, ThumbMcp as usize),
    (ThumbMcp as usize, ThumbIp as usize),
    (ThumbIp as usize, ThumbTip as usize),
    (Wrist as usize, IndexFingerMcp as usize),
    (IndexFingerMcp as usize, IndexFingerPip as usize),
    (IndexFingerPip as usize, IndexFingerDip as usize),
    (IndexFingerDip as usize, IndexFingerTip as usize),
    (Wrist as usize, MiddleFingerMcp as usize),
    (MiddleFingerMcp as usize, MiddleFingerPip as usize),
    (MiddleFingerPip as usize, MiddleFingerDip as usize),
    (MiddleFingerDip as usize, MiddleFingerTip as usize),
    (Wrist as usize, RingFingerMcp as usize),
    (RingFingerMcp as usize, RingFingerPip as usize),
    (RingFingerPip as usize, RingFingerDip as usize),
    (RingFingerDip as usize, RingFingerTip as usize),
    (Wrist as usize, PinkyMcp as usize),
    (PinkyMcp as usize, PinkyPip as usize),
    (PinkyPip as usize, PinkyDip as usize),
    (PinkyDip as usize, PinkyTip as usize),
    (IndexFingerMcp as usize, MiddleFingerMcp as usize),
];

const BONE_COLOR: Rgba<u8> = Rgba([255, 215, 0, 255]);
const JOINT_COLOR: Rgba<u8> = Rgba([220, 20, 60, 255]);
const JOINT_RADIUS: i32 = 3;

// ==============================================================================
// Icons
// ==============================================================================

/// Icon image per registered gesture, `<icon_dir>/<gesture name>.png`
#[derive(Debug, Clone)]
pub struct IconTable {
    icons: HashMap<String, PathBuf>,
}

impl IconTable {
    pub fn from_registry(icon_dir: &Path, registry: &GestureRegistry) -> Self {
        let icons = registry
            .names()
            .into_iter()
            .map(|name| (name.to_string(), icon_dir.join(format!("{}.png", name))))
            .collect();
        Self { icons }
    }

    pub fn icon_path(&self, gesture: &str) -> Option<&Path> {
        self.icons.get(gesture).map(PathBuf::as_path)
    }

    /// Icon to show for a selection; `None` hides the icon
    pub fn for_selection(&self, selection: &SelectionResult) -> Option<&Path> {
        selection.gesture_name().and_then(|name| self.icon_path(name))
    }
}

// ==============================================================================
// Overlay surfaces
// ==============================================================================

/// Something that can show the published display state
pub trait OverlaySurface: Send + Sync {
    fn present(&self, state: &DisplayState) -> GestureResult<()>;
}

/// Draws the skeleton into an RGBA canvas the size of the camera frame and
/// tracks which icon is currently shown.
pub struct RasterOverlay {
    icons: IconTable,
    canvas: Mutex<RgbaImage>,
    shown_icon: Mutex<Option<PathBuf>>,
}

impl RasterOverlay {
    pub fn new(width: u32, height: u32, icons: IconTable) -> Self {
        Self {
            icons,
            canvas: Mutex::new(RgbaImage::new(width, height)),
            shown_icon: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> GestureResult<RgbaImage> {
        Ok(self.lock_canvas()?.clone())
    }

    pub fn shown_icon(&self) -> Option<PathBuf> {
        self.shown_icon.lock().ok().and_then(|icon| icon.clone())
    }

    /// Write the current canvas as a PNG
    pub fn save_png(&self, path: &Path) -> GestureResult<()> {
        self.lock_canvas()?.save(path)?;
        Ok(())
    }

    fn lock_canvas(&self) -> GestureResult<std::sync::MutexGuard<'_, RgbaImage>> {
        self.canvas
            .lock()
            .map_err(|_| GestureError::RenderFailed("Overlay canvas lock poisoned".to_string()))
    }
}

impl OverlaySurface for RasterOverlay {
    fn present(&self, state: &DisplayState) -> GestureResult<()> {
        {
            let mut canvas = self.lock_canvas()?;
            canvas.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));
            if let Some(landmarks) = &state.landmarks {
                draw_hand(&mut canvas, landmarks);
            }
        }

        let icon = self.icons.for_selection(&state.selection).map(Path::to_path_buf);
        let mut shown = self
            .shown_icon
            .lock()
            .map_err(|_| GestureError::RenderFailed("Icon lock poisoned".to_string()))?;
        if *shown != icon {
            debug!("Overlay icon changed to {:?}", icon);
            *shown = icon;
        }
        Ok(())
    }
}

/// Logs gesture changes instead of drawing; used for headless runs
pub struct TracingOverlay {
    icons: IconTable,
    last_gesture: Mutex<Option<String>>,
}

impl TracingOverlay {
    pub fn new(icons: IconTable) -> Self {
        Self {
            icons,
            last_gesture: Mutex::new(None),
        }
    }

    pub fn last_gesture(&self) -> Option<String> {
        self.last_gesture.lock().ok().and_then(|g| g.clone())
    }
}

impl OverlaySurface for TracingOverlay {
    fn present(&self, state: &DisplayState) -> GestureResult<()> {
        let gesture = state.selection.gesture_name().map(str::to_string);
        let mut last = self
            .last_gesture
            .lock()
            .map_err(|_| GestureError::RenderFailed("Gesture lock poisoned".to_string()))?;

        if *last == gesture {
            return Ok(());
        }

        match (&gesture, state.selection.confidence()) {
            (Some(name), Some(confidence)) => info!(
                "Showing {} ({:.1}/10) icon {}",
                name,
                confidence,
                self.icons
                    .icon_path(name)
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<none>".to_string())
            ),
            _ => info!("Gesture icon hidden ({:?})", state.tracker),
        }
        *last = gesture;
        Ok(())
    }
}

/// Present every published state change on `surface` until the publisher goes away
pub fn spawn_renderer(
    mut rx: watch::Receiver<DisplayState>,
    surface: Arc<dyn OverlaySurface>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let state = rx.borrow_and_update().clone();
            if let Err(e) = surface.present(&state) {
                warn!("Failed to present overlay for tick {}: {}", state.seq, e);
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}

// ==============================================================================
// Drawing
// ==============================================================================

fn draw_hand(canvas: &mut RgbaImage, landmarks: &LandmarkSet) {
    let (width, height) = (canvas.width() as f32, canvas.height() as f32);
    let points = landmarks.points();

    for (from, to) in HAND_BONES {
        let a = (points[from].x, points[from].y);
        let b = (points[to].x, points[to].y);
        if let Some((start, end)) = clip_segment(a, b, width, height) {
            draw_line_segment_mut(canvas, start, end, BONE_COLOR);
        }
    }

    let reach = JOINT_RADIUS as f32;
    for point in points {
        let visible = point.x.is_finite()
            && point.y.is_finite()
            && (-reach..width + reach).contains(&point.x)
            && (-reach..height + reach).contains(&point.y);
        if visible {
            let center = (point.x.round() as i32, point.y.round() as i32);
            draw_filled_circle_mut(canvas, center, JOINT_RADIUS, JOINT_COLOR);
        }
    }
}

/// Liang-Barsky clip of segment `a -> b` to the canvas rectangle.
/// Returns `None` for segments entirely outside or with non-finite ends.
fn clip_segment(
    a: (f32, f32),
    b: (f32, f32),
    width: f32,
    height: f32,
) -> Option<((f32, f32), (f32, f32))> {
    if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    let edges = [
        (-dx, a.0),
        (dx, width - 1.0 - a.0),
        (-dy, a.1),
        (dy, height - 1.0 - a.1),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}
