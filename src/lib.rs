pub mod core;
pub mod models;
pub mod platform;

use crate::core::config::Config;
use crate::core::controller::GestureController;
use crate::core::estimator::GestureEstimator;
use crate::models::gesture::GestureResult;
use crate::platform::camera::CameraSource;
use crate::platform::pose::HandPoseModel;
use crate::platform::render::{spawn_renderer, OverlaySurface};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Run the overlay: start the sampling loop, render every published state on
/// `surface`, and stop after `run_for` or on Ctrl-C.
pub async fn run(
    config: &Config,
    estimator: GestureEstimator,
    model: Arc<dyn HandPoseModel>,
    camera: Arc<dyn CameraSource>,
    surface: Arc<dyn OverlaySurface>,
    run_for: Option<Duration>,
) -> GestureResult<()> {
    info!(
        "Gesture vocabulary: {} (floor {:.1})",
        estimator.registry().names().join(", "),
        estimator.floor()
    );

    let controller = GestureController::new(model, camera, estimator, config);
    drive(&controller, surface, run_for).await
}

/// Render `controller`'s published states on `surface` while its sampling
/// loop runs, until `run_for` elapses or Ctrl-C.
pub async fn drive(
    controller: &GestureController,
    surface: Arc<dyn OverlaySurface>,
    run_for: Option<Duration>,
) -> GestureResult<()> {
    let renderer = spawn_renderer(controller.subscribe(), surface);

    if let Err(e) = controller.start().await {
        renderer.abort();
        return Err(e);
    }

    match run_for {
        Some(duration) => tokio::time::sleep(duration).await,
        None => {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
            }
        }
    }

    // Leave the last rendered frame in place
    renderer.abort();
    controller.stop().await?;

    let last = controller.state();
    info!("Shut down after {} ticks", last.seq);
    Ok(())
}
