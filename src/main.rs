//! Hand gesture overlay - estimates a hand gesture from pose landmarks every tick
//! and shows the matching icon over the skeleton.

use clap::Parser;
use gesture_overlay_lib::core::config::Config;
use gesture_overlay_lib::core::estimator::GestureEstimator;
use gesture_overlay_lib::platform::camera::SyntheticCamera;
use gesture_overlay_lib::platform::pose::{HandPoseModel, NullHandPose, ReplayHandPose};
use gesture_overlay_lib::platform::render::{IconTable, OverlaySurface, RasterOverlay, TracingOverlay};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gesture-overlay", about = "Hand gesture estimation overlay")]
struct Cli {
    /// Configuration file (default: ~/.gesture_overlay/config/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Landmark recording to replay instead of a live pose model
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Camera frame width
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Camera frame height
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Override the confidence floor (0-10)
    #[arg(long)]
    floor: Option<f32>,

    /// Stop after N seconds instead of waiting for Ctrl-C
    #[arg(long)]
    run_for_secs: Option<u64>,

    /// Draw the overlay and write the final frame to this PNG
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_overlay=info,gesture_overlay_lib=info".into()),
        )
        .init();

    info!("gesture-overlay v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    if let Some(floor) = cli.floor {
        config.confidence_floor = floor;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid --floor: {}", e))?;
    }

    let model: Arc<dyn HandPoseModel> = match &cli.replay {
        Some(path) => Arc::new(ReplayHandPose::from_file(path)?),
        None => Arc::new(NullHandPose),
    };
    info!("Pose model: {}", model.model_info());

    let estimator = GestureEstimator::with_default_vocabulary(config.confidence_floor)?;
    let icons = IconTable::from_registry(&config.icon_dir, estimator.registry());
    let camera = Arc::new(SyntheticCamera::ready(cli.width, cli.height));

    let raster = cli
        .snapshot
        .as_ref()
        .map(|_| Arc::new(RasterOverlay::new(cli.width, cli.height, icons.clone())));
    let surface: Arc<dyn OverlaySurface> = match &raster {
        Some(raster) => raster.clone(),
        None => Arc::new(TracingOverlay::new(icons)),
    };

    gesture_overlay_lib::run(
        &config,
        estimator,
        model,
        camera,
        surface,
        cli.run_for_secs.map(Duration::from_secs),
    )
    .await?;

    if let (Some(raster), Some(path)) = (raster, &cli.snapshot) {
        raster.save_png(path)?;
        info!("Wrote overlay snapshot to {}", path.display());
    }

    Ok(())
}
