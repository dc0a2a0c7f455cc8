//! ShotCoach - Adaptive Basketball Shooting-Form Coaching
//!
//! Command-line entry point: analyzes one video and prints the feedback as
//! JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use shotcoach::analysis::{
    BasicAnalyzer, LightweightAnalyzer, SimulatedPoseEstimator, SimulatedVision, TieredStrategy,
    VideoMetadata, VideoRef,
};
use shotcoach::capability::{CapabilityAssessor, SysinfoProbe};
use shotcoach::connectivity::{ConnectionType, ConnectivityStatus, StaticConnectivity};
use shotcoach::pipeline::CoachingPipeline;
use shotcoach::processing::ProcessingRouter;
use shotcoach::storage::config::load_config;
use shotcoach::storage::{Database, SessionStore, SqliteCapabilityCache};

#[derive(Parser, Debug)]
#[command(name = "shotcoach")]
#[command(version, about = "Analyze a basketball jump shot and get coaching feedback")]
struct Args {
    /// Video file or identifier to analyze
    video: String,

    /// User the session belongs to
    #[arg(long)]
    user: Option<Uuid>,

    /// Current network: wifi, cellular or offline
    #[arg(long, default_value = "offline")]
    network: ConnectionType,

    /// Treat the network as metered
    #[arg(long)]
    metered: bool,

    /// Re-detect device capabilities even if cached
    #[arg(long)]
    force_refresh: bool,

    /// Configuration file (defaults to the platform data directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Frame rate
    #[arg(long)]
    fps: Option<f32>,

    /// Duration in seconds
    #[arg(long)]
    duration: Option<f32>,
}

impl Args {
    fn video_ref(&self) -> VideoRef {
        let video = VideoRef::new(self.video.clone());
        match (self.width, self.height, self.fps, self.duration) {
            (Some(width), Some(height), Some(frame_rate), Some(duration_secs)) => {
                video.with_metadata(VideoMetadata {
                    width,
                    height,
                    frame_rate,
                    duration_secs,
                })
            }
            (None, None, None, None) => video,
            _ => {
                tracing::warn!("Ignoring partial video metadata; pass --width, --height, --fps and --duration together");
                video
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    tracing::info!("Starting ShotCoach v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_deref()).context("failed to load configuration")?;
    let db = Arc::new(
        Database::open(&config.database_path()).context("failed to open session database")?,
    );

    let assessor = CapabilityAssessor::new(
        Arc::new(SysinfoProbe),
        Arc::new(SqliteCapabilityCache::new(Arc::clone(&db))),
    )
    .with_max_age(config.capability.max_age());

    let pose_settings = config.analysis.pose_settings();
    let strategy = TieredStrategy::new(
        BasicAnalyzer::new(SimulatedVision),
        LightweightAnalyzer::with_settings(
            SimulatedPoseEstimator::new(pose_settings.shooting_hand),
            pose_settings,
        ),
    );

    let connectivity = ConnectivityStatus::from_link(args.network, args.metered);
    let pipeline = CoachingPipeline::new(
        assessor,
        Arc::new(StaticConnectivity(connectivity)),
        Arc::new(strategy),
    )
    .with_router(ProcessingRouter::new(config.processing.router_settings()))
    .with_consent(config.consent);

    let user_id = args.user.unwrap_or_else(Uuid::nil);
    let sessions = SessionStore::new(Arc::clone(&db));
    let history = sessions
        .sessions_for_user(user_id)
        .context("failed to load session history")?;

    let video = args.video_ref();
    let outcome = pipeline
        .analyze(&video, user_id, &history, args.force_refresh)
        .await
        .context("analysis unavailable")?;

    if let Err(e) = sessions.record_session(&outcome.to_session(user_id, &video)) {
        tracing::warn!("Failed to record session: {}", e);
    }

    let json = serde_json::to_string_pretty(&outcome).context("failed to serialize feedback")?;
    println!("{}", json);

    Ok(())
}
