//! Invigil Agent
//!
//! Headless session driver: opens an exam attempt, replays a directory
//! of JPEG stills through the capture cadence, and reacts to service
//! verdicts exactly like an interactive client would. Ctrl-C submits
//! the exam; a second Ctrl-C abandons the wait.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};

use invigil_client::{
    session::status_notice, FrameCaptureLoop, IntegrityClient, InvigilConfig, ReplayFrameSource,
    SessionController, SessionStatus,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = InvigilConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    init_logging(&config)?;

    info!("Starting Invigil proctoring agent");
    info!(
        service_url = %config.service.base_url,
        exam_id = %config.session.exam_id,
        frame_interval_ms = config.capture.frame_interval_ms,
        "Session configuration loaded"
    );

    let frame_dir = config
        .capture
        .frame_dir
        .clone()
        .context("INVIGIL_FRAME_DIR must point at a directory of JPEG stills")?;
    let source = ReplayFrameSource::from_dir(Path::new(&frame_dir))?;

    let api = Arc::new(IntegrityClient::new(&config.service)?);
    let (controller, session) = SessionController::new(config.session.clone(), api);
    tokio::spawn(controller.run());

    let capture = FrameCaptureLoop::new(source, session.clone(), config.capture.frame_interval_ms);
    tokio::spawn(capture.run());

    info!("Session running; Ctrl-C submits the exam");

    let mut finalize_requested = false;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                if finalize_requested {
                    warn!("Second interrupt received, abandoning wait");
                    break;
                }
                if session.status().await == SessionStatus::PendingStart {
                    warn!("Session never became active, exiting");
                    break;
                }
                info!("Interrupt received, submitting exam");
                session.submit_answers().await;
                finalize_requested = true;
            }
            _ = tokio::time::sleep(Duration::from_millis(500)) => {
                if session.status().await.is_terminal() {
                    break;
                }
            }
        }
    }

    let snapshot = session.snapshot().await;
    if let Some(notice) = status_notice(snapshot.status) {
        info!(status = ?snapshot.status, "{}", notice);
    }
    info!(
        frames = snapshot.frames_submitted,
        behavior_events = snapshot.behavior_events_submitted,
        verdicts = snapshot.verdicts_received,
        answers = snapshot.answers_recorded,
        "Session closed"
    );

    Ok(())
}

fn init_logging(config: &InvigilConfig) -> Result<()> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}
