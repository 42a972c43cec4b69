//! Frame Capture
//!
//! Produces one webcam still per interval tick for as long as the session
//! is active. A tick where the device yields no image is skipped, never
//! queued; the next tick recovers on its own.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::behavior::BehaviorSignal;
use crate::session::{SessionHandle, SessionStatus};

/// Evidence produced by a capture source, consumed once by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Encoded webcam still
    Frame { image_data: Vec<u8> },
    /// Discrete behavioral signal
    Behavior { signal: BehaviorSignal },
}

/// A device that can yield an encoded still image on demand
///
/// `None` means the device had nothing this tick. Not an error.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Option<Vec<u8>>;
}

/// Frame source that cycles through a directory of JPEG stills
///
/// Stands in for a live capture device in the headless agent and demos.
pub struct ReplayFrameSource {
    frames: Vec<PathBuf>,
    cursor: usize,
}

impl ReplayFrameSource {
    /// Scan `dir` for JPEG files, sorted by name for a stable replay order
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read frame directory: {}", dir.display()))?;

        let mut frames = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read frame directory entry")?;
            let path = entry.path();
            let is_jpeg = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
                .unwrap_or(false);
            if is_jpeg {
                frames.push(path);
            }
        }
        frames.sort();

        if frames.is_empty() {
            return Err(anyhow::anyhow!(
                "No JPEG frames found in {}",
                dir.display()
            ));
        }

        info!(count = frames.len(), dir = %dir.display(), "Loaded replay frames");
        Ok(Self { frames, cursor: 0 })
    }
}

impl FrameSource for ReplayFrameSource {
    fn next_frame(&mut self) -> Option<Vec<u8>> {
        let path = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();

        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read frame, skipping tick");
                None
            }
        }
    }
}

/// Drives the capture cadence against the session controller
///
/// Ticks before the attempt is active produce nothing; the loop exits the
/// moment the session leaves `ACTIVE`, so no frame is handed to the
/// controller past a terminal transition.
pub struct FrameCaptureLoop<S: FrameSource> {
    source: S,
    session: SessionHandle,
    interval: Duration,
}

impl<S: FrameSource> FrameCaptureLoop<S> {
    pub fn new(source: S, session: SessionHandle, interval_ms: u64) -> Self {
        Self {
            source,
            session,
            interval: Duration::from_millis(interval_ms),
        }
    }

    pub async fn run(mut self) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "Frame capture loop starting"
        );

        loop {
            tokio::time::sleep(self.interval).await;

            match self.session.status().await {
                SessionStatus::PendingStart => continue,
                SessionStatus::Active => {}
                status => {
                    debug!(?status, "Session no longer active, stopping frame capture");
                    break;
                }
            }

            match self.source.next_frame() {
                Some(image_data) => self.session.on_frame_captured(image_data).await,
                None => debug!("Capture device yielded no image, skipping tick"),
            }
        }

        info!("Frame capture loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_jpeg(dir: &Path, name: &str, bytes: &[u8]) {
        std::fs::write(dir.join(name), bytes).expect("write frame");
    }

    #[test]
    fn test_replay_source_cycles_sorted() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        write_jpeg(dir.path(), "b.jpg", b"second");
        write_jpeg(dir.path(), "a.jpg", b"first");
        write_jpeg(dir.path(), "notes.txt", b"not a frame");

        let mut source = ReplayFrameSource::from_dir(dir.path()).expect("source");
        assert_eq!(source.next_frame().as_deref(), Some(&b"first"[..]));
        assert_eq!(source.next_frame().as_deref(), Some(&b"second"[..]));
        assert_eq!(source.next_frame().as_deref(), Some(&b"first"[..]));
    }

    #[test]
    fn test_replay_source_rejects_empty_dir() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        write_jpeg(dir.path(), "readme.md", b"no frames here");
        assert!(ReplayFrameSource::from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_replay_source_accepts_jpeg_extension() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        write_jpeg(dir.path(), "still.JPEG", b"frame");
        let mut source = ReplayFrameSource::from_dir(dir.path()).expect("source");
        assert_eq!(source.next_frame().as_deref(), Some(&b"frame"[..]));
    }
}
