//! Proctoring Session Controller
//!
//! The single writer of session state. Evidence, answer selections,
//! finalize requests, and network completions all arrive as commands on
//! one queue and are processed strictly in arrival order, so every
//! transition runs to completion before the next message is seen and the
//! terminal-state check guards every mutation.
//!
//! ## Lifecycle
//!
//! ```text
//!                 startup succeeds
//! PENDING_START ──────────────────► ACTIVE ◄──┐
//!      │                              │  │    │ verdicts update
//!      │ startup fails                │  └────┘ warning level
//!      ▼                              │
//! (stays pending,                     ├── student submits ──► SUBMITTED
//!  no retry)                          │
//!                                     └── service verdict ──► TERMINATED
//! ```
//!
//! Dispatch completions may arrive out of initiation order; a response
//! that lands after SUBMITTED or TERMINATED is discarded, never applied.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};

use crate::client::{ClientError, IntegrityApi};
use crate::config::SessionConfig;
use crate::evidence::{BehaviorSignal, CaptureEvent};

use super::state::{AnswerSheet, SessionSnapshot, SessionStatus, WarningLevel, WarningState};
use super::verdict::Verdict;

/// Kind of evidence a dispatch carried, for logging and accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceKind {
    Frame,
    Behavior,
}

impl EvidenceKind {
    fn label(&self) -> &'static str {
        match self {
            EvidenceKind::Frame => "frame",
            EvidenceKind::Behavior => "behavior",
        }
    }
}

/// Messages processed by the controller task
#[derive(Debug)]
pub enum SessionCommand {
    /// Evidence produced by a capture source
    Capture(CaptureEvent),
    /// Local answer selection
    RecordAnswer { question: u32, choice: u32 },
    /// Student finished the exam
    Finalize,
    /// Completion of the startup call
    StartCompleted(Result<String, ClientError>),
    /// Completion of an evidence dispatch
    VerdictArrived {
        kind: EvidenceKind,
        result: Result<Verdict, ClientError>,
    },
}

/// The session state machine
///
/// Owns status, attempt identity, warning state, and the answer sheet.
/// Constructed together with its [`SessionHandle`]; `run()` consumes the
/// controller and is meant to be spawned.
pub struct SessionController {
    config: SessionConfig,
    api: Arc<dyn IntegrityApi>,
    commands: mpsc::Receiver<SessionCommand>,
    /// Sender handed to spawned dispatches. Dropped on the terminal
    /// transition so the queue closes once outstanding completions drain.
    dispatch_tx: Option<mpsc::Sender<SessionCommand>>,
    shared: Arc<RwLock<SessionSnapshot>>,
    snapshot: SessionSnapshot,
    warnings: WarningState,
    answers: AnswerSheet,
}

impl SessionController {
    pub fn new(config: SessionConfig, api: Arc<dyn IntegrityApi>) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(config.queue_depth);
        let shared = Arc::new(RwLock::new(SessionSnapshot::default()));

        let handle = SessionHandle {
            commands: tx.clone(),
            shared: Arc::clone(&shared),
        };

        let controller = Self {
            config,
            api,
            commands: rx,
            dispatch_tx: Some(tx),
            shared,
            snapshot: SessionSnapshot::default(),
            warnings: WarningState::new(),
            answers: AnswerSheet::new(),
        };

        (controller, handle)
    }

    /// Drive the session until every command sender is gone.
    ///
    /// The startup call is dispatched immediately. After a terminal
    /// transition the loop keeps draining so late completions are
    /// discarded rather than left queued.
    pub async fn run(mut self) {
        self.spawn_start();

        while let Some(command) = self.commands.recv().await {
            self.handle_command(command).await;
        }

        debug!("Session command queue closed, controller exiting");
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Capture(event) => self.handle_capture(event).await,
            SessionCommand::RecordAnswer { question, choice } => {
                self.handle_record_answer(question, choice).await
            }
            SessionCommand::Finalize => self.handle_finalize().await,
            SessionCommand::StartCompleted(result) => self.handle_start_completed(result).await,
            SessionCommand::VerdictArrived { kind, result } => {
                self.handle_verdict(kind, result).await
            }
        }
    }

    fn spawn_start(&self) {
        let tx = match &self.dispatch_tx {
            Some(tx) => tx.clone(),
            None => return,
        };
        let api = Arc::clone(&self.api);
        let exam_id = self.config.exam_id.clone();

        tokio::spawn(async move {
            info!(exam_id = %exam_id, "Requesting exam attempt");
            let result = api.start_attempt(&exam_id).await;
            let _ = tx.send(SessionCommand::StartCompleted(result)).await;
        });
    }

    async fn handle_start_completed(&mut self, result: Result<String, ClientError>) {
        if self.snapshot.status != SessionStatus::PendingStart {
            debug!(status = ?self.snapshot.status, "Startup completion ignored");
            return;
        }

        match result {
            Ok(attempt_id) => {
                info!(attempt_id = %attempt_id, "Exam attempt active");
                self.snapshot.attempt_id = Some(attempt_id);
                self.snapshot.started_at = Some(Utc::now());
                self.snapshot.status = SessionStatus::Active;
                self.publish().await;
            }
            Err(e) => {
                // No retry: the session stays pending until torn down
                error!(error = %e, "Failed to start exam attempt, session stays pending");
            }
        }
    }

    async fn handle_capture(&mut self, event: CaptureEvent) {
        if self.snapshot.status != SessionStatus::Active {
            debug!(status = ?self.snapshot.status, "Capture event ignored outside active session");
            return;
        }

        let attempt_id = match &self.snapshot.attempt_id {
            Some(id) => id.clone(),
            None => {
                warn!("Active session without attempt id, dropping capture event");
                return;
            }
        };
        let tx = match &self.dispatch_tx {
            Some(tx) => tx.clone(),
            None => return,
        };
        let api = Arc::clone(&self.api);

        match event {
            CaptureEvent::Frame { image_data } => {
                self.snapshot.frames_submitted += 1;
                tokio::spawn(async move {
                    let result = api.submit_frame(&attempt_id, &image_data).await;
                    let _ = tx
                        .send(SessionCommand::VerdictArrived {
                            kind: EvidenceKind::Frame,
                            result,
                        })
                        .await;
                });
            }
            CaptureEvent::Behavior { signal } => {
                self.snapshot.behavior_events_submitted += 1;
                tokio::spawn(async move {
                    let result = api.submit_behavior_event(&attempt_id, signal).await;
                    let _ = tx
                        .send(SessionCommand::VerdictArrived {
                            kind: EvidenceKind::Behavior,
                            result,
                        })
                        .await;
                });
            }
        }

        self.publish().await;
    }

    async fn handle_verdict(&mut self, kind: EvidenceKind, result: Result<Verdict, ClientError>) {
        if self.snapshot.status != SessionStatus::Active {
            debug!(
                status = ?self.snapshot.status,
                evidence = kind.label(),
                "Stale response discarded"
            );
            return;
        }

        let verdict = match result {
            Ok(verdict) => verdict,
            Err(e) => {
                // Evidence loss is tolerated; the next tick recovers
                warn!(evidence = kind.label(), error = %e, "Evidence dispatch failed, session continues");
                return;
            }
        };

        self.snapshot.verdicts_received += 1;
        self.snapshot.last_verdict_at = Some(Utc::now());

        if verdict.is_terminated() {
            warn!(evidence = kind.label(), "Integrity service terminated the exam");
            self.enter_terminal(SessionStatus::Terminated).await;
            return;
        }

        if verdict.has_warning_change() {
            self.warnings.apply(verdict.warning, verdict.phone_detected);
            info!(
                evidence = kind.label(),
                level = ?self.warnings.displayed(),
                "Warning level updated"
            );
        }

        self.publish().await;
    }

    async fn handle_record_answer(&mut self, question: u32, choice: u32) {
        if self.snapshot.status != SessionStatus::Active {
            debug!(status = ?self.snapshot.status, "Answer ignored outside active session");
            return;
        }

        self.answers.record(question, choice);
        self.snapshot.answers_recorded = self.answers.len();
        self.publish().await;
    }

    async fn handle_finalize(&mut self) {
        if self.snapshot.status != SessionStatus::Active {
            debug!(status = ?self.snapshot.status, "Finalize ignored outside active session");
            return;
        }

        info!(answers = self.answers.len(), "Exam submitted by student");

        // Best-effort on the network leg, authoritative locally: the
        // session is submitted even if this call never lands
        if let Some(attempt_id) = self.snapshot.attempt_id.clone() {
            let api = Arc::clone(&self.api);
            tokio::spawn(async move {
                if let Err(e) = api.end_attempt(&attempt_id).await {
                    warn!(error = %e, "Failed to close attempt with service");
                }
            });
        }

        self.enter_terminal(SessionStatus::Submitted).await;
    }

    async fn enter_terminal(&mut self, status: SessionStatus) {
        self.snapshot.status = status;
        // Dropping the dispatch sender stops new work; outstanding
        // completions still drain through the queue and hit the guard
        self.dispatch_tx = None;
        self.publish().await;
    }

    async fn publish(&mut self) {
        self.snapshot.warning = self.warnings.displayed();
        let mut shared = self.shared.write().await;
        *shared = self.snapshot.clone();
    }
}

/// Cheap cloneable surface for driving and observing a session
///
/// Capture sources and the presentation layer hold clones; all writes
/// funnel through the controller queue, all reads come from the
/// published snapshot.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    shared: Arc<RwLock<SessionSnapshot>>,
}

impl SessionHandle {
    /// Feed one captured still into the session
    pub async fn on_frame_captured(&self, image_data: Vec<u8>) {
        self.send(SessionCommand::Capture(CaptureEvent::Frame { image_data }))
            .await;
    }

    /// Feed one behavioral signal into the session
    pub async fn on_behavior_signal(&self, signal: BehaviorSignal) {
        self.send(SessionCommand::Capture(CaptureEvent::Behavior { signal }))
            .await;
    }

    /// Record a local answer selection
    pub async fn record_answer(&self, question: u32, choice: u32) {
        self.send(SessionCommand::RecordAnswer { question, choice })
            .await;
    }

    /// Finish the exam. The session reaches SUBMITTED even if the
    /// service is unreachable.
    pub async fn submit_answers(&self) {
        self.send(SessionCommand::Finalize).await;
    }

    pub async fn status(&self) -> SessionStatus {
        self.shared.read().await.status
    }

    /// Currently displayed warning level, if any
    pub async fn warning_level(&self) -> Option<WarningLevel> {
        self.shared.read().await.warning
    }

    pub async fn attempt_id(&self) -> Option<String> {
        self.shared.read().await.attempt_id.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.shared.read().await.clone()
    }

    async fn send(&self, command: SessionCommand) {
        if self.commands.send(command).await.is_err() {
            debug!("Session controller gone, command dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullApi;

    #[async_trait::async_trait]
    impl IntegrityApi for NullApi {
        async fn start_attempt(&self, _exam_id: &str) -> Result<String, ClientError> {
            Err(ClientError::Rejected(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
            ))
        }

        async fn submit_frame(
            &self,
            _attempt_id: &str,
            _image_data: &[u8],
        ) -> Result<Verdict, ClientError> {
            Ok(Verdict::default())
        }

        async fn submit_behavior_event(
            &self,
            _attempt_id: &str,
            _signal: BehaviorSignal,
        ) -> Result<Verdict, ClientError> {
            Ok(Verdict::default())
        }

        async fn end_attempt(&self, _attempt_id: &str) -> Result<(), ClientError> {
            Ok(())
        }
    }

    #[test]
    fn test_evidence_labels() {
        assert_eq!(EvidenceKind::Frame.label(), "frame");
        assert_eq!(EvidenceKind::Behavior.label(), "behavior");
    }

    #[tokio::test]
    async fn test_new_session_starts_pending() {
        let (controller, handle) =
            SessionController::new(SessionConfig::default(), Arc::new(NullApi));
        tokio::spawn(controller.run());

        assert_eq!(handle.status().await, SessionStatus::PendingStart);
        assert!(handle.attempt_id().await.is_none());
        assert!(handle.warning_level().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_startup_keeps_session_pending() {
        let (controller, handle) =
            SessionController::new(SessionConfig::default(), Arc::new(NullApi));
        tokio::spawn(controller.run());

        // Give the startup completion time to flow through the queue
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(handle.status().await, SessionStatus::PendingStart);
    }
}
