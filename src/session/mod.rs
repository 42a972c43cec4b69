//! Proctoring Session Module
//!
//! The state machine at the heart of the client: exam lifecycle, warning
//! escalation, and termination, kept consistent under network latency
//! and out-of-order responses.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐  capture events   ┌─────────────────────┐
//! │ EvidenceSource │ ────────────────► │ SessionController   │
//! │ (frames,       │                   │ (single command     │
//! │  behavior)     │                   │  queue, sole state  │
//! └────────────────┘                   │  writer)            │
//!                                      └──────────┬──────────┘
//!          verdicts ▲                             │ publishes
//!                   │                             ▼
//!         ┌─────────┴───────┐          ┌─────────────────────┐
//!         │ IntegrityApi    │          │ SessionSnapshot     │
//!         │ (remote service)│          │ (read-only view for │
//!         └─────────────────┘          │  rendering)         │
//!                                      └─────────────────────┘
//! ```
//!
//! Dispatches run concurrently; their completions come back through the
//! same queue, so state mutations stay strictly ordered and a terminal
//! state can never be overwritten by a late response.

pub mod controller;
pub mod display;
pub mod state;
pub mod verdict;

pub use controller::{EvidenceKind, SessionCommand, SessionController, SessionHandle};
pub use display::{banner_message, banner_severity, camera_border, status_notice};
pub use display::{BannerSeverity, CameraBorder};
pub use state::{AnswerSheet, SessionSnapshot, SessionStatus, WarningLevel, WarningState};
pub use verdict::{Verdict, VerdictStatus};
