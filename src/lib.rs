//! Invigil Proctoring Client
//!
//! Client-side session state machine for remotely proctored exams: runs
//! the exam lifecycle, captures webcam frames and behavioral signals on
//! a steady cadence, forwards them to the integrity evaluation service,
//! and escalates warnings up to forced termination. State stays
//! consistent under network latency and out-of-order responses.
//!
//! ## Module Structure
//!
//! ```text
//! src/
//! ├── lib.rs         - Crate root with re-exports
//! ├── main.rs        - Headless agent entrypoint
//! ├── config.rs      - Configuration management
//! ├── session/       - The proctoring state machine
//! │   ├── controller.rs - Command queue, transitions, snapshot publishing
//! │   ├── state.rs      - Status, warning state, answer sheet
//! │   ├── verdict.rs    - Lenient verdict parsing
//! │   └── display.rs    - Banner and border mapping for rendering
//! ├── client/        - Integrity service transport
//! │   ├── integrity.rs - IntegrityApi trait + reqwest implementation
//! │   └── error.rs     - Non-fatal transport error taxonomy
//! └── evidence/      - Capture sources
//!     ├── capture.rs   - Frame cadence loop, replay frame source
//!     └── behavior.rs  - Tab and clipboard signal bridge
//! ```

pub mod client;
pub mod config;
pub mod evidence;
pub mod session;

// Re-export main types for convenience
pub use client::{ClientError, IntegrityApi, IntegrityClient};
pub use config::InvigilConfig;
pub use evidence::{
    BehaviorMonitor, BehaviorSignal, CaptureEvent, FrameCaptureLoop, FrameSource,
    ReplayFrameSource,
};
pub use session::{
    SessionController, SessionHandle, SessionSnapshot, SessionStatus, Verdict, WarningLevel,
};
