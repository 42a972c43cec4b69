//! Evidence Capture Module
//!
//! Produces the two kinds of evidence the integrity service evaluates:
//! - Periodic webcam stills on a fixed cadence (frame capture loop)
//! - Edge-triggered behavioral signals (tab visibility, clipboard)
//!
//! Both feed the session controller, which owns dispatch and all
//! lifecycle decisions. Capture stops unconditionally once the session
//! leaves the active state.

pub mod behavior;
pub mod capture;

pub use behavior::{BehaviorMonitor, BehaviorSignal};
pub use capture::{CaptureEvent, FrameCaptureLoop, FrameSource, ReplayFrameSource};
