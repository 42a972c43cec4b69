//! Behavioral Signals
//!
//! Edge-triggered integrity signals from the exam environment: tab
//! visibility changes and clipboard attempts. Each occurrence yields
//! exactly one signal; nothing is polled or debounced here.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::session::SessionHandle;

/// Discrete behavioral signal observed in the exam environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BehaviorSignal {
    /// Exam surface lost visibility (tab switch, window minimize)
    TabBlur,
    /// Exam surface regained visibility
    TabFocus,
    /// Copy, cut, or paste attempted inside the exam surface
    ClipboardAttempt,
}

/// Bridges an embedder's signal channel onto the session controller
///
/// The embedding layer owns the sender half and pushes one signal per
/// qualifying occurrence. The monitor forwards until the channel closes
/// or the session reaches a terminal state.
pub struct BehaviorMonitor {
    signals: mpsc::Receiver<BehaviorSignal>,
    session: SessionHandle,
}

impl BehaviorMonitor {
    pub fn new(signals: mpsc::Receiver<BehaviorSignal>, session: SessionHandle) -> Self {
        Self { signals, session }
    }

    pub async fn run(mut self) {
        while let Some(signal) = self.signals.recv().await {
            if self.session.status().await.is_terminal() {
                debug!(?signal, "Session already terminal, dropping behavior signal");
                break;
            }
            self.session.on_behavior_signal(signal).await;
        }
        debug!("Behavior monitor stopped");
    }
}
