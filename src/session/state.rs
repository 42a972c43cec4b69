//! Session Lifecycle and Warning State
//!
//! An exam attempt moves PENDING_START -> ACTIVE and from there to exactly
//! one of the terminal states SUBMITTED or TERMINATED. Warning severity is
//! split into an ordered scale (yellow, final) and an orthogonal acute
//! phone flag; the displayed level prefers the acute flag whenever set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle state of an exam attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Attempt requested, no identifier issued yet
    PendingStart,
    /// Attempt identifier issued, evidence capture running
    Active,
    /// Student finished the exam
    Submitted,
    /// Integrity service ended the exam
    Terminated,
}

impl SessionStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Submitted | SessionStatus::Terminated)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

/// Warning classes issued by the integrity service
///
/// `WarningYellow` and `FinalWarning` form the ordered scale;
/// `PhoneDetected` is the acute class and outranks both for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningLevel {
    WarningYellow,
    FinalWarning,
    PhoneDetected,
}

impl WarningLevel {
    /// Critical levels drive the urgent presentation treatment
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            WarningLevel::FinalWarning | WarningLevel::PhoneDetected
        )
    }

    pub fn is_acute(&self) -> bool {
        matches!(self, WarningLevel::PhoneDetected)
    }
}

/// Warning state owned by the session controller
///
/// The ordered level and the acute phone flag are tracked independently.
/// A verdict that carries any warning information replaces the previous
/// picture: the phone flag stays set until a verdict arrives that carries
/// warning information without the acute class. Verdicts with no warning
/// information change nothing, so a level persists across quiet ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarningState {
    ordered: Option<WarningLevel>,
    phone: bool,
}

impl WarningState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the warning portion of a verdict.
    ///
    /// `warning` is the level named by the verdict, if any; `phone` is true
    /// when the verdict flagged the acute class. Absence of both means the
    /// verdict carried no warning information and the state is untouched.
    pub fn apply(&mut self, warning: Option<WarningLevel>, phone: bool) {
        if !phone && warning.is_none() {
            return;
        }

        let mut acute = phone;
        match warning {
            Some(WarningLevel::PhoneDetected) => acute = true,
            Some(level) => self.ordered = Some(level),
            None => {}
        }
        self.phone = acute;
    }

    /// The single level the presentation layer should show
    pub fn displayed(&self) -> Option<WarningLevel> {
        if self.phone {
            Some(WarningLevel::PhoneDetected)
        } else {
            self.ordered
        }
    }

    /// Current ordered-scale level, ignoring the acute flag
    pub fn ordered_level(&self) -> Option<WarningLevel> {
        self.ordered
    }

    /// Whether the acute phone class is currently in effect
    pub fn phone_detected(&self) -> bool {
        self.phone
    }
}

/// Locally recorded answer selections, question index -> option index
///
/// Selections never leave the client; the sheet exists so finalize has a
/// notion of "current answers" and the agent can report a count.
#[derive(Debug, Clone, Default)]
pub struct AnswerSheet {
    selections: BTreeMap<u32, u32>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or replace the selection for a question
    pub fn record(&mut self, question: u32, choice: u32) {
        self.selections.insert(question, choice);
    }

    pub fn selected(&self, question: u32) -> Option<u32> {
        self.selections.get(&question).copied()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

/// Read-only view of the session published after every state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    /// Displayed warning level, if any
    pub warning: Option<WarningLevel>,
    /// Identifier issued by the service, unset until startup succeeds
    pub attempt_id: Option<String>,

    /// Timestamps
    pub started_at: Option<DateTime<Utc>>,
    pub last_verdict_at: Option<DateTime<Utc>>,

    /// Dispatch and verdict counters
    pub frames_submitted: u64,
    pub behavior_events_submitted: u64,
    pub verdicts_received: u64,
    pub answers_recorded: usize,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            status: SessionStatus::PendingStart,
            warning: None,
            attempt_id: None,
            started_at: None,
            last_verdict_at: None,
            frames_submitted: 0,
            behavior_events_submitted: 0,
            verdicts_received: 0,
            answers_recorded: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!SessionStatus::PendingStart.is_terminal());
        assert!(!SessionStatus::Active.is_terminal());
        assert!(SessionStatus::Submitted.is_terminal());
        assert!(SessionStatus::Terminated.is_terminal());
    }

    #[test]
    fn test_warning_wire_names() {
        let json = serde_json::to_string(&WarningLevel::WarningYellow).unwrap();
        assert_eq!(json, "\"WARNING_YELLOW\"");
        let parsed: WarningLevel = serde_json::from_str("\"PHONE_DETECTED\"").unwrap();
        assert_eq!(parsed, WarningLevel::PhoneDetected);
    }

    #[test]
    fn test_empty_verdict_changes_nothing() {
        let mut state = WarningState::new();
        state.apply(Some(WarningLevel::WarningYellow), false);
        state.apply(None, false);
        state.apply(None, false);
        assert_eq!(state.displayed(), Some(WarningLevel::WarningYellow));
    }

    #[test]
    fn test_phone_overrides_ordered_level() {
        let mut state = WarningState::new();
        state.apply(Some(WarningLevel::FinalWarning), false);
        state.apply(Some(WarningLevel::WarningYellow), true);
        assert_eq!(state.displayed(), Some(WarningLevel::PhoneDetected));
        assert_eq!(state.ordered_level(), Some(WarningLevel::WarningYellow));
    }

    #[test]
    fn test_phone_sticky_until_superseded() {
        let mut state = WarningState::new();
        state.apply(None, true);
        state.apply(None, false);
        state.apply(None, false);
        assert_eq!(state.displayed(), Some(WarningLevel::PhoneDetected));

        // An explicit ordered-level verdict supersedes the acute class
        state.apply(Some(WarningLevel::WarningYellow), false);
        assert_eq!(state.displayed(), Some(WarningLevel::WarningYellow));
        assert!(!state.phone_detected());
    }

    #[test]
    fn test_phone_as_named_level() {
        let mut state = WarningState::new();
        state.apply(Some(WarningLevel::PhoneDetected), false);
        assert!(state.phone_detected());
        assert_eq!(state.displayed(), Some(WarningLevel::PhoneDetected));
        assert_eq!(state.ordered_level(), None);
    }

    #[test]
    fn test_explicit_downgrade_applies() {
        let mut state = WarningState::new();
        state.apply(Some(WarningLevel::FinalWarning), false);
        state.apply(Some(WarningLevel::WarningYellow), false);
        assert_eq!(state.displayed(), Some(WarningLevel::WarningYellow));
    }

    #[test]
    fn test_answer_sheet_replaces_selection() {
        let mut sheet = AnswerSheet::new();
        sheet.record(0, 2);
        sheet.record(0, 3);
        sheet.record(4, 1);
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.selected(0), Some(3));
        assert_eq!(sheet.selected(7), None);
    }

    #[test]
    fn test_snapshot_starts_pending() {
        let snapshot = SessionSnapshot::default();
        assert_eq!(snapshot.status, SessionStatus::PendingStart);
        assert!(snapshot.warning.is_none());
        assert!(snapshot.attempt_id.is_none());
    }
}
