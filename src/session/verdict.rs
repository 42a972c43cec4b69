//! Verdict Parsing
//!
//! The service answers every piece of evidence with an optional warning
//! and an optional exam status. A missing field means "no change", never
//! "back to normal", so both sides of the verdict stay independent here.
//! Parsing is lenient: an unrecognized string degrades to "no change" so
//! a malformed warning can never mask a termination in the same response.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::state::WarningLevel;

/// Wire name of the acute class inside a frame response's warnings array
const PHONE_DETECTED_WIRE: &str = "PHONE_DETECTED";

/// Exam status named by a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    Active,
    Terminated,
}

/// Parsed service response to a piece of evidence
///
/// Every field is optional on the wire; `Default` is the empty verdict
/// that changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    /// Warning level named by the verdict, if any
    pub warning: Option<WarningLevel>,
    /// Acute phone flag from the frame response's warnings array
    pub phone_detected: bool,
    /// Exam status named by the verdict, if any
    pub status: Option<VerdictStatus>,
}

impl Verdict {
    /// Build a verdict from the raw wire fields shared by both evidence
    /// endpoints: an optional warning string, an optional warnings array,
    /// and an optional status string.
    pub fn from_wire(warning: Option<&str>, warnings: &[String], status: Option<&str>) -> Self {
        Self {
            warning: warning.and_then(parse_warning_level),
            phone_detected: warnings.iter().any(|w| w == PHONE_DETECTED_WIRE),
            status: status.and_then(parse_verdict_status),
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.status, Some(VerdictStatus::Terminated))
    }

    /// Whether the verdict carries any warning information at all
    pub fn has_warning_change(&self) -> bool {
        self.warning.is_some() || self.phone_detected
    }
}

fn parse_warning_level(raw: &str) -> Option<WarningLevel> {
    match raw {
        "WARNING_YELLOW" => Some(WarningLevel::WarningYellow),
        "FINAL_WARNING" => Some(WarningLevel::FinalWarning),
        PHONE_DETECTED_WIRE => Some(WarningLevel::PhoneDetected),
        other => {
            warn!(value = %other, "Unrecognized warning level in verdict, ignoring");
            None
        }
    }
}

fn parse_verdict_status(raw: &str) -> Option<VerdictStatus> {
    match raw {
        "ACTIVE" => Some(VerdictStatus::Active),
        "TERMINATED" => Some(VerdictStatus::Terminated),
        other => {
            warn!(value = %other, "Unrecognized exam status in verdict, ignoring");
            None
        }
    }
}
