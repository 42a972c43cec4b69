//! Presentation Mapping
//!
//! Pure helpers turning controller state into rendering decisions. The
//! presentation layer holds no integrity state of its own; everything
//! here derives from the published snapshot.

use super::state::{SessionStatus, WarningLevel};

/// Visual weight of the warning banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerSeverity {
    /// Attention-getting but not last-chance
    High,
    /// Final warning or acute phone class
    Critical,
}

/// Camera frame treatment derived from the displayed warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraBorder {
    /// No warning in effect
    Normal,
    /// A warning below the critical levels
    Elevated,
    /// Final warning or acute phone class
    Critical,
}

/// Banner copy for a displayed warning level
pub fn banner_message(level: WarningLevel) -> &'static str {
    match level {
        WarningLevel::WarningYellow => {
            "Suspicious behavior detected. Please look at the screen."
        }
        WarningLevel::FinalWarning => {
            "FINAL WARNING: Exam will be terminated on next violation."
        }
        WarningLevel::PhoneDetected => "CELL PHONE DETECTED: Put it away immediately.",
    }
}

pub fn banner_severity(level: WarningLevel) -> BannerSeverity {
    if level.is_critical() {
        BannerSeverity::Critical
    } else {
        BannerSeverity::High
    }
}

pub fn camera_border(warning: Option<WarningLevel>) -> CameraBorder {
    match warning {
        Some(level) if level.is_critical() => CameraBorder::Critical,
        Some(_) => CameraBorder::Elevated,
        None => CameraBorder::Normal,
    }
}

/// Full-screen notice for a session state, if one applies
pub fn status_notice(status: SessionStatus) -> Option<&'static str> {
    match status {
        SessionStatus::PendingStart => Some("Preparing your exam session..."),
        SessionStatus::Active => None,
        SessionStatus::Submitted => Some(
            "Submission successful: your answers have been recorded. \
             You may now close this window.",
        ),
        SessionStatus::Terminated => Some(
            "Exam terminated: multiple integrity violations were detected. \
             This session has been flagged for administrator review.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_severity_split() {
        assert_eq!(
            banner_severity(WarningLevel::WarningYellow),
            BannerSeverity::High
        );
        assert_eq!(
            banner_severity(WarningLevel::FinalWarning),
            BannerSeverity::Critical
        );
        assert_eq!(
            banner_severity(WarningLevel::PhoneDetected),
            BannerSeverity::Critical
        );
    }

    #[test]
    fn test_camera_border_levels() {
        assert_eq!(camera_border(None), CameraBorder::Normal);
        assert_eq!(
            camera_border(Some(WarningLevel::WarningYellow)),
            CameraBorder::Elevated
        );
        assert_eq!(
            camera_border(Some(WarningLevel::FinalWarning)),
            CameraBorder::Critical
        );
        assert_eq!(
            camera_border(Some(WarningLevel::PhoneDetected)),
            CameraBorder::Critical
        );
    }

    #[test]
    fn test_active_session_has_no_notice() {
        assert!(status_notice(SessionStatus::Active).is_none());
        assert!(status_notice(SessionStatus::Terminated).is_some());
        assert!(status_notice(SessionStatus::Submitted).is_some());
    }

    #[test]
    fn test_phone_banner_names_the_violation() {
        assert!(banner_message(WarningLevel::PhoneDetected).contains("PHONE"));
    }
}
