//! Configuration Management
//!
//! Defaults cover a local development setup; every value can be
//! overridden through `INVIGIL_*` environment variables. Loading
//! validates the result, so a session never starts from a configuration
//! that cannot drive it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Top-level configuration for the proctoring client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvigilConfig {
    /// Integrity service endpoint
    pub service: ServiceConfig,
    /// Session behavior
    pub session: SessionConfig,
    /// Frame capture cadence and source
    pub capture: CaptureConfig,
    /// Logging
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the integrity service API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Exam identifier sent when opening an attempt
    pub exam_id: String,
    /// Command queue depth for the session controller
    pub queue_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Milliseconds between webcam stills
    pub frame_interval_ms: u64,
    /// Directory of JPEG stills for the replay frame source
    pub frame_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            exam_id: "ai_exam_1".to_string(),
            queue_depth: 256,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 2000,
            frame_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl InvigilConfig {
    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service configuration
        if let Ok(base_url) = env::var("INVIGIL_SERVICE_URL") {
            config.service.base_url = base_url;
        }

        if let Ok(timeout) = env::var("INVIGIL_REQUEST_TIMEOUT_SECS") {
            config.service.request_timeout_secs = timeout
                .parse()
                .context("Invalid INVIGIL_REQUEST_TIMEOUT_SECS value")?;
        }

        // Session configuration
        if let Ok(exam_id) = env::var("INVIGIL_EXAM_ID") {
            config.session.exam_id = exam_id;
        }

        if let Ok(depth) = env::var("INVIGIL_QUEUE_DEPTH") {
            config.session.queue_depth = depth
                .parse()
                .context("Invalid INVIGIL_QUEUE_DEPTH value")?;
        }

        // Capture configuration
        if let Ok(interval) = env::var("INVIGIL_FRAME_INTERVAL_MS") {
            config.capture.frame_interval_ms = interval
                .parse()
                .context("Invalid INVIGIL_FRAME_INTERVAL_MS value")?;
        }

        if let Ok(frame_dir) = env::var("INVIGIL_FRAME_DIR") {
            config.capture.frame_dir = Some(frame_dir);
        }

        // Logging configuration
        if let Ok(level) = env::var("INVIGIL_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations that cannot drive a session
    pub fn validate(&self) -> Result<()> {
        if self.service.base_url.is_empty() {
            return Err(anyhow::anyhow!("Service base URL cannot be empty"));
        }

        if self.service.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Request timeout must be non-zero"));
        }

        if self.session.exam_id.is_empty() {
            return Err(anyhow::anyhow!("Exam id cannot be empty"));
        }

        if self.session.queue_depth == 0 {
            return Err(anyhow::anyhow!("Queue depth must be non-zero"));
        }

        if self.capture.frame_interval_ms == 0 {
            return Err(anyhow::anyhow!("Frame interval must be non-zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InvigilConfig::default();
        assert_eq!(config.service.base_url, "http://localhost:5000/api");
        assert_eq!(config.service.request_timeout_secs, 30);
        assert_eq!(config.session.exam_id, "ai_exam_1");
        assert_eq!(config.capture.frame_interval_ms, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_exam_id() {
        let mut config = InvigilConfig::default();
        config.session.exam_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_interval() {
        let mut config = InvigilConfig::default();
        config.capture.frame_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_base_url() {
        let mut config = InvigilConfig::default();
        config.service.base_url = String::new();
        assert!(config.validate().is_err());
    }
}
