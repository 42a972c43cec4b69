//! Integrity Service Client
//!
//! Stateless HTTP adapter for the remote integrity evaluation service:
//! - Opens an exam attempt and receives its identifier
//! - Submits webcam frames and behavior events, returning parsed verdicts
//! - Closes an attempt when the student finishes
//!
//! The client carries no retry logic and no session state. Ordering and
//! loss policy belong to the session controller.

use anyhow::Context;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::error::ClientError;
use crate::config::ServiceConfig;
use crate::evidence::BehaviorSignal;
use crate::session::Verdict;

/// User agent reported on every request
const USER_AGENT: &str = concat!("invigil-client/", env!("CARGO_PKG_VERSION"));

/// The four operations the integrity service exposes
///
/// Kept behind a trait so the session controller is generic over
/// transport; tests script this seam instead of a live server.
#[async_trait]
pub trait IntegrityApi: Send + Sync {
    /// Open an attempt for `exam_id`, returning the issued identifier
    async fn start_attempt(&self, exam_id: &str) -> Result<String, ClientError>;

    /// Submit one webcam still for analysis
    async fn submit_frame(
        &self,
        attempt_id: &str,
        image_data: &[u8],
    ) -> Result<Verdict, ClientError>;

    /// Report one behavioral signal
    async fn submit_behavior_event(
        &self,
        attempt_id: &str,
        signal: BehaviorSignal,
    ) -> Result<Verdict, ClientError>;

    /// Close the attempt; the response body carries nothing the session
    /// needs
    async fn end_attempt(&self, attempt_id: &str) -> Result<(), ClientError>;
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct StartExamRequest {
    exam_id: String,
}

#[derive(Debug, Deserialize)]
struct StartExamResponse {
    attempt_id: String,
}

#[derive(Debug, Serialize)]
struct LogEventRequest {
    event: BehaviorSignal,
    attempt_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct LogEventResponse {
    warning: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProcessFrameRequest {
    image: String,
    attempt_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ProcessFrameResponse {
    #[serde(default)]
    warnings: Vec<String>,
    ui_warning: Option<String>,
    exam_status: Option<String>,
}

#[derive(Debug, Serialize)]
struct EndExamRequest {
    attempt_id: String,
}

// ============================================================================
// HTTP client
// ============================================================================

/// HTTP implementation of [`IntegrityApi`]
#[derive(Debug, Clone)]
pub struct IntegrityClient {
    base_url: String,
    http_client: Client,
}

impl IntegrityClient {
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !resp.status().is_success() {
            return Err(ClientError::Rejected(resp.status()));
        }

        resp.json().await.map_err(ClientError::Decode)
    }
}

/// Render an encoded still as the data URL the service expects
fn encode_frame(image_data: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(image_data))
}

#[async_trait]
impl IntegrityApi for IntegrityClient {
    async fn start_attempt(&self, exam_id: &str) -> Result<String, ClientError> {
        debug!(exam_id = %exam_id, "Requesting exam attempt");

        let body = StartExamRequest {
            exam_id: exam_id.to_string(),
        };
        let resp: StartExamResponse = self.post_json("/start-exam", &body).await?;

        Ok(resp.attempt_id)
    }

    async fn submit_frame(
        &self,
        attempt_id: &str,
        image_data: &[u8],
    ) -> Result<Verdict, ClientError> {
        let body = ProcessFrameRequest {
            image: encode_frame(image_data),
            attempt_id: attempt_id.to_string(),
        };
        let resp: ProcessFrameResponse = self.post_json("/process-frame", &body).await?;

        Ok(Verdict::from_wire(
            resp.ui_warning.as_deref(),
            &resp.warnings,
            resp.exam_status.as_deref(),
        ))
    }

    async fn submit_behavior_event(
        &self,
        attempt_id: &str,
        signal: BehaviorSignal,
    ) -> Result<Verdict, ClientError> {
        debug!(?signal, "Reporting behavior event");

        let body = LogEventRequest {
            event: signal,
            attempt_id: attempt_id.to_string(),
        };
        let resp: LogEventResponse = self.post_json("/log-event", &body).await?;

        Ok(Verdict::from_wire(
            resp.warning.as_deref(),
            &[],
            resp.status.as_deref(),
        ))
    }

    async fn end_attempt(&self, attempt_id: &str) -> Result<(), ClientError> {
        debug!(attempt_id = %attempt_id, "Closing exam attempt");

        let body = EndExamRequest {
            attempt_id: attempt_id.to_string(),
        };
        let url = format!("{}/end-exam", self.base_url);

        let resp = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !resp.status().is_success() {
            return Err(ClientError::Rejected(resp.status()));
        }

        Ok(())
    }
}
