// ABOUTME: reqwest-backed portal client implementing the collaborator contracts
// ABOUTME: Maps portal REST endpoints and failures onto the engine's trait seams
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Portal REST Client
//!
//! Talks to the portal backend over HTTP:
//!
//! - `GET /clients/{id}/program/active` — active program or placeholder
//! - `GET /clients/{id}/workout-session` — saved draft (`{"session": null}` when absent)
//! - `POST /clients/{id}/workout-session/save` — upsert draft
//! - `DELETE /clients/{id}/workout-session` — clear draft (idempotent)
//! - `POST /clients/{id}/program/log` — submit the finalized workout log
//!
//! Transport failures and non-2xx responses map to
//! [`AppError::external_service`]; callers attach the session-level error code
//! (`LoadFailed`, `CheckpointFailed`, `CompletionFailed`).

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ActiveProgram, DraftEnvelope, LogAck, SessionDraft, WorkoutLogRecord, WorkoutTemplate,
};
use crate::portal::{ProgramProvider, SessionStore, WorkoutHistory};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "portal backend";

/// Portal client configuration
#[derive(Debug, Clone)]
pub struct PortalClientConfig {
    /// Base URL of the portal REST API, without trailing slash
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PortalClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::PORTAL_BASE_URL.to_owned(),
            timeout_secs: defaults::PORTAL_TIMEOUT_SECS,
        }
    }
}

/// HTTP client for the portal backend
#[derive(Debug, Clone)]
pub struct PortalClient {
    config: PortalClientConfig,
    http_client: reqwest::Client,
}

/// `GET /clients/{id}/program/active` payload; the backend answers with a
/// placeholder workout (or no assignment at all) when nothing is assigned
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveProgramResponse {
    #[serde(default)]
    assignment_id: Option<String>,
    #[serde(default)]
    current_day_index: u32,
    #[serde(default)]
    workout: Option<WorkoutTemplate>,
}

/// `GET /clients/{id}/workout-session` payload
#[derive(Debug, Deserialize)]
struct SessionResponse {
    session: Option<DraftEnvelope>,
}

/// `POST /clients/{id}/program/log` payload; older backends send the id as a
/// bare integer
#[derive(Debug, Deserialize)]
struct LogResponse {
    #[serde(default)]
    log_id: Option<serde_json::Value>,
}

impl PortalClient {
    /// Create a new portal client
    pub fn new(config: PortalClientConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    async fn check(response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::external_service(
            SERVICE,
            format!("HTTP {status}: {body}"),
        ))
    }
}

#[async_trait]
impl ProgramProvider for PortalClient {
    async fn active_program(&self, client_id: &str) -> AppResult<Option<ActiveProgram>> {
        let url = self.url(&format!("/clients/{client_id}/program/active"));
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let payload: ActiveProgramResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;

        let (Some(assignment_id), Some(template)) = (payload.assignment_id, payload.workout) else {
            return Ok(None);
        };
        if template.is_placeholder() {
            return Ok(None);
        }
        Ok(Some(ActiveProgram {
            assignment_id,
            current_day_index: payload.current_day_index,
            template,
        }))
    }
}

#[async_trait]
impl SessionStore for PortalClient {
    async fn save_draft(&self, client_id: &str, draft: &SessionDraft) -> AppResult<()> {
        let url = self.url(&format!("/clients/{client_id}/workout-session/save"));
        let response = self
            .http_client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        // Fire-and-forget contract: the ack body is never used to overwrite
        // local state, only the status matters.
        Self::check(response).await?;
        Ok(())
    }

    async fn load_draft(&self, client_id: &str) -> AppResult<Option<SessionDraft>> {
        let url = self.url(&format!("/clients/{client_id}/workout-session"));
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let payload: SessionResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;
        Ok(payload.session.map(|envelope| envelope.workout_data))
    }

    async fn delete_draft(&self, client_id: &str) -> AppResult<()> {
        let url = self.url(&format!("/clients/{client_id}/workout-session"));
        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        // Discard is idempotent: deleting an absent draft is not an error
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl WorkoutHistory for PortalClient {
    async fn submit_log(&self, client_id: &str, record: &WorkoutLogRecord) -> AppResult<LogAck> {
        let url = self.url(&format!("/clients/{client_id}/program/log"));
        let response = self
            .http_client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let payload: LogResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;

        let log_id = match payload.log_id {
            Some(serde_json::Value::String(id)) => id,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        Ok(LogAck { log_id })
    }
}
