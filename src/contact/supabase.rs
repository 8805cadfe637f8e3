//! Supabase REST persistence for contact submissions.
//!
//! # Design Decisions
//! - One attempt per submission: no retry, no backoff
//! - The record is write-only; nothing is ever read back
//! - Failures surface as a generic error to the client and a detailed
//!   one in the server logs

use std::time::Duration;

use thiserror::Error;

use crate::config::schema::SupabaseConfig;
use crate::contact::form::ContactSubmission;

/// Error type for submission persistence.
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("insert rejected with status {status}")]
    Rejected { status: u16 },
}

/// Thin client for inserting rows into a Supabase table.
pub struct SupabaseClient {
    http: reqwest::Client,
    endpoint: String,
    key: String,
    timeout: Duration,
}

impl SupabaseClient {
    /// Build a client from config. Returns `None` when the URL or key is
    /// not configured — submissions are then rejected with 503 instead of
    /// failing at startup, since the rest of the site works without them.
    pub fn from_config(config: &SupabaseConfig) -> Option<Self> {
        let url = config.url.as_deref()?;
        let key = config.service_key.as_deref()?;

        Some(Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/rest/v1/{}", url.trim_end_matches('/'), config.table),
            key: key.to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Insert one submission. Single attempt.
    pub async fn insert(&self, submission: &ContactSubmission) -> Result<(), SupabaseError> {
        let response = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=minimal")
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SupabaseError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }

    /// Insert endpoint, for logging.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
