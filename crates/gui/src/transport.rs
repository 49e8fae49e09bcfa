//! Logging backend the editor submits trails to

use std::future::Future;

use serde_json::Value;
use shared::LogResponse;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}

/// Anything that can persist a JSON payload into a named table
pub trait Submitter {
    fn log(
        &self,
        table: &str,
        payload: Value,
    ) -> impl Future<Output = Result<LogResponse, SubmitError>> + Send;
}

/// Posts to `{endpoint}/api/log/{table}`
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, table: &str) -> String {
        format!("{}/api/log/{}", self.endpoint, table)
    }
}

impl Submitter for HttpSubmitter {
    fn log(
        &self,
        table: &str,
        payload: Value,
    ) -> impl Future<Output = Result<LogResponse, SubmitError>> + Send {
        let request = self.client.post(self.url(table)).json(&payload);
        async move {
            let response = request
                .send()
                .await
                .map_err(|e| SubmitError::Transport(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(SubmitError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            response
                .json::<LogResponse>()
                .await
                .map_err(|e| SubmitError::InvalidResponse(e.to_string()))
        }
    }
}
