//! Remote registration sink: forwards validated sign-ups to the API

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::form::Submission;

/// Errors from delivering a submission
#[derive(Debug, Error)]
pub enum SinkError {
    /// The server answered and refused the registration
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The server could not be reached or answered garbage
    #[error("Registration failed. Please try again.")]
    Transport(#[from] reqwest::Error),
}

/// Destination for validated submissions
#[async_trait]
pub trait RegistrationSink: Send + Sync + std::fmt::Debug {
    async fn submit(&self, submission: &Submission) -> Result<(), SinkError>;
}

#[derive(Debug, Deserialize)]
struct ServerReply {
    #[serde(default)]
    message: Option<String>,
}

/// Upper bound on one submission, below the overlay's dismissal delay
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(4);

/// Sink posting to `POST {base_url}/api/participants`
#[derive(Debug, Clone)]
pub struct HttpRegistrationSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRegistrationSink {
    pub fn new(base_url: &str) -> Result<Self, SinkError> {
        Self::with_timeout(base_url, SUBMIT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/participants", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RegistrationSink for HttpRegistrationSink {
    async fn submit(&self, submission: &Submission) -> Result<(), SinkError> {
        debug!(endpoint = %self.endpoint, email = %submission.email, "Sending registration");

        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ServerReply>()
            .await
            .ok()
            .and_then(|reply| reply.message)
            .unwrap_or_else(|| format!("Registration failed with status {}", status.as_u16()));

        warn!(status = status.as_u16(), %message, "Registration rejected by server");

        Err(SinkError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn submission() -> Submission {
        Submission {
            name: "Ada".to_string(),
            email: "ada@x.io".to_string(),
            team_size: 3,
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let sink = HttpRegistrationSink::new("http://localhost:3000/").unwrap();
        assert_eq!(sink.endpoint(), "http://localhost:3000/api/participants");
    }

    #[tokio::test]
    async fn test_submit_accepted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/participants"))
            .and(body_json(serde_json::json!({
                "name": "Ada",
                "email": "ada@x.io",
                "teamSize": 3
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "success": true,
                "message": "Thank you, Ada! Your team of 3 is registered."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sink = HttpRegistrationSink::new(&server.uri()).unwrap();
        sink.submit(&submission()).await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_rejected_surfaces_server_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/participants"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Email already registered!"
            })))
            .mount(&server)
            .await;

        let sink = HttpRegistrationSink::new(&server.uri()).unwrap();
        let err = sink.submit(&submission()).await.unwrap_err();

        match err {
            SinkError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Email already registered!");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_rejected_without_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let sink = HttpRegistrationSink::new(&server.uri()).unwrap();
        let err = sink.submit(&submission()).await.unwrap_err();

        assert_eq!(err.to_string(), "Registration failed with status 502");
    }

    #[test]
    fn test_submit_timeout_beats_overlay_dismissal() {
        assert!(SUBMIT_TIMEOUT < crate::client::OVERLAY_DISMISS_DELAY);
    }

    #[tokio::test]
    async fn test_hanging_server_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let sink =
            HttpRegistrationSink::with_timeout(&server.uri(), Duration::from_millis(200)).unwrap();
        let err = sink.submit(&submission()).await.unwrap_err();

        match err {
            SinkError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected transport timeout, got {:?}", other),
        }
    }
}
