//! Plumbing shared by the Twilio REST adapters.
//!
//! Both the Sync and `TaskRouter` adapters authenticate with the account SID
//! and auth token over HTTP basic auth, send form-encoded bodies, and report
//! failures with the same JSON error envelope.

use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Account credentials used for HTTP basic auth.
#[derive(Debug)]
pub struct TwilioCredentials {
    account_sid: String,
    auth_token: SecretString,
}

impl TwilioCredentials {
    /// Creates credentials from an account SID and auth token.
    #[must_use]
    pub fn new(account_sid: impl Into<String>, auth_token: SecretString) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token,
        }
    }

    /// Returns the account SID.
    #[must_use]
    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
    }
}

/// Non-success reply from a Twilio REST endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Twilio API returned {status}: {message}")]
pub struct ApiFailure {
    /// HTTP status code of the reply.
    pub status: u16,
    /// Twilio error code, when the body carried one.
    pub code: Option<u32>,
    /// Human-readable error message.
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    code: Option<u32>,
    message: Option<String>,
}

/// Drains a non-success response into an [`ApiFailure`].
///
/// The body is decoded as Twilio's error envelope when possible and falls
/// back to the raw text or the canonical status reason.
pub(crate) async fn api_failure(response: Response) -> ApiFailure {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let envelope = serde_json::from_str::<ErrorEnvelope>(&body).ok();
    let code = envelope.as_ref().and_then(|parsed| parsed.code);
    let message = envelope
        .and_then(|parsed| parsed.message)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_owned()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        });

    ApiFailure {
        status: status.as_u16(),
        code,
        message,
    }
}

/// Percent-encodes a value for use as a single URL path segment.
pub(crate) fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Joins a base URL and a path without doubling the separator.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
