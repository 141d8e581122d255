//! Fire-and-forget delivery of validation results to caller-supplied URLs.
//!
//! A callback gets exactly one `POST` with the JSON-encoded
//! [`ValidationResult`]. Failures are reported to the [`EventSink`] and
//! otherwise dropped: nothing is retried or queued.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::events::{EventSink, ValidationEvent};
use crate::validation::{ValidationRequest, ValidationResult, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    #[error("invalid callback URL {url:?}: {detail}")]
    InvalidUrl { url: String, detail: String },
    #[error("unsupported callback scheme {scheme:?}; expected http or https")]
    UnsupportedScheme { scheme: String },
}

/// Accepts absolute `http`/`https` URLs only.
pub fn parse_callback(raw: &str) -> Result<Url, CallbackError> {
    let url = Url::parse(raw.trim()).map_err(|err| CallbackError::InvalidUrl {
        url: raw.to_string(),
        detail: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CallbackError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}

#[derive(Clone)]
pub struct CallbackNotifier {
    client: Client,
    sink: Arc<dyn EventSink>,
}

impl CallbackNotifier {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self::with_client(Client::new(), sink)
    }

    pub fn with_client(client: Client, sink: Arc<dyn EventSink>) -> Self {
        Self { client, sink }
    }

    /// Validates on the blocking pool, then posts the result to `callback`.
    ///
    /// Must be called from within a tokio runtime. The returned handle can be
    /// dropped; the task keeps running detached.
    pub fn dispatch(
        &self,
        validator: Validator,
        request: ValidationRequest,
        callback: Url,
    ) -> JoinHandle<()> {
        let email = request.email().to_string();
        self.sink.emit(&ValidationEvent::CallbackDispatched {
            email: email.clone(),
            callback: callback.to_string(),
        });

        let notifier = self.clone();
        tokio::spawn(async move {
            let validated =
                tokio::task::spawn_blocking(move || validator.validate(&request)).await;
            match validated {
                Ok(result) => notifier.deliver(&result, &callback).await,
                Err(err) => notifier.sink.emit(&ValidationEvent::CallbackFailed {
                    email,
                    callback: callback.to_string(),
                    detail: format!("validation task failed: {err}"),
                }),
            }
        })
    }

    /// Sends one `POST`. Returns once the server has answered or the request
    /// has failed.
    pub async fn deliver(&self, result: &ValidationResult, callback: &Url) {
        let body = self.encode_payload(result, callback);
        let response = self
            .client
            .post(callback.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        let event = match response {
            Ok(response) if response.status().is_success() => ValidationEvent::CallbackDelivered {
                email: result.email.clone(),
                callback: callback.to_string(),
                status: response.status().as_u16(),
            },
            Ok(response) => ValidationEvent::CallbackFailed {
                email: result.email.clone(),
                callback: callback.to_string(),
                detail: format!("callback answered {}", response.status()),
            },
            Err(err) => ValidationEvent::CallbackFailed {
                email: result.email.clone(),
                callback: callback.to_string(),
                detail: err.to_string(),
            },
        };
        self.sink.emit(&event);
    }

    fn encode_payload(&self, result: &ValidationResult, callback: &Url) -> String {
        serde_json::to_string(result).unwrap_or_else(|err| {
            self.sink.emit(&ValidationEvent::CallbackEncodeFailed {
                email: result.email.clone(),
                callback: callback.to_string(),
                detail: err.to_string(),
            });
            fallback_payload(result)
        })
    }
}

/// Same four keys as the serde encoding, assembled field by field.
fn fallback_payload(result: &ValidationResult) -> String {
    let quote = |value: &str| serde_json::Value::from(value).to_string();
    format!(
        r#"{{"email":{},"is_valid":{},"description":{},"error":{}}}"#,
        quote(&result.email),
        result.is_valid,
        quote(&result.description),
        quote(&result.error),
    )
}
