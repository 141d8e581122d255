//! Structured events emitted by the validation pipeline and the callback
//! notifier. The library never configures logging itself: callers inject an
//! [`EventSink`], and [`TracingSink`] forwards everything to `tracing`.

use std::sync::{Mutex, PoisonError};

use crate::probe::SmtpEvent;
use crate::validation::{FailureKind, PipelineState, ValidationResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationEvent {
    StateChanged {
        email: String,
        state: PipelineState,
    },
    StageFailed {
        email: String,
        kind: FailureKind,
        detail: String,
    },
    Smtp {
        exchanger: String,
        event: SmtpEvent,
    },
    QuitFailed {
        email: String,
        detail: String,
    },
    Completed {
        result: ValidationResult,
    },
    CallbackDispatched {
        email: String,
        callback: String,
    },
    CallbackEncodeFailed {
        email: String,
        callback: String,
        detail: String,
    },
    CallbackDelivered {
        email: String,
        callback: String,
        status: u16,
    },
    CallbackFailed {
        email: String,
        callback: String,
        detail: String,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ValidationEvent);
}

/// Default sink: one `tracing` event per [`ValidationEvent`], with the
/// payload as structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &ValidationEvent) {
        match event {
            ValidationEvent::StateChanged { email, state } => {
                tracing::debug!(email = %email, state = %state, "validation state changed");
            }
            ValidationEvent::StageFailed {
                email,
                kind,
                detail,
            } => {
                tracing::info!(email = %email, kind = %kind, error = %detail, "Email is invalid");
            }
            ValidationEvent::Smtp { exchanger, event } => match event {
                SmtpEvent::Sent { stage, command } => {
                    tracing::trace!(exchanger = %exchanger, stage = %stage, "C: {command}");
                }
                SmtpEvent::Received { stage, reply } => {
                    tracing::trace!(exchanger = %exchanger, stage = %stage, "S: {reply}");
                }
                SmtpEvent::Error { stage, message } => {
                    tracing::debug!(exchanger = %exchanger, stage = %stage, error = %message, "SMTP I/O error");
                }
            },
            ValidationEvent::QuitFailed { email, detail } => {
                tracing::warn!(email = %email, error = %detail, "QUIT failed after recipient was accepted");
            }
            ValidationEvent::Completed { result } => {
                if result.is_valid {
                    tracing::info!(email = %result.email, "Email is valid");
                } else {
                    tracing::debug!(
                        email = %result.email,
                        description = %result.description,
                        "validation finished"
                    );
                }
            }
            ValidationEvent::CallbackDispatched { email, callback } => {
                tracing::info!(email = %email, callback = %callback, "Callback requested");
            }
            ValidationEvent::CallbackEncodeFailed {
                email,
                callback,
                detail,
            } => {
                tracing::error!(email = %email, callback = %callback, error = %detail, "Failed to encode callback data");
            }
            ValidationEvent::CallbackDelivered {
                email,
                callback,
                status,
            } => {
                tracing::info!(email = %email, callback = %callback, status = *status, "Sent POST to callback");
            }
            ValidationEvent::CallbackFailed {
                email,
                callback,
                detail,
            } => {
                tracing::error!(email = %email, callback = %callback, error = %detail, "Failed to POST callback");
            }
        }
    }
}

/// Keeps every event in memory, for assertions.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ValidationEvent>>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<ValidationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &ValidationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
