use std::fmt;

use serde::{Deserialize, Serialize};

pub(crate) const DESCRIPTION_OK: &str = "Ok";
pub(crate) const DESCRIPTION_MALFORMED: &str = "Format validation failed";
pub(crate) const DESCRIPTION_NO_EXCHANGER: &str = "Couldn't find MX server for this address";
pub(crate) const DESCRIPTION_UNREACHABLE: &str = "MX server is unreachable";

/// Input of one validation: the address to check plus the identities the
/// probe announces to the exchanger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    email: String,
    hostname: String,
    sender: String,
}

impl ValidationRequest {
    pub fn new(
        email: impl Into<String>,
        hostname: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            hostname: hostname.into(),
            sender: sender.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Identity sent with `EHLO`/`HELO`.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Envelope sender sent with `MAIL FROM`.
    pub fn sender(&self) -> &str {
        &self.sender
    }
}

/// Outcome of a validation, as returned over HTTP and posted to callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub email: String,
    pub is_valid: bool,
    pub description: String,
    pub error: String,
}

impl ValidationResult {
    pub fn valid(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            is_valid: true,
            description: DESCRIPTION_OK.to_string(),
            error: String::new(),
        }
    }

    pub fn invalid(
        email: impl Into<String>,
        description: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            is_valid: false,
            description: description.into(),
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Pending,
    Parsed,
    Resolved,
    Probed,
    Valid,
    Invalid,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Parsed => "parsed",
            Self::Resolved => "resolved",
            Self::Probed => "probed",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MalformedAddress,
    ExchangerLookupFailed,
    NoExchangerFound,
    ConnectFailed,
    GreetingFailed,
    SenderRejected,
    RecipientRejected,
    QuitFailed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MalformedAddress => "malformed_address",
            Self::ExchangerLookupFailed => "exchanger_lookup_failed",
            Self::NoExchangerFound => "no_exchanger_found",
            Self::ConnectFailed => "connect_failed",
            Self::GreetingFailed => "greeting_failed",
            Self::SenderRejected => "sender_rejected",
            Self::RecipientRejected => "recipient_rejected",
            Self::QuitFailed => "quit_failed",
        })
    }
}
