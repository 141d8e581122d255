use std::fmt;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use super::ProbeError;

/// Probe steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStage {
    Connect,
    Greeting,
    Sender,
    Recipient,
    Quit,
}

impl fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Greeting => "greeting",
            Self::Sender => "sender",
            Self::Recipient => "recipient",
            Self::Quit => "quit",
        })
    }
}

/// A raw SMTP reply, preserving the numeric status code and message text.
/// Multi-line replies keep one line of text per `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

impl fmt::Display for SmtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03} {}", self.code, self.message)
    }
}

/// One transcript line of a probe session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpEvent {
    Sent { stage: ProbeStage, command: String },
    Received { stage: ProbeStage, reply: SmtpReply },
    Error { stage: ProbeStage, message: String },
}

/// Identities and addresses for one probe.
#[derive(Debug, Clone, Copy)]
pub struct ProbeTarget<'a> {
    pub exchanger: &'a str,
    pub hostname: &'a str,
    pub sender: &'a str,
    pub recipient: &'a str,
}

/// A probe that got through `RCPT TO`. The QUIT outcome is informational.
#[derive(Debug)]
pub struct ProbeReport {
    pub exchanger: String,
    pub peer: SocketAddr,
    pub quit_error: Option<ProbeError>,
}
