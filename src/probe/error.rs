use std::io;

use thiserror::Error;

use super::{ProbeStage, SmtpReply};

/// Failure of a single command/reply exchange.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Reply(SmtpReply),
}

impl SessionError {
    pub fn reply(&self) -> Option<&SmtpReply> {
        match self {
            Self::Reply(reply) => Some(reply),
            Self::Io(_) => None,
        }
    }
}

/// Probe failures, one variant per stage.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("can't connect to {host}: {source}")]
    Connect { host: String, source: SessionError },
    #[error("HELO failed: {source}")]
    Greeting { source: SessionError },
    #[error("MAIL failed: {source}")]
    Sender { source: SessionError },
    #[error("RCPT failed for {recipient}: {source}")]
    Recipient {
        recipient: String,
        source: SessionError,
    },
    #[error("QUIT failed: {source}")]
    Quit { source: SessionError },
}

impl ProbeError {
    pub fn stage(&self) -> ProbeStage {
        match self {
            Self::Connect { .. } => ProbeStage::Connect,
            Self::Greeting { .. } => ProbeStage::Greeting,
            Self::Sender { .. } => ProbeStage::Sender,
            Self::Recipient { .. } => ProbeStage::Recipient,
            Self::Quit { .. } => ProbeStage::Quit,
        }
    }

    /// The server reply that ended the probe, if the failure was a rejection
    /// rather than a transport error.
    pub fn reply(&self) -> Option<&SmtpReply> {
        self.session().reply()
    }

    fn session(&self) -> &SessionError {
        match self {
            Self::Connect { source, .. }
            | Self::Greeting { source }
            | Self::Sender { source }
            | Self::Recipient { source, .. }
            | Self::Quit { source } => source,
        }
    }
}
