use thiserror::Error;

use super::FailureKind;
use super::types::{DESCRIPTION_MALFORMED, DESCRIPTION_NO_EXCHANGER, DESCRIPTION_UNREACHABLE};
use crate::address::AddressError;
use crate::mx::ExchangerError;
use crate::probe::{ProbeError, ProbeStage};

/// The first failure of a validation run.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid email: {0}")]
    Address(#[from] AddressError),
    #[error(transparent)]
    Exchanger(#[from] ExchangerError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

impl ValidationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Address(_) => FailureKind::MalformedAddress,
            Self::Exchanger(err) if err.is_no_exchanger() => FailureKind::NoExchangerFound,
            Self::Exchanger(_) => FailureKind::ExchangerLookupFailed,
            Self::Probe(err) => match err.stage() {
                ProbeStage::Connect => FailureKind::ConnectFailed,
                ProbeStage::Greeting => FailureKind::GreetingFailed,
                ProbeStage::Sender => FailureKind::SenderRejected,
                ProbeStage::Recipient => FailureKind::RecipientRejected,
                ProbeStage::Quit => FailureKind::QuitFailed,
            },
        }
    }

    /// Short human-readable summary. Rejections past the banner surface the
    /// server's own reply.
    pub fn description(&self) -> String {
        match self {
            Self::Address(_) => DESCRIPTION_MALFORMED.to_string(),
            Self::Exchanger(_) => DESCRIPTION_NO_EXCHANGER.to_string(),
            Self::Probe(err) if err.stage() == ProbeStage::Connect => {
                DESCRIPTION_UNREACHABLE.to_string()
            }
            Self::Probe(err) => err
                .reply()
                .map_or_else(|| DESCRIPTION_UNREACHABLE.to_string(), ToString::to_string),
        }
    }
}
