//! Validation pipeline: parse, resolve, probe.
//!
//! [`Validator::validate`] never fails. Every stage error is folded into a
//! [`ValidationResult`] and reported to the configured [`EventSink`].

mod error;
mod types;

pub use error::ValidationError;
pub use types::{FailureKind, PipelineState, ValidationRequest, ValidationResult};

use std::sync::Arc;

use crate::address::parse_address;
use crate::events::{EventSink, ValidationEvent};
use crate::mx::{ExchangerError, LookupMx, SystemResolver, resolve_exchangers};
use crate::probe::{ProbeOptions, ProbeTarget, run_probe};

#[derive(Clone)]
pub struct Validator {
    resolver: Arc<dyn LookupMx>,
    options: ProbeOptions,
    sink: Arc<dyn EventSink>,
}

impl Validator {
    pub fn new(
        resolver: Arc<dyn LookupMx>,
        options: ProbeOptions,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            resolver,
            options,
            sink,
        }
    }

    /// Validator backed by the system DNS configuration.
    pub fn system(options: ProbeOptions, sink: Arc<dyn EventSink>) -> Self {
        Self::new(Arc::new(SystemResolver), options, sink)
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    /// Runs the pipeline to completion. Blocking: DNS and SMTP happen on the
    /// calling thread.
    pub fn validate(&self, request: &ValidationRequest) -> ValidationResult {
        let email = request.email();
        self.transition(email, PipelineState::Pending);

        let result = match self.run(request) {
            Ok(()) => {
                self.transition(email, PipelineState::Valid);
                ValidationResult::valid(email)
            }
            Err(err) => {
                self.sink.emit(&ValidationEvent::StageFailed {
                    email: email.to_string(),
                    kind: err.kind(),
                    detail: err.to_string(),
                });
                self.transition(email, PipelineState::Invalid);
                ValidationResult::invalid(email, err.description(), err.to_string())
            }
        };

        self.sink.emit(&ValidationEvent::Completed {
            result: result.clone(),
        });
        result
    }

    fn run(&self, request: &ValidationRequest) -> Result<(), ValidationError> {
        let email = request.email();
        let address = parse_address(email)?;
        self.transition(email, PipelineState::Parsed);

        let exchangers = resolve_exchangers(self.resolver.as_ref(), address.domain())?;
        let Some(primary) = exchangers.first() else {
            return Err(ExchangerError::NoExchanger {
                domain: address.domain().to_string(),
            }
            .into());
        };
        self.transition(email, PipelineState::Resolved);

        let recipient = address.addr_spec();
        let target = ProbeTarget {
            exchanger: &primary.exchange,
            hostname: request.hostname(),
            sender: request.sender(),
            recipient: &recipient,
        };
        let report = run_probe(&target, &self.options, self.sink.as_ref())?;
        self.transition(email, PipelineState::Probed);

        if let Some(quit) = report.quit_error {
            self.sink.emit(&ValidationEvent::QuitFailed {
                email: email.to_string(),
                detail: quit.to_string(),
            });
        }
        Ok(())
    }

    fn transition(&self, email: &str, state: PipelineState) {
        self.sink.emit(&ValidationEvent::StateChanged {
            email: email.to_string(),
            state,
        });
    }
}

#[cfg(test)]
pub(crate) mod tests;
