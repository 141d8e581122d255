#![forbid(unsafe_code)]
//! mail_bouncer: email deliverability checks over HTTP.
//!
//! The pipeline parses an address, resolves the MX hosts of its domain and
//! asks the top-priority exchanger whether it would accept the recipient,
//! without ever sending a message.

pub mod address;
pub mod events;
pub mod mx;
pub mod probe;
pub mod validation;

pub use address::{Address, AddressError, parse_address};
pub use events::{EventSink, MemorySink, TracingSink, ValidationEvent};
pub use mx::{ExchangerError, LookupMx, MxRecord, SystemResolver, resolve_exchangers};
pub use probe::{ProbeError, ProbeOptions, ProbeReport, ProbeStage, SmtpReply, run_probe};
pub use validation::{
    FailureKind, PipelineState, ValidationError, ValidationRequest, ValidationResult, Validator,
};

#[cfg(feature = "server")]
pub mod notify;
#[cfg(feature = "server")]
pub use notify::{CallbackError, CallbackNotifier, parse_callback};

#[cfg(feature = "server")]
pub mod server;
