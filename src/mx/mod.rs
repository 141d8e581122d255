//! DNS MX resolution.
//!
//! [`resolve_exchangers`] returns the exchangers of a domain sorted by
//! ascending preference, distinguishing a failed lookup from an answer that
//! names no exchanger.

mod error;
mod resolver;
mod types;

pub use error::ExchangerError;
pub use resolver::{LookupMx, SystemResolver, resolve_exchangers};
pub use types::MxRecord;

#[cfg(test)]
pub(crate) mod tests;
