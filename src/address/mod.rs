//! RFC 5322 mailbox parsing.
//!
//! [`parse_address`] accepts either a bare `local@domain` or a
//! `Display Name <local@domain>` form and returns the address without its
//! display name. Comments, groups and address lists are rejected.

mod error;
mod parser;
mod types;

pub use error::AddressError;
pub use types::Address;

use parser::Parser;

const MAX_LOCAL_LEN: usize = 64;
const MAX_ADDRESS_LEN: usize = 254;

pub fn parse_address(input: &str) -> Result<Address, AddressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }

    let mailbox = Parser::new(trimmed).mailbox()?;
    let local_len = mailbox.spec.local.len();
    if local_len > MAX_LOCAL_LEN {
        return Err(AddressError::LocalPartTooLong(local_len));
    }
    let total = local_len + 1 + mailbox.spec.domain.len();
    if total > MAX_ADDRESS_LEN {
        return Err(AddressError::TooLong(total));
    }

    Ok(Address::new(
        mailbox.spec.local,
        mailbox.spec.domain,
        mailbox.display_name,
    ))
}
