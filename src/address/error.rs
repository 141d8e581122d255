use thiserror::Error;

/// Syntax complaints raised while parsing an RFC 5322 mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("no address")]
    Empty,
    #[error("missing @ in addr-spec")]
    MissingAt,
    #[error("missing local part")]
    MissingLocalPart,
    #[error("missing domain")]
    MissingDomain,
    #[error("no angle-addr")]
    NoAngleAddr,
    #[error("unclosed angle-addr")]
    UnclosedAngleAddr,
    #[error("unclosed quoted-string")]
    UnclosedQuotedString,
    #[error("unclosed domain-literal")]
    UnclosedDomainLiteral,
    #[error("comments are not allowed")]
    Comment,
    #[error("groups and address lists are not allowed")]
    AddressList,
    #[error("expected single address, found trailing {0:?}")]
    TrailingData(String),
    #[error("{part} has a leading, trailing or doubled dot")]
    MisplacedDot { part: &'static str },
    #[error("invalid character {ch:?} in {part}")]
    InvalidChar { part: &'static str, ch: char },
    #[error("local part length {0} > 64")]
    LocalPartTooLong(usize),
    #[error("address length {0} > 254")]
    TooLong(usize),
}

impl AddressError {
    pub(crate) fn misplaced_dot(part: &'static str) -> Self {
        Self::MisplacedDot { part }
    }

    pub(crate) fn invalid_char(part: &'static str, ch: char) -> Self {
        Self::InvalidChar { part, ch }
    }
}
