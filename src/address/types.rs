use std::fmt;
use std::str::FromStr;

use super::{AddressError, parse_address};

/// A syntactically valid mailbox, stripped of its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    local_part: String,
    domain: String,
    display_name: Option<String>,
}

impl Address {
    pub(crate) fn new(
        local_part: impl Into<String>,
        domain: impl Into<String>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
            display_name,
        }
    }

    /// Local part in canonical form: quoted only when it is not a dot-atom.
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// `local@domain`, the form used in `RCPT TO`.
    pub fn addr_spec(&self) -> String {
        format!("{}@{}", self.local_part, self.domain)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}
