use serde::{Deserialize, Serialize};

/// One mail exchanger. Ordering sorts by ascending preference first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }

    /// RFC 7505 null MX: the domain explicitly accepts no mail.
    pub fn is_null(&self) -> bool {
        self.exchange.is_empty()
    }
}
