use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangerError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("MX lookup failed for {domain}: domain literals have no MX records")]
    DomainLiteral { domain: String },
    #[error("MX lookup failed for {domain}: IDNA conversion failed")]
    IdnaConversion {
        domain: String,
        #[source]
        source: idna::Errors,
    },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("MX lookup failed for {domain}: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
    #[error("no MX records found for {domain}")]
    NoExchanger { domain: String },
}

impl ExchangerError {
    pub(crate) fn idna(domain: impl Into<String>, source: idna::Errors) -> Self {
        Self::IdnaConversion {
            domain: domain.into(),
            source,
        }
    }

    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn lookup(
        domain: impl Into<String>,
        source: trust_dns_resolver::error::ResolveError,
    ) -> Self {
        Self::Lookup {
            domain: domain.into(),
            source,
        }
    }

    /// True when DNS answered but named no usable exchanger.
    pub fn is_no_exchanger(&self) -> bool {
        matches!(self, Self::NoExchanger { .. })
    }
}
