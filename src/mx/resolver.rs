use trust_dns_resolver::{
    Resolver,
    error::{ResolveError, ResolveErrorKind},
};

use super::{ExchangerError, MxRecord};

/// Resolve the mail exchangers of `domain`, ascending preference.
///
/// The domain is normalized via IDNA before querying DNS. An empty answer and
/// a null MX both yield [`ExchangerError::NoExchanger`].
pub fn resolve_exchangers<R>(resolver: &R, domain: &str) -> Result<Vec<MxRecord>, ExchangerError>
where
    R: LookupMx + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    let mut records = resolver.lookup_mx(&ascii)?;

    records.retain(|record| !record.is_null());
    records.sort();
    records.dedup();

    if records.is_empty() {
        return Err(ExchangerError::NoExchanger {
            domain: domain.trim().to_string(),
        });
    }
    Ok(records)
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, ExchangerError> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(ExchangerError::EmptyDomain);
    }
    if trimmed.starts_with('[') {
        return Err(ExchangerError::DomainLiteral {
            domain: trimmed.to_string(),
        });
    }
    idna::domain_to_ascii(trimmed).map_err(|err| ExchangerError::idna(trimmed, err))
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

/// Seam over the MX query so the pipeline can run against a stub.
pub trait LookupMx: Send + Sync {
    /// Raw records for an ASCII domain. "No records" answers are `Ok(vec![])`.
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ExchangerError>;
}

/// Queries the system-configured resolver. A fresh resolver is built for
/// every lookup so nothing is cached between validations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl LookupMx for SystemResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ExchangerError> {
        let resolver = Resolver::from_system_conf().map_err(ExchangerError::resolver_init)?;
        let lookup = match resolver.mx_lookup(domain) {
            Ok(lookup) => lookup,
            Err(err) if is_no_records(&err) => return Ok(Vec::new()),
            Err(err) => return Err(ExchangerError::lookup(domain, err)),
        };
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
            .collect())
    }
}

fn is_no_records(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}
