use trust_dns_resolver::error::ResolveError;

use super::{ExchangerError, LookupMx, MxRecord, resolve_exchangers, resolver};

type LookupResult = Result<Vec<MxRecord>, ExchangerError>;
type LookupFn = dyn Fn(&str) -> LookupResult + Send + Sync;

pub(crate) struct StubResolver {
    pub on_lookup: Box<LookupFn>,
}

impl StubResolver {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> LookupResult + Send + Sync + 'static,
    {
        Self {
            on_lookup: Box::new(f),
        }
    }

    /// Answers every query with the same records.
    pub(crate) fn with_records(records: Vec<MxRecord>) -> Self {
        Self::new(move |_| Ok(records.clone()))
    }

    /// Fails every query the way a SERVFAIL would.
    pub(crate) fn failing() -> Self {
        Self::new(|domain| Err(ExchangerError::lookup(domain, ResolveError::from("SERVFAIL"))))
    }
}

impl LookupMx for StubResolver {
    fn lookup_mx(&self, domain: &str) -> LookupResult {
        (self.on_lookup)(domain)
    }
}

#[test]
fn normalize_domain_rejects_empty() {
    let err = resolver::normalize_domain("  ").expect_err("empty domain should fail");
    assert!(matches!(err, ExchangerError::EmptyDomain));
}

#[test]
fn normalize_domain_converts_idna() {
    let ascii = resolver::normalize_domain("exämple.com.").expect("idna conversion");
    assert_eq!(ascii, "xn--exmple-cua.com");
}

#[test]
fn domain_literals_are_lookup_failures() {
    let stub = StubResolver::new(|_| panic!("literal must not reach DNS"));
    let err = resolve_exchangers(&stub, "[192.0.2.1]").expect_err("literal");
    assert!(matches!(err, ExchangerError::DomainLiteral { .. }));
    assert!(!err.is_no_exchanger());
}

#[test]
fn sorts_and_dedups_records() {
    let stub = StubResolver::new(|domain| {
        assert_eq!(domain, "example.com");
        Ok(vec![
            MxRecord::new(20, "mx2.example.com"),
            MxRecord::new(10, "mx1.example.com"),
            MxRecord::new(10, "mx1.example.com"),
            MxRecord::new(30, "mx3.example.com"),
        ])
    });

    let records = resolve_exchangers(&stub, "example.com").expect("lookup succeeds");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].preference, 10);
    assert_eq!(records[0].exchange, "mx1.example.com");
    assert_eq!(records[2].preference, 30);
}

#[test]
fn empty_answer_is_no_exchanger() {
    let stub = StubResolver::with_records(Vec::new());
    let err = resolve_exchangers(&stub, "example.com").expect_err("no records");
    assert!(err.is_no_exchanger());
    assert_eq!(err.to_string(), "no MX records found for example.com");
}

#[test]
fn null_mx_is_no_exchanger() {
    let stub = StubResolver::with_records(vec![MxRecord::new(0, "")]);
    let err = resolve_exchangers(&stub, "example.com").expect_err("null MX");
    assert!(err.is_no_exchanger());
}

#[test]
fn resolver_errors_are_lookup_failures() {
    let err = resolve_exchangers(&StubResolver::failing(), "example.com").expect_err("servfail");
    assert!(!err.is_no_exchanger());
    assert!(
        err.to_string().starts_with("MX lookup failed for example.com"),
        "{err}"
    );
}

#[test]
fn normalize_exchange_trims_dot_and_lowercases() {
    let out = resolver::normalize_exchange("Mail.EXAMPLE.com.".to_string());
    assert_eq!(out, "mail.example.com");
    assert_eq!(resolver::normalize_exchange(".".to_string()), "");
}
