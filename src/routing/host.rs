//! Tenant extraction from the Host header.
//!
//! # Responsibilities
//! - Split the host into DNS labels
//! - Treat the bare domain and the canonical label (`www`) as production
//! - Yield the first label as the tenant otherwise
//!
//! # Design Decisions
//! - Single-level only: `a.b.example.com` yields tenant `a`
//! - Label comparison is case-sensitive
//! - An empty first label (`.example.com`) is never a tenant

use std::fmt;

/// A host needs at least this many labels before its first label names a tenant.
pub const TENANT_MIN_LABELS: usize = 3;

/// Tenant identifier borrowed from the first label of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tenant<'a>(&'a str);

impl<'a> Tenant<'a> {
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl fmt::Display for Tenant<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Extract the tenant from `host`.
///
/// Returns `None` for hosts with fewer than [`TENANT_MIN_LABELS`] labels and
/// for hosts whose first label equals `canonical_label`.
pub fn tenant<'a>(host: &'a str, canonical_label: &str) -> Option<Tenant<'a>> {
    let mut labels = host.split('.');
    let first = labels.next()?;

    if 1 + labels.count() < TENANT_MIN_LABELS {
        return None;
    }

    if first.is_empty() || first == canonical_label {
        return None;
    }

    Some(Tenant(first))
}

/// Strip an optional `:port` suffix from a Host header value.
///
/// Bracketed IPv6 literals keep their brackets: `[::1]:8080` becomes `[::1]`.
pub fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port))
            if !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && (!name.contains(':') || name.ends_with(']')) =>
        {
            name
        }
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_label_host_has_no_tenant() {
        assert_eq!(tenant("example.com", "www"), None);
    }

    #[test]
    fn test_www_host_has_no_tenant() {
        assert_eq!(tenant("www.example.com", "www"), None);
        assert_eq!(tenant("www.shop.example.com", "www"), None);
    }

    #[test]
    fn test_subdomain_is_tenant() {
        assert_eq!(tenant("acme.example.com", "www").map(|t| t.as_str()), Some("acme"));
    }

    #[test]
    fn test_nested_subdomain_takes_first_label() {
        assert_eq!(tenant("a.b.example.com", "www").map(|t| t.as_str()), Some("a"));
    }

    #[test]
    fn test_degenerate_hosts() {
        assert_eq!(tenant("", "www"), None);
        assert_eq!(tenant("localhost", "www"), None);
        assert_eq!(tenant(".example.com", "www"), None);
    }

    #[test]
    fn test_label_match_is_case_sensitive() {
        assert_eq!(tenant("WWW.example.com", "www").map(|t| t.to_string()), Some("WWW".to_string()));
    }

    #[test]
    fn test_custom_canonical_label() {
        assert_eq!(tenant("app.example.com", "app"), None);
        assert_eq!(tenant("www.example.com", "app").map(|t| t.as_str()), Some("www"));
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("acme.example.com:8080"), "acme.example.com");
        assert_eq!(strip_port("acme.example.com"), "acme.example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("[::1]"), "[::1]");
        assert_eq!(strip_port("example.com:"), "example.com:");
    }
}
