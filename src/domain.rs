// 🌐 Domain Extractor
// Reduces an operator-supplied URL to its registrable domain (label + public suffix)

use crate::error::ScanError;
use once_cell::sync::Lazy;
use psl::{List, Psl, Type};
use regex::Regex;
use std::fmt;
use url::{Host, Url};

// "https://", "ftp://" ... at the very start; a "://" later in a query string doesn't count
static LEADING_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").unwrap());

// ============================================================================
// DOMAIN
// ============================================================================

/// Registrable domain: the label directly left of the public suffix, plus the suffix.
///
/// "https://mail.example.co.uk/inbox" → label "example", suffix "co.uk".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    label: String,
    suffix: String,
    name: String,
}

impl Domain {
    fn new(label: &str, suffix: &str) -> Self {
        Domain {
            label: label.to_string(),
            suffix: suffix.to_string(),
            name: format!("{}.{}", label, suffix),
        }
    }

    /// Registrable label, e.g. "example"
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Public suffix, e.g. "com" or "co.uk"
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Full registrable domain, e.g. "example.co.uk"
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Extract the registrable domain from a raw, unvalidated URL.
///
/// Inputs without a scheme are read as `http://...`, so "www.example.com/path"
/// and "https://www.example.com/path" both give "example.com".
///
/// # Errors
/// Empty input, an unparsable URL, a URL without host, an IP literal host, a
/// host under a TLD the suffix list doesn't know, or a host that is only a
/// public suffix.
pub fn extract_domain(input: &str) -> Result<Domain, ScanError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScanError::EmptyInput);
    }

    let url = parse_lenient(trimmed)?;

    let host = match url.host() {
        Some(Host::Domain(host)) => host.trim_end_matches('.'),
        Some(Host::Ipv4(ip)) => return Err(ScanError::HostNotDomain(ip.to_string())),
        Some(Host::Ipv6(ip)) => return Err(ScanError::HostNotDomain(ip.to_string())),
        None => return Err(ScanError::MissingHost(trimmed.to_string())),
    };

    if host.is_empty() {
        return Err(ScanError::MissingHost(trimmed.to_string()));
    }

    split_registrable(host)
}

/// Parse with the scheme the operator gave, or assume http when there is none.
fn parse_lenient(input: &str) -> Result<Url, ScanError> {
    if LEADING_SCHEME.is_match(input) {
        Ok(Url::parse(input)?)
    } else {
        Ok(Url::parse(&format!("http://{}", input))?)
    }
}

/// Split a lowercase ASCII host into registrable label and ICANN public suffix.
///
/// Private PSL entries (github.io, blogspot.com, ...) are not suffixes here: the
/// registrable name is the one a WHOIS registry holds, so "evil.github.io" gives
/// "github.io".
fn split_registrable(host: &str) -> Result<Domain, ScanError> {
    let public = List
        .suffix(host.as_bytes())
        .ok_or_else(|| ScanError::NoRegistrableDomain(host.to_string()))?;
    if !public.is_known() {
        return Err(ScanError::UnknownSuffix(host.to_string()));
    }

    let suffix =
        icann_suffix(host).ok_or_else(|| ScanError::NoRegistrableDomain(host.to_string()))?;

    let label = host
        .strip_suffix(suffix)
        .and_then(|rest| rest.strip_suffix('.'))
        .and_then(|rest| rest.rsplit('.').next())
        .filter(|label| !label.is_empty())
        .ok_or_else(|| ScanError::NoRegistrableDomain(host.to_string()))?;

    Ok(Domain::new(label, suffix))
}

/// Longest tail of `host` that is itself an ICANN public suffix
fn icann_suffix(host: &str) -> Option<&str> {
    let mut tail = host;
    loop {
        let is_icann = List.suffix(tail.as_bytes()).map_or(false, |suffix| {
            suffix.typ() == Some(Type::Icann) && suffix.as_bytes() == tail.as_bytes()
        });
        if is_icann {
            return Some(tail);
        }
        tail = tail.split_once('.')?.1;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_path_and_subdomain_are_dropped() {
        for input in [
            "https://www.example.com/path",
            "http://example.com",
            "example.com",
            "www.example.com/login?next=/",
            "https://a.b.c.example.com:8443/x#frag",
            "  https://EXAMPLE.com/  ",
            "www.example.com/redirect?to=https://other.net",
            "example.com:8080/login",
        ] {
            let domain = extract_domain(input).unwrap();
            assert_eq!(domain.as_str(), "example.com", "input: {}", input);
        }
    }

    #[test]
    fn test_multi_label_suffix() {
        let domain = extract_domain("https://mail.example.co.uk/inbox").unwrap();

        assert_eq!(domain.label(), "example");
        assert_eq!(domain.suffix(), "co.uk");
        assert_eq!(domain.to_string(), "example.co.uk");
    }

    #[test]
    fn test_private_suffix_resolves_to_registered_parent() {
        let domain = extract_domain("https://evil.github.io/login").unwrap();
        assert_eq!(domain.as_str(), "github.io");
        assert_eq!(domain.label(), "github");
        assert_eq!(domain.suffix(), "io");

        let domain = extract_domain("http://phish.account-verify.blogspot.com/").unwrap();
        assert_eq!(domain.as_str(), "blogspot.com");
    }

    #[test]
    fn test_unknown_tld_rejected() {
        assert_eq!(
            extract_domain("https://www.example.zzzz/"),
            Err(ScanError::UnknownSuffix("www.example.zzzz".to_string()))
        );
    }

    #[test]
    fn test_trailing_root_dot() {
        let domain = extract_domain("http://www.example.org./").unwrap();
        assert_eq!(domain.as_str(), "example.org");
    }

    #[test]
    fn test_userinfo_trick_uses_real_host() {
        let domain = extract_domain("https://paypal.com@evil-site.net/login").unwrap();
        assert_eq!(domain.as_str(), "evil-site.net");
    }

    #[test]
    fn test_empty_input_fails_fast() {
        assert_eq!(extract_domain(""), Err(ScanError::EmptyInput));
        assert_eq!(extract_domain("   "), Err(ScanError::EmptyInput));
    }

    #[test]
    fn test_ip_host_rejected() {
        let result = extract_domain("http://192.168.1.10/admin");
        assert_eq!(
            result,
            Err(ScanError::HostNotDomain("192.168.1.10".to_string()))
        );
    }

    #[test]
    fn test_bare_suffix_rejected() {
        assert!(matches!(
            extract_domain("https://co.uk/"),
            Err(ScanError::NoRegistrableDomain(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(extract_domain("http://").is_err());
        assert!(extract_domain("https://exa mple.com").is_err());
    }
}
