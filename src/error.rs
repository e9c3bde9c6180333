// ❌ Error types shared by the extractor and the lookup clients

use thiserror::Error;

/// Everything that can go wrong while extracting a domain or talking to a lookup service.
///
/// Payloads are plain strings so the error stays `Clone` and comparable in tests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    /// Nothing was entered.
    #[error("no URL was provided")]
    EmptyInput,

    /// The input could not be parsed as a URL.
    #[error("could not parse URL: {0}")]
    InvalidUrl(String),

    /// The URL parsed but carries no host.
    #[error("URL has no host: {0}")]
    MissingHost(String),

    /// The host is an IP literal, which has no registrable domain.
    #[error("host is an IP address, not a domain: {0}")]
    HostNotDomain(String),

    /// The host ends in a TLD the Public Suffix List doesn't know.
    #[error("unknown top-level domain in host: {0}")]
    UnknownSuffix(String),

    /// The host is a bare public suffix (e.g. "co.uk").
    #[error("no registrable domain in host: {0}")]
    NoRegistrableDomain(String),

    /// Connecting to or reading from a WHOIS server failed.
    #[error("WHOIS query to {server} failed: {reason}")]
    Whois { server: String, reason: String },

    /// The directory answered but holds no record for the domain.
    #[error("no WHOIS record found for {0}")]
    NotRegistered(String),

    /// The HTTP request to the geo lookup service failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// A response body could not be decoded.
    #[error("could not decode response: {0}")]
    InvalidResponse(String),
}

impl From<url::ParseError> for ScanError {
    fn from(err: url::ParseError) -> Self {
        ScanError::InvalidUrl(err.to_string())
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ScanError::InvalidResponse(err.to_string())
        } else {
            ScanError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::InvalidResponse(err.to_string())
    }
}
