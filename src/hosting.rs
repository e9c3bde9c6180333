// 🌍 Hosting Locator
// Asks an IP/geo JSON API where a domain is hosted and who runs the network

use crate::config::ScanConfig;
use crate::domain::Domain;
use crate::error::ScanError;
use crate::report::{Check, Finding};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

// ============================================================================
// HOSTING RECORD
// ============================================================================

/// The parts of the geo API answer we report. Other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HostingRecord {
    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub org: Option<String>,
}

impl HostingRecord {
    pub fn country_or_unknown(&self) -> &str {
        self.country.as_deref().unwrap_or("Unknown")
    }

    pub fn org_or_unknown(&self) -> &str {
        self.org.as_deref().unwrap_or("Unknown")
    }
}

// ============================================================================
// LOOKUP TRAIT
// ============================================================================

/// HostingLookup - resolves a domain to hosting country and organization
pub trait HostingLookup: Send + Sync {
    fn lookup(&self, domain: &Domain) -> Result<HostingRecord, ScanError>;
}

// ============================================================================
// IPINFO CLIENT
// ============================================================================

/// `GET {base_url}/{domain}/json`, one request, no retry
#[derive(Debug, Clone)]
pub struct IpInfoClient {
    base_url: String,
    client: Client,
}

impl IpInfoClient {
    pub fn new(base_url: &str) -> Result<Self, ScanError> {
        let client = Client::builder().build()?;
        Ok(IpInfoClient::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        IpInfoClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        IpInfoClient::new(&config.ipinfo_base_url)
    }

    pub fn endpoint(&self, domain: &Domain) -> String {
        format!("{}/{}/json", self.base_url, domain)
    }
}

impl HostingLookup for IpInfoClient {
    fn lookup(&self, domain: &Domain) -> Result<HostingRecord, ScanError> {
        let url = self.endpoint(domain);
        let response = self.client.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;
        debug!(%url, %status, "geo lookup answered");

        // Error bodies are JSON too; they simply lack country/org
        Ok(serde_json::from_str(&body)?)
    }
}

// ============================================================================
// CHECK
// ============================================================================

pub fn describe_hosting(domain: &Domain, record: &HostingRecord) -> Finding {
    Finding::info(
        Check::Hosting,
        "🌍",
        format!(
            "{} is hosted in {} ({})",
            domain,
            record.country_or_unknown(),
            record.org_or_unknown()
        ),
    )
}

/// Look up hosting info. A failed request or undecodable body becomes one error finding.
pub fn check_hosting(lookup: &dyn HostingLookup, domain: &Domain) -> Finding {
    match lookup.lookup(domain) {
        Ok(record) => describe_hosting(domain, &record),
        Err(e) => {
            tracing::warn!(domain = %domain, error = %e, "hosting lookup failed");
            Finding::error(
                Check::Hosting,
                format!("Error retrieving hosting information: {}", e),
            )
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extract_domain;
    use crate::report::Severity;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;

    /// One-shot HTTP server returning `body` with `status_line`; records the request line
    fn spawn_http_server(status_line: &'static str, body: &'static str) -> (String, Arc<Mutex<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let request_line = Arc::new(Mutex::new(String::new()));
        let seen = Arc::clone(&request_line);

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut first = String::new();
            reader.read_line(&mut first).unwrap();
            *seen.lock().unwrap() = first.trim_end().to_string();

            loop {
                let mut header = String::new();
                let read = reader.read_line(&mut header).unwrap();
                if read == 0 || header == "\r\n" {
                    break;
                }
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        (base, request_line)
    }

    fn local_client(base: &str) -> IpInfoClient {
        let client = Client::builder().no_proxy().build().unwrap();
        IpInfoClient::with_client(base, client)
    }

    struct FailingLookup;

    impl HostingLookup for FailingLookup {
        fn lookup(&self, _domain: &Domain) -> Result<HostingRecord, ScanError> {
            Err(ScanError::Http("connection reset".to_string()))
        }
    }

    #[test]
    fn test_record_from_ipinfo_json() {
        let record: HostingRecord = serde_json::from_str(
            r#"{"ip":"93.184.215.14","city":"Los Angeles","country":"US","org":"AS15133 Edgecast Inc."}"#,
        )
        .unwrap();

        assert_eq!(record.country_or_unknown(), "US");
        assert_eq!(record.org_or_unknown(), "AS15133 Edgecast Inc.");
    }

    #[test]
    fn test_missing_fields_are_unknown() {
        let record: HostingRecord =
            serde_json::from_str(r#"{"status":404,"error":{"title":"Wrong ip"}}"#).unwrap();
        let domain = extract_domain("example.com").unwrap();

        assert_eq!(
            describe_hosting(&domain, &record).render(false),
            "🌍 example.com is hosted in Unknown (Unknown)"
        );
    }

    #[test]
    fn test_endpoint() {
        let client = local_client("https://ipinfo.io/");
        let domain = extract_domain("https://www.example.com/path").unwrap();

        assert_eq!(client.endpoint(&domain), "https://ipinfo.io/example.com/json");
    }

    #[test]
    fn test_lookup_against_local_server() {
        let (base, request_line) =
            spawn_http_server("HTTP/1.1 200 OK", r#"{"country":"DE","org":"AS24940 Hetzner Online GmbH"}"#);
        let client = local_client(&base);
        let domain = extract_domain("example.com").unwrap();

        let finding = check_hosting(&client, &domain);

        assert_eq!(
            finding.render(false),
            "🌍 example.com is hosted in DE (AS24940 Hetzner Online GmbH)"
        );
        assert_eq!(*request_line.lock().unwrap(), "GET /example.com/json HTTP/1.1");
    }

    #[test]
    fn test_error_status_with_json_body_reports_unknown() {
        let (base, _) = spawn_http_server(
            "HTTP/1.1 404 Not Found",
            r#"{"status":404,"error":{"title":"Wrong ip","message":"Please provide a valid IP address"}}"#,
        );
        let client = local_client(&base);
        let domain = extract_domain("example.com").unwrap();

        let finding = check_hosting(&client, &domain);
        assert_eq!(finding.severity, Severity::Info);
        assert!(finding.message.ends_with("is hosted in Unknown (Unknown)"));
    }

    #[test]
    fn test_non_json_body_is_an_error() {
        let (base, _) = spawn_http_server("HTTP/1.1 502 Bad Gateway", "<html>bad gateway</html>");
        let client = local_client(&base);
        let domain = extract_domain("example.com").unwrap();

        let finding = check_hosting(&client, &domain);
        assert_eq!(finding.severity, Severity::Error);
        assert!(finding
            .message
            .starts_with("Error retrieving hosting information: could not decode response"));
    }

    #[test]
    fn test_lookup_failure_is_one_error_line() {
        let domain = extract_domain("example.com").unwrap();
        let finding = check_hosting(&FailingLookup, &domain);

        assert_eq!(
            finding.render(false),
            "❌ Error retrieving hosting information: HTTP request failed: connection reset"
        );
    }
}
