// Phish Probe - Core Library
// Heuristic phishing signals for a URL: registration age/registrar/status via WHOIS,
// a digit-substitution homograph check, and hosting location via an IP/geo API.

pub mod config;
pub mod domain;
pub mod error;
pub mod homograph;
pub mod hosting;
pub mod registration;
pub mod report;
pub mod scanner;
pub mod whois;

// Re-export commonly used types
pub use config::ScanConfig;
pub use domain::{extract_domain, Domain};
pub use error::ScanError;
pub use homograph::{check_homograph, detect_homograph, SUBSTITUTIONS};
pub use hosting::{check_hosting, HostingLookup, HostingRecord, IpInfoClient};
pub use registration::{analyze_registration, check_registration, clean_status, clean_statuses};
pub use report::{Check, Finding, ScanReport, Severity};
pub use scanner::{read_url, run_scan, Scanner};
pub use whois::{parse_whois, parse_whois_date, RegistrationLookup, RegistrationRecord, WhoisClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
