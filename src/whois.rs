// 📇 WHOIS Client - registration metadata from the domain directory
//
// Transport and referral chasing belong to whois-rust: the query starts at
// whois.iana.org, follows "refer:" to the registry and, for thin registries such
// as .com, "Registrar WHOIS Server:" to the registrar. This module only turns the
// final answer into a RegistrationRecord.

use crate::config::{ScanConfig, WHOIS_PORT, WHOIS_REFERRAL_HOPS, WHOIS_TIMEOUT};
use crate::domain::Domain;
use crate::error::ScanError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt::Display;
use tracing::debug;
use whois_rust::{WhoIs, WhoIsLookupOptions};

// ============================================================================
// REGISTRATION RECORD
// ============================================================================

/// Registration metadata as returned by the directory. Every field may be absent;
/// the shape varies by registry and is not validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationRecord {
    /// Creation dates in the order the record lists them
    pub creation_dates: Vec<DateTime<Utc>>,

    pub registrar: Option<String>,

    /// Raw status codes, annotations included (cleaned by the analyzer)
    pub statuses: Option<Vec<String>>,
}

impl RegistrationRecord {
    /// First listed creation date, if any
    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.creation_dates.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.creation_dates.is_empty() && self.registrar.is_none() && self.statuses.is_none()
    }
}

// ============================================================================
// LOOKUP TRAIT
// ============================================================================

/// RegistrationLookup - anything that can fetch registration metadata for a domain
///
/// Implemented by `WhoisClient`; tests substitute canned records or failures.
pub trait RegistrationLookup: Send + Sync {
    /// # Returns
    /// * `Ok(RegistrationRecord)` - possibly with every field absent
    /// * `Err(ScanError)` - network failure, or no record exists
    fn lookup(&self, domain: &Domain) -> Result<RegistrationRecord, ScanError>;
}

// ============================================================================
// WHOIS CLIENT
// ============================================================================

#[derive(Debug, Clone)]
pub struct WhoisClient {
    whois: WhoIs,
    bootstrap_server: String,
}

impl WhoisClient {
    /// Client whose queries start at `bootstrap_server`; non-standard ports are
    /// passed on as "host:port".
    pub fn new(bootstrap_server: &str, port: u16) -> Result<Self, ScanError> {
        let host = if port == WHOIS_PORT {
            bootstrap_server.to_string()
        } else {
            format!("{}:{}", bootstrap_server, port)
        };

        let whois = WhoIs::from_host(host.as_str()).map_err(|e| whois_error(&host, e))?;

        Ok(WhoisClient {
            whois,
            bootstrap_server: host,
        })
    }

    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        WhoisClient::new(&config.whois_server, config.whois_port)
    }

    /// Raw text of the last server in the referral chain
    pub fn query(&self, domain: &Domain) -> Result<String, ScanError> {
        let mut options = WhoIsLookupOptions::from_string(domain.as_str())
            .map_err(|e| whois_error(&self.bootstrap_server, e))?;
        options.follow = WHOIS_REFERRAL_HOPS;
        options.timeout = Some(WHOIS_TIMEOUT);

        debug!(domain = %domain, server = %self.bootstrap_server, "sending WHOIS query");
        let text = self
            .whois
            .lookup(options)
            .map_err(|e| whois_error(&self.bootstrap_server, e))?;

        debug!(domain = %domain, bytes = text.len(), "WHOIS response received");
        Ok(text)
    }
}

impl RegistrationLookup for WhoisClient {
    fn lookup(&self, domain: &Domain) -> Result<RegistrationRecord, ScanError> {
        let text = self.query(domain)?;
        record_from_response(&self.bootstrap_server, domain, &text)
    }
}

fn whois_error(server: &str, reason: impl Display) -> ScanError {
    ScanError::Whois {
        server: server.to_string(),
        reason: reason.to_string(),
    }
}

/// Interpret the final response of a lookup that started at `bootstrap_server`.
///
/// An IANA TLD record means no registry was referred to, so nothing about the
/// domain itself was learned.
pub fn record_from_response(
    bootstrap_server: &str,
    domain: &Domain,
    text: &str,
) -> Result<RegistrationRecord, ScanError> {
    if is_iana_tld_record(text) {
        return Err(whois_error(
            bootstrap_server,
            format!("no WHOIS server known for .{}", domain.suffix()),
        ));
    }

    let record = parse_whois(text);
    if record.is_empty() && is_not_found(text) {
        return Err(ScanError::NotRegistered(domain.to_string()));
    }

    Ok(record)
}

// ============================================================================
// RESPONSE PARSING
// ============================================================================

enum Field {
    Creation,
    Registrar,
    Status,
}

fn field_for(key: &str) -> Option<Field> {
    match key {
        "creation date"
        | "created"
        | "created on"
        | "registered on"
        | "registered"
        | "registration time"
        | "domain registration date" => Some(Field::Creation),
        "registrar" | "sponsoring registrar" | "registrar name" => Some(Field::Registrar),
        "domain status" | "status" => Some(Field::Status),
        _ => None,
    }
}

/// Split "Key:   value" into a lowercase key and trimmed value, skipping comments.
fn key_value(line: &str) -> Option<(String, &str)> {
    let line = line.trim();
    if line.starts_with('%') || line.starts_with('#') || line.starts_with(">>>") {
        return None;
    }

    let (key, value) = line.split_once(':')?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    Some((key.trim().to_ascii_lowercase(), value))
}

/// Parse a raw WHOIS response. Unrecognised lines are ignored.
pub fn parse_whois(text: &str) -> RegistrationRecord {
    let mut record = RegistrationRecord::default();

    for (key, value) in text.lines().filter_map(key_value) {
        match field_for(&key) {
            Some(Field::Creation) => {
                if let Some(date) = parse_whois_date(value) {
                    record.creation_dates.push(date);
                }
            }
            Some(Field::Registrar) => {
                if record.registrar.is_none() {
                    record.registrar = Some(value.to_string());
                }
            }
            Some(Field::Status) => {
                record
                    .statuses
                    .get_or_insert_with(Vec::new)
                    .push(value.to_string());
            }
            None => {}
        }
    }

    record
}

fn is_iana_tld_record(text: &str) -> bool {
    text.lines()
        .filter_map(key_value)
        .any(|(key, value)| key == "source" && value.eq_ignore_ascii_case("IANA"))
}

fn is_not_found(text: &str) -> bool {
    let lower = text.to_lowercase();
    ["no match", "not found", "no data found", "no entries found"]
        .iter()
        .any(|marker| lower.contains(marker))
}

// ============================================================================
// DATES
// ============================================================================

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d-%b-%Y %H:%M:%S",
    "%Y.%m.%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d-%b-%Y",
    "%d.%m.%Y",
    "%Y.%m.%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
];

/// Parse the date formats registries commonly emit. Naive values are read as UTC,
/// trailing zone words ("UTC", "CLST") are dropped.
pub fn parse_whois_date(value: &str) -> Option<DateTime<Utc>> {
    let tokens: Vec<&str> = value.split_whitespace().collect();

    // Longest candidate first: "2020-01-01 10:00:00 UTC", "2020-01-01 10:00:00", "2020-01-01"
    (1..=tokens.len())
        .rev()
        .find_map(|n| parse_date_candidate(&tokens[..n].join(" ")))
}

fn parse_date_candidate(candidate: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(candidate) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(candidate, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(candidate, format) {
            return Some(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}

// ============================================================================
// TESTS
// ============================================================================
