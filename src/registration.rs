// 🏛️ Registration Analyzer
// Turns a registration record into findings: domain age, registrar, status codes

use crate::domain::Domain;
use crate::report::{Check, Finding};
use crate::whois::{RegistrationLookup, RegistrationRecord};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Domains younger than this many days are flagged as newly registered
pub const NEW_DOMAIN_DAYS: i64 = 365;

/// Status code whose absence suggests standard registrar protections are missing
pub const TRANSFER_LOCK_STATUS: &str = "clientTransferProhibited";

// "(...)" annotations and embedded URLs that registries append to status codes
static STATUS_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(.*?\)|\s*https?://\S+").unwrap());

/// "clientTransferProhibited (https://icann.org/epp#clientTransferProhibited)" → "clientTransferProhibited"
pub fn clean_status(status: &str) -> String {
    STATUS_NOISE.replace_all(status, "").into_owned()
}

pub fn clean_statuses(statuses: &[String]) -> Vec<String> {
    statuses.iter().map(|s| clean_status(s)).collect()
}

/// Analyze a record as of `now`.
///
/// Missing creation date and missing registrar are warnings; missing status codes
/// produce nothing at all.
pub fn analyze_registration(record: &RegistrationRecord, now: DateTime<Utc>) -> Vec<Finding> {
    let mut findings = Vec::new();

    match record.creation_date() {
        Some(created) => {
            findings.push(Finding::info(
                Check::Registration,
                "📅",
                format!(
                    "Domain was registered on: {}",
                    created.format("%Y-%m-%d %H:%M:%S")
                ),
            ));

            let age_days = (now - created).num_days();
            if age_days < NEW_DOMAIN_DAYS {
                findings.push(Finding::warning(
                    Check::Registration,
                    "Warning: This domain is less than a year old, it may be a phishing site!",
                ));
            }
        }
        None => findings.push(Finding::warning(
            Check::Registration,
            "Warning: Could not determine domain registration date.",
        )),
    }

    match &record.registrar {
        Some(registrar) => findings.push(Finding::info(
            Check::Registration,
            "🏛️",
            format!("Registrar: {}", registrar),
        )),
        None => findings.push(Finding::warning(
            Check::Registration,
            "Warning: Registrar information is missing.",
        )),
    }

    if let Some(statuses) = record.statuses.as_deref().filter(|s| !s.is_empty()) {
        let cleaned = clean_statuses(statuses);
        findings.push(Finding::info(
            Check::Registration,
            "🔍",
            format!("Cleaned Domain Status: {:?}", cleaned),
        ));

        if !cleaned.iter().any(|s| s == TRANSFER_LOCK_STATUS) {
            findings.push(Finding::warning(
                Check::Registration,
                "Warning: This domain may not have standard security protections!",
            ));
        }
    }

    findings
}

/// Look the domain up and analyze it. A failed lookup becomes a single error finding.
pub fn check_registration(
    lookup: &dyn RegistrationLookup,
    domain: &Domain,
    now: DateTime<Utc>,
) -> Vec<Finding> {
    match lookup.lookup(domain) {
        Ok(record) => analyze_registration(&record, now),
        Err(e) => {
            tracing::warn!(domain = %domain, error = %e, "registration lookup failed");
            vec![Finding::error(
                Check::Registration,
                format!("Error retrieving WHOIS information: {}", e),
            )]
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
