// 🔎 Scanner - runs the three checks against one domain, in fixed order
//
// Registration → Homograph → Hosting. Nothing flows between them and a failure
// in one never stops the next.

use crate::config::ScanConfig;
use crate::domain::{extract_domain, Domain};
use crate::error::ScanError;
use crate::homograph::check_homograph;
use crate::hosting::{check_hosting, HostingLookup, IpInfoClient};
use crate::registration::check_registration;
use crate::report::{Finding, ScanReport};
use crate::whois::{RegistrationLookup, WhoisClient};
use chrono::Utc;
use std::io::{self, BufRead, Write};

pub struct Scanner {
    registration: Box<dyn RegistrationLookup>,
    hosting: Box<dyn HostingLookup>,
}

impl Scanner {
    pub fn new(registration: Box<dyn RegistrationLookup>, hosting: Box<dyn HostingLookup>) -> Self {
        Scanner {
            registration,
            hosting,
        }
    }

    /// Real WHOIS and geo clients for the configured endpoints
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        Ok(Scanner::new(
            Box::new(WhoisClient::from_config(config)?),
            Box::new(IpInfoClient::from_config(config)?),
        ))
    }

    pub fn check_registration(&self, domain: &Domain) -> Vec<Finding> {
        check_registration(self.registration.as_ref(), domain, Utc::now())
    }

    pub fn check_homograph(&self, domain: &Domain) -> Vec<Finding> {
        vec![check_homograph(domain)]
    }

    pub fn check_hosting(&self, domain: &Domain) -> Vec<Finding> {
        vec![check_hosting(self.hosting.as_ref(), domain)]
    }

    /// Run every check, handing each batch of findings to `emit` as soon as its check ends
    pub fn scan_with<F>(&self, domain: &Domain, mut emit: F) -> ScanReport
    where
        F: FnMut(&[Finding]),
    {
        let mut report = ScanReport::new(domain.clone());

        let checks: [fn(&Self, &Domain) -> Vec<Finding>; 3] = [
            Self::check_registration,
            Self::check_homograph,
            Self::check_hosting,
        ];

        for check in checks {
            let findings = check(self, domain);
            emit(findings.as_slice());
            report.extend(findings);
        }

        report
    }

    pub fn scan(&self, domain: &Domain) -> ScanReport {
        self.scan_with(domain, |_| {})
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner").finish_non_exhaustive()
    }
}

// ============================================================================
// CONSOLE FLOW
// ============================================================================

/// Prompt on `out` and read one URL line from `input`
pub fn read_url<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<String> {
    write!(out, "🔗 Enter a URL: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(line.trim().to_string())
}

/// Extract the domain from `url`, then stream every check's findings to `out`.
///
/// Returns the process exit code: 1 when the URL has no usable domain (reported
/// on `err`, nothing on `out`), 0 once all checks ran.
pub fn run_scan<W: Write, E: Write>(
    url: &str,
    scanner: &Scanner,
    out: &mut W,
    err: &mut E,
    color: bool,
) -> io::Result<i32> {
    let domain = match extract_domain(url) {
        Ok(domain) => domain,
        Err(e) => {
            writeln!(err, "❌ Invalid URL: {}", e)?;
            return Ok(1);
        }
    };

    writeln!(out, "\n🔍 Checking domain: {}\n", domain)?;

    let mut written = Ok(());
    let report = scanner.scan_with(&domain, |findings| {
        for finding in findings {
            if written.is_ok() {
                written = writeln!(out, "{}", finding.render(color));
            }
        }
    });
    written?;

    tracing::info!("{}", report.summary());
    Ok(0)
}
