// 📋 Findings - what each check reports, and how it is rendered to the console

use crate::domain::Domain;

#[cfg(feature = "color")]
use crossterm::style::Stylize;

// ============================================================================
// SEVERITY / CHECK
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,    // Plain observation
    Warning, // Signal worth a second look, or a field that was absent
    Error,   // The lookup behind the check failed
}

/// Which analyzer produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Registration,
    Homograph,
    Hosting,
}

// ============================================================================
// FINDING
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub check: Check,
    pub severity: Severity,
    pub marker: &'static str,
    pub message: String,
}

impl Finding {
    pub fn info(check: Check, marker: &'static str, message: impl Into<String>) -> Self {
        Finding {
            check,
            severity: Severity::Info,
            marker,
            message: message.into(),
        }
    }

    pub fn warning(check: Check, message: impl Into<String>) -> Self {
        Finding {
            check,
            severity: Severity::Warning,
            marker: "⚠️",
            message: message.into(),
        }
    }

    pub fn error(check: Check, message: impl Into<String>) -> Self {
        Finding {
            check,
            severity: Severity::Error,
            marker: "❌",
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// One console line: "{marker} {message}", coloured by severity when asked to
    pub fn render(&self, color: bool) -> String {
        let line = format!("{} {}", self.marker, self.message);
        if color {
            paint(&line, self.severity)
        } else {
            line
        }
    }
}

#[cfg(feature = "color")]
fn paint(line: &str, severity: Severity) -> String {
    match severity {
        Severity::Info => line.to_string(),
        Severity::Warning => line.to_string().yellow().to_string(),
        Severity::Error => line.to_string().red().to_string(),
    }
}

#[cfg(not(feature = "color"))]
fn paint(line: &str, _severity: Severity) -> String {
    line.to_string()
}

// ============================================================================
// SCAN REPORT
// ============================================================================

/// All findings for one domain, in the order the checks ran
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub domain: Domain,
    pub findings: Vec<Finding>,
}

impl ScanReport {
    pub fn new(domain: Domain) -> Self {
        ScanReport {
            domain,
            findings: Vec::new(),
        }
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn for_check(&self, check: Check) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.check == check)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_warning())
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} findings, {} warnings, {} errors",
            self.domain,
            self.findings.len(),
            self.warnings().count(),
            self.errors().count()
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
