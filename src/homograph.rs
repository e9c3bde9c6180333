// 🔤 Homograph Checker
//
// Crude substitution check: flags any domain containing a digit commonly used in
// place of a look-alike letter. Position and context are ignored, so "web4.com"
// is flagged too. Unicode confusables (Cyrillic "а" for Latin "a", etc.) are not
// covered; the url crate hands us the punycode form of such hosts.

use crate::domain::Domain;
use crate::report::{Check, Finding};

/// Digit → the letter it imitates
pub const SUBSTITUTIONS: [(char, char); 5] = [
    ('0', 'o'),
    ('1', 'l'),
    ('5', 's'),
    ('8', 'B'),
    ('4', 'A'),
];

pub fn detect_homograph(domain: &str) -> bool {
    domain
        .chars()
        .any(|c| SUBSTITUTIONS.iter().any(|(digit, _)| *digit == c))
}

/// Exactly one finding: detected (warning) or not detected (info)
pub fn check_homograph(domain: &Domain) -> Finding {
    if detect_homograph(domain.as_str()) {
        Finding::warning(
            Check::Homograph,
            "Potential homograph attack detected in domain name!",
        )
    } else {
        Finding::info(Check::Homograph, "✅", "No homograph attack detected.")
    }
}
