// ⚙️ Scan configuration - where the lookups go
// Defaults point at the public services; tests swap in loopback addresses.

use std::time::Duration;

/// IANA's WHOIS server, which refers each TLD to its registry
pub const WHOIS_BOOTSTRAP_SERVER: &str = "whois.iana.org";

pub const WHOIS_PORT: u16 = 43;

/// Per-lookup limit handed to whois-rust
pub const WHOIS_TIMEOUT: Duration = Duration::from_secs(10);

/// IANA → registry → registrar
pub const WHOIS_REFERRAL_HOPS: u16 = 2;

pub const IPINFO_BASE_URL: &str = "https://ipinfo.io";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// First WHOIS server asked for every domain
    pub whois_server: String,

    /// Port of the bootstrap server; referrals use whatever port they name
    pub whois_port: u16,

    /// Base URL of the IP/geo JSON API, without trailing slash
    pub ipinfo_base_url: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            whois_server: WHOIS_BOOTSTRAP_SERVER.to_string(),
            whois_port: WHOIS_PORT,
            ipinfo_base_url: IPINFO_BASE_URL.to_string(),
        }
    }
}
