//! SSRF guard: rejects fetch targets whose host is, or resolves to, a
//! private, loopback, or link-local address.

use std::net::IpAddr;

/// Hostnames treated as loopback regardless of how they resolve.
const LOOPBACK_NAMES: &[&str] = &["localhost", "localhost.localdomain", "ip6-localhost"];

/// True if `ip` falls in a private, loopback, or link-local range.
///
/// Covers `127.0.0.0/8`, `10.0.0.0/8`, `172.16.0.0/12`, `192.168.0.0/16`,
/// link-local (`169.254.0.0/16`), and the IPv6 loopback/unique-local
/// equivalents.
pub fn is_blocked_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_broadcast()
        }
        IpAddr::V6(v6) => v6.is_loopback() || (v6.segments()[0] & 0xfe00) == 0xfc00,
    }
}

/// Checks a host string (not yet resolved) against literal-IP ranges, the
/// loopback hostname list, and any additional hosts an operator has
/// explicitly blocked in `ComplianceConfig::blocked_hosts`.
pub fn is_blocked_host(host: &str, extra_blocked: &[String]) -> bool {
    let host_lower = host.trim().trim_matches('.').to_lowercase();

    if LOOPBACK_NAMES.contains(&host_lower.as_str()) {
        return true;
    }

    if let Ok(ip) = host_lower.parse::<IpAddr>() {
        if is_blocked_ip(ip) {
            return true;
        }
    }

    extra_blocked
        .iter()
        .any(|blocked| blocked.to_lowercase() == host_lower)
}

/// Resolves `host` via DNS and blocks it if any resolved address is private,
/// loopback, or link-local. Used for the "resolves to" half of the guard —
/// `is_blocked_host` alone only catches literal IPs and configured names.
pub async fn resolves_to_blocked_range(host: &str, port: u16) -> bool {
    match tokio::net::lookup_host((host, port)).await {
        Ok(addrs) => addrs.map(|a| a.ip()).any(is_blocked_ip),
        // DNS failure is not itself an SSRF signal; the fetch will fail on
        // its own and the caller surfaces a network error.
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_loopback_literal() {
        assert!(is_blocked_host("127.0.0.1", &[]));
        assert!(is_blocked_host("localhost", &[]));
    }

    #[test]
    fn blocks_private_ranges() {
        assert!(is_blocked_host("10.0.0.5", &[]));
        assert!(is_blocked_host("172.16.0.1", &[]));
        assert!(is_blocked_host("192.168.1.1", &[]));
        assert!(is_blocked_host("169.254.169.254", &[]));
    }

    #[test]
    fn allows_public_host() {
        assert!(!is_blocked_host("example.com", &[]));
        assert!(!is_blocked_host("8.8.8.8", &[]));
    }

    #[test]
    fn honors_operator_blocklist() {
        assert!(is_blocked_host("metadata.internal", &["metadata.internal".to_string()]));
    }

    #[tokio::test]
    async fn resolves_to_blocked_range_flags_loopback() {
        assert!(resolves_to_blocked_range("127.0.0.1", 80).await);
    }
}
