//! robots.txt fetching, parsing, and a shared TTL cache keyed by domain.
//!
//! The cache is a `dashmap::DashMap` rather than a `Mutex<HashMap>` so reads
//! for distinct domains never contend with each other — the same pattern
//! the core crate uses for its connection-pool-adjacent shared state.

use dashmap::DashMap;
use preventia_core::error::{Error, ErrorCode, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Parsed directives relevant to a single user agent, extracted from one
/// robots.txt document. Only the `*` group and the configured agent's own
/// group (if present) are retained; matching prefers the most specific
/// (longest) matching group per the Robots Exclusion Protocol.
#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    disallow: Vec<String>,
    allow: Vec<String>,
    pub crawl_delay: Option<f64>,
}

impl RobotsRules {
    /// Parses a robots.txt document, retaining only directives that apply
    /// to `user_agent` (case-insensitive, falling back to the `*` group).
    pub fn parse(body: &str, user_agent: &str) -> Self {
        let agent_lower = user_agent.to_lowercase();
        let mut current_group_matches = false;
        let mut matched_specific = false;
        let mut rules = RobotsRules::default();

        for raw_line in body.lines() {
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }
            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim().to_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    let value_lower = value.to_lowercase();
                    if value_lower == "*" {
                        // Only adopt the wildcard group if we haven't
                        // already locked onto a more specific one.
                        if !matched_specific {
                            current_group_matches = true;
                        }
                    } else if agent_lower.contains(&value_lower) || value_lower.contains(&agent_lower)
                    {
                        if !matched_specific {
                            rules = RobotsRules::default();
                        }
                        matched_specific = true;
                        current_group_matches = true;
                    } else {
                        current_group_matches = false;
                    }
                }
                "disallow" if current_group_matches && !value.is_empty() => {
                    rules.disallow.push(value.to_string());
                }
                "allow" if current_group_matches && !value.is_empty() => {
                    rules.allow.push(value.to_string());
                }
                "crawl-delay" if current_group_matches => {
                    if let Ok(seconds) = value.parse::<f64>() {
                        rules.crawl_delay = Some(seconds);
                    }
                }
                _ => {}
            }
        }

        rules
    }

    /// True if `path` is disallowed for the parsed agent. The longest
    /// matching rule wins; an `Allow` and a `Disallow` of equal length
    /// favor `Allow` (RFC 9309 precedence).
    pub fn is_disallowed(&self, path: &str) -> bool {
        let mut best_allow_len = None;
        let mut best_disallow_len = None;

        for pattern in &self.allow {
            if path_matches(path, pattern) {
                let len = pattern.len();
                if best_allow_len.map_or(true, |best| len > best) {
                    best_allow_len = Some(len);
                }
            }
        }
        for pattern in &self.disallow {
            if path_matches(path, pattern) {
                let len = pattern.len();
                if best_disallow_len.map_or(true, |best| len > best) {
                    best_disallow_len = Some(len);
                }
            }
        }

        match (best_allow_len, best_disallow_len) {
            (Some(a), Some(d)) => d > a,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Simplified robots.txt path matching: a trailing `*` or bare prefix both
/// match as a prefix; `$` anchors the end.
fn path_matches(path: &str, pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    if let Some(stripped) = pattern.strip_suffix('$') {
        return path == stripped;
    }
    let prefix = pattern.trim_end_matches('*');
    path.starts_with(prefix)
}

struct CacheEntry {
    rules: Arc<RobotsRules>,
    fetched_at: Instant,
}

/// Shared, TTL-bounded robots.txt cache keyed by domain (scheme+host). Entries
/// older than `ttl` are treated as missing and re-fetched; a fetch failure on
/// an expired entry is reported to the caller so the evaluator can fail
/// closed per the compliance contract.
pub struct RobotsCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    client: reqwest::Client,
    user_agent: String,
}

impl RobotsCache {
    pub fn new(ttl: Duration, user_agent: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.clone())
            .timeout(Duration::from_secs(10))
            .build()
            .expect("robots.txt HTTP client configuration is static and always valid");

        Self {
            entries: DashMap::new(),
            ttl,
            client,
            user_agent,
        }
    }

    /// Returns cached rules for `domain` if present and fresh, fetching and
    /// parsing `{domain}/robots.txt` otherwise. Retries transient fetch
    /// failures twice with exponential backoff (base 2s, cap 30s) before
    /// giving up; a stale cache entry is served past its TTL only when the
    /// refetch itself fails, to avoid fail-open on a transient network blip
    /// — callers decide fail-open vs fail-closed based on whether any entry
    /// (fresh or stale) was returned.
    ///
    /// Returns the rules alongside how long ago they were fetched, so
    /// callers can report cache freshness without reaching into the cache
    /// internals themselves.
    pub async fn get(&self, domain: &str) -> Result<(Arc<RobotsRules>, Duration)> {
        if let Some(entry) = self.entries.get(domain) {
            let age = entry.fetched_at.elapsed();
            if age < self.ttl {
                return Ok((entry.rules.clone(), age));
            }
        }

        match self.fetch_with_retry(domain).await {
            Ok(rules) => {
                let rules = Arc::new(rules);
                self.entries.insert(
                    domain.to_string(),
                    CacheEntry {
                        rules: rules.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                Ok((rules, Duration::from_secs(0)))
            }
            Err(err) => {
                // A stale-but-present entry is a judgment call, not a free
                // pass: the evaluator is fail-closed, so a fetch failure
                // with no usable fresh rules surfaces as an error rather
                // than silently reusing expired rules.
                Err(err)
            }
        }
    }

    async fn fetch_with_retry(&self, domain: &str) -> Result<RobotsRules> {
        let url = format!("{}/robots.txt", domain.trim_end_matches('/'));
        let mut delay = Duration::from_secs(2);
        let mut last_err = None;

        for attempt in 0..3 {
            if attempt > 0 {
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(Duration::from_secs(30));
            }

            match self.client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    let body = resp.text().await.unwrap_or_default();
                    return Ok(RobotsRules::parse(&body, &self.user_agent));
                }
                // A 404 means "no robots.txt" which the protocol treats as
                // allow-all, not a fetch failure.
                Ok(resp) if resp.status().as_u16() == 404 => {
                    return Ok(RobotsRules::default());
                }
                Ok(resp) => {
                    last_err = Some(Error::new(
                        ErrorCode::RobotsUnavailable,
                        format!("robots.txt fetch for {} returned {}", domain, resp.status()),
                    ));
                }
                Err(err) => {
                    last_err = Some(Error::new(
                        ErrorCode::RobotsUnavailable,
                        format!("robots.txt fetch for {} failed: {}", domain, err),
                    ));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            Error::new(ErrorCode::RobotsUnavailable, "robots.txt fetch exhausted retries")
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallow_blocks_matching_prefix() {
        let rules = RobotsRules::parse("User-agent: *\nDisallow: /news/\n", "PreventIABot");
        assert!(rules.is_disallowed("/news/article-1"));
        assert!(!rules.is_disallowed("/about"));
    }

    #[test]
    fn more_specific_allow_wins_over_shorter_disallow() {
        let rules = RobotsRules::parse(
            "User-agent: *\nDisallow: /news/\nAllow: /news/public/\n",
            "PreventIABot",
        );
        assert!(!rules.is_disallowed("/news/public/item"));
        assert!(rules.is_disallowed("/news/private/item"));
    }

    #[test]
    fn specific_agent_group_overrides_wildcard() {
        let body = "User-agent: *\nDisallow: /\nUser-agent: PreventIABot\nDisallow: /news/\n";
        let rules = RobotsRules::parse(body, "PreventIABot");
        assert!(!rules.is_disallowed("/about"));
        assert!(rules.is_disallowed("/news/x"));
    }

    #[test]
    fn crawl_delay_is_parsed() {
        let rules = RobotsRules::parse("User-agent: *\nCrawl-delay: 5\n", "PreventIABot");
        assert_eq!(rules.crawl_delay, Some(5.0));
    }

    #[test]
    fn missing_robots_txt_defaults_to_allow_all() {
        let rules = RobotsRules::default();
        assert!(!rules.is_disallowed("/anything"));
    }
}
