//! Server configuration read from the environment at startup.

use lifeguard_analytics_models::AnalyticsConfig;
use lifeguard_scoring_models::{LookupPolicy, ScoringConfig};

/// Listener address and the policy settings handed to every request.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind, `BIND_ADDR`.
    pub bind_addr: String,
    /// Port to bind, `PORT`.
    pub port: u16,
    /// Analytics policy, row cap from `LIFEGUARD_LOG_ROW_CAP`.
    pub analytics: AnalyticsConfig,
    /// Scoring policy, lookup policy from `LIFEGUARD_LOOKUP_POLICY`.
    pub scoring: ScoringConfig,
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup. Unset or invalid
    /// values fall back to their defaults with a warning.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("PORT", lookup("PORT"), 8080);

        let defaults = AnalyticsConfig::default();
        let analytics = AnalyticsConfig {
            log_row_cap: parse_or(
                "LIFEGUARD_LOG_ROW_CAP",
                lookup("LIFEGUARD_LOG_ROW_CAP"),
                defaults.log_row_cap,
            ),
            ..defaults
        };

        let scoring = ScoringConfig {
            lookup_policy: parse_or(
                "LIFEGUARD_LOOKUP_POLICY",
                lookup("LIFEGUARD_LOOKUP_POLICY"),
                LookupPolicy::default(),
            ),
            ..ScoringConfig::default()
        };

        Self {
            bind_addr,
            port,
            analytics,
            scoring,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {key}={value:?}, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.analytics.log_row_cap, 10_000);
        assert_eq!(config.scoring.lookup_policy, LookupPolicy::Lenient);
        assert_eq!(config.scoring.provenance_comment, "Admin Panel Update");
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "9000"),
            ("LIFEGUARD_LOG_ROW_CAP", "500"),
            ("LIFEGUARD_LOOKUP_POLICY", "Strict"),
        ]);
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.analytics.log_row_cap, 500);
        assert_eq!(config.scoring.lookup_policy, LookupPolicy::Strict);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[("PORT", "eighty"), ("LIFEGUARD_LOOKUP_POLICY", "sometimes")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.scoring.lookup_policy, LookupPolicy::Lenient);
    }
}
