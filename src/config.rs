//! Runtime configuration read from the environment
//!
//! - `TWIG_LOCK_TIMEOUT_MS`: how long to wait for the repository lock
//! - `TWIG_COMMIT_DATE`: pin the commit timestamp (RFC 3339 or `%Y-%m-%d %H:%M:%S %z`)

use crate::errors::{RepositoryError, Result};
use chrono::{DateTime, FixedOffset};
use std::time::Duration;

pub const LOCK_TIMEOUT_ENV: &str = "TWIG_LOCK_TIMEOUT_MS";
pub const COMMIT_DATE_ENV: &str = "TWIG_COMMIT_DATE";

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on waiting for the repository lock before failing with `Locked`
    pub lock_timeout: Duration,
    /// Fixed timestamp for new commits, the current time when unset
    pub commit_time: Option<DateTime<FixedOffset>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            commit_time: None,
        }
    }
}

impl Config {
    pub fn load_from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lock_timeout = match lookup(LOCK_TIMEOUT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| {
                    RepositoryError::InvalidConfig(format!("{LOCK_TIMEOUT_ENV}={raw}"))
                })?,
            None => DEFAULT_LOCK_TIMEOUT,
        };

        let commit_time = lookup(COMMIT_DATE_ENV)
            .map(|raw| {
                parse_commit_date(&raw)
                    .ok_or_else(|| RepositoryError::InvalidConfig(format!("{COMMIT_DATE_ENV}={raw}")))
            })
            .transpose()?;

        Ok(Config {
            lock_timeout,
            commit_time,
        })
    }

    pub fn with_lock_timeout(self, lock_timeout: Duration) -> Self {
        Config {
            lock_timeout,
            ..self
        }
    }

    pub fn with_commit_time(self, commit_time: DateTime<FixedOffset>) -> Self {
        Config {
            commit_time: Some(commit_time),
            ..self
        }
    }
}

fn parse_commit_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .or_else(|_| DateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S %z"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[rstest]
    #[case("2023-01-01 12:00:00 +0000")]
    #[case("2023-01-01T12:00:00Z")]
    #[case("2023-01-01T14:00:00+02:00")]
    fn commit_date_accepts_both_formats(#[case] raw: &str) {
        let config = Config::from_lookup(lookup(&[(COMMIT_DATE_ENV, raw)])).unwrap();
        let expected = DateTime::parse_from_rfc3339("2023-01-01T12:00:00Z").unwrap();

        assert_eq!(config.commit_time.unwrap(), expected);
    }

    #[rstest]
    #[case(LOCK_TIMEOUT_ENV, "soon")]
    #[case(COMMIT_DATE_ENV, "yesterday")]
    fn invalid_values_are_rejected(#[case] key: &str, #[case] value: &str) {
        let err = Config::from_lookup(lookup(&[(key, value)])).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidConfig(_)));
    }

    #[test]
    fn lock_timeout_is_read_in_milliseconds() {
        let config = Config::from_lookup(lookup(&[(LOCK_TIMEOUT_ENV, "250")])).unwrap();
        assert_eq!(config.lock_timeout, Duration::from_millis(250));
    }
}
