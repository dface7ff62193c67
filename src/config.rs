use anyhow::{Context, Result, anyhow};
use std::time::Duration;

use crate::error::PipelineError;
use crate::playlist::RangeEnd;
use crate::source::MidnightLabel;

const DEFAULT_SINK_BASE_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SOURCE_BASE_URL: &str = "http://www.kexp.org/playlist";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration loaded from environment variables
#[derive(Debug)]
pub struct Config {
    pub sink_base_url: String,
    pub source_base_url: String,
    pub access_token: String,
    pub timeout: Duration,
    pub range_end: RangeEnd,
    pub midnight_label: MidnightLabel,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    config_from(|key| std::env::var(key).ok())
}

/// Build a configuration from a variable lookup
pub fn config_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let access_token = lookup("SPOTIFY_ACCESS_TOKEN")
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            PipelineError::AuthFailure("SPOTIFY_ACCESS_TOKEN is not set".to_string())
        })?;

    let timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("HTTP_TIMEOUT_SECS must be a whole number, got '{raw}'"))?,
        None => DEFAULT_TIMEOUT_SECS,
    };

    let range_end = match lookup("HOUR_RANGE_INCLUSIVE") {
        Some(raw) if parse_flag(&raw)? => RangeEnd::Inclusive,
        _ => RangeEnd::Exclusive,
    };

    let midnight_label = match lookup("MIDNIGHT_LABEL").as_deref().map(str::trim) {
        None | Some("0AM") => MidnightLabel::ZeroAm,
        Some("12AM") => MidnightLabel::TwelveAm,
        Some(other) => return Err(anyhow!("MIDNIGHT_LABEL must be 0AM or 12AM, got '{other}'")),
    };

    Ok(Config {
        sink_base_url: lookup("SPOTIFY_API_BASE")
            .unwrap_or_else(|| DEFAULT_SINK_BASE_URL.to_string()),
        source_base_url: lookup("SOURCE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_SOURCE_BASE_URL.to_string()),
        access_token,
        timeout: Duration::from_secs(timeout_secs),
        range_end,
        midnight_label,
    })
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(anyhow!("expected a boolean flag, got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_token() -> Result<()> {
        let cfg = config_from(lookup_in(&[("SPOTIFY_ACCESS_TOKEN", "abc")]))?;

        assert_eq!(cfg.access_token, "abc");
        assert_eq!(cfg.sink_base_url, DEFAULT_SINK_BASE_URL);
        assert_eq!(cfg.source_base_url, DEFAULT_SOURCE_BASE_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.range_end, RangeEnd::Exclusive);
        assert_eq!(cfg.midnight_label, MidnightLabel::ZeroAm);

        Ok(())
    }

    #[test]
    fn test_missing_token_is_auth_failure() {
        let err = config_from(lookup_in(&[])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::AuthFailure(_))
        ));
    }

    #[test]
    fn test_toggles_and_overrides() -> Result<()> {
        let cfg = config_from(lookup_in(&[
            ("SPOTIFY_ACCESS_TOKEN", "abc"),
            ("SOURCE_BASE_URL", "http://localhost:9000/playlist"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("HOUR_RANGE_INCLUSIVE", "true"),
            ("MIDNIGHT_LABEL", "12AM"),
        ]))?;

        assert_eq!(cfg.source_base_url, "http://localhost:9000/playlist");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.range_end, RangeEnd::Inclusive);
        assert_eq!(cfg.midnight_label, MidnightLabel::TwelveAm);

        Ok(())
    }

    #[test]
    fn test_rejects_malformed_values() {
        assert!(
            config_from(lookup_in(&[
                ("SPOTIFY_ACCESS_TOKEN", "abc"),
                ("HTTP_TIMEOUT_SECS", "soon"),
            ]))
            .is_err()
        );
        assert!(
            config_from(lookup_in(&[
                ("SPOTIFY_ACCESS_TOKEN", "abc"),
                ("MIDNIGHT_LABEL", "midnight"),
            ]))
            .is_err()
        );
    }
}
