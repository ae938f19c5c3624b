use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

pub const SEARCH_URL_ENV: &str = "CANVASS_SEARCH_URL";
pub const SITE_URL_ENV: &str = "CANVASS_SITE_URL";
pub const GEOCODER_URL_ENV: &str = "CANVASS_GEOCODER_URL";
pub const GEOCODER_COUNTRY_ENV: &str = "CANVASS_GEOCODER_COUNTRY";
pub const USER_AGENT_ENV: &str = "CANVASS_USER_AGENT";
pub const REQUEST_TIMEOUT_ENV: &str = "CANVASS_REQUEST_TIMEOUT_SECS";
pub const NEWS_PAGE_SIZE_ENV: &str = "CANVASS_NEWS_PAGE_SIZE";
pub const VOLUNTEER_URL_ENV: &str = "CANVASS_VOLUNTEER_URL";
pub const PRIVACY_POLICY_URL_ENV: &str = "CANVASS_PRIVACY_POLICY_URL";
pub const CODERS_URL_ENV: &str = "CANVASS_CODERS_URL";
pub const DESIGNERS_URL_ENV: &str = "CANVASS_DESIGNERS_URL";

const DEFAULT_SEARCH_URL: &str = "http://localhost:9200/";
const DEFAULT_SITE_URL: &str = "https://example.org/";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/";
const DEFAULT_GEOCODER_COUNTRY: &str = "us";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_NEWS_PAGE_SIZE: usize = 30;

/// Runtime configuration, read from `CANVASS_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub search_url: Url,
    pub site_url: Url,
    pub geocoder_url: Url,
    pub geocoder_country: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub news_page_size: usize,
    pub volunteer_url: Option<Url>,
    pub privacy_policy_url: Option<Url>,
    pub coders_url: Option<Url>,
    pub designers_url: Option<Url>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds settings from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let request_timeout_secs = match get(REQUEST_TIMEOUT_ENV) {
            Some(value) => value
                .parse::<u64>()
                .with_context(|| format!("{} must be a whole number of seconds", REQUEST_TIMEOUT_ENV))?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let news_page_size = match get(NEWS_PAGE_SIZE_ENV) {
            Some(value) => value
                .parse::<usize>()
                .with_context(|| format!("{} must be a positive integer", NEWS_PAGE_SIZE_ENV))?,
            None => DEFAULT_NEWS_PAGE_SIZE,
        };

        let optional_url = |var: &str| -> Result<Option<Url>> {
            get(var)
                .map(|value| parse_url(var, &value))
                .transpose()
        };

        Ok(Self {
            search_url: parse_base_url(SEARCH_URL_ENV, get(SEARCH_URL_ENV).as_deref().unwrap_or(DEFAULT_SEARCH_URL))?,
            site_url: parse_base_url(SITE_URL_ENV, get(SITE_URL_ENV).as_deref().unwrap_or(DEFAULT_SITE_URL))?,
            geocoder_url: parse_base_url(
                GEOCODER_URL_ENV,
                get(GEOCODER_URL_ENV).as_deref().unwrap_or(DEFAULT_GEOCODER_URL),
            )?,
            geocoder_country: get(GEOCODER_COUNTRY_ENV)
                .unwrap_or_else(|| DEFAULT_GEOCODER_COUNTRY.to_string()),
            user_agent: get(USER_AGENT_ENV).unwrap_or_else(default_user_agent),
            request_timeout: Duration::from_secs(request_timeout_secs),
            news_page_size,
            volunteer_url: optional_url(VOLUNTEER_URL_ENV)?,
            privacy_policy_url: optional_url(PRIVACY_POLICY_URL_ENV)?,
            coders_url: optional_url(CODERS_URL_ENV)?,
            designers_url: optional_url(DESIGNERS_URL_ENV)?,
        })
    }
}

fn default_user_agent() -> String {
    format!("canvass/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_url(var: &str, value: &str) -> Result<Url> {
    Url::parse(value).with_context(|| format!("{} is not a valid URL: {}", var, value))
}

// Url::join replaces the last path segment unless the base ends with a slash
fn parse_base_url(var: &str, value: &str) -> Result<Url> {
    if value.ends_with('/') {
        parse_url(var, value)
    } else {
        parse_url(var, &format!("{}/", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.search_url.as_str(), "http://localhost:9200/");
        assert_eq!(settings.site_url.as_str(), "https://example.org/");
        assert_eq!(settings.geocoder_country, "us");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.news_page_size, 30);
        assert!(settings.user_agent.starts_with("canvass/"));
        assert_eq!(settings.privacy_policy_url, None);
    }

    #[test]
    fn test_base_urls_get_trailing_slash() {
        let settings = settings_from(&[
            (SEARCH_URL_ENV, "https://search.example.com/v1"),
            (SITE_URL_ENV, "https://campaign.example.com"),
        ])
        .unwrap();
        assert_eq!(settings.search_url.as_str(), "https://search.example.com/v1/");
        assert_eq!(settings.site_url.as_str(), "https://campaign.example.com/");
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let settings = settings_from(&[
            (REQUEST_TIMEOUT_ENV, "5"),
            (NEWS_PAGE_SIZE_ENV, "10"),
            (GEOCODER_COUNTRY_ENV, "  "),
            (PRIVACY_POLICY_URL_ENV, "http://example.com/privates"),
        ])
        .unwrap();
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.news_page_size, 10);
        assert_eq!(settings.geocoder_country, "us");
        assert_eq!(
            settings.privacy_policy_url.map(|u| u.to_string()),
            Some("http://example.com/privates".to_string())
        );
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = settings_from(&[(REQUEST_TIMEOUT_ENV, "soon")]).unwrap_err();
        assert!(err.to_string().contains(REQUEST_TIMEOUT_ENV));

        let err = settings_from(&[(SEARCH_URL_ENV, "not a url")]).unwrap_err();
        assert!(err.to_string().contains(SEARCH_URL_ENV));
    }
}
