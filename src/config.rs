//! Invocation configuration.
//!
//! Everything the runner needs from the process environment is read once,
//! here, into a [`Config`] value that is then passed around explicitly.

use secrecy::SecretString;
use snafu::{ResultExt, Snafu};
use url::Url;

use crate::client::{default_base_url, Model};

/// Variable holding the API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Optional override of the API endpoint root.
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("GEMINI_BASE_URL is not a valid URL: '{value}'"))]
    InvalidBaseUrl {
        source: url::ParseError,
        value: String,
    },
}

#[derive(Debug)]
pub struct Config {
    /// `None` when the key is unset or empty.
    pub credential: Option<SecretString>,
    pub model: Model,
    pub base_url: Url,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Without a credential the endpoint override is not read, so a missing key is
    /// reported ahead of a bad `GEMINI_BASE_URL`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let credential = lookup(API_KEY_VAR)
            .filter(|key| !key.is_empty())
            .map(SecretString::from);

        let base_url = match credential
            .as_ref()
            .and_then(|_| lookup(BASE_URL_VAR))
            .filter(|url| !url.trim().is_empty())
        {
            Some(value) => parse_base_url(&value)?,
            None => parse_base_url(default_base_url())?,
        };

        Ok(Self {
            credential,
            model: Model::default(),
            base_url,
        })
    }
}

/// Parses an endpoint root, making sure it ends with `/` so model paths join beneath it.
fn parse_base_url(value: &str) -> Result<Url, Error> {
    let value = value.trim();
    let normalized = if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{value}/")
    };
    Url::parse(&normalized).context(InvalidBaseUrlSnafu { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "abc")])).unwrap();
        assert_eq!(config.credential.unwrap().expose_secret(), "abc");
        assert_eq!(config.model, Model::Gemini15Flash);
        assert_eq!(config.base_url.as_str(), default_base_url());
    }

    #[test]
    fn test_missing_and_empty_key() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.credential.is_none());

        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "")])).unwrap();
        assert!(config.credential.is_none());
    }

    #[test]
    fn test_base_url_override_gets_trailing_slash() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "abc"),
            (BASE_URL_VAR, "http://127.0.0.1:8080/v1beta"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8080/v1beta/");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "abc"), (BASE_URL_VAR, "not a url")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
        assert_eq!(
            err.to_string(),
            "GEMINI_BASE_URL is not a valid URL: 'not a url'"
        );
    }

    #[test]
    fn test_missing_key_ignores_bad_base_url() {
        let config = Config::from_lookup(lookup(&[(BASE_URL_VAR, "::bad")])).unwrap();
        assert!(config.credential.is_none());
        assert_eq!(config.base_url.as_str(), default_base_url());

        let config =
            Config::from_lookup(lookup(&[(API_KEY_VAR, ""), (BASE_URL_VAR, "::bad")])).unwrap();
        assert!(config.credential.is_none());
    }
}
