use std::{path::Path, time::Duration};

use secrecy::SecretString;
use url::Url;

use crate::error::DotcomError;

pub const DEFAULT_API_URL: &str = "https://sourcegraph.com/.api/graphql";

#[derive(Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Settings for reaching the dotcom GraphQL API.
pub struct DotcomConfig {
    /// GraphQL endpoint of the dotcom API.
    pub url: Url,
    /// Service account token, sent as a bearer token with every request.
    pub access_token: Option<SecretString>,
    /// Timeout for a single request. No timeout by default.
    #[serde(deserialize_with = "duration_str::deserialize_option_duration")]
    pub timeout: Option<Duration>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
    /// Number of subscriptions requested per page. The API default applies if unset.
    pub page_size: Option<u32>,
}

impl Default for DotcomConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.parse().expect("default dotcom url should be valid"),
            access_token: None,
            timeout: None,
            user_agent: None,
            page_size: None,
        }
    }
}

impl DotcomConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, DotcomError> {
        toml::from_str(input).map_err(|err| DotcomError::Configuration(err.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DotcomError> {
        let path = path.as_ref();

        let input = std::fs::read_to_string(path)
            .map_err(|err| DotcomError::Configuration(format!("could not read '{}': {err}", path.display())))?;

        Self::from_toml_str(&input)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .unwrap_or(concat!("dotcom-client/", env!("CARGO_PKG_VERSION")))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults() {
        let config = DotcomConfig::from_toml_str("").unwrap();

        assert_eq!(config.url.as_str(), DEFAULT_API_URL);
        assert!(config.access_token.is_none());
        assert_eq!(config.timeout, None);
        assert_eq!(config.page_size, None);
        assert!(config.user_agent().starts_with("dotcom-client/"));
    }

    #[test]
    fn all_settings() {
        let input = indoc! {r#"
            url = "http://localhost:3080/.api/graphql"
            access_token = "sgs_0123456789"
            timeout = "5s"
            user_agent = "cody-gateway"
            page_size = 50
        "#};

        let config = DotcomConfig::from_toml_str(input).unwrap();

        assert_eq!(config.url.as_str(), "http://localhost:3080/.api/graphql");
        assert_eq!(
            config.access_token.as_ref().map(|token| token.expose_secret().as_str()),
            Some("sgs_0123456789")
        );
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.user_agent(), "cody-gateway");
        assert_eq!(config.page_size, Some(50));
    }

    #[test]
    fn access_token_is_redacted() {
        let config = DotcomConfig::from_toml_str(r#"access_token = "sgs_0123456789""#).unwrap();
        assert!(!format!("{config:?}").contains("sgs_0123456789"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = DotcomConfig::from_toml_str("retries = 3").unwrap_err();
        assert!(error.to_string().contains("unknown field `retries`"), "{error}");
    }

    #[test]
    fn invalid_url() {
        let error = DotcomConfig::from_toml_str(r#"url = "not a url""#).unwrap_err();
        assert!(matches!(error, DotcomError::Configuration(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dotcom.toml");
        std::fs::write(&path, r#"timeout = "250ms""#).unwrap();

        let config = DotcomConfig::load(&path).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn load_missing_file() {
        let error = DotcomConfig::load("/definitely/not/here/dotcom.toml").unwrap_err();
        assert!(error.to_string().contains("could not read"), "{error}");
    }
}
