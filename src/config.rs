use std::{fmt, str::FromStr, time::Duration};

use crate::{MgcError, RetryConfig};

/// Known Magalu Cloud API endpoints.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Region {
    /// Brazil Northeast 1.
    BrNe1,
    /// Brazil Southeast 1.
    BrSe1,
    /// Brazil Magalu 1.
    BrMgl1,
    /// Products that are not bound to a region.
    Global,
}

impl Region {
    /// Base URL for the region, without a trailing slash.
    pub fn url(self) -> &'static str {
        match self {
            Self::BrNe1 => "https://api.magalu.cloud/br-ne1",
            Self::BrSe1 => "https://api.magalu.cloud/br-se1",
            Self::BrMgl1 => "https://api.magalu.cloud/br-se-1",
            Self::Global => "https://api.magalu.cloud",
        }
    }
}

impl FromStr for Region {
    type Err = MgcError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "br-ne1" | "br-ne-1" => Ok(Self::BrNe1),
            "br-se1" | "br-se-1" => Ok(Self::BrSe1),
            "br-mgl1" | "br-mgl-1" => Ok(Self::BrMgl1),
            "global" => Ok(Self::Global),
            other => Err(MgcError::Config(format!("unknown region '{other}'"))),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

/// Settings shared by every request issued through a [`crate::CoreClient`].
#[derive(Clone)]
pub struct Config {
    /// Sent as `X-API-Key`.
    pub api_key: Option<String>,
    /// Full `Authorization` value, always with a `Bearer ` scheme.
    pub(crate) authorization: Option<String>,
    pub base_url: String,
    pub user_agent: String,
    /// Deadline for a whole call, retries and backoff included. Zero disables it.
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub content_type: String,
    /// Extra headers added to every request, in insertion order.
    pub custom_headers: Vec<(String, String)>,
    /// Sent as `X-Request-ID` for request correlation.
    pub request_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            authorization: None,
            base_url: Region::BrSe1.url().to_owned(),
            user_agent: concat!("mgc-sdk-rust/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout: Duration::from_secs(15 * 60),
            retry: RetryConfig::default(),
            content_type: "application/json".to_owned(),
            custom_headers: Vec::new(),
            request_id: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("content_type", &self.content_type)
            .field("custom_headers", &RedactedHeaders(&self.custom_headers))
            .field("request_id", &self.request_id)
            .finish()
    }
}

/// Header names are shown, values never are.
struct RedactedHeaders<'a>(&'a [(String, String)]);

impl fmt::Debug for RedactedHeaders<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(name, _)| (name, "<redacted>")))
            .finish()
    }
}

impl Config {
    pub(crate) fn set_jwt(&mut self, token: &str) {
        self.authorization = Some(normalize_bearer_authorization(token));
    }

    pub(crate) fn set_header(&mut self, name: String, value: String) {
        match self
            .custom_headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.custom_headers.push((name, value)),
        }
    }
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        format!("Bearer {}", trimmed[7..].trim_start())
    } else {
        format!("Bearer {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_base_url, normalize_bearer_authorization, Config, Region};

    #[test]
    fn normalize_bearer_adds_prefix_when_missing() {
        assert_eq!(normalize_bearer_authorization("abc123"), "Bearer abc123");
    }

    #[test]
    fn normalize_bearer_keeps_a_single_prefix() {
        assert_eq!(normalize_bearer_authorization("bEaReR abc123"), "Bearer abc123");
        assert_eq!(normalize_bearer_authorization("  Bearer  abc123 "), "Bearer abc123");
    }

    #[test]
    fn regions_parse_from_slugs() {
        assert_eq!("br-ne1".parse::<Region>().ok(), Some(Region::BrNe1));
        assert_eq!("BR-SE1".parse::<Region>().ok(), Some(Region::BrSe1));
        assert_eq!("br-mgl1".parse::<Region>().ok(), Some(Region::BrMgl1));
        assert_eq!("global".parse::<Region>().ok(), Some(Region::Global));
        assert!("mars-1".parse::<Region>().is_err());
        assert_eq!(Region::BrMgl1.url(), "https://api.magalu.cloud/br-se-1");
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        assert_eq!(normalize_base_url("http://localhost:8080/ "), "http://localhost:8080");
    }

    #[test]
    fn custom_headers_replace_case_insensitively() {
        let mut config = Config::default();
        config.set_header("X-Tenant".to_owned(), "a".to_owned());
        config.set_header("x-tenant".to_owned(), "b".to_owned());
        assert_eq!(config.custom_headers, vec![("X-Tenant".to_owned(), "b".to_owned())]);
    }

    #[test]
    fn debug_redacts_credentials() {
        let mut config = Config {
            api_key: Some("secret-key".to_owned()),
            ..Config::default()
        };
        config.set_jwt("secret-token");
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-key"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn debug_hides_custom_header_values() {
        let mut config = Config::default();
        config.set_header("Authorization".to_owned(), "Bearer hidden-jwt".to_owned());
        config.set_header("X-Tenant".to_owned(), "tenant-7".to_owned());
        let debug = format!("{config:?}");
        assert!(debug.contains("Authorization"));
        assert!(debug.contains("X-Tenant"));
        assert!(!debug.contains("hidden-jwt"));
        assert!(!debug.contains("tenant-7"));
    }
}
