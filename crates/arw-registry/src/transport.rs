//! Registry transport boundary.
//!
//! [`RegistryTransport`] is the only place that touches the network. It
//! reports raw status codes and bodies; classifying them into success,
//! rejection or transient failure is the session's job.

use std::fmt;
use std::time::Duration;

use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE, ORIGIN, REFERER, SET_COOKIE,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Endpoint configuration
// ---------------------------------------------------------------------------

/// URLs and request headers of the registry. Defaults point at ARES.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RegistryEndpoints {
    /// Page whose response sets the session cookie.
    pub bootstrap_url: String,
    pub search_url: String,
    pub origin: String,
    pub referer: String,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// Name of the session cookie carrying the credential.
    pub cookie_name: String,
    pub request_timeout_secs: u64,
}

impl Default for RegistryEndpoints {
    fn default() -> Self {
        Self {
            bootstrap_url: "https://ares.gov.cz/ekonomicke-subjekty".to_string(),
            search_url:
                "https://ares.gov.cz/ekonomicke-subjekty-v-be/rest/ekonomicke-subjekty/vyhledat"
                    .to_string(),
            origin: "https://ares.gov.cz".to_string(),
            referer: "https://ares.gov.cz/ekonomicke-subjekty".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            accept: "application/json, text/plain, */*".to_string(),
            accept_language: "en-US".to_string(),
            cookie_name: "GN-TOKEN-CSP".to_string(),
            request_timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Replies and errors
// ---------------------------------------------------------------------------

/// Response of the unauthenticated bootstrap request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReply {
    pub status: u16,
    /// Session cookie value, when the response set one.
    pub token: Option<String>,
}

/// Raw response of a search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReply {
    pub status: u16,
    pub body: String,
}

impl SearchReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure: no usable HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    Build(String),
    /// Connection, TLS, timeout or other send failure.
    Network(String),
    /// The response body could not be read.
    Body(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Build(msg) => write!(f, "http client build error: {msg}"),
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Body(msg) => write!(f, "response body error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/// Blocking access to the two registry endpoints.
pub trait RegistryTransport {
    /// Unauthenticated request that issues a fresh session cookie.
    fn bootstrap(&self) -> Result<BootstrapReply, TransportError>;

    /// Search request with a JSON `body`. `token` is sent as the session
    /// cookie when present.
    fn search(&self, token: Option<&str>, body: &str) -> Result<SearchReply, TransportError>;
}

impl<T: RegistryTransport + ?Sized> RegistryTransport for &T {
    fn bootstrap(&self) -> Result<BootstrapReply, TransportError> {
        (**self).bootstrap()
    }

    fn search(&self, token: Option<&str>, body: &str) -> Result<SearchReply, TransportError> {
        (**self).search(token, body)
    }
}

/// Value of cookie `name` from one `Set-Cookie` header line.
///
/// Returns `None` for other cookies and for empty values.
pub fn cookie_value(set_cookie: &str, name: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?;
    let (k, v) = pair.split_once('=')?;
    let v = v.trim();
    (k.trim() == name && !v.is_empty()).then(|| v.to_string())
}

// ---------------------------------------------------------------------------
// reqwest implementation
// ---------------------------------------------------------------------------

/// Blocking reqwest transport (no Tokio runtime required).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::blocking::Client,
    endpoints: RegistryEndpoints,
}

impl HttpTransport {
    pub fn new(endpoints: RegistryEndpoints) -> Result<Self, TransportError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(endpoints.user_agent.as_str())
            .timeout(Duration::from_secs(endpoints.request_timeout_secs))
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { http, endpoints })
    }

    pub fn endpoints(&self) -> &RegistryEndpoints {
        &self.endpoints
    }
}

impl RegistryTransport for HttpTransport {
    fn bootstrap(&self) -> Result<BootstrapReply, TransportError> {
        let resp = self
            .http
            .get(self.endpoints.bootstrap_url.as_str())
            .header(ACCEPT_LANGUAGE, self.endpoints.accept_language.as_str())
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let token = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|line| cookie_value(line, &self.endpoints.cookie_name));

        Ok(BootstrapReply { status, token })
    }

    fn search(&self, token: Option<&str>, body: &str) -> Result<SearchReply, TransportError> {
        let ep = &self.endpoints;
        let mut req = self
            .http
            .post(ep.search_url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ep.accept.as_str())
            .header(ACCEPT_LANGUAGE, ep.accept_language.as_str())
            .header(ORIGIN, ep.origin.as_str())
            .header(REFERER, ep.referer.as_str());

        if let Some(t) = token {
            req = req.header(COOKIE, format!("{}={}", ep.cookie_name, t));
        }

        let resp = req
            .body(body.to_string())
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(SearchReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_picks_named_cookie() {
        let line = "GN-TOKEN-CSP=abc123; Path=/; Secure; HttpOnly";
        assert_eq!(cookie_value(line, "GN-TOKEN-CSP").as_deref(), Some("abc123"));
    }

    #[test]
    fn cookie_value_ignores_other_cookies_and_empty_values() {
        assert_eq!(cookie_value("JSESSIONID=zzz; Path=/", "GN-TOKEN-CSP"), None);
        assert_eq!(cookie_value("GN-TOKEN-CSP=; Max-Age=0", "GN-TOKEN-CSP"), None);
        assert_eq!(cookie_value("garbage", "GN-TOKEN-CSP"), None);
    }

    #[test]
    fn default_endpoints_target_ares() {
        let ep = RegistryEndpoints::default();
        assert!(ep.search_url.ends_with("/ekonomicke-subjekty/vyhledat"));
        assert_eq!(ep.cookie_name, "GN-TOKEN-CSP");
    }
}
