//! AMS client: session ownership, request plumbing, and resource views.
//!
//! # Example
//!
//! ```rust,ignore
//! use ams_sdk::client::AmsClient;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AmsClient::login("trader", "hunter2")?;
//!
//!     for (id, unit) in client.asset_units().fetch()? {
//!         println!("{id}: {}", unit.name);
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::Method;
use serde_json::Value;

use crate::auth::{LoginRequest, LoginResponse, Session};
use crate::error::{AmsError, AmsResult};
use crate::models::{Account, AssetUnit, Broker, Model};
use crate::network::{API_PREFIX, DEFAULT_SERVER_URL};
use crate::proxy::RemoteMap;
use crate::retry::RetryPolicy;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Builder for configuring [`AmsClient`].
///
/// Exactly one credential path must be chosen:
/// [`credentials`](Self::credentials) performs a login call during
/// [`build`](Self::build), [`session_id`](Self::session_id) adopts an
/// existing session without touching the network.
#[derive(Debug, Clone)]
pub struct AmsClientBuilder {
    server_url: String,
    timeout: Duration,
    debug: bool,
    username: Option<String>,
    password: Option<String>,
    sid: Option<String>,
}

impl Default for AmsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AmsClientBuilder {
    pub fn new() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            debug: false,
            username: None,
            password: None,
            sid: None,
        }
    }

    /// Override the service base URL.
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the per-request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Enable verbose request/response body logging (at `debug` level).
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Authenticate with username and password during `build`.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Adopt a pre-established session id.
    pub fn session_id(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    /// Build the client, performing the login call when the credentials path
    /// was chosen. Rejected credentials propagate as
    /// [`AmsError::RequestFailed`].
    pub fn build(self) -> AmsResult<AmsClient> {
        match (&self.sid, &self.username) {
            (Some(_), Some(_)) => {
                return Err(AmsError::Validation(
                    "choose either credentials or a session id, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(AmsError::Validation(
                    "either credentials or a session id is required".to_string(),
                ))
            }
            _ => {}
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()?;

        let base_url = format!("{}{}", self.server_url.trim_end_matches('/'), API_PREFIX);
        let retry = RetryPolicy::default();

        let session = match self.sid {
            Some(sid) => Session { sid, user_id: None },
            None => {
                // Both set together by `credentials`.
                let username = self.username.as_deref().unwrap_or_default();
                let password = self.password.as_deref().unwrap_or_default();
                login(&http, &retry, &base_url, username, password)?
            }
        };

        Ok(AmsClient {
            http,
            base_url,
            session,
            retry,
            debug: self.debug,
            username: self.username,
        })
    }
}

/// Authenticated client for the AMS REST service.
///
/// Cheap to clone: the transport and session are shared and immutable for the
/// client's lifetime. Every resource view obtained from it performs blocking
/// calls on the caller's thread.
#[derive(Debug, Clone)]
pub struct AmsClient {
    http: HttpClient,
    base_url: String,
    session: Session,
    retry: RetryPolicy,
    debug: bool,
    username: Option<String>,
}

impl AmsClient {
    /// Create a builder with default settings.
    pub fn builder() -> AmsClientBuilder {
        AmsClientBuilder::new()
    }

    /// Log in against the default service with username and password.
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> AmsResult<Self> {
        Self::builder().credentials(username, password).build()
    }

    /// Adopt a pre-established session id against the default service.
    pub fn with_session(sid: impl Into<String>) -> AmsResult<Self> {
        Self::builder().session_id(sid).build()
    }

    /// The session id presented on authenticated requests.
    pub fn sid(&self) -> &str {
        &self.session.sid
    }

    /// User id from the login response; `None` when the client was built
    /// from a session id.
    pub fn user_id(&self) -> Option<&str> {
        self.session.user_id.as_deref()
    }

    /// Username used at login, when that path was taken.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Absolute base URL requests are issued against (server URL + API prefix).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Resource views
    // =========================================================================

    /// Asset units visible to this user, keyed by id. Read-only.
    pub fn asset_units(&self) -> RemoteMap<String, AssetUnit> {
        let client = self.clone();
        RemoteMap::new().with_fetch(move || {
            let body = client.request_json(Method::GET, "/asset_units", true, None)?;
            decode_listing(&client, &body, "asset_units", "id")
        })
    }

    /// Accounts of this user, keyed by external account id. Supports fetch,
    /// registration (insert), and removal.
    pub fn accounts(&self) -> RemoteMap<String, Account> {
        let fetch_client = self.clone();
        let remove_client = self.clone();
        let insert_client = self.clone();
        RemoteMap::new()
            .with_fetch(move || {
                let body = fetch_client.request_json(Method::GET, "/accounts", true, None)?;
                decode_listing(&fetch_client, &body, "accounts", "account")
            })
            .with_remove(move |account: &String| {
                remove_client.request_json(
                    Method::DELETE,
                    &format!("/accounts/{}", urlencoding::encode(account)),
                    true,
                    None,
                )?;
                Ok(())
            })
            .with_insert(move |_key: &String, account: &Account| {
                let doc = account.reference_doc()?;
                insert_client.request_json(Method::POST, "/accounts", true, Some(&doc))?;
                Ok(())
            })
    }

    /// Brokers available for account registration, keyed by id. Read-only.
    pub fn brokers(&self) -> RemoteMap<String, Broker> {
        let client = self.clone();
        RemoteMap::new().with_fetch(move || {
            let body = client.request_json(Method::GET, "/brokers", true, None)?;
            decode_listing(&client, &body, "brokers", "id")
        })
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Issue one API call and parse the response body as JSON.
    ///
    /// Joins `path` onto the base URL, attaches the session cookie unless
    /// `need_login` is false, retries transport failures per the client's
    /// [`RetryPolicy`], and maps any non-2xx status to
    /// [`AmsError::RequestFailed`] without retrying.
    pub(crate) fn request_json(
        &self,
        method: Method,
        path: &str,
        need_login: bool,
        body: Option<&Value>,
    ) -> AmsResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, url = %url, "issuing request");
        if self.debug {
            if let Some(body) = body {
                tracing::debug!(payload = %body, "request body");
            }
        }

        let response = send_checked(&self.retry, || {
            let mut request = self.http.request(method.clone(), &url);
            if need_login {
                request = request.header(COOKIE, format!("sid={}", self.session.sid));
            }
            if let Some(body) = body {
                request = request.json(body);
            }
            request
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes()?;
        tracing::debug!(method = %method, url = %url, status, "request completed");

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        let value: Value = serde_json::from_slice(&bytes)?;
        if self.debug {
            tracing::debug!(payload = %value, "response body");
        }
        Ok(value)
    }
}

/// Run a login call and assemble the session from the response.
fn login(
    http: &HttpClient,
    retry: &RetryPolicy,
    base_url: &str,
    username: &str,
    password: &str,
) -> AmsResult<Session> {
    let url = format!("{base_url}/login");
    tracing::debug!(url = %url, username, "logging in");
    let response = send_checked(retry, || {
        http.post(&url).json(&LoginRequest { username, password })
    })?;

    let sid = response
        .cookies()
        .find(|cookie| cookie.name() == "sid")
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| AmsError::Auth("login response did not set a sid cookie".to_string()))?;
    let body: LoginResponse = serde_json::from_slice(&response.bytes()?)?;
    let user_id = body
        .user_id_string()
        .ok_or_else(|| AmsError::Auth("login response did not carry a user id".to_string()))?;

    Ok(Session {
        sid,
        user_id: Some(user_id),
    })
}

/// Send a request (rebuilt fresh per attempt) under the retry policy and map
/// non-2xx statuses to [`AmsError::RequestFailed`].
fn send_checked(
    retry: &RetryPolicy,
    build: impl Fn() -> RequestBuilder,
) -> AmsResult<Response> {
    let response = retry.run(|| build().send().map_err(AmsError::from))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(AmsError::RequestFailed {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Decode an enveloped entity listing into a map keyed by `key_field`.
pub(crate) fn decode_listing<M: Model>(
    client: &AmsClient,
    body: &Value,
    list_key: &str,
    key_field: &str,
) -> AmsResult<BTreeMap<String, M>> {
    let items = body
        .get(list_key)
        .and_then(Value::as_array)
        .ok_or_else(|| AmsError::decode(format!("response is missing the {list_key:?} list")))?;

    let mut entities = BTreeMap::new();
    for item in items {
        let key = item
            .get(key_field)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AmsError::decode(format!("{list_key} entry is missing {key_field:?}"))
            })?
            .to_string();
        entities.insert(key, M::from_doc(item.clone(), Some(client))?);
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_missing_credentials() {
        let result = AmsClient::builder().build();
        assert!(matches!(result, Err(AmsError::Validation(_))));
    }

    #[test]
    fn test_builder_rejects_both_credential_paths() {
        let result = AmsClient::builder()
            .credentials("trader", "hunter2")
            .session_id("abc")
            .build();
        assert!(matches!(result, Err(AmsError::Validation(_))));
    }

    #[test]
    fn test_session_id_path_builds_without_network() {
        let client = AmsClient::builder()
            .server_url("https://ams.staging.example.com/")
            .session_id("sid-123")
            .build()
            .unwrap();
        assert_eq!(client.sid(), "sid-123");
        assert_eq!(client.user_id(), None);
        assert_eq!(client.username(), None);
        // Trailing slash trimmed before the API prefix is joined.
        assert_eq!(
            client.base_url(),
            "https://ams.staging.example.com/api/ams_open/v1"
        );
    }

    #[test]
    fn test_resource_view_capabilities() {
        let client = AmsClient::with_session("sid-123").unwrap();

        let asset_units = format!("{:?}", client.asset_units());
        assert!(asset_units.contains("fetch: true"));
        assert!(asset_units.contains("insert: false"));

        let accounts = format!("{:?}", client.accounts());
        assert!(accounts.contains("fetch: true"));
        assert!(accounts.contains("remove: true"));
        assert!(accounts.contains("insert: true"));
        assert!(accounts.contains("extend: false"));

        let brokers = format!("{:?}", client.brokers());
        assert!(brokers.contains("fetch: true"));
        assert!(brokers.contains("remove: false"));
    }

    #[test]
    fn test_decode_listing_rejects_missing_envelope() {
        let client = AmsClient::with_session("sid-123").unwrap();
        let body = serde_json::json!({"unexpected": []});
        let result: AmsResult<BTreeMap<String, Broker>> =
            decode_listing(&client, &body, "brokers", "id");
        assert!(matches!(result, Err(AmsError::Serde(_))));
    }

    #[test]
    fn test_decode_listing_binds_client_and_keys_by_field() {
        // Unroutable address: bound entities must get past the
        // unbound-validation check and fail only at the transport.
        let client = AmsClient::builder()
            .server_url("http://127.0.0.1:1")
            .timeout_secs(1)
            .session_id("sid-123")
            .build()
            .unwrap();
        let body = serde_json::json!({
            "accounts": [
                {"name": "CTA main", "account": "880021", "portfolio": {"id": "pf-1"}},
                {"name": "CTA hedge", "account": "880022"}
            ]
        });
        let accounts: BTreeMap<String, Account> =
            decode_listing(&client, &body, "accounts", "account").unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts["880021"].name, "CTA main");

        let mut account = accounts["880021"].clone();
        let err = account
            .set_portfolio(crate::models::Portfolio::new("pf-2", "Beta"))
            .unwrap_err();
        assert!(matches!(err, AmsError::Transport(_)));
    }
}
