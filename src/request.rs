//! Declarative request descriptors and the step that turns them into
//! transport-ready messages.
//!
//! A [`Request`] is plain data: target URL, verb, query parameters, headers,
//! credentials, and an optional JSON payload. Nothing touches the network
//! until [`RestClient::execute`](crate::RestClient::execute) is called with
//! it. The success and error *destination types* ride along as type
//! parameters so the response decodes without any further annotation at the
//! call site.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::errors::{RequestError, Result};
use crate::method::Method;

/// Basic-auth credentials for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Userinfo {
    /// Username sent in the `Authorization: Basic ..` header.
    pub username: String,
    /// Optional password. `None` sends an empty password, as curl does.
    pub password: Option<String>,
}

/// Describes one HTTP request and the shapes its reply decodes into.
///
/// `S` is the success destination (decoded for `2xx` replies) and `E` the
/// error destination (decoded for everything else). Both default to
/// [`serde_json::Value`], so an un-annotated request still yields a
/// structured view of whatever comes back. Use [`Request::expect_success`]
/// and [`Request::expect_error`] to pick concrete shapes.
///
/// # Examples
/// ```
/// use restcall::Request;
///
/// let req = Request::get("http://api.example.com/items")
///     .param("q", "shoes")
///     .label("item-search");
/// assert_eq!(req.method, restcall::Method::Get);
/// ```
pub struct Request<S = Value, E = Value> {
    /// Raw target URL string. Parsed and validated at execute time.
    pub url: String,
    /// HTTP verb to use.
    pub method: Method,
    /// Optional username/password to authenticate this request.
    pub userinfo: Option<Userinfo>,
    /// Query parameters, honored only when [`Request::method`] is
    /// [`Method::Get`]; silently ignored for all other verbs.
    pub params: BTreeMap<String, String>,
    /// Header overrides merged onto the outgoing message.
    pub headers: HeaderMap,
    /// Payload to JSON-encode as the request body, if any.
    pub data: Option<Value>,
    /// Optional caller-supplied tag threaded into every diagnostic log line
    /// for this request, standing in for call-site capture.
    pub label: Option<String>,

    destinations: PhantomData<fn() -> (S, E)>,
}

impl Request {
    /// Create a descriptor with the given verb and target URL.
    ///
    /// Both destinations start as the generic [`serde_json::Value`]; narrow
    /// them with [`Request::expect_success`] / [`Request::expect_error`].
    pub fn new(method: Method, url: impl Into<String>) -> Request {
        Request {
            url: url.into(),
            method,
            userinfo: None,
            params: BTreeMap::new(),
            headers: HeaderMap::new(),
            data: None,
            label: None,
            destinations: PhantomData,
        }
    }

    /// Shorthand for [`Request::new`] with [`Method::Get`].
    pub fn get(url: impl Into<String>) -> Request {
        Request::new(Method::Get, url)
    }

    /// Shorthand for [`Request::new`] with [`Method::Put`].
    pub fn put(url: impl Into<String>) -> Request {
        Request::new(Method::Put, url)
    }

    /// Shorthand for [`Request::new`] with [`Method::Post`].
    pub fn post(url: impl Into<String>) -> Request {
        Request::new(Method::Post, url)
    }

    /// Shorthand for [`Request::new`] with [`Method::Delete`].
    pub fn delete(url: impl Into<String>) -> Request {
        Request::new(Method::Delete, url)
    }
}

impl<S, E> Request<S, E> {
    /// Add one query parameter. Only honored for GET requests; a parameter
    /// with the same name as one already present in the raw URL replaces it.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add several query parameters at once. Same semantics as
    /// [`Request::param`].
    pub fn params<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.params.insert(key.into(), value.into());
        }
        self
    }

    /// Set a header on the outgoing message, overriding any default.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach basic-auth credentials to this request.
    pub fn basic_auth(
        mut self,
        username: impl Into<String>,
        password: Option<impl Into<String>>,
    ) -> Self {
        self.userinfo = Some(Userinfo {
            username: username.into(),
            password: password.map(Into::into),
        });
        self
    }

    /// JSON-encode `payload` as the request body.
    ///
    /// The payload is converted to a [`serde_json::Value`] immediately, so an
    /// unserializable payload (e.g. a map with non-string keys) fails here
    /// with [`RequestError::EncodeJson`] rather than mid-execute.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        let value = serde_json::to_value(payload).map_err(|err| RequestError::EncodeJson {
            message: err.to_string(),
        })?;
        self.data = Some(value);
        Ok(self)
    }

    /// Tag this request with a diagnostic label.
    ///
    /// The label appears in every log line the client emits about this
    /// request, so failures can be traced back to their origin without the
    /// caller adding instrumentation.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Select the shape `2xx` replies decode into.
    pub fn expect_success<S2>(self) -> Request<S2, E> {
        self.retype()
    }

    /// Select the shape non-`2xx` replies decode into.
    ///
    /// Left unselected, the error destination stays the generic
    /// [`serde_json::Value`] default.
    pub fn expect_error<E2>(self) -> Request<S, E2> {
        self.retype()
    }

    fn retype<S2, E2>(self) -> Request<S2, E2> {
        Request {
            url: self.url,
            method: self.method,
            userinfo: self.userinfo,
            params: self.params,
            headers: self.headers,
            data: self.data,
            label: self.label,
            destinations: PhantomData,
        }
    }

    /// Parse the target URL and, for GET requests, merge query parameters
    /// into its query string.
    ///
    /// Caller-supplied keys overwrite same-named keys already present in the
    /// raw URL; everything else is preserved, including repeated values for
    /// untouched keys. The final query string is a deterministic re-encoding
    /// of the merged set (sorted by key).
    pub(crate) fn build_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url)?;

        if self.method != Method::Get || self.params.is_empty() {
            return Ok(url);
        }

        let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in url.query_pairs() {
            merged
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        for (key, value) in &self.params {
            merged.insert(key.clone(), vec![value.clone()]);
        }

        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, values) in &merged {
                for value in values {
                    pairs.append_pair(key, value);
                }
            }
        }

        Ok(url)
    }

    /// Assemble the transport-ready message. No network I/O happens here.
    pub(crate) fn to_reqwest(&self, http: &reqwest::Client) -> Result<reqwest::RequestBuilder> {
        let url = self.build_url()?;
        let mut builder = http.request(self.method.as_reqwest(), url);

        if !self.headers.is_empty() {
            builder = builder.headers(self.headers.clone());
        }

        if let Some(data) = &self.data {
            let body = serde_json::to_vec(data).map_err(|err| RequestError::EncodeJson {
                message: err.to_string(),
            })?;
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body);
        }

        // Never override a caller-supplied Accept.
        if !self.headers.contains_key(ACCEPT) {
            builder = builder.header(ACCEPT, "application/json");
        }

        if let Some(userinfo) = &self.userinfo {
            builder = builder.basic_auth(&userinfo.username, userinfo.password.as_ref());
        }

        Ok(builder)
    }
}

// Manual impls keep `S`/`E` free of `Clone`/`Debug` bounds; the markers are
// zero-sized and carry no values.
impl<S, E> Clone for Request<S, E> {
    fn clone(&self) -> Self {
        Request {
            url: self.url.clone(),
            method: self.method,
            userinfo: self.userinfo.clone(),
            params: self.params.clone(),
            headers: self.headers.clone(),
            data: self.data.clone(),
            label: self.label.clone(),
            destinations: PhantomData,
        }
    }
}

impl<S, E> fmt::Debug for Request<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("userinfo", &self.userinfo)
            .field("params", &self.params)
            .field("headers", &self.headers)
            .field("data", &self.data)
            .field("label", &self.label)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn get_merges_params_and_caller_wins() {
        let req = Request::get("http://api.test/items?q=old&keep=1").param("q", "shoes");
        let url = req.build_url().unwrap();
        assert_eq!(url.as_str(), "http://api.test/items?keep=1&q=shoes");
    }

    #[test]
    fn get_without_params_leaves_url_untouched() {
        let req = Request::get("http://api.test/items?q=old");
        assert_eq!(req.build_url().unwrap().as_str(), "http://api.test/items?q=old");
    }

    #[test]
    fn repeated_values_survive_for_untouched_keys() {
        let req = Request::get("http://api.test/i?a=1&a=2&b=0").param("b", "9");
        let url = req.build_url().unwrap();
        assert_eq!(url.as_str(), "http://api.test/i?a=1&a=2&b=9");
    }

    #[test]
    fn non_get_ignores_params() {
        for method in [Method::Put, Method::Post, Method::Delete] {
            let req = Request::new(method, "http://api.test/items").param("q", "shoes");
            let url = req.build_url().unwrap();
            assert_eq!(url.query(), None);
        }
    }

    #[test]
    fn simple_get_scenario() {
        let req = Request::get("http://api.test/items").param("q", "shoes");
        assert_eq!(req.build_url().unwrap().as_str(), "http://api.test/items?q=shoes");
    }

    #[test]
    fn malformed_url_is_a_parse_error() {
        let req = Request::get("://nope");
        assert!(matches!(req.build_url(), Err(Error::Parse(_))));
    }

    #[test]
    fn json_payload_sets_body_and_content_type() {
        let http = reqwest::Client::new();
        let req = Request::post("http://api.test/items")
            .json(&serde_json::json!({ "name": "widget" }))
            .unwrap();
        let built = req.to_reqwest(&http).unwrap().build().unwrap();

        assert_eq!(
            built.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = built.body().unwrap().as_bytes().unwrap();
        assert_eq!(body, br#"{"name":"widget"}"#);
    }

    #[test]
    fn no_payload_means_no_body() {
        let http = reqwest::Client::new();
        let req = Request::get("http://api.test/items");
        let built = req.to_reqwest(&http).unwrap().build().unwrap();
        assert!(built.body().is_none());
        assert!(built.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn accept_defaults_to_json_but_caller_wins() {
        let http = reqwest::Client::new();

        let plain = Request::get("http://api.test/items");
        let built = plain.to_reqwest(&http).unwrap().build().unwrap();
        assert_eq!(built.headers().get(ACCEPT).unwrap(), "application/json");

        let overridden = Request::get("http://api.test/items")
            .header(ACCEPT, HeaderValue::from_static("text/plain"));
        let built = overridden.to_reqwest(&http).unwrap().build().unwrap();
        assert_eq!(built.headers().get(ACCEPT).unwrap(), "text/plain");
    }

    #[test]
    fn userinfo_becomes_basic_auth() {
        let http = reqwest::Client::new();
        let req = Request::get("http://api.test/private").basic_auth("alice", Some("secret"));
        let built = req.to_reqwest(&http).unwrap().build().unwrap();

        let auth = built
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(auth.starts_with("Basic "));
    }

    #[test]
    fn unserializable_payload_fails_at_descriptor_build() {
        use std::collections::BTreeMap;

        let mut bad: BTreeMap<Vec<u8>, &str> = BTreeMap::new();
        bad.insert(vec![1, 2], "x");

        let err = Request::post("http://api.test/items").json(&bad).unwrap_err();
        assert!(matches!(
            err,
            Error::Request(RequestError::EncodeJson { .. })
        ));
    }
}
