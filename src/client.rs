use std::time::{Duration, SystemTime};

use serde::de::DeserializeOwned;

use crate::errors::{BuildError, RequestError};
use crate::request::Request;
use crate::response::{Response, resolve};

const DEFAULT_USER_AGENT: &str = concat!("restcall", "@", env!("CARGO_PKG_VERSION"));

/// Configures a [`RestClient`] before construction.
///
/// Most code obtains this via [`RestClient::builder()`], which simply returns
/// `RestClientBuilder::default()`.
///
/// # Defaults
/// - HTTP request timeout: reqwest default (no global timeout) unless set via
///   [`Self::request_timeout`]
/// - User-agent: `restcall@<crate-version>` plus any [`Self::user_agent_extra`]
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// # use restcall::RestClient;
/// let client = RestClient::builder()
///     .request_timeout(Duration::from_secs(10))
///     .user_agent_extra("myapp/1.2.3")
///     .build()?;
/// # Ok::<_, restcall::BuildError>(())
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct RestClientBuilder {
    request_timeout: Option<Duration>,

    /// Optional user-agent segment appended to the default UA for app-level telemetry.
    user_agent_extra: Option<String>,
}

impl RestClientBuilder {
    /// Set HTTP requests timeout.
    ///
    /// Timeouts are entirely the transport's concern; the execute pipeline
    /// itself never enforces one.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.request_timeout = Some(timeout);

        self
    }

    /// Append an extra user-agent segment after the default `restcall@<version>`.
    /// Example: `.user_agent_extra("myapp/1.2.3")`
    pub fn user_agent_extra<S: Into<String>>(&mut self, extra: S) -> &mut Self {
        self.user_agent_extra = Some(extra.into());
        self
    }

    /// Build [`RestClient`].
    pub fn build(&self) -> Result<RestClient, BuildError> {
        // Compose user agent with optional extra part.
        let user_agent = match &self.user_agent_extra {
            Some(extra) if !extra.trim().is_empty() => {
                format!("{DEFAULT_USER_AGENT} {}", extra.trim())
            }
            _ => DEFAULT_USER_AGENT.to_string(),
        };

        let mut http_builder = reqwest::Client::builder().user_agent(user_agent);

        if let Some(timeout) = self.request_timeout {
            http_builder = http_builder.timeout(timeout);
        }

        Ok(RestClient {
            http: http_builder.build()?,
        })
    }
}

/// A REST client: the coordinator that turns a [`Request`] descriptor into a
/// [`Response`].
///
/// It owns one [`reqwest::Client`] and nothing else. Construct once and
/// reuse; cloning is cheap (clones share the underlying connection pool),
/// and the client holds no per-request mutable state, so concurrent use from
/// many tasks is safe.
///
/// Each call is a single linear pass (build, send, read, decode) with no
/// retries and no internal timeout; configure timeouts through
/// [`RestClient::builder`].
///
/// ### Construction
/// Use [`RestClient::new()`] for defaults, or [`RestClient::builder()`] to
/// tweak the timeout or user agent. For zero-setup one-off calls, the
/// crate-level [`execute`](crate::execute) uses a process-wide default
/// client instead.
///
/// ### Example
/// ```no_run
/// use restcall::{Request, RestClient};
///
/// # async fn run() -> restcall::Result<()> {
/// let client = RestClient::new()?;
/// let response = client
///     .execute(Request::get("https://api.example.com/items").param("q", "shoes"))
///     .await?;
/// println!("{} -> {}", response.status, response.raw_text);
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct RestClient {
    pub(crate) http: reqwest::Client,
}

impl RestClient {
    /// Creates a client with default configuration.
    pub fn new() -> Result<RestClient, BuildError> {
        Self::builder().build()
    }

    /// Returns a builder to edit settings before creating [`RestClient`].
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::default()
    }

    /// Execute one request: build the message, send it, read the body, and
    /// decode into the descriptor's success or error destination by status
    /// class.
    ///
    /// Structural failures (malformed URL, unencodable payload, transport
    /// errors) abort the call and return no response. A body that is valid
    /// JSON but not in the declared shape is returned as
    /// [`Decoded::Untyped`](crate::Decoded::Untyped) rather than an error;
    /// see [`Outcome`](crate::Outcome).
    ///
    /// The descriptor is consumed and handed back on the response as
    /// [`Response::request`].
    pub async fn execute<S, E>(&self, request: Request<S, E>) -> crate::Result<Response<S, E>>
    where
        S: DeserializeOwned,
        E: DeserializeOwned,
    {
        let builder = request.to_reqwest(&self.http)?;

        let reply = match builder.send().await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(
                    url = %request.url,
                    label = request.label.as_deref(),
                    error = %err,
                    "transport failure executing request"
                );
                return Err(RequestError::Transport(err).into());
            }
        };

        let status = reply.status();
        let raw_text = match reply.text().await {
            Ok(raw_text) => raw_text,
            Err(err) => {
                tracing::error!(
                    status = status.as_u16(),
                    url = %request.url,
                    label = request.label.as_deref(),
                    error = %err,
                    "failed reading response body"
                );
                return Err(RequestError::Transport(err).into());
            }
        };
        let timestamp = SystemTime::now();

        let outcome = resolve(status, &raw_text, request.label.as_deref())?;

        Ok(Response {
            status,
            timestamp,
            raw_text,
            outcome,
            request,
        })
    }
}
