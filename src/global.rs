//! Global, resettable [`RestClient`] for zero-setup one-off calls.
//!
//! # Why this exists
//! Small programs and tests often want a single `restcall::execute(..)` call
//! without constructing and threading a [`RestClient`]. This module provides
//! a process-wide, lazily initialized, resettable client for that
//! convenience, documented as such rather than left as an ambient global.
//!
//! # Design
//! - Backing storage is `ArcSwapOption<RestClient>` inside a `OnceLock`.
//! - **Reads are lock-free**; [`global_client`] does a single atomic load and
//!   returns a cheap clone of the current [`RestClient`].
//! - **Reset is safe**; [`set_global_client`]/[`drop_global_client`] publish
//!   a new instance (or `None`). Existing clones keep working independently.
//! - **Init is fallible** and returns [`BuildError`] instead of panicking.
//!
//! # When not to use
//! Long-lived services that manage their own client configuration; construct
//! and pass a [`RestClient`] explicitly instead.
//!
//! # Concurrency and races
//! If multiple threads call [`global_client`] concurrently before
//! initialization, more than one [`RestClient`] may be constructed; the last
//! stored wins and the others are dropped. This is acceptable and uncommon.
//!
//! # Test hygiene
//! Use [`drop_global_client`] between tests to guarantee a fresh default
//! client, or [`set_global_client`] to inject a deterministic one.

use arc_swap::ArcSwapOption;
use std::sync::Arc;
use std::sync::OnceLock;

use serde::de::DeserializeOwned;

use crate::errors::BuildError;
use crate::{Request, Response, RestClient};

/// Process-wide slot for the optional default client.
///
/// Initialized on first use; may be replaced or cleared at runtime.
/// Lock-free loads; last-writer-wins stores.
static GLOBAL_CLIENT: OnceLock<ArcSwapOption<RestClient>> = OnceLock::new();

#[inline]
fn slot() -> &'static ArcSwapOption<RestClient> {
    GLOBAL_CLIENT.get_or_init(|| ArcSwapOption::from(None))
}

/// Get-or-init the process-wide default client.
///
/// Returns a **clone** of the current default [`RestClient`]. Clones are
/// cheap and share the underlying connection pool.
///
/// - On first use, constructs via [`RestClient::new()`].
/// - Subsequent calls are lock-free and just clone the current instance.
/// - Clones remain valid even if you later call [`set_global_client`] or
///   [`drop_global_client`].
pub fn global_client() -> Result<RestClient, BuildError> {
    if let Some(current) = slot().load_full() {
        // Clone the inner client; dropping this Arc only decrements the refcount.
        return Ok(current.as_ref().clone());
    }

    // Initialize a fresh one and publish it, racing safely with other initializers.
    let fresh = RestClient::new()?;
    slot().store(Some(Arc::new(fresh.clone())));
    Ok(fresh)
}

/// Replace the global default client.
///
/// Publishes `new_client` atomically. Existing handles continue to use the
/// previous client until they are dropped.
pub fn set_global_client(new_client: RestClient) {
    slot().store(Some(Arc::new(new_client)));
}

/// Clear the global default client.
///
/// After this call, the next [`global_client`] will lazily construct a fresh
/// client. Existing handles remain valid.
pub fn drop_global_client() {
    slot().store(None);
}

/// Execute one request on the process-wide default client.
///
/// Equivalent to `global_client()?.execute(request).await`; see
/// [`RestClient::execute`] for the full contract.
///
/// # Examples
/// ```no_run
/// use restcall::Request;
///
/// # async fn run() -> restcall::Result<()> {
/// let response = restcall::execute(Request::get("https://api.example.com/status")).await?;
/// println!("{}", response.status);
/// # Ok(()) }
/// ```
pub async fn execute<S, E>(request: Request<S, E>) -> crate::Result<Response<S, E>>
where
    S: DeserializeOwned,
    E: DeserializeOwned,
{
    let client = global_client()?;
    client.execute(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn crate_level_execute_uses_the_default_client() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ping");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"ok":true}"#);
            })
            .await;

        let response = execute(Request::get(server.url("/ping"))).await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.untyped(), None);
        assert_eq!(
            response.success(),
            Some(&serde_json::json!({ "ok": true }))
        );
    }

    #[test]
    fn global_client_is_lazy_and_resettable() {
        drop_global_client();
        let first = global_client().unwrap();

        // Injected clients are what subsequent callers observe.
        let custom = RestClient::builder()
            .user_agent_extra("injected/1")
            .build()
            .unwrap();
        set_global_client(custom);
        let second = global_client().unwrap();

        // Existing handles stay usable after a reset.
        drop_global_client();
        let _ = (first, second);

        // And the slot re-initializes on demand.
        let _fresh = global_client().unwrap();
    }
}
