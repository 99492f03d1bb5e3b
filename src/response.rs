//! Response descriptors and the status-class decode policy.
//!
//! The resolver picks a destination purely by status class: `2xx` replies
//! decode as the success shape `S`, everything else as the error shape `E`.
//! An empty body short-circuits to [`Outcome::Empty`] without attempting a
//! decode. When a body is valid JSON but does not match the declared shape,
//! the caller still gets a structured view of it as [`Decoded::Untyped`]
//! rather than an error; only a body that is not JSON at all surfaces
//! [`RequestError::DecodeJson`].

use std::time::SystemTime;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Request;
use crate::errors::{RequestError, Result};

/// A decoded response body.
///
/// [`Decoded::Typed`] carries the value in the shape the caller declared.
/// [`Decoded::Untyped`] is the documented fallback: the body was valid JSON
/// but did not match that shape, so it is handed over as a generic
/// [`serde_json::Value`] instead. Callers pattern-match; the typed
/// destination is never silently rebound.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    /// The body matched the declared shape.
    Typed(T),
    /// The body was JSON, but not in the declared shape.
    Untyped(Value),
}

impl<T> Decoded<T> {
    /// The typed value, if the declared shape matched.
    pub fn typed(&self) -> Option<&T> {
        match self {
            Decoded::Typed(value) => Some(value),
            Decoded::Untyped(_) => None,
        }
    }
}

/// Where the response body ended up.
///
/// Exactly one destination is decoded per call, selected purely by status
/// class; an empty body reaches neither.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<S, E> {
    /// Status was in `[200, 300)`; the body decoded as the success shape.
    Success(Decoded<S>),
    /// Status was outside `[200, 300)`; the body decoded as the error shape.
    Failure(Decoded<E>),
    /// The body was empty. No decode was attempted.
    Empty,
}

/// The reply to one executed [`Request`].
#[derive(Debug)]
pub struct Response<S, E> {
    /// HTTP status of the executed request.
    pub status: StatusCode,
    /// Time the reply was received.
    pub timestamp: SystemTime,
    /// Raw text of the server response, possibly empty.
    pub raw_text: String,
    /// The decoded body, routed by status class.
    pub outcome: Outcome<S, E>,
    /// The descriptor this response answers.
    pub request: Request<S, E>,
}

impl<S, E> Response<S, E> {
    /// Whether the status is in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The typed success value, when the reply was `2xx` and matched `S`.
    pub fn success(&self) -> Option<&S> {
        match &self.outcome {
            Outcome::Success(decoded) => decoded.typed(),
            _ => None,
        }
    }

    /// The typed error value, when the reply was non-`2xx` and matched `E`.
    pub fn error(&self) -> Option<&E> {
        match &self.outcome {
            Outcome::Failure(decoded) => decoded.typed(),
            _ => None,
        }
    }

    /// The generic fallback value, when the body was JSON in neither
    /// declared shape.
    pub fn untyped(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Success(Decoded::Untyped(value))
            | Outcome::Failure(Decoded::Untyped(value)) => Some(value),
            _ => None,
        }
    }
}

/// Route the raw body into the success or error destination by status class.
pub(crate) fn resolve<S, E>(
    status: StatusCode,
    raw_text: &str,
    label: Option<&str>,
) -> Result<Outcome<S, E>>
where
    S: DeserializeOwned,
    E: DeserializeOwned,
{
    // Servers legitimately return nothing (204, HEAD-ish endpoints); don't
    // bother decoding what would fail anyway.
    if raw_text.is_empty() {
        return Ok(Outcome::Empty);
    }

    if status.is_success() {
        Ok(Outcome::Success(decode(status, raw_text, label)?))
    } else {
        Ok(Outcome::Failure(decode(status, raw_text, label)?))
    }
}

/// Decode into `T`, falling back to a generic JSON value on shape mismatch.
fn decode<T: DeserializeOwned>(
    status: StatusCode,
    raw_text: &str,
    label: Option<&str>,
) -> Result<Decoded<T>> {
    let typed_err = match serde_json::from_str::<T>(raw_text) {
        Ok(value) => return Ok(Decoded::Typed(value)),
        Err(err) => err,
    };

    tracing::warn!(
        status = status.as_u16(),
        label,
        error = %typed_err,
        raw_text,
        "response body did not match the declared shape, decoding generically"
    );

    match serde_json::from_str::<Value>(raw_text) {
        Ok(value) => Ok(Decoded::Untyped(value)),
        Err(err) => {
            tracing::error!(
                status = status.as_u16(),
                label,
                error = %err,
                raw_text,
                "response body is not valid JSON"
            );
            Err(RequestError::DecodeJson {
                message: err.to_string(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Msg {
        msg: String,
    }

    #[test]
    fn success_status_decodes_into_success_destination() {
        let outcome: Outcome<Msg, Msg> =
            resolve(StatusCode::OK, r#"{"msg":"hi"}"#, None).unwrap();
        match outcome {
            Outcome::Success(Decoded::Typed(value)) => assert_eq!(value.msg, "hi"),
            other => panic!("expected typed success, got {other:?}"),
        }
    }

    #[test]
    fn error_status_decodes_into_error_destination() {
        let outcome: Outcome<Msg, Msg> =
            resolve(StatusCode::NOT_FOUND, r#"{"msg":"not found"}"#, None).unwrap();
        match outcome {
            Outcome::Failure(Decoded::Typed(value)) => assert_eq!(value.msg, "not found"),
            other => panic!("expected typed failure, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_decodes_nothing() {
        let outcome: Outcome<Msg, Msg> = resolve(StatusCode::OK, "", None).unwrap();
        assert_eq!(outcome, Outcome::Empty);

        let outcome: Outcome<Msg, Msg> = resolve(StatusCode::BAD_GATEWAY, "", None).unwrap();
        assert_eq!(outcome, Outcome::Empty);
    }

    #[test]
    fn shape_mismatch_falls_back_to_generic_value() {
        let outcome: Outcome<Msg, Msg> =
            resolve(StatusCode::OK, r#"[1, 2, 3]"#, Some("fallback-test")).unwrap();
        match outcome {
            Outcome::Success(Decoded::Untyped(value)) => {
                assert_eq!(value, serde_json::json!([1, 2, 3]));
            }
            other => panic!("expected untyped fallback, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_surfaces_decode_error() {
        let result: Result<Outcome<Msg, Msg>> =
            resolve(StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>", None);
        assert!(matches!(
            result,
            Err(Error::Request(RequestError::DecodeJson { .. }))
        ));
    }
}
