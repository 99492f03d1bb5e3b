//! The four HTTP verbs a [`Request`](crate::Request) can carry.

use std::fmt;

/// An HTTP verb.
///
/// Only the verbs this client understands are representable; the descriptor
/// stays plain data instead of re-exporting the transport's open-ended
/// method type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// HTTP `GET`. The only verb for which query parameters are honored.
    Get,
    /// HTTP `PUT`.
    Put,
    /// HTTP `POST`.
    Post,
    /// HTTP `DELETE`.
    Delete,
}

impl Method {
    /// The verb as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }

    pub(crate) fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
