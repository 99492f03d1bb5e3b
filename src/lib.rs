#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod client;
pub mod errors;
mod global;
mod method;
mod request;
mod response;

pub mod prelude;

// --- PUBLIC API EXPORTS ---
// Client
pub use client::{RestClient, RestClientBuilder};
// Descriptors
pub use method::Method;
pub use request::{Request, Userinfo};
pub use response::{Decoded, Outcome, Response};

// Error and global client
pub use errors::{BuildError, Error, Result};
pub use global::{drop_global_client, execute, global_client, set_global_client};

// Re-exports
pub use reqwest::StatusCode;
pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
