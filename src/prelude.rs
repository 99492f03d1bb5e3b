//! Common imports for quick starts.

// Common
pub use crate::{BuildError, Error, Result};

// Client
pub use crate::{RestClient, RestClientBuilder};

// Descriptors and outcomes
pub use crate::{Decoded, Method, Outcome, Request, Response, Userinfo};

// Global client convenience
pub use crate::{drop_global_client, execute, global_client, set_global_client};
