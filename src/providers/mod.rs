//! Remote AI backends.
//!
//! [`AiBackend`] is the single external interface the gateway depends on;
//! [`EdgeFunctionClient`] talks to the hosted function over HTTP.

pub mod edge_function;
pub mod traits;

pub use edge_function::EdgeFunctionClient;
pub use traits::{AiBackend, payload_error};
