//! Gateway implementations

mod builder;
mod service;

pub use builder::{ScholarGate, ScholarGateBuilder};
pub use service::AiGateway;
