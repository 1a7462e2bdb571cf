//! # Integration Flows
//!
//! Every flow runs the real subsystems against `InMemoryChain`; nothing is
//! mocked below the gateway ports.

mod rounds;
mod runtime;
mod scoring;
