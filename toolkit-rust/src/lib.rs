//! # HFV Toolkit
//!
//! The HFV Toolkit is a Rust library that provides a trait to define a proxy
//! function. A proxy function is a stateless handler that receives query
//! parameters, calls the upstream market-data provider with the server-held
//! API key attached and relays the (minimally reshaped) answer back. The
//! Toolkit generates the HTTP endpoints for every function and serves them.

mod proxy_function;
mod runtime;
mod secret;
mod upstream;

pub use {
    anyhow::Result as AnyResult,
    log,
    proxy_function::{ProxyBody, ProxyFunction, ProxyReply},
    runtime::{routes_for_, ProxyContext},
    secret::ApiKey,
    upstream::{UpstreamClient, UpstreamError, UpstreamResponse},
    warp::{self, http::StatusCode},
};
