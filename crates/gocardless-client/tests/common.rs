//! Shared helpers for client integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use gocardless_client::{ClientConfig, GoCardlessClient};
use gocardless_core::{RawAttributes, SharedTransport};
use serde_json::Value;
use wiremock::MockServer;

pub const ACCESS_TOKEN: &str = "test-access-token";

/// Client pointed at a mock server.
pub fn client_for(server: &MockServer) -> GoCardlessClient {
    let config = ClientConfig::new(ACCESS_TOKEN).with_base_url(server.uri());
    GoCardlessClient::new(&config).expect("client should build")
}

/// Shared transport pointed at a mock server.
pub fn transport_for(server: &MockServer) -> SharedTransport {
    Arc::new(client_for(server))
}

/// Unwrap a `json!` object literal.
pub fn raw(value: Value) -> RawAttributes {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
