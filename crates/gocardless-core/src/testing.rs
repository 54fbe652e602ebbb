//! In-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::resource::RawAttributes;
use crate::transport::{SharedTransport, Transport};

/// Unwrap a `json!` object literal.
pub fn raw(value: Value) -> RawAttributes {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Records every call and answers from canned responses keyed by path.
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Option<Value>>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shared() -> SharedTransport {
        Self::new()
    }

    pub fn respond(&self, path: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), body);
    }

    /// Calls as `"<METHOD> <path>"`, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<Option<Value>> {
        self.bodies.lock().unwrap().clone()
    }

    fn record(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(format!("{method} {path}"));
        self.bodies.lock().unwrap().push(body.cloned());
        self.responses
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| format!("no response for {method} {path}").into())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn api_get(&self, path: &str) -> Result<Value, TransportError> {
        self.record("GET", path, None)
    }

    async fn api_post(&self, path: &str, params: &Value) -> Result<Value, TransportError> {
        self.record("POST", path, Some(params))
    }

    async fn api_put(&self, path: &str, params: Option<&Value>) -> Result<Value, TransportError> {
        self.record("PUT", path, params)
    }
}
