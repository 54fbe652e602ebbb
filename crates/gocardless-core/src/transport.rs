//! Transport capability and the context that carries it.
//!
//! The core never talks HTTP itself. Every fetch goes through a [`Transport`]
//! supplied by the caller, either directly or through a [`Context`]. A single
//! process-wide default context can be installed once for call sites that do
//! not want to thread one through.

use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ResourceError, Result, TransportError};
use crate::resources::ApiResource;

/// Authenticated access to the API base.
///
/// Paths are relative to a base URL owned by the implementation
/// (e.g. `/bills/BL1`).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET and return the decoded JSON body.
    async fn api_get(&self, path: &str) -> std::result::Result<Value, TransportError>;

    /// Perform a POST with a JSON body.
    async fn api_post(&self, path: &str, params: &Value)
        -> std::result::Result<Value, TransportError>;

    /// Perform a PUT with an optional JSON body.
    async fn api_put(
        &self,
        path: &str,
        params: Option<&Value>,
    ) -> std::result::Result<Value, TransportError>;
}

/// Shared transport handle captured by resources and lazy accessors.
pub type SharedTransport = Arc<dyn Transport>;

/// Explicit configuration passed to top-level fetches.
#[derive(Clone)]
pub struct Context {
    transport: SharedTransport,
}

impl Context {
    /// Create a context around a transport.
    #[must_use]
    pub fn new(transport: SharedTransport) -> Self {
        Self { transport }
    }

    /// Create a context from a concrete transport.
    #[must_use]
    pub fn from_transport<T: Transport + 'static>(transport: T) -> Self {
        Self::new(Arc::new(transport))
    }

    /// The transport handle.
    #[must_use]
    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    /// Fetch a resource by id through this context.
    ///
    /// # Errors
    ///
    /// Propagates transport and materialization errors.
    pub async fn find<R: ApiResource>(&self, id: &str) -> Result<R> {
        crate::resources::find_with_transport(id, &self.transport).await
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}

static DEFAULT_CONTEXT: OnceLock<Context> = OnceLock::new();

/// Install the process-wide default context.
///
/// Can only be done once per process.
///
/// # Errors
///
/// Returns [`ResourceError::Configuration`] if a default context is already set.
pub fn set_default_context(context: Context) -> Result<()> {
    DEFAULT_CONTEXT.set(context).map_err(|_| {
        tracing::warn!("Default context already configured - ignoring new context");
        ResourceError::Configuration("default context is already configured".to_string())
    })?;
    tracing::info!("Default context configured");
    Ok(())
}

/// The process-wide default context.
///
/// # Errors
///
/// Returns [`ResourceError::Configuration`] if [`set_default_context`] has not
/// been called.
pub fn default_context() -> Result<&'static Context> {
    DEFAULT_CONTEXT.get().ok_or_else(|| {
        ResourceError::Configuration(
            "no default context configured; call set_default_context first".to_string(),
        )
    })
}
