//! Error types for resource materialization and fetching.

use crate::registry::ResourceKind;

/// Result type for resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Boxed error produced by a [`Transport`](crate::Transport) implementation.
///
/// The core never inspects, wraps or retries these; callers can downcast to
/// the concrete transport error type.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while materializing or fetching resources.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// A required attribute is absent from a payload.
    #[error("missing required field: {field}")]
    MissingField {
        /// The attribute name.
        field: String,
    },

    /// A required attribute has the wrong JSON type.
    #[error("invalid field {field}: expected {expected}")]
    InvalidField {
        /// The attribute name.
        field: String,
        /// Description of the expected JSON type.
        expected: &'static str,
    },

    /// A declared date field does not match `%Y-%m-%dT%H:%M:%SZ`.
    #[error("malformed date in field {field}: {value}")]
    MalformedDate {
        /// The date field name.
        field: String,
        /// The offending raw value.
        value: String,
    },

    /// A reference or sub-resource name does not resolve to a registered kind.
    #[error("unknown resource type {type_name:?} (from {name:?})")]
    UnknownResourceType {
        /// The name as it appeared in the payload.
        name: String,
        /// The canonical type name derived from it.
        type_name: String,
    },

    /// A lazy accessor was resolved as a kind other than its target.
    #[error("resource kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        /// The kind requested by the caller.
        expected: ResourceKind,
        /// The kind the accessor points to.
        found: ResourceKind,
    },

    /// The process-wide default context is missing or already set.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Request body or response payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport failed; the original error is preserved as the source.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),
}

impl ResourceError {
    /// Shorthand for [`ResourceError::MissingField`].
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

impl From<TransportError> for ResourceError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}
