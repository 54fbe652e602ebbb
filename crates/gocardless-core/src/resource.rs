//! The resource materializer.
//!
//! A [`Resource`] is built from a raw JSON mapping plus the static declaration
//! of its kind. Declared date fields are parsed, declared reference fields and
//! server-supplied `sub_resource_uris` become lazy accessors, and everything
//! else is kept verbatim as plain fields. The original mapping is retained as
//! the equality witness.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::error::{ResourceError, Result};
use crate::naming;
use crate::registry::{self, ResourceKind};
use crate::resources::{find_with_transport, AnyResource, ApiResource};
use crate::transport::SharedTransport;

/// Timestamp format of every date field on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Path prefix stripped from sub-resource URIs.
pub const API_VERSION_PREFIX: &str = "/api/v1";

/// Key holding the sub-resource name -> URI mapping.
pub const SUB_RESOURCE_URIS: &str = "sub_resource_uris";

/// Raw attribute mapping as received from the API.
pub type RawAttributes = Map<String, Value>;

/// Parse a wire timestamp.
///
/// # Errors
///
/// Returns [`ResourceError::MalformedDate`] if `value` does not match [`DATE_FORMAT`].
pub fn parse_date(field: &str, value: &str) -> Result<DateTime<Utc>> {
    let malformed = || ResourceError::MalformedDate {
        field: field.to_string(),
        value: value.to_string(),
    };
    let parsed = NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| malformed())?;
    // chrono skips whitespace and accepts unpadded numbers; the wire format does not.
    if format_date(&parsed) != value {
        return Err(malformed());
    }
    Ok(parsed)
}

/// Format a timestamp the way the API sends it.
#[must_use]
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Relative API path of a sub-resource URI.
///
/// Everything up to and including the last [`API_VERSION_PREFIX`] is dropped;
/// URIs without the prefix are used as-is.
#[must_use]
pub fn relative_path(uri: &str) -> &str {
    uri.rfind(API_VERSION_PREFIX)
        .map_or(uri, |idx| &uri[idx + API_VERSION_PREFIX.len()..])
}

/// A foreign id that resolves to a fresh fetch of the referenced resource.
#[derive(Clone)]
pub struct LazyReference {
    kind: ResourceKind,
    id: String,
    transport: SharedTransport,
}

impl LazyReference {
    /// Kind of the referenced resource.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The foreign id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fetch the referenced resource. Every call performs a new GET.
    ///
    /// # Errors
    ///
    /// Propagates transport and materialization errors.
    pub async fn resolve(&self) -> Result<AnyResource> {
        AnyResource::find_with_transport(self.kind, &self.id, &self.transport).await
    }

    /// Fetch the referenced resource as a concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::KindMismatch`] if `R` is not the referenced
    /// kind, otherwise propagates transport and materialization errors.
    pub async fn resolve_as<R: ApiResource>(&self) -> Result<R> {
        ensure_kind::<R>(self.kind)?;
        find_with_transport(&self.id, &self.transport).await
    }
}

impl fmt::Debug for LazyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyReference")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// A server-supplied collection path that resolves to a fresh list fetch.
#[derive(Clone)]
pub struct LazyCollection {
    name: String,
    kind: ResourceKind,
    path: String,
    transport: SharedTransport,
}

impl LazyCollection {
    /// Kind of every element in the collection.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Path relative to the API base.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetch the collection. Every call performs a new GET.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidField`] if the response is not an array
    /// of objects, otherwise propagates transport and materialization errors.
    pub async fn resolve(&self) -> Result<Vec<AnyResource>> {
        self.fetch_raw()
            .await?
            .into_iter()
            .map(|raw| AnyResource::materialize(self.kind, raw, self.transport.clone()))
            .collect()
    }

    /// Fetch the collection as a concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::KindMismatch`] if `R` is not the element kind,
    /// otherwise as [`LazyCollection::resolve`].
    pub async fn resolve_as<R: ApiResource>(&self) -> Result<Vec<R>> {
        ensure_kind::<R>(self.kind)?;
        self.fetch_raw()
            .await?
            .into_iter()
            .map(|raw| R::from_raw(raw, self.transport.clone()))
            .collect()
    }

    async fn fetch_raw(&self) -> Result<Vec<RawAttributes>> {
        tracing::debug!(name = %self.name, path = %self.path, "Fetching sub-resource");
        let Value::Array(items) = self.transport.api_get(&self.path).await? else {
            return Err(ResourceError::InvalidField {
                field: self.name.clone(),
                expected: "array",
            });
        };
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(raw) => Ok(raw),
                _ => Err(ResourceError::InvalidField {
                    field: self.name.clone(),
                    expected: "array of objects",
                }),
            })
            .collect()
    }
}

impl fmt::Debug for LazyCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCollection")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn ensure_kind<R: ApiResource>(found: ResourceKind) -> Result<()> {
    if R::KIND == found {
        Ok(())
    } else {
        Err(ResourceError::KindMismatch {
            expected: R::KIND,
            found,
        })
    }
}

/// A materialized resource of any kind.
///
/// Equality compares the kind and the raw payload; hashing uses only the id.
/// Two resources with the same id but different payloads therefore hash
/// equally while comparing unequal.
#[derive(Clone)]
pub struct Resource {
    kind: ResourceKind,
    id: String,
    raw: RawAttributes,
    dates: BTreeMap<String, Option<DateTime<Utc>>>,
    references: BTreeMap<String, LazyReference>,
    sub_resources: BTreeMap<String, LazyCollection>,
    fields: RawAttributes,
    transport: SharedTransport,
}

impl Resource {
    /// Materialize `raw` as a resource of `kind`.
    ///
    /// No request is made; accessors fetch when resolved.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::MissingField`] if `id` is absent
    /// - [`ResourceError::InvalidField`] if `id` or a reference is not a string,
    ///   or `sub_resource_uris` is not a mapping of strings
    /// - [`ResourceError::MalformedDate`] on the first unparsable date field
    /// - [`ResourceError::UnknownResourceType`] if a reference or sub-resource
    ///   name resolves to no kind
    pub fn materialize(
        kind: ResourceKind,
        raw: RawAttributes,
        transport: SharedTransport,
    ) -> Result<Self> {
        let id = match raw.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(_) => {
                return Err(ResourceError::InvalidField {
                    field: "id".to_string(),
                    expected: "string",
                })
            }
            None => return Err(ResourceError::missing("id")),
        };

        let mut attrs = raw.clone();

        let mut sub_resources = BTreeMap::new();
        if let Some(uris) = attrs.remove(SUB_RESOURCE_URIS) {
            let Value::Object(uris) = uris else {
                return Err(ResourceError::InvalidField {
                    field: SUB_RESOURCE_URIS.to_string(),
                    expected: "object",
                });
            };
            for (name, uri) in uris {
                let Value::String(uri) = uri else {
                    return Err(ResourceError::InvalidField {
                        field: format!("{SUB_RESOURCE_URIS}.{name}"),
                        expected: "string",
                    });
                };
                let collection = LazyCollection {
                    kind: registry::resolve(&name)?,
                    path: relative_path(&uri).to_string(),
                    name: name.clone(),
                    transport: transport.clone(),
                };
                sub_resources.insert(name, collection);
            }
        }

        let mut dates = BTreeMap::new();
        for field in kind.date_fields() {
            let value = match attrs.remove(*field) {
                None | Some(Value::Null) => None,
                Some(Value::String(value)) => Some(parse_date(field, &value)?),
                Some(other) => {
                    return Err(ResourceError::MalformedDate {
                        field: (*field).to_string(),
                        value: other.to_string(),
                    })
                }
            };
            dates.insert((*field).to_string(), value);
        }

        let mut references = BTreeMap::new();
        for field in kind.reference_fields() {
            let foreign_id = match attrs.remove(*field) {
                None | Some(Value::Null) => continue,
                Some(Value::String(foreign_id)) => foreign_id,
                Some(_) => {
                    return Err(ResourceError::InvalidField {
                        field: (*field).to_string(),
                        expected: "string",
                    })
                }
            };
            let name = naming::reference_name(field);
            let reference = LazyReference {
                kind: registry::resolve(name)?,
                id: foreign_id,
                transport: transport.clone(),
            };
            references.insert(name.to_string(), reference);
        }

        tracing::debug!(
            kind = %kind,
            id = %id,
            dates = dates.len(),
            references = references.len(),
            sub_resources = sub_resources.len(),
            "Materialized resource"
        );

        Ok(Self {
            kind,
            id,
            raw,
            dates,
            references,
            sub_resources,
            fields: attrs,
            transport,
        })
    }

    /// Materialize a JSON response body, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidField`] for non-object bodies, otherwise
    /// as [`Resource::materialize`].
    pub fn from_value(
        kind: ResourceKind,
        value: Value,
        transport: SharedTransport,
    ) -> Result<Self> {
        match value {
            Value::Object(raw) => Self::materialize(kind, raw, transport),
            _ => Err(ResourceError::InvalidField {
                field: kind.type_name().to_string(),
                expected: "object",
            }),
        }
    }

    /// The resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The resource id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Endpoint of this resource, e.g. `/subscriptions/SB123`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.kind.endpoint(&self.id)
    }

    /// The payload exactly as received.
    #[must_use]
    pub fn raw_attributes(&self) -> &RawAttributes {
        &self.raw
    }

    /// A parsed date field; `None` if absent, null or not declared.
    #[must_use]
    pub fn date(&self, name: &str) -> Option<DateTime<Utc>> {
        self.dates.get(name).copied().flatten()
    }

    /// Every declared date field; `None` values mark null or absent input.
    #[must_use]
    pub fn dates(&self) -> &BTreeMap<String, Option<DateTime<Utc>>> {
        &self.dates
    }

    /// A plain field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// A plain string field.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Every plain field.
    #[must_use]
    pub fn fields(&self) -> &RawAttributes {
        &self.fields
    }

    /// The lazy reference bound from `<name>_id`.
    #[must_use]
    pub fn reference(&self, name: &str) -> Option<&LazyReference> {
        self.references.get(name)
    }

    /// Every lazy reference, keyed by accessor name.
    #[must_use]
    pub fn references(&self) -> &BTreeMap<String, LazyReference> {
        &self.references
    }

    /// The lazy collection bound from `sub_resource_uris`.
    #[must_use]
    pub fn sub_resource(&self, name: &str) -> Option<&LazyCollection> {
        self.sub_resources.get(name)
    }

    /// Every lazy collection, keyed by sub-resource name.
    #[must_use]
    pub fn sub_resources(&self) -> &BTreeMap<String, LazyCollection> {
        &self.sub_resources
    }

    /// The transport this resource was materialized with.
    #[must_use]
    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    /// Overwrite a plain field. The raw payload is left untouched.
    pub(crate) fn set_field(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.raw == other.raw
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("dates", &self.dates)
            .field("references", &self.references)
            .field("sub_resources", &self.sub_resources)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
