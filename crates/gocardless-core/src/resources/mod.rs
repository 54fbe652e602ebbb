//! Concrete resource types.
//!
//! Each type is a thin newtype over [`Resource`] generated by the
//! `resource_type!` macro, which provides:
//! - [`ApiResource`] (kind, materialization, fetch-by-id)
//! - `Deref<Target = Resource>` for the generic accessors
//! - `PartialEq`, `Eq`, `Hash` delegating to [`Resource`]
//!
//! Kind-specific accessors and operations live in the per-type modules.

use std::ops::Deref;

use serde_json::Value;

use crate::error::{ResourceError, Result};
use crate::naming::REFERENCE_SUFFIX;
use crate::registry::ResourceKind;
use crate::resource::{RawAttributes, Resource};
use crate::transport::{default_context, SharedTransport};

mod sealed {
    pub trait Sealed {}
}

/// A statically typed resource kind.
///
/// Sealed: implemented only by the types in this module.
pub trait ApiResource: sealed::Sealed + Deref<Target = Resource> + Sized {
    /// The kind this type materializes.
    const KIND: ResourceKind;

    /// Wrap a resource already materialized as [`Self::KIND`].
    #[doc(hidden)]
    fn from_resource(resource: Resource) -> Self;

    /// Unwrap into the generic resource.
    fn into_resource(self) -> Resource;

    /// Materialize a raw mapping as this type.
    ///
    /// # Errors
    ///
    /// As [`Resource::materialize`].
    fn from_raw(raw: RawAttributes, transport: SharedTransport) -> Result<Self> {
        Resource::materialize(Self::KIND, raw, transport).map(Self::from_resource)
    }

    /// Materialize a JSON response body as this type.
    ///
    /// # Errors
    ///
    /// As [`Resource::from_value`].
    fn from_value(value: Value, transport: SharedTransport) -> Result<Self> {
        Resource::from_value(Self::KIND, value, transport).map(Self::from_resource)
    }
}

/// Fetch a resource by id with an explicit transport.
///
/// # Errors
///
/// Propagates transport errors unchanged and materialization errors.
pub async fn find_with_transport<R: ApiResource>(
    id: &str,
    transport: &SharedTransport,
) -> Result<R> {
    let path = R::KIND.endpoint(id);
    tracing::debug!(kind = %R::KIND, path = %path, "Fetching resource");
    let value = transport.api_get(&path).await?;
    R::from_value(value, transport.clone())
}

/// Fetch a resource by id through the process-wide default context.
///
/// # Errors
///
/// Returns [`ResourceError::Configuration`] if no default context is set,
/// otherwise as [`find_with_transport`].
pub async fn find<R: ApiResource>(id: &str) -> Result<R> {
    default_context()?.find(id).await
}

/// Resolve the reference bound from `<name>_id` as a concrete type.
pub(crate) async fn referenced<R: ApiResource>(resource: &Resource, name: &str) -> Result<R> {
    resource
        .reference(name)
        .ok_or_else(|| ResourceError::missing(format!("{name}{REFERENCE_SUFFIX}")))?
        .resolve_as()
        .await
}

/// PUT `<endpoint>/cancel` and copy the returned `status` onto the resource.
pub(crate) async fn cancel(resource: &mut Resource) -> Result<()> {
    let path = format!("{}/cancel", resource.endpoint());
    tracing::debug!(kind = %resource.kind(), id = %resource.id(), "Cancelling resource");
    let mut response = resource.transport().api_put(&path, None).await?;
    let status = response
        .get_mut("status")
        .map(Value::take)
        .ok_or_else(|| ResourceError::missing("status"))?;
    resource.set_field("status", status);
    Ok(())
}

macro_rules! resource_type {
    ($name:ident, $kind:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(crate::resource::Resource);

        impl $name {
            /// Fetch by id with an explicit transport.
            ///
            /// # Errors
            ///
            /// Propagates transport and materialization errors.
            pub async fn find_with_transport(
                id: &str,
                transport: &crate::transport::SharedTransport,
            ) -> crate::error::Result<Self> {
                crate::resources::find_with_transport(id, transport).await
            }

            /// Fetch by id through the process-wide default context.
            ///
            /// # Errors
            ///
            /// Returns a configuration error if no default context is set.
            pub async fn find(id: &str) -> crate::error::Result<Self> {
                crate::resources::find(id).await
            }
        }

        impl crate::resources::sealed::Sealed for $name {}

        impl crate::resources::ApiResource for $name {
            const KIND: crate::registry::ResourceKind = crate::registry::ResourceKind::$kind;

            fn from_resource(resource: crate::resource::Resource) -> Self {
                Self(resource)
            }

            fn into_resource(self) -> crate::resource::Resource {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = crate::resource::Resource;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$name> for crate::resources::AnyResource {
            fn from(resource: $name) -> Self {
                Self::$kind(resource)
            }
        }
    };
}

mod bill;
mod merchant;
mod pre_authorization;
mod subscription;
mod user;

pub use bill::{Bill, BillInput, CreateBillRequest, BILLS_PATH};
pub use merchant::Merchant;
pub use pre_authorization::PreAuthorization;
pub use subscription::Subscription;
pub use user::User;

/// A resource whose kind is only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnyResource {
    /// A [`Merchant`].
    Merchant(Merchant),
    /// A [`Subscription`].
    Subscription(Subscription),
    /// A [`PreAuthorization`].
    PreAuthorization(PreAuthorization),
    /// A [`Bill`].
    Bill(Bill),
    /// A [`User`].
    User(User),
}

impl AnyResource {
    /// Materialize `raw` as the concrete type registered for `kind`.
    ///
    /// # Errors
    ///
    /// As [`Resource::materialize`].
    pub fn materialize(
        kind: ResourceKind,
        raw: RawAttributes,
        transport: SharedTransport,
    ) -> Result<Self> {
        Resource::materialize(kind, raw, transport).map(Self::from_resource)
    }

    /// Fetch by kind and id with an explicit transport.
    ///
    /// # Errors
    ///
    /// Propagates transport and materialization errors.
    pub async fn find_with_transport(
        kind: ResourceKind,
        id: &str,
        transport: &SharedTransport,
    ) -> Result<Self> {
        let path = kind.endpoint(id);
        tracing::debug!(kind = %kind, path = %path, "Fetching resource");
        let value = transport.api_get(&path).await?;
        Resource::from_value(kind, value, transport.clone()).map(Self::from_resource)
    }

    fn from_resource(resource: Resource) -> Self {
        match resource.kind() {
            ResourceKind::Merchant => Self::Merchant(Merchant::from_resource(resource)),
            ResourceKind::Subscription => {
                Self::Subscription(Subscription::from_resource(resource))
            }
            ResourceKind::PreAuthorization => {
                Self::PreAuthorization(PreAuthorization::from_resource(resource))
            }
            ResourceKind::Bill => Self::Bill(Bill::from_resource(resource)),
            ResourceKind::User => Self::User(User::from_resource(resource)),
        }
    }

    /// The generic resource.
    #[must_use]
    pub fn resource(&self) -> &Resource {
        match self {
            Self::Merchant(r) => &**r,
            Self::Subscription(r) => &**r,
            Self::PreAuthorization(r) => &**r,
            Self::Bill(r) => &**r,
            Self::User(r) => &**r,
        }
    }

    /// The resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.resource().kind()
    }

    /// Convert into a concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::KindMismatch`] if the kinds differ.
    pub fn into_typed<R: ApiResource>(self) -> Result<R> {
        let found = self.kind();
        if found != R::KIND {
            return Err(ResourceError::KindMismatch {
                expected: R::KIND,
                found,
            });
        }
        let resource = match self {
            Self::Merchant(r) => r.into_resource(),
            Self::Subscription(r) => r.into_resource(),
            Self::PreAuthorization(r) => r.into_resource(),
            Self::Bill(r) => r.into_resource(),
            Self::User(r) => r.into_resource(),
        };
        Ok(R::from_resource(resource))
    }
}

impl Deref for AnyResource {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        self.resource()
    }
}
