//! Typed resources for the GoCardless API.
//!
//! This crate turns raw JSON payloads into typed resources:
//!
//! - **Materializer**: [`Resource::materialize`] parses declared date fields,
//!   binds lazy accessors for references and sub-resources, keeps the rest verbatim
//! - **Declarations**: [`ResourceKind`] with per-kind endpoints, cumulative
//!   date fields and reference fields, plus a name registry
//! - **Resources**: [`Merchant`], [`Subscription`], [`PreAuthorization`],
//!   [`Bill`], [`User`]
//! - **Transport**: the [`Transport`] trait and the [`Context`] that carries it
//!
//! HTTP lives in the `gocardless-client` crate.
//!
//! # Identity
//!
//! Resources compare equal when their raw payloads are equal, but hash by id
//! only. Two payloads of the same resource fetched at different times hash
//! the same and compare unequal.
//!
//! # Laziness
//!
//! Accessors never cache: every [`LazyReference::resolve`] or
//! [`LazyCollection::resolve`] performs a new request.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod naming;
pub mod registry;
pub mod resource;
pub mod resources;
pub mod transport;

#[cfg(test)]
mod testing;

pub use error::{ResourceError, Result, TransportError};
pub use registry::ResourceKind;
pub use resource::{
    format_date, parse_date, LazyCollection, LazyReference, RawAttributes, Resource,
    DATE_FORMAT,
};
pub use resources::{
    find, find_with_transport, AnyResource, ApiResource, Bill, BillInput, CreateBillRequest,
    Merchant, PreAuthorization, Subscription, User,
};
pub use transport::{default_context, set_default_context, Context, SharedTransport, Transport};
