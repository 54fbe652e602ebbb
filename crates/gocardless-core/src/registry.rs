//! Static declarations for every resource kind.
//!
//! Each kind declares an endpoint template, its own date fields and its
//! reference fields. Date fields are cumulative: a kind inherits the date
//! fields of its parent declaration. The resolved tables are computed once,
//! top-down through the parent chain, the first time they are needed.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, Result};
use crate::naming;

/// Placeholder substituted with the resource id in endpoint templates.
pub const ID_PLACEHOLDER: &str = ":id";

/// Every concrete resource kind exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A merchant account.
    Merchant,
    /// A recurring subscription.
    Subscription,
    /// A pre-authorization allowing bills up to a limit.
    PreAuthorization,
    /// A single bill.
    Bill,
    /// A paying customer.
    User,
}

impl ResourceKind {
    /// All kinds, in registration order.
    pub const ALL: [Self; 5] = [
        Self::Merchant,
        Self::Subscription,
        Self::PreAuthorization,
        Self::Bill,
        Self::User,
    ];

    /// Canonical type name used as the registry key.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Merchant => "Merchant",
            Self::Subscription => "Subscription",
            Self::PreAuthorization => "PreAuthorization",
            Self::Bill => "Bill",
            Self::User => "User",
        }
    }

    /// Static declaration for this kind.
    #[must_use]
    pub fn declaration(self) -> &'static Declaration {
        match self {
            Self::Merchant => &MERCHANT,
            Self::Subscription => &SUBSCRIPTION,
            Self::PreAuthorization => &PRE_AUTHORIZATION,
            Self::Bill => &BILL,
            Self::User => &USER,
        }
    }

    /// Endpoint template, e.g. `/bills/:id`.
    #[must_use]
    pub fn endpoint_template(self) -> &'static str {
        self.declaration().endpoint
    }

    /// Endpoint for a concrete id.
    #[must_use]
    pub fn endpoint(self, id: &str) -> String {
        self.endpoint_template().replace(ID_PLACEHOLDER, id)
    }

    /// Date fields of this kind including every inherited one, without duplicates.
    #[must_use]
    pub fn date_fields(self) -> &'static [&'static str] {
        tables()
            .date_fields
            .get(&self)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Reference fields declared by this kind.
    #[must_use]
    pub fn reference_fields(self) -> &'static [&'static str] {
        self.declaration().reference_fields
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Field metadata for one declaration in the resource hierarchy.
#[derive(Debug)]
pub struct Declaration {
    /// Endpoint template containing [`ID_PLACEHOLDER`]; empty for the base.
    pub endpoint: &'static str,
    /// Date fields declared at this level only.
    pub date_fields: &'static [&'static str],
    /// Reference fields declared at this level.
    pub reference_fields: &'static [&'static str],
    /// Parent declaration whose date fields are inherited.
    pub parent: Option<&'static Declaration>,
}

impl Declaration {
    /// Own date fields followed by every ancestor's, skipping duplicates.
    fn resolved_date_fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        let mut current = Some(self);
        while let Some(decl) = current {
            for field in decl.date_fields {
                if !fields.contains(field) {
                    fields.push(*field);
                }
            }
            current = decl.parent;
        }
        fields
    }
}

/// Root of the hierarchy: every resource carries `created_at`.
pub static BASE: Declaration = Declaration {
    endpoint: "",
    date_fields: &["created_at"],
    reference_fields: &[],
    parent: None,
};

static MERCHANT: Declaration = Declaration {
    endpoint: "/merchants/:id",
    date_fields: &["next_payout_date"],
    reference_fields: &[],
    parent: Some(&BASE),
};

static SUBSCRIPTION: Declaration = Declaration {
    endpoint: "/subscriptions/:id",
    date_fields: &["expires_at", "next_interval_start"],
    reference_fields: &["user_id", "merchant_id"],
    parent: Some(&BASE),
};

static PRE_AUTHORIZATION: Declaration = Declaration {
    endpoint: "/pre_authorizations/:id",
    date_fields: &["expires_at", "next_interval_start"],
    reference_fields: &["user_id", "merchant_id"],
    parent: Some(&BASE),
};

static BILL: Declaration = Declaration {
    endpoint: "/bills/:id",
    date_fields: &["paid_at"],
    reference_fields: &["merchant_id", "user_id"],
    parent: Some(&BASE),
};

static USER: Declaration = Declaration {
    endpoint: "/users/:id",
    date_fields: &[],
    reference_fields: &[],
    parent: Some(&BASE),
};

struct Tables {
    by_name: HashMap<&'static str, ResourceKind>,
    date_fields: HashMap<ResourceKind, Vec<&'static str>>,
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| Tables {
        by_name: ResourceKind::ALL
            .iter()
            .map(|kind| (kind.type_name(), *kind))
            .collect(),
        date_fields: ResourceKind::ALL
            .iter()
            .map(|kind| (*kind, kind.declaration().resolved_date_fields()))
            .collect(),
    })
}

/// Look up a kind by its canonical type name (`"PreAuthorization"`).
#[must_use]
pub fn lookup(type_name: &str) -> Option<ResourceKind> {
    tables().by_name.get(type_name).copied()
}

/// Resolve a payload name (`"bills"`, `"pre_authorization"`) to a kind.
///
/// # Errors
///
/// Returns [`ResourceError::UnknownResourceType`] if no kind is registered
/// under the derived type name.
pub fn resolve(name: &str) -> Result<ResourceKind> {
    let type_name = naming::type_name(name);
    lookup(&type_name).ok_or_else(|| ResourceError::UnknownResourceType {
        name: name.to_string(),
        type_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_fields_include_inherited() {
        assert_eq!(
            ResourceKind::Subscription.date_fields(),
            &["expires_at", "next_interval_start", "created_at"]
        );
        assert_eq!(ResourceKind::User.date_fields(), &["created_at"]);
    }

    #[test]
    fn date_fields_skip_duplicates() {
        static DUPLICATE: Declaration = Declaration {
            endpoint: "/things/:id",
            date_fields: &["created_at", "updated_at"],
            reference_fields: &[],
            parent: Some(&BASE),
        };
        assert_eq!(
            DUPLICATE.resolved_date_fields(),
            vec!["created_at", "updated_at"]
        );
    }

    #[test]
    fn endpoint_substitutes_id() {
        assert_eq!(
            ResourceKind::PreAuthorization.endpoint("PA1"),
            "/pre_authorizations/PA1"
        );
    }

    #[test]
    fn resolve_known_names() {
        assert_eq!(resolve("bills").unwrap(), ResourceKind::Bill);
        assert_eq!(resolve("user").unwrap(), ResourceKind::User);
        assert_eq!(
            resolve("pre_authorizations").unwrap(),
            ResourceKind::PreAuthorization
        );
    }

    #[test]
    fn resolve_unknown_name() {
        let err = resolve("payouts").unwrap_err();
        assert!(matches!(
            err,
            ResourceError::UnknownResourceType { ref type_name, .. } if type_name == "Payout"
        ));
    }

    #[test]
    fn every_kind_is_registered() {
        for kind in ResourceKind::ALL {
            assert_eq!(lookup(kind.type_name()), Some(kind));
        }
    }
}
