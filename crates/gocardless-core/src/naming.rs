//! Naming conventions used to map payload names onto resource kinds.
//!
//! Reference fields are named `<singular_type>_id` and sub-resources are named
//! after the plural collection (`bills`, `pre_authorizations`). Both are turned
//! into a canonical type name (`Bill`, `PreAuthorization`) that keys the
//! [registry](crate::registry).

/// Suffix carried by reference field names.
pub const REFERENCE_SUFFIX: &str = "_id";

/// Reduce a plural word to its singular form.
///
/// Only the final word of a snake-case name is affected.
#[must_use]
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if name.ends_with("ss") {
        return name.to_string();
    }
    name.strip_suffix('s').unwrap_or(name).to_string()
}

/// Convert a snake-case name into a capitalized identifier.
///
/// `pre_authorization` becomes `PreAuthorization`.
#[must_use]
pub fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

/// Canonical type name for a payload name: singularize, then camelize.
#[must_use]
pub fn type_name(name: &str) -> String {
    camelize(&singularize(name))
}

/// Accessor name for a reference field (`user_id` -> `user`).
#[must_use]
pub fn reference_name(field: &str) -> &str {
    field.strip_suffix(REFERENCE_SUFFIX).unwrap_or(field)
}
