//! Explicit build configuration.
//!
//! This is the only shape the core consumes. Inflating a looser, ergonomic
//! config (facet/range shorthands, type inference, auto-meta) into this
//! explicit form is an external collaborator's job (spec §6) — out of scope
//! here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::{FieldKind, ScalarType};

///
/// FieldConfig
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldConfig {
    pub kind: FieldKind,
    #[serde(rename = "type")]
    pub scalar_type: ScalarType,
    #[serde(default, rename = "aliasTarget", skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<String>,
}

///
/// BuildConfig
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(rename = "datasetId")]
    pub dataset_id: String,
    pub fields: BTreeMap<String, FieldConfig>,
    /// Resolves Open Question 9a: when `true`, numeric and string keys that
    /// stringify identically (`1` vs `"1"`) are kept in separate posting-list
    /// buckets instead of colliding. Off by default to match spec.md's
    /// documented collision-by-design.
    #[serde(default)]
    pub strict_scalar_typing: bool,
}
