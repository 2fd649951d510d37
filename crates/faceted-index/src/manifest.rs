//! Manifest: the bundle's immutable, self-describing schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::{Field, FieldKind};

/// Major manifest version this crate writes. Readers must also tolerate
/// major version `"1"` (no `aliases`, no `lookups`).
pub const CURRENT_VERSION: &str = "2.0.0";

///
/// Capabilities
///
/// Authoritative list of queryable fields by role.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub facets: Vec<String>,
    pub ranges: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

///
/// LookupTable
///
/// Two inverses built from item data for one alias field. Both maps are
/// duplicate-free and unordered by contract.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LookupTable {
    #[serde(rename = "aliasToIds")]
    pub alias_to_ids: BTreeMap<String, Vec<String>>,
    #[serde(rename = "idToAliases")]
    pub id_to_aliases: BTreeMap<String, Vec<String>>,
}

impl LookupTable {
    pub(crate) fn insert_pair(&mut self, alias_key: String, target_key: String) {
        let aliases = self.alias_to_ids.entry(alias_key.clone()).or_default();
        if !aliases.contains(&target_key) {
            aliases.push(target_key.clone());
        }

        let ids = self.id_to_aliases.entry(target_key).or_default();
        if !ids.contains(&alias_key) {
            ids.push(alias_key);
        }
    }
}

///
/// Manifest
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    #[serde(rename = "datasetId")]
    pub dataset_id: String,
    #[serde(rename = "builtAt")]
    pub built_at: String,
    pub fields: Vec<Field>,
    pub capabilities: Capabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookups: Option<BTreeMap<String, LookupTable>>,

    /// Resolves Open Question 9a: when set, facet posting-list keys carry a
    /// one-byte type tag so `1` (number) and `"1"` (string) no longer
    /// collide. Readers must consult this before comparing stringified
    /// query values against posting-list keys.
    #[serde(default, rename = "strictScalarTyping")]
    pub strict_scalar_typing: bool,

    /// Unknown top-level manifest keys are preserved round-trip, not
    /// stripped, per the stable wire format's compatibility rule.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Manifest {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn is_facet(&self, name: &str) -> bool {
        self.capabilities.facets.iter().any(|f| f == name)
    }

    #[must_use]
    pub fn is_range(&self, name: &str) -> bool {
        self.capabilities.ranges.iter().any(|f| f == name)
    }

    #[must_use]
    pub fn is_alias(&self, name: &str) -> bool {
        self.capabilities.aliases.iter().any(|f| f == name)
    }

    /// The canonical facet/range field an alias resolves to, if `name` is a
    /// declared alias field.
    #[must_use]
    pub fn alias_target(&self, name: &str) -> Option<&str> {
        self.field(name)
            .filter(|f| f.kind == FieldKind::Alias)
            .and_then(|f| f.alias_target.as_deref())
    }
}

///
/// Snapshot
///
/// Identity card returned with every query result.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "datasetId")]
    pub dataset_id: String,
    #[serde(rename = "builtAt")]
    pub built_at: String,
    #[serde(rename = "indexVersion")]
    pub index_version: String,
}

impl Snapshot {
    #[must_use]
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            dataset_id: manifest.dataset_id.clone(),
            built_at: manifest.built_at.clone(),
            index_version: manifest.version.clone(),
        }
    }
}
