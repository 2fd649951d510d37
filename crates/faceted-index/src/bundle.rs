//! Bundle: the immutable aggregate of manifest + items + posting lists +
//! alias lookups, plus the scratch buffers the evaluator reuses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::BundleFormatError,
    manifest::{Manifest, Snapshot},
    obs::QueryTrace,
    query::{eval, Query, QueryResult},
    traits::{Enrichable, FieldAccess},
};

pub type FacetIndex = BTreeMap<String, BTreeMap<String, Vec<u32>>>;

///
/// Bundle
///
/// Immutable except for three scratch integer buffers private to the
/// evaluator. Because those buffers are mutated during a query, `query`
/// takes `&mut self` — the borrow checker enforces the documented policy
/// that a single bundle instance is not safe for concurrent queries, rather
/// than leaving that invariant to a runtime assertion.
///

pub struct Bundle<T> {
    pub(crate) manifest: Manifest,
    pub(crate) items: Vec<T>,
    pub(crate) facet_index: FacetIndex,
    pub(crate) scratch_a: Vec<u32>,
    pub(crate) scratch_b: Vec<u32>,
    pub(crate) scratch_range: Vec<u32>,
}

impl<T> Bundle<T> {
    pub(crate) fn new(manifest: Manifest, items: Vec<T>, facet_index: FacetIndex) -> Self {
        Self {
            manifest,
            items,
            facet_index,
            scratch_a: Vec::new(),
            scratch_b: Vec::new(),
            scratch_range: Vec::new(),
        }
    }

    #[must_use]
    pub const fn describe(&self) -> &Manifest {
        &self.manifest
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_manifest(&self.manifest)
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub const fn facet_index(&self) -> &FacetIndex {
        &self.facet_index
    }

    /// A single value's alias resolutions, or `None` if `field` is not a
    /// declared alias or `value` has no mapping.
    #[must_use]
    pub fn alias_lookup(&self, field: &str, value: &str) -> Option<&[String]> {
        self.manifest
            .lookups
            .as_ref()?
            .get(field)?
            .alias_to_ids
            .get(value)
            .map(Vec::as_slice)
    }

    /// All alias resolutions for several values at once, skipping any value
    /// with no mapping.
    #[must_use]
    pub fn alias_lookup_many(&self, field: &str, values: &[&str]) -> Vec<&str> {
        let Some(table) = self.manifest.lookups.as_ref().and_then(|l| l.get(field)) else {
            return Vec::new();
        };
        values
            .iter()
            .filter_map(|v| table.alias_to_ids.get(*v))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// The target-id -> alias-values lookup for one alias field.
    #[must_use]
    pub fn id_to_aliases(&self, field: &str, target_id: &str) -> Option<&[String]> {
        self.manifest
            .lookups
            .as_ref()?
            .get(field)?
            .id_to_aliases
            .get(target_id)
            .map(Vec::as_slice)
    }

    /// The whole lookup table for one alias field.
    #[must_use]
    pub fn lookup_table(&self, field: &str) -> Option<&crate::manifest::LookupTable> {
        self.manifest.lookups.as_ref()?.get(field)
    }
}

impl<T: FieldAccess + Clone + Enrichable> Bundle<T> {
    /// Evaluate `query` against this bundle. Total and fail-closed: never
    /// panics or returns an error for any input (see spec §4.3, §7).
    pub fn query(&mut self, query: &Query) -> QueryResult<T> {
        eval::evaluate(self, query)
    }

    /// Same as `query`, additionally returning a `QueryTrace` with the
    /// candidate-set size after each pipeline stage. Costs nothing on the
    /// plain `query` path since no trace is built unless this is called.
    pub fn query_traced(&mut self, query: &Query) -> (QueryResult<T>, QueryTrace) {
        let mut trace = QueryTrace::new();
        let result = eval::evaluate_traced(self, query, &mut trace);
        (result, trace)
    }

    /// Re-typed, sorted facet-value counts for one field, optionally under
    /// additional filters. Implemented as a zero-limit query with
    /// `includeFacetCounts` set.
    #[must_use]
    pub fn facet_summary(&mut self, field: &str, base: Option<&Query>) -> Vec<(crate::value::Value, usize)> {
        eval::facet_summary(self, field, base)
    }
}

impl<T: Serialize> Bundle<T> {
    /// Emit `{manifest, items, facetIndex}` as the stable wire format.
    ///
    /// # Errors
    /// Returns the underlying `serde_json` error if `T` fails to serialize.
    pub fn serialize(&self) -> Result<serde_json::Value, serde_json::Error> {
        Ok(serde_json::json!({
            "manifest": serde_json::to_value(&self.manifest)?,
            "items": serde_json::to_value(&self.items)?,
            "facetIndex": serde_json::to_value(&self.facet_index)?,
        }))
    }
}

impl<T: for<'de> Deserialize<'de>> Bundle<T> {
    /// Validate and load a wire-format payload.
    ///
    /// # Errors
    /// Returns `BundleFormatError` if the payload violates any invariant
    /// documented in spec §4.4/§6: missing `manifest`/`items`, unsupported
    /// major version, an empty field set, a capability or posting-list
    /// entry referencing an undeclared field.
    pub fn deserialize(payload: serde_json::Value) -> Result<Self, BundleFormatError> {
        let object = payload.as_object().ok_or(BundleFormatError::MissingManifest)?;

        let manifest_value = object.get("manifest").ok_or(BundleFormatError::MissingManifest)?;
        let items_value = object.get("items").ok_or(BundleFormatError::MissingItems)?;

        let manifest: Manifest =
            serde_json::from_value(manifest_value.clone()).map_err(|_| BundleFormatError::MissingManifest)?;

        validate_manifest(&manifest)?;

        let items: Vec<T> =
            serde_json::from_value(items_value.clone()).map_err(|_| BundleFormatError::MissingItems)?;

        if items.len() > usize::try_from(u32::MAX).unwrap_or(usize::MAX) {
            return Err(BundleFormatError::TooManyItems { count: items.len() });
        }

        let mut facet_index: FacetIndex = object
            .get("facetIndex")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|_| BundleFormatError::MissingItems)?
            .unwrap_or_default();

        for field in facet_index.keys() {
            if !manifest.capabilities.facets.iter().any(|f| f == field) {
                return Err(BundleFormatError::PostingListForNonFacetField { field: field.clone() });
            }
        }

        for facet in &manifest.capabilities.facets {
            facet_index.entry(facet.clone()).or_default();
        }

        Ok(Self::new(manifest, items, facet_index))
    }
}

fn validate_manifest(manifest: &Manifest) -> Result<(), BundleFormatError> {
    let major = manifest.version.split('.').next().unwrap_or("");
    if major != "1" && major != "2" {
        return Err(BundleFormatError::UnsupportedVersion {
            version: manifest.version.clone(),
        });
    }

    if manifest.fields.is_empty() {
        return Err(BundleFormatError::EmptyFieldSet);
    }

    let known: std::collections::HashSet<&str> = manifest.fields.iter().map(|f| f.name.as_str()).collect();

    for name in manifest
        .capabilities
        .facets
        .iter()
        .chain(manifest.capabilities.ranges.iter())
    {
        if !known.contains(name.as_str()) {
            return Err(BundleFormatError::UnknownCapabilityField { field: name.clone() });
        }
    }

    Ok(())
}
