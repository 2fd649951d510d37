//! Query contract and result shapes (spec §4.3).

mod alias;
mod normalize;
pub(crate) mod eval;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{manifest::Snapshot, value::Value};

///
/// RangeBounds
///
/// Inclusive `min`/`max` bounds; both optional.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

///
/// EnrichAliases
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnrichAliases {
    #[default]
    None,
    All(bool),
    Only(Vec<String>),
}

impl EnrichAliases {
    pub(crate) fn is_requested(&self) -> bool {
        match self {
            Self::None => false,
            Self::All(flag) => *flag,
            Self::Only(fields) => !fields.is_empty(),
        }
    }

    /// Whether `field` should be enriched, given `declared_aliases` (the
    /// manifest's alias capability list).
    pub(crate) fn wants(&self, field: &str, declared_aliases: &[String]) -> bool {
        match self {
            Self::None => false,
            Self::All(flag) => *flag && declared_aliases.iter().any(|f| f == field),
            Self::Only(fields) => fields.iter().any(|f| f == field),
        }
    }
}

///
/// Query
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub equal: BTreeMap<String, Vec<Value>>,
    #[serde(default, rename = "notEqual", skip_serializing_if = "BTreeMap::is_empty")]
    pub not_equal: BTreeMap<String, Vec<Value>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ranges: BTreeMap<String, RangeBounds>,
    #[serde(default, rename = "isNull", skip_serializing_if = "Vec::is_empty")]
    pub is_null: Vec<String>,
    #[serde(default, rename = "isNotNull", skip_serializing_if = "Vec::is_empty")]
    pub is_not_null: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, rename = "includeFacetCounts")]
    pub include_facet_counts: bool,
    #[serde(default, rename = "enrichAliases")]
    pub enrich_aliases: EnrichAliases,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_equal(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.equal.insert(field.into(), values);
        self
    }

    #[must_use]
    pub fn with_not_equal(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.not_equal.insert(field.into(), values);
        self
    }

    #[must_use]
    pub fn with_range(mut self, field: impl Into<String>, bounds: RangeBounds) -> Self {
        self.ranges.insert(field.into(), bounds);
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub const fn with_facet_counts(mut self) -> Self {
        self.include_facet_counts = true;
        self
    }

    #[must_use]
    pub fn with_enrich_aliases(mut self, aliases: EnrichAliases) -> Self {
        self.enrich_aliases = aliases;
        self
    }
}

///
/// AppliedFilters
///
/// Echo of the original query's filter fields (everything but pagination
/// and the enrichment/facet toggles).
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilters {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub equal: BTreeMap<String, Vec<Value>>,
    #[serde(default, rename = "notEqual", skip_serializing_if = "BTreeMap::is_empty")]
    pub not_equal: BTreeMap<String, Vec<Value>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ranges: BTreeMap<String, RangeBounds>,
    #[serde(default, rename = "isNull", skip_serializing_if = "Vec::is_empty")]
    pub is_null: Vec<String>,
    #[serde(default, rename = "isNotNull", skip_serializing_if = "Vec::is_empty")]
    pub is_not_null: Vec<String>,
}

impl From<&Query> for AppliedFilters {
    fn from(query: &Query) -> Self {
        Self {
            equal: query.equal.clone(),
            not_equal: query.not_equal.clone(),
            ranges: query.ranges.clone(),
            is_null: query.is_null.clone(),
            is_not_null: query.is_not_null.clone(),
        }
    }
}

///
/// QueryResult
///

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: for<'a> Deserialize<'a>"))]
pub struct QueryResult<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub applied: AppliedFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<BTreeMap<String, BTreeMap<String, usize>>>,
    pub snapshot: Snapshot,
    #[serde(rename = "enrichedAliases", skip_serializing_if = "Option::is_none")]
    pub enriched_aliases: Option<Vec<BTreeMap<String, Vec<String>>>>,
}
