//! A portable, deterministic, precomputed structured-retrieval index.
//!
//! A `Bundle` packages an immutable manifest, a set of opaque records, and
//! the posting lists / alias lookups built from them at `Builder::build`
//! time. Queries run entirely in memory against that package: no I/O, no
//! background indexing, no partial results — the same query against the
//! same bundle always returns the same answer.

pub mod bundle;
pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod manifest;
pub mod obs;
mod query;
pub mod set_algebra;
pub mod traits;
pub mod value;

#[cfg(feature = "json-schema")]
pub mod schema_adapter;

pub use query::{AppliedFilters, EnrichAliases, Query, QueryResult, RangeBounds};

/// Re-exports of the domain vocabulary most callers need; everything else
/// (set algebra, diagnostics internals, the build pipeline's private
/// helpers) stays reachable through its own module for callers who need it.
pub mod prelude {
    pub use crate::{
        bundle::Bundle,
        builder::Builder,
        config::{BuildConfig, FieldConfig},
        error::{BuildConfigError, BundleFormatError},
        field::{Field, FieldKind, FieldOp, ScalarType},
        manifest::{Capabilities, LookupTable, Manifest, Snapshot},
        query::{AppliedFilters, EnrichAliases, Query, QueryResult, RangeBounds},
        value::Value,
    };
}
