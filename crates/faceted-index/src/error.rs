//! Fatal error taxonomy.
//!
//! Only the build and deserialize entry points raise these. The query
//! evaluator is total — see `diagnostics` for its non-fatal warning channel.

use thiserror::Error as ThisError;

///
/// BuildConfigError
///
/// Raised by `Builder::build` when the supplied schema is self-contradictory.
///

#[derive(Debug, ThisError, Eq, PartialEq)]
pub enum BuildConfigError {
    #[error("schema declares no fields")]
    EmptyFieldSet,

    #[error("alias field '{field}' does not declare an alias target")]
    MissingAliasTarget { field: String },

    #[error("alias field '{field}' targets '{target}', which is not declared")]
    UnknownAliasTarget { field: String, target: String },

    #[error(
        "alias field '{field}' targets '{target}', which is kind '{target_kind}' (must be facet or range)"
    )]
    InvalidAliasTargetKind {
        field: String,
        target: String,
        target_kind: String,
    },

    #[error("dataset has {count} items, which exceeds the maximum a bundle can index (u32::MAX)")]
    TooManyItems { count: usize },
}

///
/// BundleFormatError
///
/// Raised by `Bundle::deserialize` when a wire payload violates the stable
/// format's invariants.
///

#[derive(Debug, ThisError, Eq, PartialEq)]
pub enum BundleFormatError {
    #[error("bundle payload is missing a manifest")]
    MissingManifest,

    #[error("bundle payload is missing items")]
    MissingItems,

    #[error("unsupported manifest version '{version}' (major must be 1 or 2)")]
    UnsupportedVersion { version: String },

    #[error("manifest declares no fields")]
    EmptyFieldSet,

    #[error("capabilities reference undeclared field '{field}'")]
    UnknownCapabilityField { field: String },

    #[error("posting-list map has an entry for non-facet field '{field}'")]
    PostingListForNonFacetField { field: String },

    #[error("bundle has {count} items, which exceeds the maximum a bundle can index (u32::MAX)")]
    TooManyItems { count: usize },
}

#[cfg(test)]
mod tests;
