//! Field schema vocabulary.

use serde::{Deserialize, Serialize};

///
/// FieldKind
///
/// How a field participates in indexing.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Id,
    Facet,
    Range,
    Meta,
    Alias,
}

///
/// ScalarType
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Number,
    Boolean,
    Date,
}

///
/// FieldOp
///
/// Operations a field's `kind` exposes to the query evaluator.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldOp {
    Eq,
    In,
    Between,
    Gte,
    Lte,
}

///
/// Field
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    #[serde(rename = "type")]
    pub scalar_type: ScalarType,
    pub ops: Vec<FieldOp>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "aliasTarget")]
    pub alias_target: Option<String>,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind, scalar_type: ScalarType) -> Self {
        let ops = Self::derive_ops(kind);
        Self {
            name: name.into(),
            kind,
            scalar_type,
            ops,
            alias_target: None,
        }
    }

    #[must_use]
    pub fn with_alias_target(mut self, target: impl Into<String>) -> Self {
        self.alias_target = Some(target.into());
        self
    }

    /// Derive the operation list for `kind`: range fields expose
    /// `{between, gte, lte}`; everything else exposes `{eq, in}`.
    #[must_use]
    pub fn derive_ops(kind: FieldKind) -> Vec<FieldOp> {
        if matches!(kind, FieldKind::Range) {
            vec![FieldOp::Between, FieldOp::Gte, FieldOp::Lte]
        } else {
            vec![FieldOp::Eq, FieldOp::In]
        }
    }

    #[must_use]
    pub const fn is_facet(&self) -> bool {
        matches!(self.kind, FieldKind::Facet)
    }

    #[must_use]
    pub const fn is_range(&self) -> bool {
        matches!(self.kind, FieldKind::Range)
    }

    #[must_use]
    pub const fn is_alias(&self) -> bool {
        matches!(self.kind, FieldKind::Alias)
    }
}

#[cfg(test)]
mod tests;
