//! Raw record values as seen by the builder and evaluator.
//!
//! Records themselves are opaque to this crate (see `traits::FieldAccess`);
//! only the values read back from a record field are typed here.

use serde::{Deserialize, Serialize};

///
/// Value
///
/// Tagged variant of every shape a record field can take. Object/nested
/// values are intentionally absent: per spec, nested structures are
/// stringified opaquely at indexing time and never recursed into.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Canonical scalar-to-string stringification used to build posting-list
    /// and lookup-table keys. Arrays are iterated one level by the caller;
    /// this only stringifies a single scalar (or, for a nested array,
    /// opaquely, with no recursion).
    #[must_use]
    pub fn stringify_scalar(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(if *b { "true".to_owned() } else { "false".to_owned() }),
            Self::Number(n) => Some(format_number(*n)),
            Self::String(s) => Some(s.clone()),
            Self::Array(_) => Some(format!("{self:?}")),
        }
    }

    /// Coerce to a plain `f64` for range comparisons. Strings are not parsed
    /// here — date/number string coercion is schema-type-dependent and lives
    /// in `query::eval`.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The posting-list/lookup key for this scalar. When `strict` is set
    /// (manifest's `strictScalarTyping`), a one-byte type tag is prefixed so
    /// `1` (number) and `"1"` (string) no longer collide in the same
    /// bucket; callers on both the build and query side must apply the same
    /// `strict` flag for keys to compare equal.
    #[must_use]
    pub fn index_key(&self, strict: bool) -> Option<String> {
        let key = self.stringify_scalar()?;
        if !strict {
            return Some(key);
        }
        let tag = match self {
            Self::Number(_) => 'n',
            Self::Bool(_) => 'b',
            _ => 's',
        };
        Some(format!("{tag}:{key}"))
    }
}

/// Decimal-digit canonical formatting: integral values never carry a
/// trailing `.0`, matching how JSON numbers round-trip through most
/// self-describing formats.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        let mut s = format!("{n}");
        if s.ends_with(".0") {
            s.truncate(s.len() - 2);
        }
        s
    }
}

#[cfg(test)]
mod tests;
