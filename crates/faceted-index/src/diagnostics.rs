//! Diagnostics boundary for non-fatal warnings.
//!
//! Build and query logic never panic and never return an error for a soft
//! failure (unresolvable alias, declared-but-absent field, skipped
//! scalar/array mismatch). Every such case flows through a `Warning` here.
//! This module is the only allowed bridge between core logic and the
//! pluggable sink; callers may override it to capture warnings in tests.

use std::cell::RefCell;
use std::fmt;

///
/// Warning
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Warning {
    /// A declared field never appeared on any item during build.
    FieldNeverObserved { field: String },
    /// An alias/target pair was skipped because one side was array-valued.
    AliasPairNotScalar { alias_field: String, item_index: usize },
    /// An alias field produced zero valid pairs during build.
    AliasProducedNoPairs { field: String },
    /// A supplied alias value had no entry in `aliasToIds`.
    AliasValueUnresolved { field: String, value: String },
    /// Every value for an alias constraint was unresolved; the constraint
    /// was dropped rather than treated as "no matches".
    AliasConstraintDropped { field: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldNeverObserved { field } => {
                write!(f, "field '{field}' is declared but never observed in any item")
            }
            Self::AliasPairNotScalar { alias_field, item_index } => write!(
                f,
                "alias '{alias_field}' skipped item {item_index}: alias/target must both be scalar"
            ),
            Self::AliasProducedNoPairs { field } => write!(
                f,
                "alias '{field}' produced zero valid pairs; it will match nothing at query time"
            ),
            Self::AliasValueUnresolved { field, value } => {
                write!(f, "alias '{field}' value '{value}' has no mapping; dropped")
            }
            Self::AliasConstraintDropped { field } => write!(
                f,
                "alias constraint on '{field}' had no resolvable values; constraint dropped"
            ),
        }
    }
}

///
/// WarningSink
///

pub trait WarningSink {
    fn record(&self, warning: Warning);
}

///
/// StderrWarningSink
///
/// Default sink: writes to process stderr.
///

pub struct StderrWarningSink;

impl WarningSink for StderrWarningSink {
    fn record(&self, warning: Warning) {
        eprintln!("faceted-index: {warning}");
    }
}

///
/// NoopWarningSink
///

pub struct NoopWarningSink;

impl WarningSink for NoopWarningSink {
    fn record(&self, _: Warning) {}
}

const GLOBAL_SINK: StderrWarningSink = StderrWarningSink;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn WarningSink>> = const { RefCell::new(None) };
}

pub(crate) fn warn(warning: Warning) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY: override is scoped by `with_warning_sink` and only read
        // back synchronously within that scope, on the same thread.
        unsafe { (*ptr).record(warning) };
    } else {
        GLOBAL_SINK.record(warning);
    }
}

/// Run `f` with a temporary warning sink override, restoring the previous
/// sink (or the default) on scope exit even if `f` panics.
pub fn with_warning_sink<T>(sink: &dyn WarningSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn WarningSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY: the erased pointer is only dereferenced while this scope (and
    // thus `sink`'s borrow) is still alive; `Guard` restores the previous
    // value before `sink` can go out of scope.
    let sink_ptr = std::ptr::from_ref::<dyn WarningSink>(sink);
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}

#[cfg(test)]
mod tests;
