//! Pipeline steps 3-12: candidate-set algebra, ranges, pagination,
//! materialization and alias enrichment. Steps 1-2 live in `normalize` and
//! `alias`; this module wires everything together and is the only place
//! that touches a bundle's scratch buffers.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::{
    bundle::Bundle,
    field::ScalarType,
    obs::QueryTrace,
    set_algebra,
    traits::{Enrichable, FieldAccess},
    value::Value,
};

use super::{alias, normalize, normalize::Normalized, AppliedFilters, Query, QueryResult, RangeBounds};

/// Evaluate `query` against `bundle`. Total: never panics, never returns an
/// error. Unknown facet/range fields and empty IN lists fail closed to an
/// empty result rather than propagating anything to the caller.
pub(crate) fn evaluate<T: FieldAccess + Clone + Enrichable>(bundle: &mut Bundle<T>, query: &Query) -> QueryResult<T> {
    run(bundle, query, None)
}

/// Same pipeline as `evaluate`, additionally recording the candidate-set
/// size after each stage into `trace`.
pub(crate) fn evaluate_traced<T: FieldAccess + Clone + Enrichable>(
    bundle: &mut Bundle<T>,
    query: &Query,
    trace: &mut QueryTrace,
) -> QueryResult<T> {
    run(bundle, query, Some(trace))
}

fn run<T: FieldAccess + Clone + Enrichable>(
    bundle: &mut Bundle<T>,
    query: &Query,
    mut trace: Option<&mut QueryTrace>,
) -> QueryResult<T> {
    let applied = AppliedFilters::from(query);

    let mut normalized = normalize::normalize(query);
    alias::resolve(bundle, &mut normalized);

    let Some(mut candidates) = equal_candidates(bundle, &normalized.equal) else {
        if let Some(trace) = trace.as_deref_mut() {
            trace.record("equal", 0);
        }
        return empty_result(bundle, applied, query);
    };
    if let Some(trace) = trace.as_deref_mut() {
        trace.record("equal", candidates.len());
    }

    or_null_adjustment(bundle, &normalized.or_null_fields, &mut candidates);
    if let Some(trace) = trace.as_deref_mut() {
        trace.record("orNull", candidates.len());
    }

    if !query.ranges.is_empty() {
        if query.ranges.keys().any(|field| !bundle.describe().is_range(field)) {
            if let Some(trace) = trace.as_deref_mut() {
                trace.record("ranges", 0);
            }
            return empty_result(bundle, applied, query);
        }
        candidates = apply_ranges(bundle, &query.ranges, &candidates);
        if let Some(trace) = trace.as_deref_mut() {
            trace.record("ranges", candidates.len());
        }
    }

    apply_null_checks(bundle, &normalized, &mut candidates);
    if let Some(trace) = trace.as_deref_mut() {
        trace.record("nullChecks", candidates.len());
    }

    apply_exclusions(bundle, &normalized.not_equal, &mut candidates);
    if let Some(trace) = trace.as_deref_mut() {
        trace.record("exclusions", candidates.len());
    }

    let total = candidates.len();

    let facets = query
        .include_facet_counts
        .then(|| facet_counts(bundle, &candidates));

    let page = paginate(&candidates, query.offset, query.limit);
    let items: Vec<T> = page.iter().map(|&idx| bundle.items[idx as usize].clone()).collect();

    let (items, enriched_aliases) = enrich(bundle, items, query);

    QueryResult {
        items,
        total,
        applied,
        facets,
        snapshot: bundle.snapshot(),
        enriched_aliases,
    }
}

/// Re-typed, sorted facet-value counts for one field. Implemented as a
/// zero-limit query with `includeFacetCounts` set, since counts are
/// computed before pagination anyway.
pub(crate) fn facet_summary<T: FieldAccess + Clone + Enrichable>(
    bundle: &mut Bundle<T>,
    field: &str,
    base: Option<&Query>,
) -> Vec<(Value, usize)> {
    let mut query = base.cloned().unwrap_or_default();
    query.limit = Some(0);
    query.include_facet_counts = true;

    let result = evaluate(bundle, &query);
    let Some(counts) = result.facets.as_ref().and_then(|f| f.get(field)) else {
        return Vec::new();
    };

    let scalar_type = bundle.describe().field(field).map(|f| f.scalar_type);

    let mut typed: Vec<(Value, usize)> = counts
        .iter()
        .map(|(key, &count)| (retype(key, scalar_type), count))
        .collect();

    typed.sort_by(|(a, _), (b, _)| compare_facet_values(a, b));
    typed
}

/// Step 3: union per-value posting lists per field (IN semantics), then
/// intersect across fields small-set-first. `None` means "stop, the whole
/// query is empty" (non-facet field referenced, or an empty IN list).
fn equal_candidates<T>(bundle: &mut Bundle<T>, equal: &BTreeMap<String, Vec<Value>>) -> Option<Vec<u32>> {
    if equal.is_empty() {
        return Some(set_algebra::all_indices(bundle.items.len()));
    }

    let mut per_field: Vec<Vec<u32>> = Vec::with_capacity(equal.len());

    for (field, values) in equal {
        if values.is_empty() || !bundle.manifest.is_facet(field) {
            return None;
        }

        let postings = bundle.facet_index.get(field)?;
        let strict = bundle.manifest.strict_scalar_typing;

        let set = if let [single] = values.as_slice() {
            single
                .index_key(strict)
                .and_then(|key| postings.get(&key))
                .cloned()
                .unwrap_or_default()
        } else {
            let lists: Vec<&[u32]> = values
                .iter()
                .filter_map(|v| v.index_key(strict))
                .filter_map(|key| postings.get(&key))
                .map(Vec::as_slice)
                .collect();
            set_algebra::union(&lists)
        };

        per_field.push(set);
    }

    per_field.sort_by_key(Vec::len);
    let mut fields = per_field.into_iter();
    let mut current = fields.next()?;
    let mut use_a = true;

    for next in fields {
        if current.is_empty() {
            break;
        }
        let target = if use_a { &mut bundle.scratch_a } else { &mut bundle.scratch_b };
        set_algebra::intersect(&current, &next, target);
        current = std::mem::take(target);
        use_a = !use_a;
    }

    Some(current)
}

/// Step 4: union in the null/absent index set for every OR-null field.
fn or_null_adjustment<T: FieldAccess>(bundle: &Bundle<T>, or_null_fields: &[String], candidates: &mut Vec<u32>) {
    for field in or_null_fields {
        // bounded by the TooManyItems check in Builder::build/Bundle::deserialize
        let null_indices: Vec<u32> = bundle
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.field(field).is_null())
            .map(|(index, _)| u32::try_from(index).expect("item count fits u32"))
            .collect();
        *candidates = set_algebra::union(&[candidates.as_slice(), null_indices.as_slice()]);
    }
}

/// Step 5: linear scan applying inclusive min/max range bounds, coercing
/// strings to numbers (ISO date parse when the field's declared type is
/// `date`, decimal parse otherwise). Unparseable or null values reject.
fn apply_ranges<T: FieldAccess>(bundle: &mut Bundle<T>, ranges: &BTreeMap<String, RangeBounds>, candidates: &[u32]) -> Vec<u32> {
    bundle.scratch_range.clear();

    for &index in candidates {
        let item = &bundle.items[index as usize];
        let passes = ranges.iter().all(|(field, bounds)| {
            let raw = item.field(field);
            let scalar_type = bundle.manifest.field(field).map(|f| f.scalar_type);
            let Some(number) = coerce_range_number(scalar_type, &raw) else {
                return false;
            };
            bounds.min.is_none_or(|min| number >= min) && bounds.max.is_none_or(|max| number <= max)
        });

        if passes {
            bundle.scratch_range.push(index);
        }
    }

    std::mem::take(&mut bundle.scratch_range)
}

fn coerce_range_number(scalar_type: Option<ScalarType>, raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => Some(*n),
        Value::String(s) => {
            if scalar_type == Some(ScalarType::Date) {
                chrono::DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.timestamp_millis() as f64)
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Step 6: explicit `isNull` (minus fields already folded into the OR-null
/// union) and `isNotNull`, in a single pass.
fn apply_null_checks<T: FieldAccess>(bundle: &Bundle<T>, normalized: &Normalized, candidates: &mut Vec<u32>) {
    let is_null_fields: Vec<&String> = normalized
        .is_null
        .iter()
        .filter(|f| !normalized.or_null_fields.contains(f))
        .collect();

    if is_null_fields.is_empty() && normalized.is_not_null.is_empty() {
        return;
    }

    candidates.retain(|&index| {
        let item = &bundle.items[index as usize];
        is_null_fields.iter().all(|field| item.field(field).is_null())
            && normalized.is_not_null.iter().all(|field| !item.field(field).is_null())
    });
}

/// Step 7: reject items whose (non-null) field value is present in the
/// excluded set. Null values never trigger `notEqual` exclusion.
fn apply_exclusions<T: FieldAccess>(bundle: &Bundle<T>, not_equal: &BTreeMap<String, Vec<Value>>, candidates: &mut Vec<u32>) {
    if not_equal.is_empty() {
        return;
    }

    candidates.retain(|&index| {
        let item = &bundle.items[index as usize];
        not_equal.iter().all(|(field, excluded)| {
            let raw = item.field(field);
            if raw.is_null() {
                return true;
            }
            let keys = stringify_keys(&raw);
            let excluded_keys: Vec<String> = excluded.iter().filter_map(Value::stringify_scalar).collect();
            !keys.iter().any(|key| excluded_keys.contains(key))
        })
    });
}

/// Step 9: per-facet value counts over the current candidate set. Array
/// values contribute once per element, duplicates included; null/absent
/// never counted.
fn facet_counts<T: FieldAccess>(bundle: &Bundle<T>, candidates: &[u32]) -> BTreeMap<String, BTreeMap<String, usize>> {
    let mut facets = BTreeMap::new();

    for facet_name in &bundle.manifest.capabilities.facets {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for &index in candidates {
            let raw = bundle.items[index as usize].field(facet_name);
            for key in stringify_keys(&raw) {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        facets.insert(facet_name.clone(), counts);
    }

    facets
}

/// Step 10: `start = max(0, offset)`; a negative `limit` clamps to zero
/// items without altering `total`.
fn paginate(candidates: &[u32], offset: Option<i64>, limit: Option<i64>) -> &[u32] {
    let start = offset.unwrap_or(0).max(0);
    let start = usize::try_from(start).unwrap_or(usize::MAX).min(candidates.len());

    let end = match limit {
        None => candidates.len(),
        Some(limit) => {
            let span = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
            start.saturating_add(span).min(candidates.len())
        }
    };

    &candidates[start..end]
}

/// Step 12: collect unique target-IDs referenced by the paginated items,
/// resolve each once via `idToAliases`, then attach alias values back onto
/// every item (union across target IDs when the target field is array-valued).
fn enrich<T: FieldAccess + Clone + Enrichable>(
    bundle: &Bundle<T>,
    mut items: Vec<T>,
    query: &Query,
) -> (Vec<T>, Option<Vec<BTreeMap<String, Vec<String>>>>) {
    let declared_aliases = bundle.manifest.capabilities.aliases.clone();
    let wanted: Vec<&String> = declared_aliases
        .iter()
        .filter(|field| query.enrich_aliases.wants(field, &declared_aliases))
        .collect();

    if wanted.is_empty() {
        return (items, None);
    }

    let mut enriched_aliases: Vec<BTreeMap<String, Vec<String>>> = vec![BTreeMap::new(); items.len()];

    for alias_field in wanted {
        let Some(target) = bundle.manifest.alias_target(alias_field) else {
            continue;
        };

        let mut unique_ids: Vec<String> = Vec::new();
        for item in &items {
            for id in stringify_keys(&item.field(target)) {
                if !unique_ids.contains(&id) {
                    unique_ids.push(id);
                }
            }
        }

        let mut resolved: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for id in &unique_ids {
            if let Some(aliases) = bundle.id_to_aliases(alias_field, id) {
                resolved.insert(id.clone(), aliases.to_vec());
            }
        }

        for (item, side) in items.iter_mut().zip(enriched_aliases.iter_mut()) {
            let target_ids = stringify_keys(&item.field(target));
            let mut values: Vec<String> = Vec::new();
            for id in &target_ids {
                if let Some(aliases) = resolved.get(id) {
                    for alias_value in aliases {
                        if !values.contains(alias_value) {
                            values.push(alias_value.clone());
                        }
                    }
                }
            }
            item.attach_alias(alias_field, &values);
            side.insert(alias_field.clone(), values);
        }
    }

    (items, Some(enriched_aliases))
}

fn empty_result<T: FieldAccess + Clone + Enrichable>(
    bundle: &Bundle<T>,
    applied: AppliedFilters,
    query: &Query,
) -> QueryResult<T> {
    QueryResult {
        items: Vec::new(),
        total: 0,
        applied,
        facets: query.include_facet_counts.then(|| facet_counts(bundle, &[])),
        snapshot: bundle.snapshot(),
        enriched_aliases: query.enrich_aliases.is_requested().then(Vec::new),
    }
}

/// Array values are iterated element-by-element (duplicates kept); everything
/// else stringifies to zero or one key.
fn stringify_keys(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(Value::stringify_scalar).collect(),
        other => other.stringify_scalar().into_iter().collect(),
    }
}

fn retype(key: &str, scalar_type: Option<ScalarType>) -> Value {
    match scalar_type {
        Some(ScalarType::Number) => key
            .parse::<f64>()
            .map_or_else(|_| Value::String(key.to_owned()), Value::Number),
        Some(ScalarType::Boolean) => Value::Bool(key == "true"),
        _ => Value::String(key.to_owned()),
    }
}

/// Determinism rule (iv): numbers ascending, booleans false-before-true,
/// strings in lexicographic code-point order.
fn compare_facet_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
