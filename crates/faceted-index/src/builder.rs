//! Build pipeline: (items, schema) -> (manifest, facetIndex, lookups).

use std::collections::BTreeMap;

use chrono::Utc;

use crate::{
    bundle::Bundle,
    config::BuildConfig,
    diagnostics::{self, Warning},
    error::BuildConfigError,
    field::{Field, FieldKind},
    manifest::{Capabilities, LookupTable, Manifest, CURRENT_VERSION},
    traits::FieldAccess,
    value::Value,
};

///
/// Builder
///

pub struct Builder;

impl Builder {
    /// Consume `items` and `config`, producing an immutable `Bundle`.
    ///
    /// Fatal on a self-contradictory schema (§7 `BuildConfigError`). All
    /// other irregularities — a declared field that never appears on any
    /// item, an alias pair skipped for being array-valued, an alias that
    /// produced zero pairs — are warned through `diagnostics::warn` and
    /// never fail the build.
    pub fn build<T: FieldAccess>(
        items: Vec<T>,
        config: BuildConfig,
    ) -> Result<Bundle<T>, BuildConfigError> {
        if items.len() > usize::try_from(u32::MAX).unwrap_or(usize::MAX) {
            return Err(BuildConfigError::TooManyItems { count: items.len() });
        }

        let mut manifest = Self::build_manifest(&config)?;
        let facet_index = Self::build_facet_index(&items, &manifest);
        Self::warn_on_unobserved_fields(&items, &manifest);

        if !manifest.capabilities.aliases.is_empty() {
            manifest.lookups = Some(Self::build_lookups(&items, &manifest));
        }

        Ok(Bundle::new(manifest, items, facet_index))
    }

    fn build_manifest(config: &BuildConfig) -> Result<Manifest, BuildConfigError> {
        if config.fields.is_empty() {
            return Err(BuildConfigError::EmptyFieldSet);
        }

        let mut fields = Vec::with_capacity(config.fields.len());
        let mut facets = Vec::new();
        let mut ranges = Vec::new();
        let mut aliases = Vec::new();

        for (name, field_config) in &config.fields {
            if field_config.kind == FieldKind::Alias && field_config.alias_target.is_none() {
                return Err(BuildConfigError::MissingAliasTarget {
                    field: name.clone(),
                });
            }

            let mut field = Field::new(name.clone(), field_config.kind, field_config.scalar_type);
            field.alias_target = field_config.alias_target.clone();
            fields.push(field);

            match field_config.kind {
                FieldKind::Facet => facets.push(name.clone()),
                FieldKind::Range => ranges.push(name.clone()),
                FieldKind::Alias => aliases.push(name.clone()),
                FieldKind::Id | FieldKind::Meta => {}
            }
        }

        for (name, field_config) in &config.fields {
            let Some(target) = &field_config.alias_target else {
                continue;
            };
            let Some(target_config) = config.fields.get(target) else {
                return Err(BuildConfigError::UnknownAliasTarget {
                    field: name.clone(),
                    target: target.clone(),
                });
            };
            if !matches!(target_config.kind, FieldKind::Facet | FieldKind::Range) {
                return Err(BuildConfigError::InvalidAliasTargetKind {
                    field: name.clone(),
                    target: target.clone(),
                    target_kind: format!("{:?}", target_config.kind).to_lowercase(),
                });
            }
        }

        fields.sort_by(|a, b| a.name.cmp(&b.name));
        facets.sort();
        ranges.sort();
        aliases.sort();

        Ok(Manifest {
            version: CURRENT_VERSION.to_owned(),
            dataset_id: config.dataset_id.clone(),
            built_at: Utc::now().to_rfc3339(),
            fields,
            capabilities: Capabilities {
                facets,
                ranges,
                aliases,
            },
            lookups: None,
            strict_scalar_typing: config.strict_scalar_typing,
            extra: BTreeMap::new(),
        })
    }

    /// Build a posting list per facet field: `field -> stringified value ->
    /// sorted-distinct item indices`.
    fn build_facet_index<T: FieldAccess>(
        items: &[T],
        manifest: &Manifest,
    ) -> BTreeMap<String, BTreeMap<String, Vec<u32>>> {
        let mut facet_index = BTreeMap::new();

        for facet_name in &manifest.capabilities.facets {
            let mut postings: BTreeMap<String, Vec<u32>> = BTreeMap::new();

            for (index, item) in items.iter().enumerate() {
                let raw = item.field(facet_name);
                for scalar in scalars_of(&raw) {
                    if let Some(key) = scalar.index_key(manifest.strict_scalar_typing) {
                        // bounded by the TooManyItems check in Builder::build
                        let index = u32::try_from(index).expect("item count fits u32");
                        postings.entry(key).or_default().push(index);
                    }
                }
            }

            for list in postings.values_mut() {
                list.sort_unstable();
                list.dedup();
            }

            facet_index.insert(facet_name.clone(), postings);
        }

        facet_index
    }

    /// Build the alias<->target lookup table for one alias field. Walks
    /// items once; skips (with a warning) any item where either side is
    /// array-valued or null/absent.
    fn build_lookups<T: FieldAccess>(items: &[T], manifest: &Manifest) -> BTreeMap<String, LookupTable> {
        let mut lookups = BTreeMap::new();

        for alias_field in manifest.fields.iter().filter(|f| f.kind == FieldKind::Alias) {
            let Some(target_field) = alias_field.alias_target.as_deref() else {
                continue;
            };

            let mut table = LookupTable::default();
            let mut pairs = 0usize;

            for (index, item) in items.iter().enumerate() {
                let alias_value = item.field(&alias_field.name);
                let target_value = item.field(target_field);

                if alias_value.as_array().is_some() || target_value.as_array().is_some() {
                    diagnostics::warn(Warning::AliasPairNotScalar {
                        alias_field: alias_field.name.clone(),
                        item_index: index,
                    });
                    continue;
                }

                let (Some(alias_key), Some(target_key)) = (
                    alias_value.stringify_scalar(),
                    target_value.stringify_scalar(),
                ) else {
                    continue;
                };

                table.insert_pair(alias_key, target_key);
                pairs += 1;
            }

            if pairs == 0 {
                diagnostics::warn(Warning::AliasProducedNoPairs {
                    field: alias_field.name.clone(),
                });
            }

            lookups.insert(alias_field.name.clone(), table);
        }

        lookups
    }

    fn warn_on_unobserved_fields<T: FieldAccess>(items: &[T], manifest: &Manifest) {
        for field in &manifest.fields {
            let observed = items.iter().any(|item| !item.field(&field.name).is_null());
            if !observed {
                diagnostics::warn(Warning::FieldNeverObserved {
                    field: field.name.clone(),
                });
            }
        }
    }
}

/// Array values are iterated element-by-element; everything else is a
/// singleton. Nested arrays are not recursed into (stringified opaquely by
/// `Value::stringify_scalar`).
fn scalars_of(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests;
