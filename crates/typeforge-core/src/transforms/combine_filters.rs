//! Fold per-nullability filter variants into a single filter per kind
//!
//! The schema layer emits one filter input per scalar kind and variant:
//! `StringFilter`, `StringNullableFilter`, `NestedStringFilter` and so on.
//! This pass merges every variant into the base filter (`StringFilter`) and
//! points all references at it. Aggregate filters such as
//! `StringWithAggregatesFilter` carry extra fields and form their own group.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::ir::{DefinitionSet, Field, RenameTable, TypeDefinition, TypeKind};
use crate::naming::remove_tokens;

/// Tokens that distinguish a filter variant from its base filter
pub const VARIANT_TOKENS: &[&str] = &["Nullable", "Nested"];

pub fn is_filter(def: &TypeDefinition) -> bool {
    def.kind == TypeKind::Input && def.name.ends_with("Filter")
}

/// `NestedStringNullableFilter` -> `StringFilter`
pub fn filter_base_name(name: &str) -> String {
    remove_tokens(name, VARIANT_TOKENS)
}

pub fn combine_scalar_filters(set: DefinitionSet) -> CoreResult<DefinitionSet> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for def in set.types().filter(|def| is_filter(def)) {
        groups
            .entry(filter_base_name(&def.name))
            .or_default()
            .push(def.name.clone());
    }

    let mut table = RenameTable::new();
    for (base, members) in &groups {
        for member in members.iter().filter(|m| *m != base) {
            table.insert(member.as_str(), base.as_str())?;
        }
    }

    if table.is_empty() {
        debug!("No filter variants to combine");
        return Ok(set);
    }

    for base in groups.keys() {
        if set.contains_enum(base) {
            let first = format!("enum {}", base);
            return Err(CoreError::collision(base.as_str(), first, "merged filter"));
        }
        if let Some(existing) = set.get_type(base) {
            if !is_filter(existing) {
                return Err(CoreError::collision(
                    base.as_str(),
                    format!("{} {}", existing.kind, base),
                    "merged filter",
                ));
            }
        }
    }

    let (mut types, enums) = set.into_parts();
    let mut folded = 0usize;

    for (base, members) in groups {
        if members.iter().all(|m| *m == base) {
            continue;
        }

        // The base filter leads so its field order is preserved.
        let mut variants: Vec<TypeDefinition> = Vec::with_capacity(members.len());
        if let Some(def) = types.remove(&base) {
            variants.push(def);
        }
        for name in members.iter().filter(|m| **m != base) {
            if let Some(def) = types.remove(name) {
                variants.push(def);
            }
        }

        folded += variants.len() - 1;
        let merged = merge_variants(&base, variants, &table)?;
        debug!(
            "Combined {} filter variant(s) into {} ({} fields)",
            members.len(),
            base,
            merged.fields.len()
        );
        types.insert(base, merged);
    }

    info!("Combined {} filter variant(s)", folded);
    Ok(DefinitionSet::from_maps(types, enums).rewrite_references(&table))
}

/// Union of the variants' fields, joined by field name
///
/// Field types are compared after renaming, so `not: NestedStringFilter` and
/// `not: NestedStringNullableFilter` agree once both point at `StringFilter`.
fn merge_variants(
    base: &str,
    variants: Vec<TypeDefinition>,
    table: &RenameTable,
) -> CoreResult<TypeDefinition> {
    let source_entity = variants.iter().find_map(|v| v.source_entity.clone());
    let mut fields: Vec<Field> = Vec::new();
    let mut introduced_by: BTreeMap<String, String> = BTreeMap::new();

    for variant in &variants {
        for field in &variant.fields {
            let field = field.clone().renamed(table);
            match fields.iter_mut().find(|f| f.name == field.name) {
                None => {
                    introduced_by.insert(field.name.clone(), variant.name.clone());
                    fields.push(field);
                }
                Some(existing) => {
                    if existing.ty != field.ty || existing.is_list != field.is_list {
                        let left = introduced_by
                            .get(&field.name)
                            .cloned()
                            .unwrap_or_else(|| base.to_string());
                        return Err(CoreError::SchemaIncompatibility {
                            left,
                            right: variant.name.clone(),
                            field: field.name.clone(),
                            detail: format!(
                                "{}{} vs {}{}",
                                existing.ty,
                                if existing.is_list { "[]" } else { "" },
                                field.ty,
                                if field.is_list { "[]" } else { "" },
                            ),
                        });
                    }
                    existing.nullable |= field.nullable;
                }
            }
        }
    }

    Ok(TypeDefinition {
        name: base.to_string(),
        kind: TypeKind::Input,
        fields,
        source_entity,
    })
}
