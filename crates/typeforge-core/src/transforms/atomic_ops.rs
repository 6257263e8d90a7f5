//! Replace atomic number update operation types with their plain scalar
//!
//! An update input such as `IntFieldUpdateOperationsInput` carries `set` plus
//! arithmetic operations. When the generator is told not to expose those
//! operations, every field accepting the operations type accepts the scalar
//! that `set` carries instead, and the operations type goes away.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::error::CoreResult;
use crate::ir::{DefinitionSet, Field, TypeDefinition, TypeKind, TypeRef};

const SET_FIELD: &str = "set";
const ARITHMETIC_FIELDS: &[&str] = &["increment", "decrement", "multiply", "divide"];

/// The `set` field of an atomic operations type, or `None` if `def` is not one
///
/// Detection is structural: an input whose fields are `set` plus at least one
/// arithmetic operation and nothing else, where `set` carries a single
/// numeric scalar.
pub fn atomic_set_field(def: &TypeDefinition) -> Option<&Field> {
    if def.kind != TypeKind::Input {
        return None;
    }

    let only_operations = def
        .fields
        .iter()
        .all(|f| f.name == SET_FIELD || ARITHMETIC_FIELDS.contains(&f.name.as_str()));
    let has_arithmetic = def
        .fields
        .iter()
        .any(|f| ARITHMETIC_FIELDS.contains(&f.name.as_str()));
    if !only_operations || !has_arithmetic {
        return None;
    }

    let set = def.field(SET_FIELD)?;
    match set.ty {
        TypeRef::Scalar(kind) if kind.is_numeric() && !set.is_list => Some(set),
        _ => None,
    }
}

pub fn strip_atomic_operations(set: DefinitionSet) -> CoreResult<DefinitionSet> {
    let replacements: BTreeMap<String, Field> = set
        .types()
        .filter_map(|def| atomic_set_field(def).map(|f| (def.name.clone(), f.clone())))
        .collect();

    if replacements.is_empty() {
        debug!("No atomic operation types found");
        return Ok(set);
    }

    let (types, enums) = set.into_parts();
    let mut types: BTreeMap<_, _> = types
        .into_iter()
        .map(|(name, mut def)| {
            if !replacements.contains_key(&name) {
                def.fields = def
                    .fields
                    .into_iter()
                    .map(|field| strip_field(field, &replacements))
                    .collect();
            }
            (name, def)
        })
        .collect();

    // Only delete what nothing surviving still points at.
    let mut removable: BTreeSet<String> = replacements.keys().cloned().collect();
    loop {
        let pinned: Vec<String> = removable
            .iter()
            .filter(|candidate| {
                types
                    .values()
                    .filter(|def| !removable.contains(&def.name))
                    .any(|def| def.fields.iter().any(|f| f.ty.references_type(candidate)))
            })
            .cloned()
            .collect();
        if pinned.is_empty() {
            break;
        }
        for name in pinned {
            warn!("Keeping atomic operations type {}: still referenced", name);
            removable.remove(&name);
        }
    }

    for name in &removable {
        types.remove(name);
        debug!("Removed atomic operations type {}", name);
    }

    info!("Stripped {} atomic operation type(s)", removable.len());
    Ok(DefinitionSet::from_maps(types, enums))
}

/// Point a field at the scalar instead of the operations type
///
/// The field becomes nullable when either it or the replaced `set` was.
fn strip_field(field: Field, replacements: &BTreeMap<String, Field>) -> Field {
    let mut nullable = field.nullable;
    let ty = field.ty.map_leaves(&mut |leaf| {
        let set_field = replacements.get(leaf.type_name()?)?;
        nullable |= set_field.nullable;
        Some(set_field.ty.clone())
    });
    Field {
        ty,
        nullable,
        ..field
    }
}
