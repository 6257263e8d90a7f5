//! Structural deduplication of type definitions
//!
//! Two definitions are duplicates when they have the same kind and the same
//! fields (name, nullability, list cardinality, type) where references to
//! other definitions are compared up to the same equivalence. Recursive and
//! mutually recursive types are handled by partition refinement: start with
//! every definition grouped by its shape, ignoring which type a reference
//! points at, then keep splitting classes whose members point into different
//! classes until the partition stops changing. Union members that land in
//! one class count once, matching the union they collapse into.
//!
//! Each class folds into its lexically smallest member. Iteration over a
//! [`DefinitionSet`] is lexical, so that is also the first member seen.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use tracing::{debug, info};

use crate::config::DedupMode;
use crate::error::{CoreError, CoreResult};
use crate::ir::{DefinitionSet, RenameTable, ScalarKind, TypeDefinition, TypeKind, TypeRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupOutcome {
    pub set: DefinitionSet,
    /// Removed definition -> canonical survivor
    pub folded: RenameTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LeafKey {
    Scalar(ScalarKind),
    Enum(String),
    /// Class of the referenced definition
    Type(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FieldKey {
    name: String,
    nullable: bool,
    is_list: bool,
    leaves: Vec<LeafKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ShapeKey {
    kind: TypeKind,
    /// Definitions outside the dedup scope are keyed by their own index so
    /// they always stay in a class of their own.
    pinned: Option<usize>,
    fields: Vec<FieldKey>,
}

pub fn deduplicate_types(set: DefinitionSet, mode: DedupMode) -> CoreResult<DedupOutcome> {
    let folded = fold_table(&set, mode)?;
    if folded.is_empty() {
        debug!("No structural duplicates found");
        return Ok(DedupOutcome { set, folded });
    }

    for (duplicate, canonical) in folded.iter() {
        debug!("Folding {} into {}", duplicate, canonical);
    }

    let (mut types, enums) = set.into_parts();
    for (duplicate, _) in folded.iter() {
        types.remove(duplicate);
    }
    let set = DefinitionSet::from_maps(types, enums).rewrite_references(&folded);

    info!(
        "Removed {} duplicate definition(s), {} remaining",
        folded.len(),
        set.type_count()
    );
    Ok(DedupOutcome { set, folded })
}

/// Duplicate -> canonical name for every non-canonical member of a class
pub fn fold_table(set: &DefinitionSet, mode: DedupMode) -> CoreResult<RenameTable> {
    let mut table = RenameTable::new();
    if mode == DedupMode::None {
        return Ok(table);
    }

    let defs: Vec<&TypeDefinition> = set.types().collect();
    let classes = equivalence_classes(&defs, mode)?;

    let mut members: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    for (def, class) in defs.iter().zip(&classes) {
        members.entry(*class).or_default().push(def.name.as_str());
    }

    for names in members.values() {
        if let Some((canonical, duplicates)) = names.split_first() {
            for duplicate in duplicates {
                table.insert(*duplicate, *canonical)?;
            }
        }
    }
    Ok(table)
}

/// Class index per definition, aligned with `defs`
fn equivalence_classes(defs: &[&TypeDefinition], mode: DedupMode) -> CoreResult<Vec<usize>> {
    let index: HashMap<&str, usize> = defs
        .iter()
        .enumerate()
        .map(|(i, def)| (def.name.as_str(), i))
        .collect();

    let initial: Vec<ShapeKey> = defs
        .iter()
        .enumerate()
        .map(|(i, def)| shape_key(i, def, mode, |_| Some(0), &index))
        .collect::<CoreResult<_>>()?;
    let (mut classes, mut count) = number_keys(&initial);

    let mut rounds = 0usize;
    loop {
        rounds += 1;
        let refined: Vec<(usize, ShapeKey)> = defs
            .iter()
            .enumerate()
            .map(|(i, def)| {
                let key = shape_key(i, def, mode, |target| Some(classes[target]), &index)?;
                Ok::<_, CoreError>((classes[i], key))
            })
            .collect::<CoreResult<_>>()?;
        let (next, next_count) = number_keys(&refined);
        classes = next;
        if next_count == count {
            break;
        }
        count = next_count;
    }

    debug!(
        "Partition refinement settled after {} round(s): {} class(es) for {} definition(s)",
        rounds,
        count,
        defs.len()
    );
    Ok(classes)
}

fn shape_key<F>(
    position: usize,
    def: &TypeDefinition,
    mode: DedupMode,
    class_of: F,
    index: &HashMap<&str, usize>,
) -> CoreResult<ShapeKey>
where
    F: Fn(usize) -> Option<usize>,
{
    let mut fields = Vec::with_capacity(def.fields.len());
    for field in &def.fields {
        let mut leaves = Vec::with_capacity(field.ty.members().len());
        for leaf in field.ty.members() {
            let key = match leaf {
                TypeRef::Scalar(kind) => LeafKey::Scalar(*kind),
                TypeRef::Enum(name) => LeafKey::Enum(name.clone()),
                TypeRef::Type(name) => {
                    let class = index
                        .get(name.as_str())
                        .and_then(|target| class_of(*target))
                        .ok_or_else(|| {
                            CoreError::dangling(&def.name, &field.name, name.as_str())
                        })?;
                    LeafKey::Type(class)
                }
                TypeRef::Union(_) => {
                    return Err(CoreError::InvalidDefinition(format!(
                        "field '{}.{}' has a nested union",
                        def.name, field.name
                    )))
                }
            };
            // Union members in one class collapse once folded.
            if !leaves.contains(&key) {
                leaves.push(key);
            }
        }
        fields.push(FieldKey {
            name: field.name.clone(),
            nullable: field.nullable,
            is_list: field.is_list,
            leaves,
        });
    }

    Ok(ShapeKey {
        kind: def.kind,
        pinned: (!mode.includes(def.kind)).then_some(position),
        fields,
    })
}

/// Number distinct keys in order of first appearance
fn number_keys<K: Eq + Hash + Clone>(keys: &[K]) -> (Vec<usize>, usize) {
    let mut ids: HashMap<K, usize> = HashMap::new();
    let numbered = keys
        .iter()
        .map(|key| {
            let next = ids.len();
            *ids.entry(key.clone()).or_insert(next)
        })
        .collect();
    (numbered, ids.len())
}
