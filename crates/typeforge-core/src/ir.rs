//! Intermediate representation for generated type definitions
//!
//! Definitions reference each other by name only. A [`DefinitionSet`] is an
//! arena keyed by name, so rewriting a reference is a key substitution rather
//! than a graph edit, and mutually recursive types need no special handling.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Scalar kinds understood by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Boolean,
    DateTime,
    BigInt,
    Decimal,
    Bytes,
    Json,
}

impl ScalarKind {
    /// Numeric scalars are the ones that support atomic update operations
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ScalarKind::Int | ScalarKind::Float | ScalarKind::BigInt | ScalarKind::Decimal
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::DateTime => "DateTime",
            ScalarKind::BigInt => "BigInt",
            ScalarKind::Decimal => "Decimal",
            ScalarKind::Bytes => "Bytes",
            ScalarKind::Json => "Json",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic type of a field
///
/// `Union` models fields that accept either a literal or an operation object.
/// Members of a union are never unions themselves; use [`TypeRef::union`] to
/// build one so that nesting, duplicates and singletons are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TypeRef {
    Scalar(ScalarKind),
    Enum(String),
    Type(String),
    Union(Vec<TypeRef>),
}

impl TypeRef {
    pub fn scalar(kind: ScalarKind) -> Self {
        TypeRef::Scalar(kind)
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Type(name.into())
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        TypeRef::Enum(name.into())
    }

    /// Build a normalized union: nested unions are flattened, duplicate members
    /// dropped (first occurrence wins) and a singleton collapses to its member.
    pub fn union(members: impl IntoIterator<Item = TypeRef>) -> Self {
        let mut flat: Vec<TypeRef> = Vec::new();
        for member in members {
            match member {
                TypeRef::Union(inner) => {
                    for nested in inner {
                        if !flat.contains(&nested) {
                            flat.push(nested);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }

        if flat.len() == 1 {
            flat.remove(0)
        } else {
            TypeRef::Union(flat)
        }
    }

    /// The leaves of this reference: union members, or the reference itself
    pub fn members(&self) -> &[TypeRef] {
        match self {
            TypeRef::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        match self {
            TypeRef::Type(name) => Some(name),
            _ => None,
        }
    }

    pub fn enum_name(&self) -> Option<&str> {
        match self {
            TypeRef::Enum(name) => Some(name),
            _ => None,
        }
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            TypeRef::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Names of type definitions referenced by any leaf
    pub fn referenced_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.members().iter().filter_map(TypeRef::type_name)
    }

    pub fn references_type(&self, name: &str) -> bool {
        self.referenced_types().any(|n| n == name)
    }

    /// Rewrite every leaf. `rewrite` returns the replacement for a leaf, or
    /// `None` to keep it. Unions are re-normalized afterwards.
    pub fn map_leaves<F>(&self, rewrite: &mut F) -> TypeRef
    where
        F: FnMut(&TypeRef) -> Option<TypeRef>,
    {
        match self {
            TypeRef::Union(members) => TypeRef::union(
                members
                    .iter()
                    .map(|member| rewrite(member).unwrap_or_else(|| member.clone())),
            ),
            leaf => rewrite(leaf).unwrap_or_else(|| leaf.clone()),
        }
    }

    /// Substitute type and enum names through a rename table
    pub fn renamed(&self, table: &RenameTable) -> TypeRef {
        if table.is_empty() {
            return self.clone();
        }
        self.map_leaves(&mut |leaf| match leaf {
            TypeRef::Type(name) => table.get(name).map(TypeRef::named),
            TypeRef::Enum(name) => table.get(name).map(TypeRef::enumeration),
            _ => None,
        })
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(kind) => write!(f, "{}", kind),
            TypeRef::Enum(name) | TypeRef::Type(name) => f.write_str(name),
            TypeRef::Union(members) => {
                let rendered: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                f.write_str(&rendered.join(" | "))
            }
        }
    }
}

/// A single field of a type definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub is_list: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            is_list: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn renamed(mut self, table: &RenameTable) -> Self {
        self.ty = self.ty.renamed(table);
        self
    }
}

/// Kind tag of a type definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Model,
    Input,
    Output,
}

impl TypeKind {
    pub const ALL: [TypeKind; 3] = [TypeKind::Model, TypeKind::Input, TypeKind::Output];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Model => "model",
            TypeKind::Input => "input",
            TypeKind::Output => "output",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            TypeKind::Model => "models",
            TypeKind::Input => "inputs",
            TypeKind::Output => "outputs",
        }
    }

    /// Conventional name suffix for this kind (`UserWhereInput`)
    pub fn name_suffix(self) -> Option<&'static str> {
        match self {
            TypeKind::Model => None,
            TypeKind::Input => Some("Input"),
            TypeKind::Output => Some("Output"),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Originating entity, used for output grouping. `None` marks a shared type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_entity: Option<String>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
            source_entity: None,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_source(mut self, entity: impl Into<String>) -> Self {
        self.source_entity = Some(entity.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of every type definition this definition's fields point at
    pub fn referenced_types(&self) -> BTreeSet<&str> {
        self.fields
            .iter()
            .flat_map(|f| f.ty.referenced_types())
            .collect()
    }

    fn renamed_fields(self, table: &RenameTable) -> Self {
        let fields = self.fields.into_iter().map(|f| f.renamed(table)).collect();
        Self { fields, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDefinition {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl EnumDefinition {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A field-level reference from one definition to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    pub from_type: &'a str,
    pub field: &'a str,
    pub target: &'a TypeRef,
}

/// The complete, name-keyed collection of definitions flowing through the pipeline
///
/// Type and enum names share one namespace. Iteration is in lexical name
/// order, which is the traversal order every "first seen" rule relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DefinitionSetRepr", into = "DefinitionSetRepr")]
pub struct DefinitionSet {
    types: BTreeMap<String, TypeDefinition>,
    enums: BTreeMap<String, EnumDefinition>,
}

#[derive(Serialize, Deserialize)]
struct DefinitionSetRepr {
    #[serde(default)]
    types: Vec<TypeDefinition>,
    #[serde(default)]
    enums: Vec<EnumDefinition>,
}

impl TryFrom<DefinitionSetRepr> for DefinitionSet {
    type Error = CoreError;

    fn try_from(repr: DefinitionSetRepr) -> Result<Self, Self::Error> {
        DefinitionSet::from_parts(repr.types, repr.enums)
    }
}

impl From<DefinitionSet> for DefinitionSetRepr {
    fn from(set: DefinitionSet) -> Self {
        Self {
            types: set.types.into_values().collect(),
            enums: set.enums.into_values().collect(),
        }
    }
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, rejecting any name claimed twice
    pub fn from_parts(
        types: impl IntoIterator<Item = TypeDefinition>,
        enums: impl IntoIterator<Item = EnumDefinition>,
    ) -> CoreResult<Self> {
        let mut set = Self::new();
        for def in types {
            set.insert_type(def)?;
        }
        for def in enums {
            set.insert_enum(def)?;
        }
        Ok(set)
    }

    /// Assemble a set from maps produced by a pass. The orchestrator checks
    /// the invariants afterwards.
    pub(crate) fn from_maps(
        types: BTreeMap<String, TypeDefinition>,
        enums: BTreeMap<String, EnumDefinition>,
    ) -> Self {
        Self { types, enums }
    }

    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<String, TypeDefinition>,
        BTreeMap<String, EnumDefinition>,
    ) {
        (self.types, self.enums)
    }

    pub fn insert_type(&mut self, def: TypeDefinition) -> CoreResult<()> {
        if self.contains_name(&def.name) {
            return Err(CoreError::collision(
                def.name.clone(),
                format!("existing {}", def.name),
                format!("{} {}", def.kind, def.name),
            ));
        }
        self.types.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn insert_enum(&mut self, def: EnumDefinition) -> CoreResult<()> {
        if self.contains_name(&def.name) {
            return Err(CoreError::collision(
                def.name.clone(),
                format!("existing {}", def.name),
                format!("enum {}", def.name),
            ));
        }
        self.enums.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumDefinition> {
        self.enums.get(name)
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn contains_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// Whether the name is taken by a type or an enum
    pub fn contains_name(&self, name: &str) -> bool {
        self.contains_type(name) || self.contains_enum(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDefinition> {
        self.enums.values()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.enums.is_empty()
    }

    /// Every field-level reference leaf in the set, in traversal order
    pub fn references(&self) -> impl Iterator<Item = Reference<'_>> {
        self.types.values().flat_map(|def| {
            def.fields.iter().flat_map(move |field| {
                field.ty.members().iter().map(move |target| Reference {
                    from_type: &def.name,
                    field: &field.name,
                    target,
                })
            })
        })
    }

    /// Rewrite every reference through the table, leaving definition names alone
    pub fn rewrite_references(self, table: &RenameTable) -> Self {
        if table.is_empty() {
            return self;
        }
        let types = self
            .types
            .into_iter()
            .map(|(name, def)| (name, def.renamed_fields(table)))
            .collect();
        Self {
            types,
            enums: self.enums,
        }
    }

    /// Rename definitions and every reference to them in one application
    ///
    /// Entries whose source name is absent are skipped, which makes a second
    /// application with the same table a no-op. A target that already names
    /// another definition is a collision.
    pub fn apply_renames(self, table: &RenameTable) -> CoreResult<Self> {
        table.ensure_injective()?;
        table.ensure_acyclic()?;

        for (old, new) in table.iter() {
            if !self.contains_name(old) {
                continue;
            }
            if self.contains_name(new) {
                return Err(CoreError::collision(new, old, new));
            }
        }

        let types = self
            .types
            .into_values()
            .map(|def| {
                let mut def = def.renamed_fields(table);
                if let Some(new) = table.get(&def.name) {
                    def.name = new.to_string();
                }
                (def.name.clone(), def)
            })
            .collect();

        let enums = self
            .enums
            .into_values()
            .map(|mut def| {
                if let Some(new) = table.get(&def.name) {
                    def.name = new.to_string();
                }
                (def.name.clone(), def)
            })
            .collect();

        Ok(Self { types, enums })
    }

    /// Every reference that does not resolve, in traversal order
    pub fn dangling_references(&self) -> Vec<CoreError> {
        self.references()
            .filter_map(|r| match r.target {
                TypeRef::Type(name) if !self.contains_type(name) => {
                    Some(CoreError::dangling(r.from_type, r.field, name.as_str()))
                }
                TypeRef::Enum(name) if !self.contains_enum(name) => {
                    Some(CoreError::dangling(r.from_type, r.field, name.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    /// Check the set-level invariants: consistent keys, one namespace for
    /// types and enums, unique field names, normalized unions and no
    /// dangling reference.
    pub fn validate(&self) -> CoreResult<()> {
        for (key, def) in &self.types {
            if key != &def.name {
                return Err(CoreError::InvalidDefinition(format!(
                    "type keyed as '{}' is named '{}'",
                    key, def.name
                )));
            }

            let mut seen = BTreeSet::new();
            for field in &def.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(CoreError::InvalidDefinition(format!(
                        "field '{}' declared twice in '{}'",
                        field.name, def.name
                    )));
                }
                if let TypeRef::Union(members) = &field.ty {
                    if members.len() < 2
                        || members.iter().any(|m| matches!(m, TypeRef::Union(_)))
                    {
                        return Err(CoreError::InvalidDefinition(format!(
                            "field '{}.{}' has a non-normalized union",
                            def.name, field.name
                        )));
                    }
                }
            }
        }

        for (key, def) in &self.enums {
            if key != &def.name {
                return Err(CoreError::InvalidDefinition(format!(
                    "enum keyed as '{}' is named '{}'",
                    key, def.name
                )));
            }
            if self.types.contains_key(key) {
                return Err(CoreError::collision(
                    key.as_str(),
                    format!("type {}", key),
                    format!("enum {}", key),
                ));
            }
        }

        match self.dangling_references().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Old-name to new-name substitution table
///
/// Lookups are single-step, so a name is never substituted twice within one
/// application. Several sources may share a target when the table folds
/// variants together; [`RenameTable::ensure_injective`] rejects that for
/// plain renames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameTable {
    entries: BTreeMap<String, String>,
}

impl RenameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) -> CoreResult<()> {
        let old = old.into();
        let new = new.into();
        if old == new {
            return Err(CoreError::ConfigurationConflict(format!(
                "rename of '{}' maps the name to itself",
                old
            )));
        }
        if let Some(existing) = self.entries.get(&old) {
            if existing != &new {
                return Err(CoreError::ConfigurationConflict(format!(
                    "'{}' is renamed to both '{}' and '{}'",
                    old, existing, new
                )));
            }
        }
        self.entries.insert(old, new);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Reject chains (`A -> B`, `B -> C`), which would make application order matter
    pub fn ensure_acyclic(&self) -> CoreResult<()> {
        for (old, new) in &self.entries {
            if self.entries.contains_key(new) {
                return Err(CoreError::ConfigurationConflict(format!(
                    "rename target '{}' (from '{}') is itself renamed",
                    new, old
                )));
            }
        }
        Ok(())
    }

    /// Reject two sources mapping onto the same target
    pub fn ensure_injective(&self) -> CoreResult<()> {
        let mut targets: BTreeMap<&str, &str> = BTreeMap::new();
        for (old, new) in &self.entries {
            if let Some(previous) = targets.insert(new, old) {
                return Err(CoreError::collision(new.as_str(), previous, old.as_str()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn where_input(name: &str, other: &str) -> TypeDefinition {
        TypeDefinition::new(name, TypeKind::Input)
            .with_field(Field::new("id", TypeRef::scalar(ScalarKind::Int)))
            .with_field(Field::new("other", TypeRef::named(other)).nullable())
    }

    #[test]
    fn test_union_normalization() {
        let int = TypeRef::scalar(ScalarKind::Int);
        let ops = TypeRef::named("IntFieldUpdateOperationsInput");

        let nested = TypeRef::union([
            int.clone(),
            TypeRef::Union(vec![ops.clone(), int.clone()]),
        ]);
        assert_eq!(nested, TypeRef::Union(vec![int.clone(), ops.clone()]));

        let singleton = TypeRef::union([int.clone(), int.clone()]);
        assert_eq!(singleton, int);
    }

    #[test]
    fn test_map_leaves_collapses_union() {
        let ty = TypeRef::union([
            TypeRef::named("IntFieldUpdateOperationsInput"),
            TypeRef::scalar(ScalarKind::Int),
        ]);

        let stripped = ty.map_leaves(&mut |leaf| match leaf {
            TypeRef::Type(_) => Some(TypeRef::scalar(ScalarKind::Int)),
            _ => None,
        });
        assert_eq!(stripped, TypeRef::scalar(ScalarKind::Int));
    }

    #[test]
    fn test_from_parts_rejects_shared_name() {
        let result = DefinitionSet::from_parts(
            vec![TypeDefinition::new("Role", TypeKind::Model)],
            vec![EnumDefinition::new("Role", ["ADMIN", "USER"])],
        );
        assert!(matches!(result, Err(CoreError::NamingCollision { .. })));
    }

    #[test]
    fn test_validate_reports_dangling_reference() {
        let types = vec![where_input("UserWhereInput", "PostWhereInput")];
        let set = DefinitionSet::from_parts(types, vec![]).unwrap();

        match set.validate() {
            Err(CoreError::DanglingReference {
                from_type,
                field,
                target,
            }) => {
                assert_eq!(from_type, "UserWhereInput");
                assert_eq!(field, "other");
                assert_eq!(target, "PostWhereInput");
            }
            other => panic!("expected dangling reference, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_mutual_recursion() {
        let set = DefinitionSet::from_parts(
            vec![
                where_input("UserWhereInput", "PostWhereInput"),
                where_input("PostWhereInput", "UserWhereInput"),
            ],
            vec![],
        )
        .unwrap();
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_apply_renames_rewrites_definitions_and_references() {
        let set = DefinitionSet::from_parts(
            vec![
                where_input("UserWhereInput", "PostWhereInput"),
                where_input("PostWhereInput", "UserWhereInput"),
            ],
            vec![],
        )
        .unwrap();

        let mut table = RenameTable::new();
        table.insert("PostWhereInput", "ArticleWhereInput").unwrap();

        let renamed = set.apply_renames(&table).unwrap();
        assert!(renamed.contains_type("ArticleWhereInput"));
        assert!(!renamed.contains_type("PostWhereInput"));
        assert_eq!(
            renamed.get_type("UserWhereInput").unwrap().field("other").unwrap().ty,
            TypeRef::named("ArticleWhereInput")
        );
        assert!(renamed.validate().is_ok());
    }

    #[test]
    fn test_rename_table_rejects_chains_and_merges() {
        let mut chain = RenameTable::new();
        chain.insert("A", "B").unwrap();
        chain.insert("B", "C").unwrap();
        assert!(chain.ensure_acyclic().is_err());

        let mut merge = RenameTable::new();
        merge.insert("A", "C").unwrap();
        merge.insert("B", "C").unwrap();
        assert!(merge.ensure_acyclic().is_ok());
        assert!(matches!(
            merge.ensure_injective(),
            Err(CoreError::NamingCollision { .. })
        ));

        assert!(RenameTable::new().insert("A", "A").is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let set = DefinitionSet::from_parts(
            vec![
                where_input("UserWhereInput", "PostWhereInput"),
                where_input("PostWhereInput", "UserWhereInput"),
            ],
            vec![EnumDefinition::new("Role", ["ADMIN"])],
        )
        .unwrap();

        let json = serde_json::to_string(&set).unwrap();
        let back: DefinitionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert_eq!(
            back.type_names().collect::<Vec<_>>(),
            vec!["PostWhereInput", "UserWhereInput"]
        );
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"{"types":[{"name":"User","kind":"model"},{"name":"User","kind":"model"}]}"#;
        assert!(serde_json::from_str::<DefinitionSet>(json).is_err());
    }
}
