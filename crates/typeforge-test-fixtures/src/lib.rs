//! Test fixtures for typeforge
//!
//! Provides small, representative definition sets shaped like what the
//! schema layer hands the generator, without storing generated outputs.

use std::fs;
use std::path::{Path, PathBuf};

use typeforge_core::{
    DefinitionSet, EnumDefinition, Field, ScalarKind, TypeDefinition, TypeKind, TypeRef,
};

/// Fixture categories that can be written to disk
pub enum FixtureType {
    /// Two related entities with filters, update operations and enums
    Blog,
    /// `StringFilter` and `NullableStringFilter` only
    FilterVariants,
    /// `Zoo`, `Zoo2` and a model pointing at `Zoo`
    Zoo,
}

/// Writes fixtures into a temporary directory that lives as long as this value
pub struct TestFixtures {
    temp_dir: Option<tempfile::TempDir>,
}

impl Default for TestFixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixtures {
    pub fn new() -> Self {
        Self { temp_dir: None }
    }

    /// Create a temporary directory holding `definitions.json`
    pub fn setup(&mut self, fixture_type: FixtureType) -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();

        let set = match fixture_type {
            FixtureType::Blog => blog_schema(),
            FixtureType::FilterVariants => string_filter_variants(),
            FixtureType::Zoo => zoo_schema(),
        };
        write_definitions(&path, &set);

        self.temp_dir = Some(dir);
        path
    }

    /// Write a `typeforge.toml` next to the definitions
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let dir = self
            .temp_dir
            .as_ref()
            .expect("setup() must be called before write_config()");
        let path = dir.path().join("typeforge.toml");
        fs::write(&path, contents).unwrap();
        path
    }
}

fn write_definitions(base: &Path, set: &DefinitionSet) {
    let json = serde_json::to_string_pretty(set).unwrap();
    fs::write(base.join("definitions.json"), json).unwrap();
}

fn scalar(kind: ScalarKind) -> TypeRef {
    TypeRef::scalar(kind)
}

fn opt(name: &str, ty: TypeRef) -> Field {
    Field::new(name, ty).nullable()
}

fn input(name: &str) -> TypeDefinition {
    TypeDefinition::new(name, TypeKind::Input)
}

/// `equals`/`in`/`not` filter over a scalar, with `not` pointing at `nested`
fn scalar_filter(name: &str, leaf: TypeRef, nested: &str) -> TypeDefinition {
    input(name)
        .with_field(opt("equals", leaf.clone()))
        .with_field(opt("in", leaf.clone()).list())
        .with_field(opt("not", TypeRef::union([TypeRef::named(nested), leaf])))
}

fn string_filter(name: &str, nested: &str) -> TypeDefinition {
    scalar_filter(name, scalar(ScalarKind::String), nested)
        .with_field(opt("contains", scalar(ScalarKind::String)))
}

fn int_filter(name: &str, nested: &str) -> TypeDefinition {
    scalar_filter(name, scalar(ScalarKind::Int), nested)
        .with_field(opt("lt", scalar(ScalarKind::Int)))
        .with_field(opt("gt", scalar(ScalarKind::Int)))
}

fn update_operations(name: &str, kind: ScalarKind, nullable: bool) -> TypeDefinition {
    let set = Field::new("set", scalar(kind));
    let set = if nullable { set.nullable() } else { set };
    ["increment", "decrement", "multiply", "divide"]
        .into_iter()
        .fold(input(name).with_field(set), |def, op| {
            def.with_field(opt(op, scalar(kind)))
        })
}

/// Blog schema: `User` and `Post` with the inputs a query layer generates
/// for them
///
/// Contains every shape the passes care about: nullable and nested filter
/// variants, atomic number operations, reserved root names (`Query`,
/// `Mutation`) and per-entity inputs that are structurally identical.
pub fn blog_schema() -> DefinitionSet {
    let role = TypeRef::enumeration("Role");
    let sort = TypeRef::enumeration("SortOrder");

    let types = vec![
        // Models
        TypeDefinition::new("User", TypeKind::Model)
            .with_source("User")
            .with_field(Field::new("id", scalar(ScalarKind::Int)))
            .with_field(Field::new("email", scalar(ScalarKind::String)))
            .with_field(opt("name", scalar(ScalarKind::String)))
            .with_field(Field::new("role", role.clone()))
            .with_field(Field::new("posts", TypeRef::named("Post")).list()),
        TypeDefinition::new("Post", TypeKind::Model)
            .with_source("Post")
            .with_field(Field::new("id", scalar(ScalarKind::Int)))
            .with_field(Field::new("title", scalar(ScalarKind::String)))
            .with_field(opt("content", scalar(ScalarKind::String)))
            .with_field(Field::new("views", scalar(ScalarKind::Int)))
            .with_field(opt("rating", scalar(ScalarKind::Float)))
            .with_field(Field::new("author", TypeRef::named("User")))
            .with_field(Field::new("authorId", scalar(ScalarKind::Int))),
        // Root operations
        TypeDefinition::new("Query", TypeKind::Output)
            .with_field(Field::new("users", TypeRef::named("User")).list())
            .with_field(Field::new("posts", TypeRef::named("Post")).list())
            .with_field(opt("post", TypeRef::named("Post"))),
        TypeDefinition::new("Mutation", TypeKind::Output)
            .with_field(Field::new("createOnePost", TypeRef::named("Post")))
            .with_field(opt("updateOnePost", TypeRef::named("Post"))),
        // Scalar filters and their variants
        string_filter("StringFilter", "NestedStringFilter")
            .with_field(opt("mode", TypeRef::enumeration("QueryMode"))),
        string_filter("NestedStringFilter", "NestedStringFilter"),
        string_filter("StringNullableFilter", "NestedStringNullableFilter"),
        string_filter("NestedStringNullableFilter", "NestedStringNullableFilter"),
        int_filter("IntFilter", "NestedIntFilter"),
        int_filter("NestedIntFilter", "NestedIntFilter"),
        scalar_filter(
            "FloatNullableFilter",
            scalar(ScalarKind::Float),
            "NestedFloatNullableFilter",
        ),
        scalar_filter(
            "NestedFloatNullableFilter",
            scalar(ScalarKind::Float),
            "NestedFloatNullableFilter",
        ),
        scalar_filter("EnumRoleFilter", role.clone(), "NestedEnumRoleFilter"),
        scalar_filter("NestedEnumRoleFilter", role.clone(), "NestedEnumRoleFilter"),
        // Where inputs
        input("UserWhereInput")
            .with_source("User")
            .with_field(opt("AND", TypeRef::named("UserWhereInput")).list())
            .with_field(opt("id", TypeRef::named("IntFilter")))
            .with_field(opt("email", TypeRef::named("StringFilter")))
            .with_field(opt("name", TypeRef::named("StringNullableFilter")))
            .with_field(opt("role", TypeRef::named("EnumRoleFilter")))
            .with_field(opt("posts", TypeRef::named("PostListRelationFilter"))),
        input("PostWhereInput")
            .with_source("Post")
            .with_field(opt("AND", TypeRef::named("PostWhereInput")).list())
            .with_field(opt("id", TypeRef::named("IntFilter")))
            .with_field(opt("title", TypeRef::named("StringFilter")))
            .with_field(opt("content", TypeRef::named("StringNullableFilter")))
            .with_field(opt("rating", TypeRef::named("FloatNullableFilter")))
            .with_field(opt("author", TypeRef::named("UserRelationFilter"))),
        input("PostListRelationFilter")
            .with_source("Post")
            .with_field(opt("every", TypeRef::named("PostWhereInput")))
            .with_field(opt("some", TypeRef::named("PostWhereInput")))
            .with_field(opt("none", TypeRef::named("PostWhereInput"))),
        input("UserRelationFilter")
            .with_source("User")
            .with_field(opt("is", TypeRef::named("UserWhereInput")))
            .with_field(opt("isNot", TypeRef::named("UserWhereInput"))),
        input("UserWhereUniqueInput")
            .with_source("User")
            .with_field(opt("id", scalar(ScalarKind::Int))),
        input("PostWhereUniqueInput")
            .with_source("Post")
            .with_field(opt("id", scalar(ScalarKind::Int))),
        // Ordering
        input("UserCountOrderByAggregateInput")
            .with_source("User")
            .with_field(opt("id", sort.clone())),
        input("PostCountOrderByAggregateInput")
            .with_source("Post")
            .with_field(opt("id", sort)),
        // Updates
        update_operations("IntFieldUpdateOperationsInput", ScalarKind::Int, false),
        update_operations("NullableFloatFieldUpdateOperationsInput", ScalarKind::Float, true),
        input("StringFieldUpdateOperationsInput")
            .with_field(opt("set", scalar(ScalarKind::String))),
        input("PostUpdateInput")
            .with_source("Post")
            .with_field(opt(
                "title",
                TypeRef::union([
                    scalar(ScalarKind::String),
                    TypeRef::named("StringFieldUpdateOperationsInput"),
                ]),
            ))
            .with_field(opt(
                "views",
                TypeRef::union([
                    scalar(ScalarKind::Int),
                    TypeRef::named("IntFieldUpdateOperationsInput"),
                ]),
            ))
            .with_field(opt(
                "rating",
                TypeRef::union([
                    scalar(ScalarKind::Float),
                    TypeRef::named("NullableFloatFieldUpdateOperationsInput"),
                ]),
            )),
    ];

    let enums = vec![
        EnumDefinition::new("Role", ["USER", "ADMIN"]),
        EnumDefinition::new("SortOrder", ["asc", "desc"]),
        EnumDefinition::new("QueryMode", ["default", "insensitive"]),
    ];

    DefinitionSet::from_parts(types, enums).unwrap()
}

/// `StringFilter` plus its `NullableStringFilter` variant, and a where input using both
pub fn string_filter_variants() -> DefinitionSet {
    let types = vec![
        string_filter("StringFilter", "StringFilter"),
        string_filter("NullableStringFilter", "NullableStringFilter"),
        input("UserWhereInput")
            .with_source("User")
            .with_field(opt("email", TypeRef::named("StringFilter")))
            .with_field(opt("name", TypeRef::named("NullableStringFilter"))),
    ];
    DefinitionSet::from_parts(types, vec![]).unwrap()
}

/// `Zoo` and an existing `Zoo2`, so renaming `Zoo` to `Zoo2` collides
pub fn zoo_schema() -> DefinitionSet {
    let types = vec![
        TypeDefinition::new("Zoo", TypeKind::Model)
            .with_source("Zoo")
            .with_field(Field::new("id", scalar(ScalarKind::Int))),
        TypeDefinition::new("Zoo2", TypeKind::Model)
            .with_source("Zoo2")
            .with_field(Field::new("id", scalar(ScalarKind::Int))),
        TypeDefinition::new("Animal", TypeKind::Model)
            .with_source("Animal")
            .with_field(Field::new("home", TypeRef::named("Zoo"))),
    ];
    DefinitionSet::from_parts(types, vec![]).unwrap()
}

/// A single model with one scalar field
pub fn single_model(name: &str) -> DefinitionSet {
    let model = TypeDefinition::new(name, TypeKind::Model)
        .with_source(name)
        .with_field(Field::new("id", scalar(ScalarKind::Int)));
    DefinitionSet::from_parts(vec![model], vec![]).unwrap()
}
