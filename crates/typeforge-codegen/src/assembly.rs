//! Assemble the final definition set into a virtual file tree
//!
//! Assembly runs in phases, all before anything is handed to a renderer:
//!
//! 1. place every declaration at its rendered path (the symbol table),
//!    rejecting two declarations on one path unless the layout groups,
//! 2. reject paths that differ only by case,
//! 3. resolve every field reference to the file declaring it and record
//!    cross-file imports, collecting unresolved names in one batch,
//! 4. plan re-export indexes and verify the re-export graph.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use typeforge_core::{DefinitionSet, EnumDefinition, GeneratorConfig, TypeDefinition, TypeRef};

use crate::error::{BatchErrors, CodegenError, CodegenResult, ErrorEntry, ErrorLocation};
use crate::import_path::ImportPathCalculator;
use crate::index;
use crate::layout::Layout;

/// A type or enum placed into a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "declaration", rename_all = "lowercase")]
pub enum Declaration {
    Type(TypeDefinition),
    Enum(EnumDefinition),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Type(def) => &def.name,
            Declaration::Enum(def) => &def.name,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Declaration::Type(def) => def.kind.as_str(),
            Declaration::Enum(_) => "enum",
        }
    }

    pub fn kind_plural(&self) -> &'static str {
        match self {
            Declaration::Type(def) => def.kind.plural(),
            Declaration::Enum(_) => "enums",
        }
    }

    pub fn name_suffix(&self) -> Option<&'static str> {
        match self {
            Declaration::Type(def) => def.kind.name_suffix(),
            Declaration::Enum(_) => None,
        }
    }

    pub fn source_entity(&self) -> Option<&str> {
        match self {
            Declaration::Type(def) => def.source_entity.as_deref(),
            Declaration::Enum(_) => None,
        }
    }

    /// `(field, referenced name)` for every type and enum reference
    pub fn references(&self) -> Vec<(&str, &str)> {
        match self {
            Declaration::Type(def) => def
                .fields
                .iter()
                .flat_map(|field| {
                    field.ty.members().iter().filter_map(move |leaf| match leaf {
                        TypeRef::Type(name) | TypeRef::Enum(name) => {
                            Some((field.name.as_str(), name.as_str()))
                        }
                        _ => None,
                    })
                })
                .collect(),
            Declaration::Enum(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Declarations,
    /// Only re-exports other files
    Index,
}

/// One output file
///
/// `required_imports` and `re_exports` are keyed by target path; the
/// matching relative specifiers are in `specifiers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualFile {
    pub path: String,
    pub role: FileRole,
    pub exported_names: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<Declaration>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub required_imports: BTreeMap<String, BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub re_exports: BTreeMap<String, BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specifiers: BTreeMap<String, String>,
}

impl VirtualFile {
    pub fn declarations_file(path: impl Into<String>) -> Self {
        Self::empty(path, FileRole::Declarations)
    }

    pub fn index(path: impl Into<String>) -> Self {
        Self::empty(path, FileRole::Index)
    }

    fn empty(path: impl Into<String>, role: FileRole) -> Self {
        Self {
            path: path.into(),
            role,
            exported_names: BTreeSet::new(),
            declarations: Vec::new(),
            required_imports: BTreeMap::new(),
            re_exports: BTreeMap::new(),
            specifiers: BTreeMap::new(),
        }
    }

    pub fn is_index(&self) -> bool {
        self.role == FileRole::Index
    }

    pub fn declares(&self, name: &str) -> bool {
        self.declarations.iter().any(|d| d.name() == name)
    }
}

/// The assembled output: every file by path, plus where each name lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTree {
    pub files: BTreeMap<String, VirtualFile>,
    /// Declaration name -> declaring file
    pub symbols: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_index: Option<String>,
}

impl FileTree {
    pub fn get(&self, path: &str) -> Option<&VirtualFile> {
        self.files.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn declaration_files(&self) -> impl Iterator<Item = &VirtualFile> {
        self.files.values().filter(|f| !f.is_index())
    }

    pub fn index_files(&self) -> impl Iterator<Item = &VirtualFile> {
        self.files.values().filter(|f| f.is_index())
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            files: self.files.len(),
            declaration_files: self.declaration_files().count(),
            index_files: self.index_files().count(),
            declarations: self.symbols.len(),
            imports: self
                .files
                .values()
                .map(|f| f.required_imports.values().map(BTreeSet::len).sum::<usize>())
                .sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub files: usize,
    pub declaration_files: usize,
    pub index_files: usize,
    pub declarations: usize,
    pub imports: usize,
}

/// Assemble with the layout derived from `config`
pub fn assemble(set: &DefinitionSet, config: &GeneratorConfig) -> CodegenResult<FileTree> {
    let layout = Layout::from_config(config)?;
    assemble_with(set, &layout)
}

#[instrument(skip_all, fields(pattern = layout.pattern.as_str()))]
pub fn assemble_with(set: &DefinitionSet, layout: &Layout) -> CodegenResult<FileTree> {
    let mut tree = FileTree::default();

    let declarations = set
        .types()
        .cloned()
        .map(Declaration::Type)
        .chain(set.enums().cloned().map(Declaration::Enum));

    let grouping = layout.groups_declarations();
    for declaration in declarations {
        let path = layout.path_for(&declaration);
        let name = declaration.name().to_string();
        let file = tree
            .files
            .entry(path.clone())
            .or_insert_with(|| VirtualFile::declarations_file(path.as_str()));
        if !grouping {
            if let Some(existing) = file.declarations.first() {
                return Err(CodegenError::PathCollision {
                    path,
                    first: existing.name().to_string(),
                    second: name,
                });
            }
        }
        file.exported_names.insert(name.clone());
        file.declarations.push(declaration);
        tree.symbols.insert(name, path);
    }
    debug!(
        "Placed {} declaration(s) into {} file(s)",
        tree.symbols.len(),
        tree.files.len()
    );

    check_case_collisions(&tree)?;
    resolve_imports(&mut tree)?;

    tree.root_index = if layout.emit_single {
        Some(layout.index_file.clone())
    } else {
        index::plan_indexes(&mut tree.files, layout.re_export, &layout.index_file)?
    };
    check_case_collisions(&tree)?;
    index::verify(&tree)?;

    fill_specifiers(&mut tree, &ImportPathCalculator::new(layout.pattern.extension()));

    let stats = tree.stats();
    info!(
        "Assembled {} file(s): {} declaration file(s), {} index(es), {} import(s)",
        stats.files, stats.declaration_files, stats.index_files, stats.imports
    );
    Ok(tree)
}

/// Reject distinct paths that only differ by case
fn check_case_collisions(tree: &FileTree) -> CodegenResult<()> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    for path in tree.paths() {
        if let Some(first) = seen.insert(path.to_lowercase(), path) {
            return Err(CodegenError::PathCollision {
                path: path.to_lowercase(),
                first: first.to_string(),
                second: path.to_string(),
            });
        }
    }
    Ok(())
}

fn resolve_imports(tree: &mut FileTree) -> CodegenResult<()> {
    let mut errors = BatchErrors::new();

    for file in tree.files.values_mut() {
        errors.set_file_context(file.path.as_str());
        let mut imports: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for declaration in &file.declarations {
            errors.set_type_context(declaration.name());
            for (field, target) in declaration.references() {
                match tree.symbols.get(target) {
                    Some(path) if *path == file.path => {}
                    Some(path) => {
                        imports
                            .entry(path.clone())
                            .or_default()
                            .insert(target.to_string());
                    }
                    None => errors.add(
                        ErrorEntry::unresolved_symbol(target)
                            .at(ErrorLocation::new().in_field(field)),
                    ),
                }
            }
        }

        errors.clear_type_context();
        file.required_imports = imports;
    }

    errors.into_result()
}

fn fill_specifiers(tree: &mut FileTree, calculator: &ImportPathCalculator) {
    for file in tree.files.values_mut() {
        let targets: BTreeSet<&String> = file
            .required_imports
            .keys()
            .chain(file.re_exports.keys())
            .collect();
        file.specifiers = targets
            .into_iter()
            .map(|target| (target.clone(), calculator.calculate(&file.path, target)))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use typeforge_core::{Field, ReExport, ScalarKind, TypeKind};

    fn blog() -> DefinitionSet {
        DefinitionSet::from_parts(
            vec![
                TypeDefinition::new("User", TypeKind::Model)
                    .with_source("User")
                    .with_field(Field::new("id", TypeRef::scalar(ScalarKind::Int)))
                    .with_field(Field::new("role", TypeRef::enumeration("Role")))
                    .with_field(Field::new("posts", TypeRef::named("Post")).list()),
                TypeDefinition::new("Post", TypeKind::Model)
                    .with_source("Post")
                    .with_field(Field::new("author", TypeRef::named("User"))),
                TypeDefinition::new("PostWhereInput", TypeKind::Input)
                    .with_source("Post")
                    .with_field(Field::new(
                        "title",
                        TypeRef::union([
                            TypeRef::named("StringFilter"),
                            TypeRef::scalar(ScalarKind::String),
                        ]),
                    ))
                    .with_field(Field::new("AND", TypeRef::named("PostWhereInput")).list()),
                TypeDefinition::new("StringFilter", TypeKind::Input)
                    .with_field(Field::new("equals", TypeRef::scalar(ScalarKind::String))),
            ],
            vec![EnumDefinition::new("Role", ["USER", "ADMIN"])],
        )
        .unwrap()
    }

    #[test]
    fn test_default_layout_places_and_imports() {
        let tree = assemble(&blog(), &GeneratorConfig::default()).unwrap();

        assert_eq!(tree.symbols["User"], "user/user.model.ts");
        assert_eq!(tree.symbols["PostWhereInput"], "post/post-where.input.ts");
        assert_eq!(tree.symbols["StringFilter"], "prisma/string-filter.input.ts");
        assert_eq!(tree.symbols["Role"], "prisma/role.enum.ts");

        let user = tree.get("user/user.model.ts").unwrap();
        let expected: BTreeMap<String, BTreeSet<String>> = [
            ("post/post.model.ts".to_string(), BTreeSet::from(["Post".to_string()])),
            ("prisma/role.enum.ts".to_string(), BTreeSet::from(["Role".to_string()])),
        ]
        .into_iter()
        .collect();
        assert_eq!(user.required_imports, expected);
        assert_eq!(user.specifiers["post/post.model.ts"], "../post/post.model");

        // Self references never import.
        let where_input = tree.get("post/post-where.input.ts").unwrap();
        assert_eq!(
            where_input.required_imports.keys().collect::<Vec<_>>(),
            vec!["prisma/string-filter.input.ts"]
        );
    }

    #[test]
    fn test_grouped_pattern_shares_files() {
        let config = GeneratorConfig {
            output_file_pattern: "{model}.ts".to_string(),
            re_export: ReExport::None,
            ..Default::default()
        };
        let tree = assemble(&blog(), &config).unwrap();

        let post = tree.get("post.ts").unwrap();
        assert_eq!(
            post.exported_names.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Post", "PostWhereInput"]
        );
        assert!(post.declares("PostWhereInput"));
        assert_eq!(
            post.required_imports.keys().collect::<Vec<_>>(),
            vec!["prisma.ts", "user.ts"]
        );
        assert_eq!(tree.index_files().count(), 0);
    }

    #[test]
    fn test_emit_single_has_no_imports() {
        let config = GeneratorConfig {
            emit_single: true,
            ..Default::default()
        };
        let tree = assemble(&blog(), &config).unwrap();
        assert_eq!(tree.paths().collect::<Vec<_>>(), vec!["index.ts"]);
        assert_eq!(tree.root_index.as_deref(), Some("index.ts"));
        let only = tree.get("index.ts").unwrap();
        assert_eq!(only.declarations.len(), 5);
        assert!(only.required_imports.is_empty());
    }

    #[test]
    fn test_case_only_difference_is_a_collision() {
        let set = DefinitionSet::from_parts(
            vec![
                TypeDefinition::new("Post", TypeKind::Model).with_source("Post"),
                TypeDefinition::new("Audit", TypeKind::Model),
            ],
            vec![],
        )
        .unwrap();
        let config = GeneratorConfig {
            output_file_pattern: "{model}/{type}.ts".to_string(),
            shared_directory: "Post".to_string(),
            ..Default::default()
        };
        match assemble(&set, &config) {
            Err(CodegenError::PathCollision { first, second, .. }) => {
                assert_eq!(first, "Post/model.ts");
                assert_eq!(second, "post/model.ts");
            }
            other => panic!("expected path collision, got {:?}", other),
        }
    }

    #[test]
    fn test_declarations_sharing_a_name_path_collide() {
        let set = DefinitionSet::from_parts(
            vec![
                TypeDefinition::new("User", TypeKind::Model).with_source("User"),
                TypeDefinition::new("UserInput", TypeKind::Input).with_source("User"),
            ],
            vec![],
        )
        .unwrap();
        let config = GeneratorConfig {
            output_file_pattern: "data/{name}.ts".to_string(),
            ..Default::default()
        };
        match assemble(&set, &config) {
            Err(CodegenError::PathCollision { path, first, second }) => {
                assert_eq!(path, "data/user.ts");
                assert_eq!(first, "User");
                assert_eq!(second, "UserInput");
            }
            other => panic!("expected path collision, got {:?}", other),
        }

        // Names rendering alike collide too.
        let alike = DefinitionSet::from_parts(
            vec![
                TypeDefinition::new("UserRole", TypeKind::Model),
                TypeDefinition::new("User_Role", TypeKind::Model),
            ],
            vec![],
        )
        .unwrap();
        let config = GeneratorConfig {
            output_file_pattern: "{type}/{name}.ts".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            assemble(&alike, &config),
            Err(CodegenError::PathCollision { .. })
        ));
    }

    #[test]
    fn test_unresolved_symbols_are_batched() {
        let set = DefinitionSet::from_parts(
            vec![
                TypeDefinition::new("A", TypeKind::Model)
                    .with_field(Field::new("x", TypeRef::named("Missing1")))
                    .with_field(Field::new("y", TypeRef::enumeration("Missing2"))),
            ],
            vec![],
        )
        .unwrap();
        match assemble(&set, &GeneratorConfig::default()) {
            Err(CodegenError::Batch { count, summary }) => {
                assert_eq!(count, 2);
                assert!(summary.contains("Missing1"));
                assert!(summary.contains("prisma/a.model.ts:A.y"));
            }
            other => panic!("expected batch error, got {:?}", other),
        }
    }
}
