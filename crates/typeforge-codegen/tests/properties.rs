//! Property tests for file assembly over random sets and layouts

use std::collections::BTreeSet;

use proptest::prelude::*;
use typeforge_codegen::{assemble, FileTree};
use typeforge_core::{
    DefinitionSet, EnumDefinition, Field, GeneratorConfig, ReExport, ScalarKind, TypeDefinition,
    TypeKind, TypeRef,
};

const ENTITIES: [&str; 3] = ["Alpha", "Beta", "GammaRay"];

const PATTERNS: [&str; 5] = [
    "{model}/{name}.{type}.ts",
    "{plural.type}/{model}.ts",
    "data/{type}/{name}.ts",
    "{model}.ts",
    "out/{model}/{type}/{name}",
];

fn arb_kind() -> impl Strategy<Value = TypeKind> {
    prop_oneof![Just(TypeKind::Input), Just(TypeKind::Model), Just(TypeKind::Output)]
}

type ArbDefinition = (TypeKind, Option<usize>, Vec<usize>, bool);

fn arb_definition(count: usize) -> impl Strategy<Value = ArbDefinition> {
    (
        arb_kind(),
        prop::option::of(0..ENTITIES.len()),
        prop::collection::vec(0..count, 0..3),
        any::<bool>(),
    )
}

fn arb_definition_set() -> impl Strategy<Value = DefinitionSet> {
    (1usize..8)
        .prop_flat_map(|n| prop::collection::vec(arb_definition(n), n))
        .prop_map(|defs| {
            let types = defs.into_iter().enumerate().map(|(i, (kind, source, refs, uses_enum))| {
                let mut def = TypeDefinition::new(format!("Thing{}", i), kind)
                    .with_field(Field::new("id", TypeRef::scalar(ScalarKind::Int)));
                if let Some(entity) = source {
                    def = def.with_source(ENTITIES[entity]);
                }
                for (j, target) in refs.into_iter().enumerate() {
                    def = def.with_field(Field::new(
                        format!("ref{}", j),
                        TypeRef::named(format!("Thing{}", target)),
                    ));
                }
                if uses_enum {
                    def = def.with_field(Field::new("status", TypeRef::enumeration("Status")));
                }
                def
            });
            DefinitionSet::from_parts(types, vec![EnumDefinition::new("Status", ["ON", "OFF"])])
                .unwrap()
        })
}

fn arb_re_export() -> impl Strategy<Value = ReExport> {
    prop_oneof![
        Just(ReExport::None),
        Just(ReExport::Single),
        Just(ReExport::Directories),
        Just(ReExport::All),
    ]
}

fn reachable(tree: &FileTree, root: &str) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![root.to_string()];
    while let Some(path) = stack.pop() {
        if seen.insert(path.clone()) {
            stack.extend(tree.get(&path).unwrap().re_exports.keys().cloned());
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn every_declaration_is_placed_once_and_imports_resolve(
        set in arb_definition_set(),
        pattern in prop::sample::select(PATTERNS.to_vec()),
        re_export in arb_re_export(),
    ) {
        let config = GeneratorConfig {
            output_file_pattern: pattern.to_string(),
            re_export,
            ..Default::default()
        };
        let tree = assemble(&set, &config).unwrap();

        let declared: usize = tree.declaration_files().map(|f| f.declarations.len()).sum();
        prop_assert_eq!(declared, set.type_count() + set.enum_count());

        for file in tree.declaration_files() {
            for name in &file.exported_names {
                prop_assert_eq!(tree.symbols.get(name), Some(&file.path));
            }
            for (target, names) in &file.required_imports {
                let target = tree.get(target).unwrap();
                prop_assert!(names.iter().all(|n| target.declares(n)));
            }
        }

        let lowered: BTreeSet<String> = tree.paths().map(str::to_lowercase).collect();
        prop_assert_eq!(lowered.len(), tree.files.len());
    }

    #[test]
    fn root_index_reaches_every_declaration(
        set in arb_definition_set(),
        pattern in prop::sample::select(PATTERNS.to_vec()),
        re_export in prop_oneof![Just(ReExport::Single), Just(ReExport::All)],
    ) {
        let config = GeneratorConfig {
            output_file_pattern: pattern.to_string(),
            re_export,
            ..Default::default()
        };
        let tree = assemble(&set, &config).unwrap();
        let root = tree.root_index.clone().unwrap();

        let seen = reachable(&tree, &root);
        for file in tree.declaration_files() {
            prop_assert!(seen.contains(&file.path), "{} not reachable", file.path);
        }
        prop_assert_eq!(
            tree.get(&root).unwrap().exported_names.len(),
            set.type_count() + set.enum_count()
        );
    }
}
