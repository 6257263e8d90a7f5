//! End-to-end runs of the transformation pipeline over realistic schemas

use pretty_assertions::assert_eq;
use typeforge_core::{
    CoreError, DedupMode, DefinitionSet, GeneratorConfig, PipelineError, PipelineOutput, ScalarKind,
    Stage, TransformPipeline, TypeRef,
};
use typeforge_test_fixtures::{blog_schema, string_filter_variants, zoo_schema};

fn run(config: &GeneratorConfig, set: DefinitionSet) -> PipelineOutput {
    TransformPipeline::new(config).run(set).unwrap()
}

#[test]
fn test_filter_variants_collapse_to_one_filter() {
    let config = GeneratorConfig {
        combine_scalar_filters: true,
        ..Default::default()
    };
    let output = run(&config, string_filter_variants());

    let filters: Vec<_> = output
        .set
        .type_names()
        .filter(|n| n.ends_with("Filter"))
        .collect();
    assert_eq!(filters, vec!["StringFilter"]);
    assert!(output
        .set
        .type_names()
        .all(|n| !n.to_lowercase().contains("nullable")));

    let user = output.set.get_type("UserWhereInput").unwrap();
    assert_eq!(user.field("name").unwrap().ty, TypeRef::named("StringFilter"));
}

#[test]
fn test_blog_filters_combine() {
    let config = GeneratorConfig {
        combine_scalar_filters: true,
        ..Default::default()
    };
    let output = run(&config, blog_schema());

    let filters: Vec<_> = output
        .set
        .type_names()
        .filter(|n| n.ends_with("Filter"))
        .collect();
    assert_eq!(
        filters,
        vec![
            "EnumRoleFilter",
            "FloatFilter",
            "IntFilter",
            "PostListRelationFilter",
            "StringFilter",
            "UserRelationFilter",
        ]
    );

    let string = output.set.get_type("StringFilter").unwrap();
    assert!(string.has_field("mode"));
    assert_eq!(
        string.field("not").unwrap().ty,
        TypeRef::union([TypeRef::named("StringFilter"), TypeRef::scalar(ScalarKind::String)])
    );
}

#[test]
fn test_atomic_operations_are_stripped() {
    let config = GeneratorConfig {
        atomic_number_operations: false,
        ..Default::default()
    };
    let output = run(&config, blog_schema());

    assert!(!output.set.contains_type("IntFieldUpdateOperationsInput"));
    assert!(!output.set.contains_type("NullableFloatFieldUpdateOperationsInput"));
    assert!(output.set.contains_type("StringFieldUpdateOperationsInput"));

    let update = output.set.get_type("PostUpdateInput").unwrap();
    assert_eq!(update.field("views").unwrap().ty, TypeRef::scalar(ScalarKind::Int));
    assert_eq!(update.field("rating").unwrap().ty, TypeRef::scalar(ScalarKind::Float));
    assert!(update.field("rating").unwrap().nullable);
    assert!(matches!(update.field("title").unwrap().ty, TypeRef::Union(_)));
}

#[test]
fn test_atomic_operations_kept_by_default() {
    let output = run(&GeneratorConfig::default(), blog_schema());
    assert!(output.set.contains_type("IntFieldUpdateOperationsInput"));
    assert_eq!(output.set, blog_schema());
}

#[test]
fn test_rename_into_existing_name_is_fatal() {
    let mut config = GeneratorConfig {
        rename_types: true,
        ..Default::default()
    };
    config.rename.overrides.insert("Zoo".into(), "Zoo2".into());

    let err = TransformPipeline::new(&config).run(zoo_schema()).unwrap_err();
    assert!(matches!(err, PipelineError::TransformFailed(_)));
    assert_eq!(err.stage(), Some(Stage::RenameTypes));
    match err.core_error() {
        CoreError::NamingCollision { name, first, .. } => {
            assert_eq!(name, "Zoo2");
            assert_eq!(first, "Zoo");
        }
        other => panic!("expected naming collision, got {:?}", other),
    }
}

#[test]
fn test_reserved_roots_are_renamed() {
    let config = GeneratorConfig {
        rename_types: true,
        ..Default::default()
    };
    let output = run(&config, blog_schema());
    assert!(output.set.contains_type("QueryType"));
    assert!(output.set.contains_type("MutationType"));
    assert!(!output.set.contains_type("Query"));
}

#[test]
fn test_identical_inputs_are_deduplicated() {
    let config = GeneratorConfig {
        remove_duplicate_types: DedupMode::Input,
        ..Default::default()
    };
    let output = run(&config, blog_schema());

    assert!(output.set.contains_type("PostWhereUniqueInput"));
    assert!(!output.set.contains_type("UserWhereUniqueInput"));
    assert!(!output.set.contains_type("UserCountOrderByAggregateInput"));
    assert_eq!(
        output.report.folded.get("UserWhereUniqueInput"),
        Some("PostWhereUniqueInput")
    );
    assert_eq!(output.report.folded.get("NestedIntFilter"), Some("IntFilter"));

    // Models stay even though nothing else changed about them.
    assert!(output.set.contains_type("User"));
    assert!(output.set.contains_type("Post"));
}

#[test]
fn test_every_pass_together() {
    let config = GeneratorConfig {
        combine_scalar_filters: true,
        atomic_number_operations: false,
        rename_types: true,
        remove_duplicate_types: DedupMode::All,
        ..Default::default()
    };
    let output = run(&config, blog_schema());

    assert_eq!(output.report.stages.len(), 4);
    assert!(output.set.validate().is_ok());
    assert!(output.set.dangling_references().is_empty());
    assert!(output
        .set
        .type_names()
        .all(|n| !n.contains("Nullable") && !n.starts_with("Nested")));
    assert!(!output.set.contains_type("Query"));

    let again = run(&config, blog_schema());
    assert_eq!(again.set, output.set);
}
