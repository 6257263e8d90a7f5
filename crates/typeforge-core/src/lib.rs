//! Core intermediate representation, configuration and transformation
//! pipeline for typeforge

pub mod config;
pub mod error;
pub mod ir;
pub mod naming;
pub mod pipeline;
pub mod transforms;

pub use config::{DedupMode, GeneratorConfig, ReExport, RenameConfig};
pub use error::{CoreError, CoreResult};
pub use ir::{
    DefinitionSet, EnumDefinition, Field, RenameTable, ScalarKind, TypeDefinition, TypeKind,
    TypeRef,
};
pub use pipeline::{
    PipelineError, PipelineOutput, PipelineReport, PipelineResult, Stage, TransformPipeline,
};
