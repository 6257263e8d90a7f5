//! File assembly for typeforge
//!
//! Takes a [`DefinitionSet`] through the transformation pipeline and lays the
//! result out as a tree of virtual files with resolved imports and re-export
//! indexes. Rendering file contents is left to language backends; everything
//! here is path and symbol bookkeeping.

pub mod assembly;
pub mod error;
pub mod import_path;
pub mod index;
pub mod layout;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use typeforge_core::{DefinitionSet, GeneratorConfig, PipelineReport, TransformPipeline};

pub use assembly::{
    assemble, assemble_with, Declaration, FileRole, FileTree, TreeStats, VirtualFile,
};
pub use error::{BatchErrors, CodegenError, CodegenResult};
pub use import_path::ImportPathCalculator;
pub use layout::{Layout, OutputPattern};

/// Everything one generator run produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generated {
    pub tree: FileTree,
    pub report: PipelineReport,
}

impl Generated {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the transformation pipeline and file assembly under one config
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    #[instrument(skip_all, fields(types = set.type_count(), enums = set.enum_count()))]
    pub fn generate(&self, set: DefinitionSet) -> CodegenResult<Generated> {
        // Layout problems are configuration errors; report them before any
        // pass runs.
        let layout = Layout::from_config(self.config)?;

        let output = TransformPipeline::new(self.config).run(set)?;
        let tree = assemble_with(&output.set, &layout)?;

        info!(
            "Generated {} file(s) from {} declaration(s) in {}us",
            tree.files.len(),
            tree.symbols.len(),
            output.report.duration_us
        );
        Ok(Generated {
            tree,
            report: output.report,
        })
    }
}
