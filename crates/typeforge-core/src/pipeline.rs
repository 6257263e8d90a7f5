//! Configuration-driven transformation pipeline
//!
//! The orchestrator decides which passes run, always in the same order:
//!
//! ```text
//! combine filters -> strip atomic ops -> rename -> deduplicate
//! ```
//!
//! Filters are merged before renaming so that reserved-name detection sees
//! final filter names, and deduplication runs last so it compares final
//! names and final field types. The definition set is validated before the
//! first pass and after every pass; a violation aborts the run.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{DedupMode, GeneratorConfig};
use crate::error::CoreError;
use crate::ir::{DefinitionSet, RenameTable};
use crate::transforms;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Transformation passes, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CombineScalarFilters,
    StripAtomicOperations,
    RenameTypes,
    DeduplicateTypes,
}

impl Stage {
    pub const ORDER: [Stage; 4] = [
        Stage::CombineScalarFilters,
        Stage::StripAtomicOperations,
        Stage::RenameTypes,
        Stage::DeduplicateTypes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::CombineScalarFilters => "combine_scalar_filters",
            Stage::StripAtomicOperations => "strip_atomic_operations",
            Stage::RenameTypes => "rename_types",
            Stage::DeduplicateTypes => "deduplicate_types",
        }
    }

    pub fn is_enabled(self, config: &GeneratorConfig) -> bool {
        match self {
            Stage::CombineScalarFilters => config.combine_scalar_filters,
            Stage::StripAtomicOperations => !config.atomic_number_operations,
            Stage::RenameTypes => config.rename_types,
            Stage::DeduplicateTypes => config.remove_duplicate_types != DedupMode::None,
        }
    }

    fn recovery_suggestion(self, error: &CoreError) -> Option<String> {
        match (self, error) {
            (Stage::CombineScalarFilters, CoreError::SchemaIncompatibility { .. }) => Some(
                "disable combine_scalar_filters or align the variant field types".to_string(),
            ),
            (Stage::RenameTypes, CoreError::NamingCollision { name, .. }) => Some(format!(
                "'{}' is already taken; add a [rename.overrides] entry with an unused name",
                name
            )),
            (_, CoreError::DanglingReference { .. }) => {
                Some("the input definition set is incomplete; regenerate it".to_string())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details for transform failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformFailedDetails {
    pub stage: Stage,
    pub source: CoreError,
    pub recovery_suggestion: Option<String>,
}

impl fmt::Display for TransformFailedDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.stage, self.source)?;
        if let Some(hint) = &self.recovery_suggestion {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(CoreError),

    #[error("Input definition set is invalid: {0}")]
    InvalidInput(CoreError),

    #[error("Transform failed: {0}")]
    TransformFailed(Box<TransformFailedDetails>),

    /// A pass produced a set that breaks a set-level invariant
    #[error("Invariant violated after {stage}: {source}")]
    InvariantViolated { stage: Stage, source: CoreError },
}

impl PipelineError {
    /// The categorized error underneath
    pub fn core_error(&self) -> &CoreError {
        match self {
            PipelineError::ConfigError(e) | PipelineError::InvalidInput(e) => e,
            PipelineError::TransformFailed(details) => &details.source,
            PipelineError::InvariantViolated { source, .. } => source,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::TransformFailed(details) => Some(details.stage),
            PipelineError::InvariantViolated { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Stage-level diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDiagnostics {
    pub stage: Stage,
    pub duration_us: u64,
    pub types_before: usize,
    pub types_after: usize,
    pub enums_before: usize,
    pub enums_after: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub stages: Vec<StageDiagnostics>,
    /// Definitions folded away by the deduplicator, mapped to their survivor
    pub folded: RenameTable,
    pub duration_us: u64,
}

impl PipelineReport {
    pub fn ran(&self, stage: Stage) -> bool {
        self.stages.iter().any(|s| s.stage == stage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub set: DefinitionSet,
    pub report: PipelineReport,
}

/// Sequences the transformation passes for one generation run
pub struct TransformPipeline<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> TransformPipeline<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Enabled stages, in execution order
    pub fn stages(&self) -> Vec<Stage> {
        Stage::ORDER
            .into_iter()
            .filter(|stage| stage.is_enabled(self.config))
            .collect()
    }

    #[instrument(skip_all, fields(types = set.type_count(), enums = set.enum_count()))]
    pub fn run(&self, set: DefinitionSet) -> PipelineResult<PipelineOutput> {
        let started = Instant::now();
        self.config.validate().map_err(PipelineError::ConfigError)?;
        set.validate().map_err(PipelineError::InvalidInput)?;

        let mut report = PipelineReport::default();
        let mut current = set;

        for stage in self.stages() {
            let stage_started = Instant::now();
            let types_before = current.type_count();
            let enums_before = current.enum_count();
            debug!("Running stage {}", stage);

            current = self.apply(stage, current, &mut report).map_err(|source| {
                PipelineError::TransformFailed(Box::new(TransformFailedDetails {
                    stage,
                    recovery_suggestion: stage.recovery_suggestion(&source),
                    source,
                }))
            })?;
            current
                .validate()
                .map_err(|source| PipelineError::InvariantViolated { stage, source })?;

            let diagnostics = StageDiagnostics {
                stage,
                duration_us: stage_started.elapsed().as_micros() as u64,
                types_before,
                types_after: current.type_count(),
                enums_before,
                enums_after: current.enum_count(),
            };
            info!(
                "Stage {} done: {} -> {} types",
                stage, diagnostics.types_before, diagnostics.types_after
            );
            report.stages.push(diagnostics);
        }

        report.duration_us = started.elapsed().as_micros() as u64;
        Ok(PipelineOutput {
            set: current,
            report,
        })
    }

    fn apply(
        &self,
        stage: Stage,
        set: DefinitionSet,
        report: &mut PipelineReport,
    ) -> Result<DefinitionSet, CoreError> {
        match stage {
            Stage::CombineScalarFilters => transforms::combine_scalar_filters(set),
            Stage::StripAtomicOperations => transforms::strip_atomic_operations(set),
            Stage::RenameTypes => transforms::rename_types(set, &self.config.rename),
            Stage::DeduplicateTypes => {
                let outcome =
                    transforms::deduplicate_types(set, self.config.remove_duplicate_types)?;
                report.folded = outcome.folded;
                Ok(outcome.set)
            }
        }
    }
}
