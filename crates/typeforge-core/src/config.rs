//! Generator configuration
//!
//! One [`GeneratorConfig`] is built per generation run and threaded by
//! reference into every component. Every key is optional in TOML: a partial
//! file is merged over [`GeneratorConfig::default`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::ir::TypeKind;

/// Which kinds of type definitions the structural deduplicator may fold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    #[default]
    None,
    Model,
    Input,
    All,
}

impl DedupMode {
    pub fn includes(self, kind: TypeKind) -> bool {
        match self {
            DedupMode::None => false,
            DedupMode::Model => kind == TypeKind::Model,
            DedupMode::Input => kind == TypeKind::Input,
            DedupMode::All => true,
        }
    }
}

/// Which index files the assembly stage produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReExport {
    /// No index files
    None,
    /// One index per directory, no root index
    Directories,
    /// Only a root index, re-exporting every declaration file directly
    Single,
    /// Directory indexes plus a root index re-exporting them
    #[default]
    All,
}

impl ReExport {
    pub fn has_root_index(self) -> bool {
        matches!(self, ReExport::Single | ReExport::All)
    }

    pub fn has_directory_indexes(self) -> bool {
        matches!(self, ReExport::Directories | ReExport::All)
    }
}

/// Names that shadow built-ins of the target platform
pub const DEFAULT_RESERVED_NAMES: &[&str] = &[
    "Date",
    "Error",
    "Function",
    "JSON",
    "Map",
    "Mutation",
    "Object",
    "Promise",
    "Query",
    "Record",
    "Set",
    "Subscription",
    "Symbol",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenameConfig {
    /// Definition names that must not be emitted as-is
    pub reserved: Vec<String>,
    /// Appended to a reserved name when no override is given
    pub suffix: String,
    /// Explicit replacement names, applied even to names not listed as reserved
    pub overrides: BTreeMap<String, String>,
}

impl RenameConfig {
    /// Reject rename rules whose output would be renamed again on a second run
    pub fn validate(&self) -> CoreResult<()> {
        let is_reserved = |name: &str| self.reserved.iter().any(|r| r == name);

        for (old, new) in &self.overrides {
            if old == new {
                return Err(conflict(format!("rename override maps '{}' to itself", old)));
            }
            if self.overrides.contains_key(new) {
                return Err(conflict(format!(
                    "rename override target '{}' is itself renamed",
                    new
                )));
            }
            if is_reserved(new) {
                return Err(conflict(format!(
                    "rename override '{}' -> '{}' targets a reserved name",
                    old, new
                )));
            }
        }

        for name in &self.reserved {
            if self.overrides.contains_key(name) {
                continue;
            }
            if self.suffix.is_empty() {
                return Err(conflict(format!(
                    "rename.suffix is empty, reserved name '{}' has no override",
                    name
                )));
            }
            let renamed = format!("{}{}", name, self.suffix);
            if is_reserved(&renamed) {
                return Err(conflict(format!(
                    "reserved name '{}' would be renamed to '{}', which is also reserved",
                    name, renamed
                )));
            }
        }

        Ok(())
    }
}

fn conflict(message: String) -> CoreError {
    CoreError::ConfigurationConflict(message)
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            reserved: DEFAULT_RESERVED_NAMES.iter().map(|s| s.to_string()).collect(),
            suffix: "Type".to_string(),
            overrides: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Fold nullable and nested filter variants into one filter per kind
    pub combine_scalar_filters: bool,
    /// Keep `increment`/`decrement`/... update operation types
    pub atomic_number_operations: bool,
    /// Rename definitions that shadow reserved names
    pub rename_types: bool,
    pub remove_duplicate_types: DedupMode,
    /// Path template with `{name}`, `{type}`, `{plural.type}` and `{model}` tokens
    pub output_file_pattern: String,
    pub re_export: ReExport,
    /// Put every declaration into a single root file
    pub emit_single: bool,
    /// `{model}` value for definitions without a source entity
    pub shared_directory: String,
    pub rename: RenameConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            combine_scalar_filters: false,
            atomic_number_operations: true,
            rename_types: false,
            remove_duplicate_types: DedupMode::None,
            output_file_pattern: "{model}/{name}.{type}.ts".to_string(),
            re_export: ReExport::All,
            emit_single: false,
            shared_directory: "prisma".to_string(),
            rename: RenameConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a TOML document, merging it over the defaults
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        toml::from_str(content).map_err(|e| CoreError::InvalidConfig(e.to_string()))
    }

    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject option combinations the pipeline cannot reconcile
    ///
    /// Output-layout options are checked by the assembly stage; this covers
    /// what the transformation passes rely on.
    pub fn validate(&self) -> CoreResult<()> {
        if self.shared_directory.trim().is_empty()
            || self.shared_directory.contains(&['/', '\\'][..])
            || self.shared_directory == ".."
        {
            return Err(CoreError::ConfigurationConflict(format!(
                "shared_directory must be a single path segment, got '{}'",
                self.shared_directory
            )));
        }

        if self.rename_types {
            self.rename.validate()?;
        }

        Ok(())
    }
}
