//! Library interface for the typeforge CLI
//!
//! All file I/O lives here; the core and codegen crates only see values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};
use typeforge_codegen::{Generated, Generator};
use typeforge_core::{DefinitionSet, GeneratorConfig};

/// Config file picked up next to the input when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "typeforge.toml";

pub fn load_definitions(path: &Path) -> Result<DefinitionSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read definitions: {:?}", path))?;
    let set: DefinitionSet = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse definitions JSON: {:?}", path))?;
    info!(
        "Loaded {} type(s) and {} enum(s) from {:?}",
        set.type_count(),
        set.enum_count(),
        path
    );
    Ok(set)
}

/// Explicit config path, else `typeforge.toml` beside `input`, else defaults
pub fn resolve_config_path(input: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidate = input
        .parent()
        .map(|dir| dir.join(DEFAULT_CONFIG_FILE))
        .filter(|path| path.is_file());
    if let Some(ref path) = candidate {
        debug!("Using config found next to input: {:?}", path);
    }
    candidate
}

pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {:?}", path)),
        None => {
            debug!("No config file, using defaults");
            Ok(GeneratorConfig::default())
        }
    }
}

/// Load inputs and run the pipeline and file assembly
pub fn generate(input: &Path, config: Option<&Path>) -> Result<Generated> {
    let config_path = resolve_config_path(input, config);
    let config = load_config(config_path.as_deref())?;
    let set = load_definitions(input)?;
    Generator::new(&config)
        .generate(set)
        .with_context(|| format!("Generation failed for {:?}", input))
}

/// Write the generated tree as JSON to `output`, or return it for stdout
pub fn write_output(generated: &Generated, output: Option<&Path>) -> Result<Option<String>> {
    let json = generated
        .to_json_pretty()
        .context("Failed to serialize generated tree")?;
    match output {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
            }
            fs::write(path, json).with_context(|| format!("Failed to write output: {:?}", path))?;
            info!("Generated tree written to {:?}", path);
            Ok(None)
        }
        None => Ok(Some(json)),
    }
}

/// Human-readable summary printed by `check`
pub fn summarize(generated: &Generated) -> String {
    let stats = generated.tree.stats();
    let mut lines = vec![
        format!("files:             {}", stats.files),
        format!("declaration files: {}", stats.declaration_files),
        format!("index files:       {}", stats.index_files),
        format!("declarations:      {}", stats.declarations),
        format!("imports:           {}", stats.imports),
    ];
    if let Some(root) = &generated.tree.root_index {
        lines.push(format!("root index:        {}", root));
    }
    for stage in &generated.report.stages {
        lines.push(format!(
            "stage {}: {} -> {} types, {} -> {} enums ({}us)",
            stage.stage,
            stage.types_before,
            stage.types_after,
            stage.enums_before,
            stage.enums_after,
            stage.duration_us
        ));
    }
    if !generated.report.folded.is_empty() {
        lines.push(format!("folded duplicates: {}", generated.report.folded.len()));
    }
    lines.join("\n")
}
