//! Rename definitions whose names shadow reserved identifiers

use tracing::{debug, info};

use crate::config::RenameConfig;
use crate::error::CoreResult;
use crate::ir::{DefinitionSet, RenameTable};

/// Build the rename table for the names actually present in `set`
///
/// Explicit overrides win. A reserved name without an override gets the
/// configured suffix appended.
pub fn build_rename_table(
    set: &DefinitionSet,
    config: &RenameConfig,
) -> CoreResult<RenameTable> {
    config.validate()?;
    let mut table = RenameTable::new();

    for (old, new) in &config.overrides {
        if set.contains_name(old) {
            table.insert(old.as_str(), new.as_str())?;
        }
    }

    for name in &config.reserved {
        if table.get(name).is_some() || !set.contains_name(name) {
            continue;
        }
        table.insert(name.as_str(), format!("{}{}", name, config.suffix))?;
    }

    Ok(table)
}

/// Apply the rename table in a single step
///
/// Running the pass again is a no-op: renamed sources are gone, so the next
/// table is empty. A target that is already taken is a naming collision.
pub fn rename_types(set: DefinitionSet, config: &RenameConfig) -> CoreResult<DefinitionSet> {
    let table = build_rename_table(&set, config)?;
    if table.is_empty() {
        debug!("No reserved names present, nothing to rename");
        return Ok(set);
    }

    for (old, new) in table.iter() {
        debug!("Renaming {} -> {}", old, new);
    }
    let renamed = set.apply_renames(&table)?;
    info!("Renamed {} definition(s)", table.len());
    Ok(renamed)
}
