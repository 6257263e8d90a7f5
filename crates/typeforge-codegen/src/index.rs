//! Re-export index planning and verification
//!
//! Index files carry no declarations of their own. Each one re-exports the
//! declaration files next to it and the indexes of its child directories,
//! so a single root index reaches every exported name.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::{is_cyclic_directed, kosaraju_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use tracing::debug;
use typeforge_core::ReExport;

use crate::assembly::{FileTree, VirtualFile};
use crate::error::{BatchErrors, CodegenError, CodegenResult, ErrorEntry, ErrorLocation};
use crate::import_path::{join, parent_dir};

/// Add the index files `mode` asks for to `files`
///
/// Returns the path of the root index when one was created.
pub fn plan_indexes(
    files: &mut BTreeMap<String, VirtualFile>,
    mode: ReExport,
    index_name: &str,
) -> CodegenResult<Option<String>> {
    let exports: BTreeMap<String, BTreeSet<String>> = files
        .values()
        .filter(|f| !f.is_index())
        .map(|f| (f.path.clone(), f.exported_names.clone()))
        .collect();

    let mut planned: Vec<VirtualFile> = Vec::new();
    let root = match mode {
        ReExport::None => return Ok(None),
        ReExport::Single => {
            let mut root = VirtualFile::index(index_name);
            for (path, names) in &exports {
                add_re_export(&mut root, path, names);
            }
            planned.push(root);
            Some(index_name.to_string())
        }
        ReExport::Directories | ReExport::All => {
            let dir_indexes = plan_directory_indexes(&exports, index_name);

            let root = if mode.has_root_index() {
                let mut root = VirtualFile::index(index_name);
                for (path, names) in &exports {
                    if parent_dir(path).is_empty() {
                        add_re_export(&mut root, path, names);
                    }
                }
                for (dir, index) in &dir_indexes {
                    if parent_dir(dir).is_empty() {
                        add_re_export(&mut root, &index.path, &index.exported_names);
                    }
                }
                planned.push(root);
                Some(index_name.to_string())
            } else {
                None
            };

            planned.extend(dir_indexes.into_values());
            root
        }
    };

    for index in planned {
        if let Some(existing) = files.get(&index.path) {
            return Err(CodegenError::PathCollision {
                path: index.path.clone(),
                first: describe(existing),
                second: "re-export index".to_string(),
            });
        }
        debug!(
            "Index {} re-exports {} file(s)",
            index.path,
            index.re_exports.len()
        );
        files.insert(index.path.clone(), index);
    }

    Ok(root)
}

/// One index per non-root directory holding declaration files, directly or
/// below it, keyed by directory
fn plan_directory_indexes(
    exports: &BTreeMap<String, BTreeSet<String>>,
    index_name: &str,
) -> BTreeMap<String, VirtualFile> {
    let mut dirs: BTreeSet<&str> = BTreeSet::new();
    for path in exports.keys() {
        let mut dir = parent_dir(path);
        while !dir.is_empty() && dirs.insert(dir) {
            dir = parent_dir(dir);
        }
    }

    // Children first so a parent can copy their exported names.
    let mut ordered: Vec<&str> = dirs.into_iter().collect();
    ordered.sort_by(|a, b| depth(b).cmp(&depth(a)).then_with(|| a.cmp(b)));

    let mut indexes: BTreeMap<String, VirtualFile> = BTreeMap::new();
    for dir in ordered {
        let mut index = VirtualFile::index(join(dir, index_name));
        for (path, names) in exports {
            if parent_dir(path) == dir {
                add_re_export(&mut index, path, names);
            }
        }
        for (child, child_index) in &indexes {
            if parent_dir(child) == dir {
                add_re_export(&mut index, &child_index.path, &child_index.exported_names);
            }
        }
        indexes.insert(dir.to_string(), index);
    }
    indexes
}

fn depth(dir: &str) -> usize {
    dir.matches('/').count()
}

fn add_re_export(index: &mut VirtualFile, target: &str, names: &BTreeSet<String>) {
    index.exported_names.extend(names.iter().cloned());
    index
        .re_exports
        .entry(target.to_string())
        .or_default()
        .extend(names.iter().cloned());
}

fn describe(file: &VirtualFile) -> String {
    match file.exported_names.iter().next() {
        Some(name) => format!("file declaring '{}'", name),
        None => format!("file '{}'", file.path),
    }
}

/// Check the re-export graph of an assembled tree
///
/// Every re-export target must exist, indexes must not re-export each other
/// in a cycle, and with a root index every declaration file must be reachable
/// from it.
pub fn verify(tree: &FileTree) -> CodegenResult<()> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let nodes: BTreeMap<&str, NodeIndex> = tree
        .files
        .keys()
        .map(|path| (path.as_str(), graph.add_node(path.as_str())))
        .collect();

    let mut errors = BatchErrors::new();
    for file in tree.index_files() {
        let Some(&from) = nodes.get(file.path.as_str()) else {
            continue;
        };
        for target in file.re_exports.keys() {
            match nodes.get(target.as_str()) {
                Some(&to) => {
                    graph.add_edge(from, to, ());
                }
                None => errors.add(
                    ErrorEntry::missing_target(target)
                        .at(ErrorLocation::new().in_file(file.path.as_str())),
                ),
            }
        }
    }
    errors.into_result()?;

    if is_cyclic_directed(&graph) {
        let through = kosaraju_scc(&graph)
            .into_iter()
            .find(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .and_then(|scc| scc.into_iter().map(|idx| graph[idx]).min())
            .unwrap_or_default();
        return Err(CodegenError::IndexCycle(through.to_string()));
    }

    let Some(root) = tree.root_index.as_deref() else {
        return Ok(());
    };
    let Some(&start) = nodes.get(root) else {
        return Err(CodegenError::Unreachable {
            name: String::new(),
            path: root.to_string(),
            root: root.to_string(),
        });
    };

    let mut reached = BTreeSet::new();
    let mut dfs = Dfs::new(&graph, start);
    while let Some(node) = dfs.next(&graph) {
        reached.insert(graph[node]);
    }

    for file in tree.declaration_files() {
        if !reached.contains(file.path.as_str()) {
            return Err(CodegenError::Unreachable {
                name: file.exported_names.iter().next().cloned().unwrap_or_default(),
                path: file.path.clone(),
                root: root.to_string(),
            });
        }
    }
    Ok(())
}
