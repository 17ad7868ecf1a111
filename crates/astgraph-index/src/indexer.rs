//! Full-rebuild indexing of a project's syntax trees.
//!
//! Every run clears the graph, walks the project, parses each file with a
//! known extension and writes one node row per syntax node plus one edge
//! per parent/child pair. Only store failures abort a run; unreadable or
//! unparsable files are logged and skipped, and rejected rows are counted
//! in the [`IndexReport`].

use crate::schema::NodeRecord;
use crate::store::{GraphStore, GraphWriter, InsertOutcome};
use anyhow::Result;
use astgraph_parser::{Language, LanguageSupport, NodeSpan, node_id};
use ignore::{DirEntry, WalkBuilder};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};
use tree_sitter::{Node, Tree};

/// Counters collected over one index run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Regular files found by the walk.
    pub files_seen: usize,
    /// Files parsed and written to the graph.
    pub files_indexed: usize,
    /// Files without a supported extension.
    pub files_skipped: usize,
    /// Files that could not be read or parsed.
    pub files_failed: usize,
    pub nodes_visited: usize,
    pub nodes_inserted: usize,
    /// Nodes whose id was already present.
    pub nodes_ignored: usize,
    pub edges_inserted: usize,
    /// Node or edge writes rejected by the store.
    pub insert_errors: usize,
    pub elapsed: Duration,
}

pub struct Indexer<'a> {
    store: &'a GraphStore,
    language_support: LanguageSupport,
}

impl<'a> Indexer<'a> {
    pub fn new(store: &'a GraphStore) -> Result<Self> {
        Ok(Self {
            store,
            language_support: LanguageSupport::new()?,
        })
    }

    /// Rebuild the graph from every supported file under `project_root`.
    pub fn index_project(&mut self, project_root: &Path) -> Result<IndexReport> {
        let start = Instant::now();
        let store = self.store;
        let language_support = &mut self.language_support;

        store.clear_all()?;

        let mut report = store.with_conn(|conn| {
            let writer = GraphWriter::begin(conn)?;
            let mut report = IndexReport::default();

            // Standard filters off: hidden and git-ignored files are indexed too
            let walker = WalkBuilder::new(project_root)
                .standard_filters(false)
                .follow_links(false)
                .build();

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable directory entry: {}", e);
                        continue;
                    }
                };

                if !is_regular_file(&entry) {
                    continue;
                }
                report.files_seen += 1;

                let path = entry.path();
                let Some(language) = Language::from_path(path) else {
                    report.files_skipped += 1;
                    continue;
                };

                index_file(language_support, &writer, path, language, &mut report);

                if report.files_indexed > 0 && report.files_indexed % 100 == 0 {
                    info!("Indexed {} files...", report.files_indexed);
                }
            }

            writer.commit()?;
            Ok(report)
        })?;

        report.elapsed = start.elapsed();

        info!("Indexing complete!");
        info!(
            "  Files: {} indexed, {} skipped, {} failed",
            report.files_indexed, report.files_skipped, report.files_failed
        );
        info!(
            "  Nodes: {} ({} duplicate ids)",
            report.nodes_inserted, report.nodes_ignored
        );
        info!("  Edges: {}", report.edges_inserted);
        if report.insert_errors > 0 {
            warn!("  Rejected writes: {}", report.insert_errors);
        }
        info!("  Time: {:.2}s", report.elapsed.as_secs_f64());

        Ok(report)
    }
}

/// Regular files, plus symlinks that resolve to one. Symlinked
/// directories are never descended into.
fn is_regular_file(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => entry.path().is_file(),
        _ => false,
    }
}

fn index_file(
    language_support: &mut LanguageSupport,
    writer: &GraphWriter<'_>,
    path: &Path,
    language: Language,
    report: &mut IndexReport,
) {
    let filepath = path.to_string_lossy();

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            error!("GraphDB: read {} failed: {}", filepath, e);
            report.files_failed += 1;
            return;
        }
    };

    let tree = match language_support.parse(language, content.as_bytes()) {
        Ok(tree) => tree,
        Err(e) => {
            error!("GraphDB: parse {} failed: {}", filepath, e);
            report.files_failed += 1;
            return;
        }
    };

    let before = report.nodes_visited;
    write_tree(writer, &filepath, &tree, report);
    report.files_indexed += 1;

    debug!(
        "Indexed {} ({}): {} nodes",
        filepath,
        language,
        report.nodes_visited - before
    );
}

/// Pre-order walk over an explicit stack of `(node, parent_id)` pairs.
/// Call depth stays constant however deep the tree nests.
fn write_tree(writer: &GraphWriter<'_>, filepath: &str, tree: &Tree, report: &mut IndexReport) {
    let mut stack: Vec<(Node<'_>, Option<String>)> = vec![(tree.root_node(), None)];
    let mut cursor = tree.walk();

    while let Some((node, parent_id)) = stack.pop() {
        report.nodes_visited += 1;

        let span = NodeSpan::of(&node);
        let id = node_id(filepath, node.kind(), span.start());
        let record = NodeRecord::new(id, filepath, node.kind(), span);

        match writer.insert_node(&record) {
            Ok(InsertOutcome::Inserted) => report.nodes_inserted += 1,
            Ok(InsertOutcome::Ignored) => report.nodes_ignored += 1,
            Err(e) => {
                trace!("Node insert failed for {}: {}", record.id, e);
                report.insert_errors += 1;
            }
        }

        if let Some(parent) = parent_id {
            match writer.insert_edge(&parent, &record.id) {
                Ok(()) => report.edges_inserted += 1,
                Err(e) => {
                    trace!("Edge insert failed for {} -> {}: {}", parent, record.id, e);
                    report.insert_errors += 1;
                }
            }
        }

        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            stack.push((child, Some(record.id.clone())));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportOrder;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn index(store: &GraphStore, root: &Path) -> IndexReport {
        Indexer::new(store).unwrap().index_project(root).unwrap()
    }

    #[test]
    fn test_index_single_javascript_file() {
        let project = TempDir::new().unwrap();
        let file = write(project.path(), "main.js", b"let x = 1;");
        let store = GraphStore::open_in_memory().unwrap();

        let report = index(&store, project.path());

        assert_eq!(report.files_seen, 1);
        assert_eq!(report.files_indexed, 1);
        assert_eq!(report.files_failed, 0);
        assert_eq!(report.nodes_visited, report.nodes_inserted);
        assert_eq!(report.edges_inserted, report.nodes_visited - 1);
        assert_eq!(report.insert_errors, 0);

        let stats = store.get_stats().unwrap();
        assert_eq!(stats.node_count, report.nodes_inserted);
        assert_eq!(stats.edge_count, report.edges_inserted);

        let filepath = file.to_string_lossy();
        let root_id = format!("{}@program@0@0", filepath);
        let root = store.get_node(&root_id).unwrap().unwrap();
        assert_eq!(root.kind, "program");
        assert_eq!((root.end_row, root.end_col), (0, 10));

        let children = store.edges_from(&root_id).unwrap();
        assert_eq!(children, vec![format!("{}@lexical_declaration@0@0", filepath)]);
    }

    #[test]
    fn test_nodes_written_in_pre_order() {
        let project = TempDir::new().unwrap();
        write(project.path(), "main.js", b"let x = 1;\nlet y = 2;");
        let store = GraphStore::open_in_memory().unwrap();

        index(&store, project.path());

        let nodes = store.all_nodes(ExportOrder::Natural).unwrap();
        assert_eq!(nodes[0].kind, "program");
        assert_eq!(nodes[1].kind, "lexical_declaration");
        assert_eq!(nodes[1].start_row, 0);
        let second_decl = nodes
            .iter()
            .position(|n| n.kind == "lexical_declaration" && n.start_row == 1)
            .unwrap();
        assert!(nodes[..second_decl].iter().all(|n| n.start_row == 0));
    }

    #[test]
    fn test_colliding_ids_keep_one_row() {
        // Both member expressions of `a.b.c` start at 0,0
        let project = TempDir::new().unwrap();
        write(project.path(), "chain.js", b"a.b.c;");
        let store = GraphStore::open_in_memory().unwrap();

        let report = index(&store, project.path());

        assert_eq!(report.nodes_ignored, 1);
        assert_eq!(report.nodes_inserted, report.nodes_visited - 1);
        assert_eq!(report.edges_inserted, report.nodes_visited - 1);
        assert_eq!(report.insert_errors, 0);

        let members: Vec<_> = store
            .all_nodes(ExportOrder::Natural)
            .unwrap()
            .into_iter()
            .filter(|n| n.kind == "member_expression")
            .collect();
        assert_eq!(members.len(), 1);
        // First visited (outer) expression wins
        assert_eq!((members[0].end_row, members[0].end_col), (0, 5));
    }

    #[test]
    fn test_unsupported_extensions_produce_empty_graph() {
        let project = TempDir::new().unwrap();
        write(project.path(), "README.md", b"# hello");
        write(project.path(), "main.py", b"print('hi')");
        write(project.path(), "APP.TS", b"let x = 1;");
        let store = GraphStore::open_in_memory().unwrap();

        let report = index(&store, project.path());

        assert_eq!(report.files_seen, 3);
        assert_eq!(report.files_skipped, 3);
        assert_eq!(report.files_indexed, 0);
        assert_eq!(store.get_stats().unwrap().node_count, 0);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let project = TempDir::new().unwrap();
        write(project.path(), "good.js", b"let x = 1;");
        write(project.path(), "good.lua", b"local y = 2");
        let bad = write(project.path(), "bad.js", &[0xff, 0xfe, 0x00, 0x80]);
        let store = GraphStore::open_in_memory().unwrap();

        let report = index(&store, project.path());

        assert_eq!(report.files_failed, 1);
        assert_eq!(report.files_indexed, 2);

        let bad_path = bad.to_string_lossy();
        let nodes = store.all_nodes(ExportOrder::Natural).unwrap();
        assert!(nodes.iter().all(|n| n.filepath != bad_path));
        assert_eq!(store.get_stats().unwrap().file_count, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_without_read_permission_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let project = TempDir::new().unwrap();
        write(project.path(), "good.js", b"let x = 1;");
        let locked = write(project.path(), "locked.ts", b"let y = 2;");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users (root) read through mode 000
        if fs::read(&locked).is_ok() {
            return;
        }

        let store = GraphStore::open_in_memory().unwrap();
        let report = index(&store, project.path());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

        assert_eq!(report.files_failed, 1);
        assert_eq!(report.files_indexed, 1);

        let locked_path = locked.to_string_lossy();
        let nodes = store.all_nodes(ExportOrder::Natural).unwrap();
        assert!(!nodes.is_empty());
        assert!(nodes.iter().all(|n| n.filepath != locked_path));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_indexed() {
        let target_dir = TempDir::new().unwrap();
        let target = write(target_dir.path(), "real.js", b"let x = 1;");
        let project = TempDir::new().unwrap();
        let link = project.path().join("lib.js");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let store = GraphStore::open_in_memory().unwrap();
        let report = index(&store, project.path());

        assert_eq!(report.files_seen, 1);
        assert_eq!(report.files_indexed, 1);

        let link_path = link.to_string_lossy();
        let root = store
            .get_node(&format!("{}@program@0@0", link_path))
            .unwrap()
            .unwrap();
        assert_eq!(root.filepath, link_path);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_not_followed() {
        let outside = TempDir::new().unwrap();
        write(outside.path(), "inner.js", b"let x = 1;");
        let project = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), project.path().join("linked")).unwrap();

        let store = GraphStore::open_in_memory().unwrap();
        let report = index(&store, project.path());

        assert_eq!(report.files_seen, 0);
        assert_eq!(store.get_stats().unwrap().node_count, 0);
    }

    #[test]
    fn test_rejected_insert_does_not_stop_traversal() {
        let project = TempDir::new().unwrap();
        let file = write(project.path(), "main.js", b"let x = 1;");
        let store = GraphStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_identifiers BEFORE INSERT ON nodes
                     WHEN NEW.type = 'identifier'
                     BEGIN SELECT RAISE(ABORT, 'identifier rejected'); END;",
                )?;
                Ok(())
            })
            .unwrap();

        let report = Indexer::new(&store)
            .unwrap()
            .index_project(project.path())
            .unwrap();

        assert_eq!(report.insert_errors, 1);
        assert_eq!(report.nodes_inserted, report.nodes_visited - 1);
        assert_eq!(report.edges_inserted, report.nodes_visited - 1);

        let filepath = file.to_string_lossy();
        let identifier_id = format!("{}@identifier@0@4", filepath);
        assert!(store.get_node(&identifier_id).unwrap().is_none());

        // Nodes after the rejected one in pre-order are still written
        assert!(
            store
                .get_node(&format!("{}@number@0@8", filepath))
                .unwrap()
                .is_some()
        );

        let declarator_id = format!("{}@variable_declarator@0@4", filepath);
        assert!(
            store
                .edges_from(&declarator_id)
                .unwrap()
                .contains(&identifier_id)
        );
        assert_eq!(store.get_stats().unwrap().node_count, report.nodes_inserted);
    }

    #[test]
    fn test_walks_nested_and_hidden_directories() {
        let project = TempDir::new().unwrap();
        write(project.path(), "src/app.ts", b"const a: number = 1;");
        write(project.path(), "src/ui/view.tsx", b"const v = <div />;");
        write(project.path(), "lib/deep/er/util.jsx", b"export default 1;");
        write(project.path(), ".config/init.lua", b"return {}");
        let store = GraphStore::open_in_memory().unwrap();

        let report = index(&store, project.path());

        assert_eq!(report.files_indexed, 4);
        assert_eq!(store.get_stats().unwrap().file_count, 4);
    }

    #[test]
    fn test_reindex_is_idempotent() {
        let project = TempDir::new().unwrap();
        write(project.path(), "a.js", b"function f(a) { return a + 1; }");
        write(project.path(), "b.lua", b"local t = { 1, 2 }\nprint(t)");
        let store = GraphStore::open_in_memory().unwrap();

        index(&store, project.path());
        let first = store.all_nodes(ExportOrder::Sorted).unwrap();
        let first_stats = store.get_stats().unwrap();

        index(&store, project.path());
        let second = store.all_nodes(ExportOrder::Sorted).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_stats, store.get_stats().unwrap());
    }

    #[test]
    fn test_rebuild_clears_previous_project() {
        let project_a = TempDir::new().unwrap();
        let project_b = TempDir::new().unwrap();
        write(project_a.path(), "a.js", b"let a = 1;");
        let b_file = write(project_b.path(), "b.ts", b"let b: string = 'b';");
        let store = GraphStore::open_in_memory().unwrap();

        index(&store, project_a.path());
        let report = index(&store, project_b.path());

        let nodes = store.all_nodes(ExportOrder::Natural).unwrap();
        let b_path = b_file.to_string_lossy();
        assert!(nodes.iter().all(|n| n.filepath == b_path));
        assert_eq!(nodes.len(), report.nodes_inserted);

        let edges = store.all_edges().unwrap();
        assert_eq!(edges.len(), report.edges_inserted);
        assert!(edges.iter().all(|e| e.parent.starts_with(b_path.as_ref())));
    }

    #[test]
    fn test_syntax_errors_still_indexed() {
        let project = TempDir::new().unwrap();
        write(project.path(), "broken.js", b"function ( {{{ let");
        let store = GraphStore::open_in_memory().unwrap();

        let report = index(&store, project.path());

        assert_eq!(report.files_indexed, 1);
        assert!(store.get_stats().unwrap().node_count > 0);
    }

    #[test]
    fn test_missing_project_root_yields_empty_graph() {
        let dir = TempDir::new().unwrap();
        let store = GraphStore::open_in_memory().unwrap();

        let report = index(&store, &dir.path().join("does-not-exist"));

        assert_eq!(report.files_seen, 0);
        assert_eq!(store.get_stats().unwrap().node_count, 0);
    }
}
