//! End-to-end build flows over real temp directories.

use atlas_builder::{BuildError, GraphBuilder};
use atlas_graph::{CodeGraph, Direction, NodeKind, Relation};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn builds_the_two_file_import_scenario() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.py"), "from b import hello\n").unwrap();
    fs::write(temp.path().join("b.py"), "def hello(): ...\n").unwrap();

    let graph = GraphBuilder::new(temp.path()).build().await.unwrap();

    let stats = graph.stats();
    assert_eq!(stats.nodes, 3);
    assert_eq!(stats.edges, 2);

    assert!(graph.node("a.py").is_some());
    assert!(graph.node("b.py").is_some());
    let hello = graph.node("b.py::function::hello::1").unwrap();
    assert_eq!(hello.kind, NodeKind::Function);
    assert_eq!(hello.name, "hello");

    let contained = graph.neighbors("b.py", Relation::Contains, Direction::Outgoing);
    assert_eq!(contained.len(), 1);
    assert_eq!(contained[0].id, "b.py::function::hello::1");

    let imported = graph.imports_of("a.py");
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].id, "b.py");
}

#[tokio::test]
async fn saved_graph_loads_with_identical_stats() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("app.py"), "import util\n\nclass App:\n    def run(self):\n        pass\n").unwrap();
    fs::write(src.join("util.py"), "def helper(): ...\n").unwrap();
    fs::write(temp.path().join("main.py"), "from src import app\n").unwrap();

    let graph = GraphBuilder::new(temp.path()).build().await.unwrap();

    let path = temp.path().join("graph.json");
    graph.save(&path).unwrap();
    let loaded = CodeGraph::load(&path).unwrap();

    assert_eq!(loaded.stats(), graph.stats());
    let original_ids: Vec<_> = graph.nodes().map(|n| n.id.clone()).collect();
    let loaded_ids: Vec<_> = loaded.nodes().map(|n| n.id.clone()).collect();
    assert_eq!(loaded_ids, original_ids);
}

#[tokio::test]
async fn binary_files_contribute_nothing_but_do_not_abort() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("blob.py"), b"\x00\x01\x02binary").unwrap();
    fs::write(temp.path().join("ok.py"), "def fine(): ...\n").unwrap();

    let (graph, stats) = GraphBuilder::new(temp.path())
        .build_with_stats()
        .await
        .unwrap();

    assert!(graph.node("blob.py").is_none());
    assert!(graph.node("ok.py").is_some());
    assert_eq!(stats.files, 1);
    assert_eq!(stats.files_skipped, 1);
    assert!(stats.warnings.iter().any(|w| w.contains("blob.py")));
}

#[tokio::test]
async fn unresolved_imports_share_one_external_node() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.py"), "import numpy\n").unwrap();
    fs::write(temp.path().join("b.py"), "import numpy\nimport numpy\n").unwrap();

    let graph = GraphBuilder::new(temp.path()).build().await.unwrap();

    let externals = graph.nodes_by_kind(NodeKind::External);
    assert_eq!(externals.len(), 1);
    assert_eq!(externals[0].id, "external::numpy");

    let importers = graph.imported_by("external::numpy");
    let mut ids: Vec<_> = importers.iter().map(|n| n.id.clone()).collect();
    ids.sort();
    assert_eq!(ids, vec!["a.py".to_string(), "b.py".to_string()]);
}

#[tokio::test]
async fn rebuilding_an_unchanged_tree_yields_identical_ids() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("svc.py"),
        "import os\n\nclass Service:\n    def start(self):\n        pass\n\n    def start_legacy(self):\n        pass\n",
    )
    .unwrap();

    let first = GraphBuilder::new(temp.path()).build().await.unwrap();
    let second = GraphBuilder::new(temp.path()).build().await.unwrap();

    let first_ids: Vec<_> = first.nodes().map(|n| n.id.clone()).collect();
    let second_ids: Vec<_> = second.nodes().map(|n| n.id.clone()).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn latin1_file_parses_with_correct_names() {
    let temp = tempdir().unwrap();
    // Latin-1 encoded "café", invalid as UTF-8.
    fs::write(temp.path().join("menu.py"), b"def caf\xe9(): ...\n").unwrap();

    let graph = GraphBuilder::new(temp.path()).build().await.unwrap();

    let functions = graph.nodes_by_kind(NodeKind::Function);
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name, "caf\u{e9}");
}

#[tokio::test]
async fn methods_are_contained_by_their_class() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("m.py"),
        "class Box:\n    def open(self):\n        pass\n\ndef free(): ...\n",
    )
    .unwrap();

    let graph = GraphBuilder::new(temp.path()).build().await.unwrap();

    let method_parents = graph.ancestors("m.py::function::open::2");
    let parent_ids: Vec<_> = method_parents.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(parent_ids, vec!["m.py::class::Box::1", "m.py"]);

    let free_parents = graph.ancestors("m.py::function::free::5");
    let parent_ids: Vec<_> = free_parents.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(parent_ids, vec!["m.py"]);
}

#[tokio::test]
async fn empty_tree_builds_an_empty_graph() {
    let temp = tempdir().unwrap();

    let (graph, stats) = GraphBuilder::new(temp.path())
        .build_with_stats()
        .await
        .unwrap();

    assert_eq!(graph.stats().nodes, 0);
    assert_eq!(graph.stats().edges, 0);
    assert_eq!(stats.files, 0);
}

#[tokio::test]
async fn invalid_root_fails_the_whole_build() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("does-not-exist");

    let err = GraphBuilder::new(&missing).build().await.unwrap_err();
    assert!(matches!(err, BuildError::InvalidRoot(path) if path == missing));

    let file = temp.path().join("file.py");
    fs::write(&file, "x = 1\n").unwrap();
    let err = GraphBuilder::new(&file).build().await.unwrap_err();
    assert!(matches!(err, BuildError::InvalidRoot(_)));
}

#[tokio::test]
async fn relative_js_imports_resolve_within_the_tree() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("app.js"), "import { helper } from './util.js';\n").unwrap();
    fs::write(src.join("util.js"), "export function helper() {}\n").unwrap();

    let graph = GraphBuilder::new(temp.path()).build().await.unwrap();

    let imported = graph.imports_of("src/app.js");
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].id, "src/util.js");
    assert!(graph.nodes_by_kind(NodeKind::External).is_empty());
}
