//! Best-effort import-to-file resolution.
//!
//! Candidate paths are generated from the import specifier, filtered against
//! the set of files discovered in the same scan, and the shortest surviving
//! path wins (ties broken lexicographically). Everything that fails to
//! resolve becomes an external placeholder node upstream.

use std::collections::HashSet;

/// Resolve an import specifier to a scanned file's relative path.
///
/// `importer` is the relative path of the importing file; `files` is the
/// full set of relative paths discovered by the scan.
pub(crate) fn resolve_import(
    module: &str,
    importer: &str,
    files: &HashSet<String>,
) -> Option<String> {
    candidate_paths(module, importer)
        .into_iter()
        .filter(|candidate| files.contains(candidate))
        .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
}

fn candidate_paths(module: &str, importer: &str) -> Vec<String> {
    let importer_dir = importer
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .unwrap_or("");

    if module.starts_with("./") || module.starts_with("../") {
        return path_style_candidates(importer_dir, module);
    }
    if module.starts_with('.') {
        return python_relative_candidates(importer_dir, module);
    }
    if module.contains("::") {
        return rust_use_candidates(importer_dir, module);
    }
    dotted_candidates(importer_dir, module)
}

/// `./util.js`, `../lib/helper` — relative specifiers from JS/TS
fn path_style_candidates(importer_dir: &str, module: &str) -> Vec<String> {
    let Some(base) = join_normalize(importer_dir, module) else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    // Exact hit first: specifiers may carry their extension.
    candidates.push(base.clone());
    for ext in ["py", "js", "ts", "tsx", "jsx", "rs"] {
        candidates.push(format!("{base}.{ext}"));
    }
    for index in ["index.js", "index.ts", "__init__.py"] {
        candidates.push(format!("{base}/{index}"));
    }
    candidates
}

/// `.sibling`, `..pkg.mod`, bare `.` — Python relative imports
fn python_relative_candidates(importer_dir: &str, module: &str) -> Vec<String> {
    let dots = module.chars().take_while(|&c| c == '.').count();
    let rest = &module[dots..];

    // One dot is the importing file's own package; each extra dot ascends.
    let mut base: Vec<&str> = if importer_dir.is_empty() {
        Vec::new()
    } else {
        importer_dir.split('/').collect()
    };
    for _ in 1..dots {
        if base.pop().is_none() {
            return Vec::new(); // escapes the scanned tree
        }
    }

    let mut path = base.join("/");
    if !rest.is_empty() {
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(&rest.replace('.', "/"));
    }

    if path.is_empty() {
        return vec!["__init__.py".to_string()];
    }
    vec![format!("{path}.py"), format!("{path}/__init__.py")]
}

/// `crate::util::helpers`, `self::kind` — Rust use paths
fn rust_use_candidates(importer_dir: &str, module: &str) -> Vec<String> {
    let mut segments: Vec<&str> = module.split("::").collect();
    while matches!(segments.first(), Some(&"crate") | Some(&"self") | Some(&"super")) {
        segments.remove(0);
    }
    if segments.is_empty() {
        return Vec::new();
    }

    // The last segment is usually an item, not a module, so try both the
    // full path and the path with the item dropped.
    let mut bases = vec![segments.join("/")];
    if segments.len() > 1 {
        bases.push(segments[..segments.len() - 1].join("/"));
    }

    let mut candidates = Vec::new();
    for base in &bases {
        candidates.push(format!("{base}.rs"));
        candidates.push(format!("src/{base}.rs"));
        candidates.push(format!("{base}/mod.rs"));
        candidates.push(format!("src/{base}/mod.rs"));
        if let Some(joined) = join_normalize(importer_dir, base) {
            candidates.push(format!("{joined}.rs"));
            candidates.push(format!("{joined}/mod.rs"));
        }
    }
    candidates
}

/// `a.b.c` package-style dotted names (Python absolute imports)
fn dotted_candidates(importer_dir: &str, module: &str) -> Vec<String> {
    let path = module.replace('.', "/");

    let mut candidates = vec![format!("{path}.py"), format!("{path}/__init__.py")];
    if let Some(joined) = join_normalize(importer_dir, &path) {
        if joined != path {
            candidates.push(format!("{joined}.py"));
            candidates.push(format!("{joined}/__init__.py"));
        }
    }
    candidates
}

/// Join a relative specifier onto a directory and collapse `.`/`..`
/// segments. Returns `None` when the result would escape the scanned root.
fn join_normalize(base: &str, rel: &str) -> Option<String> {
    let mut parts: Vec<&str> = if base.is_empty() {
        Vec::new()
    } else {
        base.split('/').collect()
    };

    for segment in rel.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return None;
                }
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}
