use atlas_parser::Language;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Scanner for finding source files in a project
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Scan directory for source files (.gitignore aware).
    ///
    /// Results are sorted by path so downstream node ids and stats are
    /// deterministic for an unchanged tree.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true) // do not scan hidden files by default
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false); // scanned trees are not always git repos
        builder.filter_entry(move |entry| !FileScanner::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > MAX_FILE_SIZE_BYTES {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                MAX_FILE_SIZE_BYTES
                            );
                            continue;
                        }
                    }

                    if !Self::is_source_file(path) {
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} source files", files.len());
        files
    }

    /// Check if file has a parseable source extension
    fn is_source_file(path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            let ext = ext.to_lowercase();
            return Language::source_extensions()
                .iter()
                .any(|candidate| candidate == &ext);
        }
        false
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        if let Ok(relative) = path.strip_prefix(root) {
            for component in relative.components() {
                if let std::path::Component::Normal(name) = component {
                    let lowered = name.to_string_lossy().to_lowercase();
                    if IGNORED_SCOPES.iter().any(|ignored| ignored == &lowered) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    // caches / builds
    "node_modules",
    "build",
    "dist",
    "coverage",
    "target",
    ".venv",
    "venv",
    "env",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    // data / vendor
    "vendor",
    "third_party",
    "third-party",
];

const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB

#[cfg(test)]
mod tests {
    use super::FileScanner;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn skips_ignored_directories() {
        let temp = tempdir().unwrap();
        let venv = temp.path().join(".venv").join("lib");
        fs::create_dir_all(&venv).unwrap();
        fs::write(venv.join("site.py"), b"x = 1").unwrap();
        let pycache = temp.path().join("__pycache__");
        fs::create_dir_all(&pycache).unwrap();
        fs::write(pycache.join("mod.py"), b"x = 1").unwrap();
        fs::write(temp.path().join("main.py"), b"x = 1").unwrap();

        let files = FileScanner::new(temp.path()).scan();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.py"));
    }

    #[test]
    fn respects_gitignore_patterns() {
        let temp = tempdir().unwrap();
        let generated = temp.path().join("generated");
        fs::create_dir_all(&generated).unwrap();
        fs::write(generated.join("schema.py"), b"x = 1").unwrap();
        fs::write(temp.path().join("app.py"), b"x = 1").unwrap();
        fs::write(temp.path().join(".gitignore"), b"/generated\n").unwrap();

        let files = FileScanner::new(temp.path()).scan();

        assert!(files.iter().all(|p| !p.to_string_lossy().contains("generated")));
        assert!(files.iter().any(|p| p.ends_with("app.py")));
    }

    #[test]
    fn filters_non_source_extensions() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("readme.md"), b"# hi").unwrap();
        fs::write(temp.path().join("data.json"), b"{}").unwrap();
        fs::write(temp.path().join("lib.rs"), b"fn main() {}").unwrap();

        let files = FileScanner::new(temp.path()).scan();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("lib.rs"));
    }

    #[test]
    fn results_are_sorted() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("zebra.py"), b"x = 1").unwrap();
        fs::write(temp.path().join("alpha.py"), b"x = 1").unwrap();

        let files = FileScanner::new(temp.path()).scan();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["alpha.py", "zebra.py"]);
    }
}
