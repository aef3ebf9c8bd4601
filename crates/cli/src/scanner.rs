use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Build output directories that never hold script sources
const SKIPPED_DIRS: &[&str] = &["bin", "obj"];

/// Scanner for finding C# fragments under a directory
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Scan directory for `.cs` files (.gitignore aware), sorted by path
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(move |entry| !Self::is_skipped_dir(entry.path(), &root));

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
                    if !flatscript_composer::CSharpDocument::is_source_path(path) {
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::debug!("Found {} fragment(s) in {}", files.len(), self.root.display());
        files
    }

    fn is_skipped_dir(path: &Path, root: &Path) -> bool {
        if path == root {
            return false;
        }

        path.is_dir()
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| SKIPPED_DIRS.contains(&name))
    }
}

/// Expand inputs into fragment paths: files are kept, directories are scanned
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for input in inputs {
        if input.is_dir() {
            out.extend(FileScanner::new(input).scan());
        } else {
            out.push(input.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_sorted_and_filtered() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("Scripts")).unwrap();
        fs::create_dir_all(root.join("obj")).unwrap();
        fs::write(root.join("Program.cs"), "class Program { }").unwrap();
        fs::write(root.join("Scripts/Helper.cs"), "class Helper { }").unwrap();
        fs::write(root.join("obj/Generated.cs"), "class Generated { }").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();

        let files = FileScanner::new(root).scan();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["Program.cs", "Scripts/Helper.cs"]);
    }

    #[test]
    fn test_expand_inputs_keeps_explicit_files() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("notes.txt");
        fs::write(&file, "class A { }").unwrap();

        let files = expand_inputs(&[file.clone()]);
        assert_eq!(files, vec![file]);
    }
}
