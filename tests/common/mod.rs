use snapopen::{FileFinder, IGNORE_FILE_NAME};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a directory structure from a list of relative paths.
/// Paths ending with '/' create directories; others create empty files.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, "").unwrap();
        }
    }
    tmp
}

/// Write an ignore file into `dir` (relative to `root`).
pub fn write_ignore(root: &Path, dir: &str, lines: &[&str]) {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(dir.join(IGNORE_FILE_NAME), body).unwrap();
}

/// Paths reported for `root`, in emission order.
pub fn list(root: &Path, pattern: Option<&str>) -> Vec<String> {
    FileFinder::new(root, pattern).collect()
}

/// Paths reported for `root`, as a set.
pub fn list_set(root: &Path, pattern: Option<&str>) -> HashSet<String> {
    list(root, pattern).into_iter().collect()
}

pub fn set_of(paths: &[&str]) -> HashSet<String> {
    paths.iter().map(|p| p.to_string()).collect()
}
