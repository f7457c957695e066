//! End-to-end walk over a realistic project tree.
//!
//! Run with tracing output:
//!   RUST_LOG=trace cargo test --test final_integration -- --nocapture

mod common;

use common::write_ignore;
use snapopen::FileFinder;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tempfile::TempDir;
use tracing::{debug, info, span, Level};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

fn create_project_fixture(root: &Path) {
    info!("Creating project fixture at {}", root.display());

    let files = [
        ("src/main.rs", "fn main() { }"),
        ("src/lib.rs", "pub mod components;"),
        ("src/components/button.rs", "pub struct Button;"),
        ("src/components/button.generated.rs", "// generated"),
        ("tests/integration.rs", "#[test] fn it_works() {}"),
        ("docs/README.md", "# My Project"),
        ("docs/api/index.html", "<html>"),
        ("docs/api/search.html", "<html>"),
        ("docs/api/types/Button.html", "<html>"),
        ("target/debug/app", ""),
        ("target/debug/deps/app.d", ""),
        ("Cargo.toml", "[package]\nname = \"myproject\""),
        ("Cargo.lock", "# auto-generated"),
        (".gitignore", "target/\n"),
        (".git/config", "[core]"),
    ];

    for (file, content) in &files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        debug!("  Created file: {}", file);
    }

    write_ignore(root, "", &["# build output", "target", "*.lock"]);
    write_ignore(root, "src", &["*.generated.rs"]);
    write_ignore(root, "docs/api", &["/*.html"]);
}

#[test]
fn test_full_walk() {
    init_tracing();
    let _span = span!(Level::INFO, "full_walk").entered();

    let tmp = TempDir::new().unwrap();
    create_project_fixture(tmp.path());

    let finder = FileFinder::new(tmp.path(), None);
    let files = finder.collect();
    info!("Walk found {} files", files.len());

    assert_eq!(
        files,
        vec![
            "Cargo.toml",
            "docs/README.md",
            "docs/api/types/Button.html",
            "src/components/button.rs",
            "src/lib.rs",
            "src/main.rs",
            "tests/integration.rs",
        ]
    );

    let rust_files = FileFinder::new(tmp.path(), Some("*.RS")).collect();
    assert_eq!(
        rust_files,
        vec![
            "src/components/button.rs",
            "src/lib.rs",
            "src/main.rs",
            "tests/integration.rs",
        ]
    );

    let src_only = FileFinder::new(tmp.path(), Some("src/*")).collect();
    assert_eq!(src_only.len(), 3);
    assert!(src_only.iter().all(|p| p.starts_with("src/")));

    // Mutations are picked up by the next walk.
    fs::write(tmp.path().join("src/new_feature.rs"), "").unwrap();
    fs::remove_file(tmp.path().join("docs/README.md")).unwrap();
    let after = finder.collect();
    assert!(after.contains(&"src/new_feature.rs".to_string()));
    assert!(!after.contains(&"docs/README.md".to_string()));
}

#[test]
fn test_large_tree_smoke() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    for d in 0..20 {
        for f in 0..50 {
            let path = tmp.path().join(format!("dir{d:02}/sub/file{f:02}.txt"));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
        }
    }
    write_ignore(tmp.path(), "", &["*file0?.txt"]);

    let start = Instant::now();
    let files = FileFinder::new(tmp.path(), None).collect();
    info!("Walked {} files in {:?}", files.len(), start.elapsed());

    assert_eq!(files.len(), 20 * 40);
    assert_eq!(files.first().map(String::as_str), Some("dir00/sub/file10.txt"));
}
