//! Enumerating files below a root directory.

mod stream;
mod walk;

use std::ops::ControlFlow;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::AtomicBool;

use crate::glob::GlobPattern;

pub use stream::FileStream;
use walk::Walk;

/// Walks a directory tree and reports every file that is neither hidden nor
/// ignored, optionally narrowed down by a glob on the root-relative path.
///
/// Reported paths are relative to the root and always use `/` separators.
/// Traversal is depth-first with entries of each directory in name order.
#[derive(Debug, Clone)]
pub struct FileFinder {
    root: PathBuf,
    filter: Option<GlobPattern>,
}

impl FileFinder {
    /// `pattern` is matched case-insensitively against the whole relative
    /// path; `*` also matches `/`. `None` or an empty pattern matches all.
    pub fn new(root: impl AsRef<Path>, pattern: Option<&str>) -> Self {
        let filter = pattern
            .filter(|p| !p.is_empty())
            .map(|p| GlobPattern::case_insensitive(&p.to_lowercase()));

        Self {
            root: normalize_root(root.as_ref()),
            filter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pattern(&self) -> Option<&str> {
        self.filter.as_ref().map(GlobPattern::as_str)
    }

    /// Run one full traversal, handing each matching path to `consumer`.
    ///
    /// Returning [`ControlFlow::Break`] from the consumer stops the whole
    /// walk. Unreadable directories and ignore files are skipped silently, so
    /// a missing root simply produces nothing.
    pub fn start<F>(&self, consumer: F) -> ControlFlow<()>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        tracing::debug!(root = %self.root.display(), pattern = ?self.pattern(), "starting walk");
        Walk::new(self.filter.as_ref(), consumer).run(&self.root)
    }

    /// Like [`FileFinder::start`], also stopping as soon as `cancel` is set.
    pub fn start_cancellable<F>(&self, cancel: &AtomicBool, consumer: F) -> ControlFlow<()>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        Walk::new(self.filter.as_ref(), consumer)
            .cancel_on(cancel)
            .run(&self.root)
    }

    /// All matching paths, in traversal order.
    pub fn collect(&self) -> Vec<String> {
        let mut paths = Vec::new();
        let _ = self.start(|path| {
            paths.push(path.to_string());
            ControlFlow::Continue(())
        });
        paths
    }

    /// Walk on a background thread, yielding paths as they are found.
    pub fn stream(&self) -> FileStream {
        FileStream::spawn(self.clone())
    }
}

/// Anything that can feed relative file paths to a consumer.
pub trait FileSource {
    fn for_each_file(&self, consumer: &mut dyn FnMut(&str) -> ControlFlow<()>) -> ControlFlow<()>;
}

impl FileSource for FileFinder {
    fn for_each_file(&self, consumer: &mut dyn FnMut(&str) -> ControlFlow<()>) -> ControlFlow<()> {
        self.start(consumer)
    }
}

/// Make `root` absolute and lexically clean (no `.`/`..`, no doubled or
/// trailing separators). Symlinks are left alone.
fn normalize_root(root: &Path) -> PathBuf {
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(root))
            .unwrap_or_else(|_| root.to_path_buf())
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    fold_case(normalized)
}

#[cfg(windows)]
fn fold_case(path: PathBuf) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_lowercase())
}

#[cfg(not(windows))]
fn fold_case(path: PathBuf) -> PathBuf {
    path
}
