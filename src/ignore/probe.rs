//! Directory probing used to auto-detect directory rules.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Answers "is this path a directory right now?".
///
/// Any error while probing counts as "not a directory".
pub trait DirProbe {
    fn is_dir(&self, path: &Path) -> bool;
}

/// Probes the real filesystem, following symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl DirProbe for FsProbe {
    fn is_dir(&self, path: &Path) -> bool {
        std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }
}

/// A fixed set of directories, for compiling rules without touching disk.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    dirs: HashSet<PathBuf>,
}

impl StaticProbe {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }
}

impl DirProbe for StaticProbe {
    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }
}
