use std::collections::HashSet;
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use walkdir::{DirEntry, WalkDir};

use crate::glob::GlobPattern;
use crate::ignore::{RuleChain, RuleCompiler, RuleSet, IGNORE_FILE_NAME};

/// State for one traversal: the consumer and the set of directories already
/// entered (by canonical path).
pub(super) struct Walk<'a, F> {
    filter: Option<&'a GlobPattern>,
    cancel: Option<&'a AtomicBool>,
    visited: HashSet<PathBuf>,
    consumer: F,
}

impl<'a, F> Walk<'a, F>
where
    F: FnMut(&str) -> ControlFlow<()>,
{
    pub(super) fn new(filter: Option<&'a GlobPattern>, consumer: F) -> Self {
        Self {
            filter,
            cancel: None,
            visited: HashSet::new(),
            consumer,
        }
    }

    /// Stop the walk once `cancel` is set, checked before every directory
    /// and every emitted path.
    pub(super) fn cancel_on(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn check_cancel(&self) -> ControlFlow<()> {
        match self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }

    pub(super) fn run(mut self, root: &Path) -> ControlFlow<()> {
        // Seeded with the root itself rather than starting empty: a symlink
        // back to the root then counts as a cycle, instead of listing the
        // whole tree once more under the link's name.
        if let Ok(real_root) = fs::canonicalize(root) {
            self.visited.insert(real_root);
        }
        self.walk_dir(root, "", &RuleChain::empty())
    }

    fn walk_dir(&mut self, dir: &Path, rel_dir: &str, inherited: &RuleChain) -> ControlFlow<()> {
        self.check_cancel()?;
        let entries = match list_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(dir = %dir.display(), %err, "cannot list directory, pruning");
                return ControlFlow::Continue(());
            }
        };

        let chain = match load_rules(dir, rel_dir) {
            Some(rules) => inherited.extend(rules),
            None => inherited.clone(),
        };

        for entry in entries {
            let Some(name) = entry.file_name().to_str() else {
                tracing::debug!(path = %entry.path().display(), "skipping non-UTF-8 name");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            let rel_path = join_rel(rel_dir, name);
            if let Some((owner, rule)) = chain.first_match(&rel_path) {
                tracing::trace!(
                    path = %rel_path,
                    rule = rule.pattern(),
                    owner = owner.directory(),
                    "ignored"
                );
                continue;
            }

            if is_dir(&entry) {
                let real_path = match fs::canonicalize(entry.path()) {
                    Ok(real_path) => real_path,
                    Err(err) => {
                        tracing::debug!(path = %rel_path, %err, "cannot resolve directory, pruning");
                        continue;
                    }
                };
                if !self.visited.insert(real_path) {
                    tracing::debug!(path = %rel_path, "directory already visited, skipping");
                    continue;
                }
                self.check_cancel()?;
                self.walk_dir(entry.path(), &rel_path, &chain)?;
            } else if self.filter.map_or(true, |f| f.matches(&rel_path)) {
                self.check_cancel()?;
                (self.consumer)(&rel_path)?;
            }
        }

        ControlFlow::Continue(())
    }
}

/// Direct children of `dir`, sorted by name. Fails only when `dir` itself
/// cannot be read; entries that vanish while listing are dropped.
fn list_dir(dir: &Path) -> Result<Vec<DirEntry>, walkdir::Error> {
    let mut entries = Vec::new();
    let listing = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in listing {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) if err.depth() == 0 => return Err(err),
            Err(err) => tracing::debug!(%err, "skipping unreadable entry"),
        }
    }
    Ok(entries)
}

/// Symlinks count as directories when their target is one. Dangling links
/// are treated as files.
fn is_dir(entry: &DirEntry) -> bool {
    if entry.path_is_symlink() {
        fs::metadata(entry.path()).is_ok_and(|m| m.is_dir())
    } else {
        entry.file_type().is_dir()
    }
}

fn load_rules(dir: &Path, rel_dir: &str) -> Option<RuleSet> {
    let ignore_file = dir.join(IGNORE_FILE_NAME);
    let text = fs::read_to_string(&ignore_file).ok()?;
    let rules = RuleCompiler::new().compile(rel_dir, dir, text.lines());
    tracing::debug!(dir = rel_dir, rules = rules.len(), "loaded ignore file");
    Some(rules)
}

fn join_rel(rel_dir: &str, name: &str) -> String {
    if rel_dir.is_empty() {
        name.to_string()
    } else {
        format!("{rel_dir}/{name}")
    }
}
