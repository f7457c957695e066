//! Compiling the lines of one ignore file into a [`RuleSet`].

use std::path::Path;

use super::probe::{DirProbe, FsProbe, StaticProbe};
use crate::glob::{join_literal_dir, GlobPattern};

/// One compiled ignore pattern.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: String,
    is_dir_rule: bool,
    matches_subdirs: bool,
    kind: RuleKind,
}

#[derive(Debug, Clone)]
enum RuleKind {
    /// Applies at the owning directory and everywhere beneath it.
    Unanchored {
        path: GlobPattern,
        contents: Option<GlobPattern>,
    },
    /// Applies to direct children of exactly one directory.
    Anchored {
        parent: String,
        name: GlobPattern,
        /// For directory rules: the directory whose children all match.
        children_of: Option<String>,
    },
}

impl Rule {
    fn new(directory: &str, pattern: String, is_dir_rule: bool, matches_subdirs: bool) -> Self {
        let kind = if matches_subdirs {
            // `*` crosses separators, so `dir/*` covers the whole subtree.
            let contents = format!("{pattern}/*");
            RuleKind::Unanchored {
                path: GlobPattern::new(&join_literal_dir(directory, &pattern)),
                contents: is_dir_rule
                    .then(|| GlobPattern::new(&join_literal_dir(directory, &contents))),
            }
        } else {
            let (pattern_dir, pattern_name) = split_parent(&pattern);
            RuleKind::Anchored {
                parent: join_dir(directory, pattern_dir),
                name: GlobPattern::new(pattern_name),
                children_of: is_dir_rule.then(|| join_dir(directory, &pattern)),
            }
        };

        Self {
            pattern,
            is_dir_rule,
            matches_subdirs,
            kind,
        }
    }

    /// The pattern with anchoring and trailing slash removed.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the rule names a directory (everything beneath it is excluded).
    pub fn is_dir_rule(&self) -> bool {
        self.is_dir_rule
    }

    /// `false` for anchored (`/`-prefixed) rules.
    pub fn matches_subdirs(&self) -> bool {
        self.matches_subdirs
    }

    /// Whether the root-relative `path` is excluded by this rule.
    pub fn matches(&self, path: &str) -> bool {
        match &self.kind {
            RuleKind::Unanchored { path: glob, contents } => {
                contents.as_ref().is_some_and(|c| c.matches(path)) || glob.matches(path)
            }
            RuleKind::Anchored {
                parent,
                name,
                children_of,
            } => {
                let (path_dir, path_name) = split_parent(path);
                (path_dir == parent.as_str() && name.matches(path_name))
                    || children_of.as_deref() == Some(path_dir)
            }
        }
    }
}

/// The ordered rules of one directory's ignore file. Immutable once built.
#[derive(Debug, Clone)]
pub struct RuleSet {
    directory: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile `lines` for `directory` (root-relative, `""` or `"."` for the
    /// root) without touching the filesystem: only a trailing `/` makes a
    /// directory rule.
    pub fn from_lines<I, S>(directory: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RuleCompiler::with_probe(StaticProbe::default()).compile(
            directory,
            Path::new(directory),
            lines,
        )
    }

    /// Compile `lines` for `directory`, which lives on disk at `location`.
    /// Names that exist there as directories become directory rules.
    pub fn from_lines_at<I, S>(directory: &str, location: &Path, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RuleCompiler::new().compile(directory, location, lines)
    }

    /// Like [`RuleSet::from_lines`] but for a whole file body.
    pub fn parse(directory: &str, text: &str) -> Self {
        Self::from_lines(directory, text.lines())
    }

    /// Root-relative directory owning these rules; empty for the root.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule in this set excludes `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    /// The first rule, in file order, that excludes `path`.
    pub fn first_match(&self, path: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }
}

/// Turns ignore-file lines into a [`RuleSet`].
///
/// Lines without a trailing `/` are checked against the filesystem (through
/// the [`DirProbe`]) to decide whether they name a directory.
#[derive(Debug, Clone, Default)]
pub struct RuleCompiler<P = FsProbe> {
    probe: P,
}

impl RuleCompiler<FsProbe> {
    pub fn new() -> Self {
        Self { probe: FsProbe }
    }
}

impl<P: DirProbe> RuleCompiler<P> {
    pub fn with_probe(probe: P) -> Self {
        Self { probe }
    }

    /// Compile `lines` for the root-relative `directory`, which lives on disk
    /// at `location`.
    pub fn compile<I, S>(&self, directory: &str, location: &Path, lines: I) -> RuleSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let directory = normalize_dir(directory);
        let rules = lines
            .into_iter()
            .filter_map(|line| self.compile_line(&directory, location, line.as_ref()))
            .collect();

        RuleSet { directory, rules }
    }

    fn compile_line(&self, directory: &str, location: &Path, line: &str) -> Option<Rule> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (body, explicit_dir) = match line.strip_suffix('/') {
            Some(body) => (body, true),
            None => (line, false),
        };
        let anchored = body.starts_with('/');
        let pattern = body.trim_start_matches('/');
        if pattern.is_empty() {
            return None;
        }

        let is_dir_rule = explicit_dir || self.probe.is_dir(&location.join(pattern));
        Some(Rule::new(directory, pattern.to_string(), is_dir_rule, !anchored))
    }
}

fn normalize_dir(directory: &str) -> String {
    let directory = directory.trim_end_matches('/');
    match directory {
        "." => String::new(),
        d => d.strip_prefix("./").unwrap_or(d).to_string(),
    }
}

/// Split `a/b/c` into (`a/b`, `c`); a bare name has an empty parent.
pub(crate) fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

fn join_dir(base: &str, child: &str) -> String {
    match (base.is_empty(), child.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => child.to_string(),
        (false, false) => format!("{base}/{child}"),
    }
}
