//! Per-directory ignore files: syntax, compilation and chained matching.
//!
//! Each line of an ignore file is one glob pattern. A trailing `/` marks a
//! directory rule; a leading `/` anchors the rule to the directory holding the
//! file. Rules of every ancestor directory stay in effect while descending.

mod chain;
mod probe;
mod rules;

pub use chain::{Iter, RuleChain};
pub use probe::{DirProbe, FsProbe, StaticProbe};
pub use rules::{Rule, RuleCompiler, RuleSet};

/// Name of the ignore file looked up in every visited directory.
pub const IGNORE_FILE_NAME: &str = ".snapopen_ignore";
