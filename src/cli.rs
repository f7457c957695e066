use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "snapopen",
    version,
    about = "List files for a fuzzy file picker, honoring .snapopen_ignore files",
    after_help = "Examples:\n  snapopen\n  snapopen ~/src/project '*.rs'\n  snapopen . 'src/*test*' -n 20"
)]
pub struct Args {
    /// Directory to list (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Case-insensitive glob matched against the relative path ('*' also matches '/')
    pub pattern: Option<String>,

    /// Stop after this many results (0 for unlimited)
    #[arg(short = 'n', long = "max-results")]
    pub max_results: Option<usize>,

    /// Separate results with NUL instead of newline
    #[arg(short = '0', long = "print0")]
    pub print0: bool,

    /// Log traversal decisions to stderr (repeat for more detail)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        if self.pattern.as_deref() == Some("") {
            self.pattern = None;
        }
        if self.max_results == Some(0) {
            self.max_results = None;
        }
        self
    }

    /// Default log filter when `SNAPOPEN_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("snapopen").chain(args.iter().copied()))
            .unwrap()
            .validated()
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.pattern, None);
        assert_eq!(args.max_results, None);
        assert!(!args.print0);
        assert_eq!(args.default_log_filter(), "warn");
    }

    #[test]
    fn empty_pattern_and_zero_limit_are_normalized() {
        let args = parse(&["dir", "", "-n", "0"]);
        assert_eq!(args.pattern, None);
        assert_eq!(args.max_results, None);
    }

    #[test]
    fn verbosity_selects_log_filter() {
        assert_eq!(parse(&["-v"]).default_log_filter(), "debug");
        assert_eq!(parse(&["-vv"]).default_log_filter(), "trace");
        assert_eq!(parse(&["-q"]).default_log_filter(), "error");
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["snapopen", "-q", "-v"]).is_err());
    }
}
