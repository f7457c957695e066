#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use snapopen::cli::Args;
use snapopen::{FileFinder, FileSource};
use std::io::{self, BufWriter, Write};
use std::ops::ControlFlow;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run_app() {
        eprintln!("snapopen: {e:#}");
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let args = Args::parse().validated();
    init_logging(&args);

    // The walk itself never fails, so check the root up front.
    let metadata = std::fs::metadata(&args.path)
        .with_context(|| format!("{}: failed to read path", args.path.display()))?;
    anyhow::ensure!(metadata.is_dir(), "{}: Not a directory", args.path.display());

    let finder = FileFinder::new(&args.path, args.pattern.as_deref());
    let separator = if args.print0 { b'\0' } else { b'\n' };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let printed = print_files(&finder, &mut out, args.max_results, separator)?;
    out.flush().or_else(ignore_broken_pipe)?;

    tracing::debug!(printed, "done");
    Ok(())
}

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_env("SNAPOPEN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Write every path from `source`, each followed by `separator`, stopping
/// after `limit` paths. A closed stdout ends the listing quietly.
fn print_files<W: Write>(
    source: &dyn FileSource,
    out: &mut W,
    limit: Option<usize>,
    separator: u8,
) -> Result<usize> {
    let mut printed = 0;
    let mut failure = None;

    let _ = source.for_each_file(&mut |path: &str| {
        if limit.is_some_and(|max| printed >= max) {
            return ControlFlow::Break(());
        }
        let written = out
            .write_all(path.as_bytes())
            .and_then(|()| out.write_all(&[separator]));
        match written {
            Ok(()) => {
                printed += 1;
                if limit.is_some_and(|max| printed >= max) {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
            Err(err) => {
                failure = Some(err);
                ControlFlow::Break(())
            }
        }
    });

    if let Some(err) = failure {
        ignore_broken_pipe(err).context("failed to write output")?;
    }
    Ok(printed)
}

fn ignore_broken_pipe(err: io::Error) -> io::Result<()> {
    if err.kind() == io::ErrorKind::BrokenPipe {
        Ok(())
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource(Vec<&'static str>);

    impl FileSource for FakeSource {
        fn for_each_file(
            &self,
            consumer: &mut dyn FnMut(&str) -> ControlFlow<()>,
        ) -> ControlFlow<()> {
            for &path in &self.0 {
                consumer(path)?;
            }
            ControlFlow::Continue(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn prints_one_path_per_line() {
        let mut out = Vec::new();
        let source = FakeSource(vec!["a.txt", "b/c.rs"]);
        let n = print_files(&source, &mut out, None, b'\n').unwrap();
        assert_eq!(n, 2);
        assert_eq!(out, b"a.txt\nb/c.rs\n");
    }

    #[test]
    fn limit_stops_early() {
        let mut out = Vec::new();
        let source = FakeSource(vec!["a", "b", "c"]);
        let n = print_files(&source, &mut out, Some(2), b'\0').unwrap();
        assert_eq!(n, 2);
        assert_eq!(out, b"a\0b\0");
    }

    #[test]
    fn broken_pipe_is_not_an_error() {
        let n = print_files(&FakeSource(vec!["a"]), &mut BrokenPipe, None, b'\n').unwrap();
        assert_eq!(n, 0);
    }
}
