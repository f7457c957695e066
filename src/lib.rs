#![forbid(unsafe_code)]
//! SnapOpen: file enumeration for fuzzy "open file" pickers, honoring
//! per-directory `.snapopen_ignore` files.

pub mod cli;
pub mod finder;
pub mod glob;
pub mod ignore;

pub use finder::{FileFinder, FileSource, FileStream};
pub use ignore::IGNORE_FILE_NAME;
