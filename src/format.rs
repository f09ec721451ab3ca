//! Repository definition format detection

use std::fmt;

/// The two APT source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Legacy `sources.list` style: one `deb ...` entry per line.
    OneLine,
    /// RFC822-style stanzas (`.sources` files).
    Deb822,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::OneLine => f.write_str("one-line"),
            Format::Deb822 => f.write_str("deb822"),
        }
    }
}

/// Classify file content.
///
/// A file is deb822 as soon as one line starts with `Types:` (case-sensitive,
/// column 0). Everything else is one-line. The file extension plays no part.
pub fn classify(content: &str) -> Format {
    if content.lines().any(|line| line.starts_with("Types:")) {
        Format::Deb822
    } else {
        Format::OneLine
    }
}
