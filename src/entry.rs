//! # Repository Entry Model
//!
//! This module holds the in-memory representation of APT repository
//! definitions in both formats, built so that rendering an unmodified model
//! reproduces the input byte-for-byte.
//!
//! ## One-line format
//!
//! A [`ListDocument`] is the ordered list of a file's lines. Each line is one
//! of:
//!
//! - an active entry ([`EntryLine`]): `deb|deb-src [options] URI suite
//!   component...`, parsed into a [`SourceEntry`];
//! - a commented-out entry (`# deb ...`), recognised but never touched;
//! - anything else, kept verbatim.
//!
//! ## deb822 format
//!
//! A [`StanzaDocument`] is an ordered list of blocks: paragraphs of
//! `Key: value` fields ([`SourceStanza`]) and the blank-line separators
//! between them. A `Types:` field opens a new declaration: when a paragraph
//! already has one, a second `Types:` line starts a new stanza, so nothing
//! about one stanza carries over into the next.
//!
//! ## Mutation
//!
//! Both models implement [`RepositoryEntry`], the seam the component
//! augmenter works through. Components are appended by inserting text at a
//! byte offset of the original line, which leaves every other byte in place.

use std::fmt;

/// A parse problem tied to a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line: usize,
    pub message: String,
}

impl LineError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for LineError {}

/// One logical repository declaration, as seen by the augmenter.
pub trait RepositoryEntry {
    /// Whether this entry may receive components at all.
    fn is_eligible(&self) -> bool;

    /// The repository URIs the entry points at.
    fn uris(&self) -> Vec<&str>;

    /// The component tokens currently declared.
    fn components(&self) -> Vec<&str>;

    /// Append `names` after the existing component list.
    fn append_components(&mut self, names: &[&str]);
}

/// Split content into `(body, terminator)` pairs.
///
/// The terminator is `"\n"`, `"\r\n"`, or empty for an unterminated last line.
pub(crate) fn split_lines(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content.split_inclusive('\n').map(|raw| {
        let body = match raw.strip_suffix('\n') {
            Some(body) => body.strip_suffix('\r').unwrap_or(body),
            None => raw,
        };
        (body, &raw[body.len()..])
    })
}

/// Whitespace-separated tokens with their byte offsets.
fn tokens(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push((s, &text[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push((s, &text[s..]));
    }

    out
}

fn insertion_text(names: &[&str]) -> String {
    names.iter().map(|name| format!(" {}", name)).collect()
}

// ============================================================================
// One-line format
// ============================================================================

/// Archive type of a one-line entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    /// `deb`
    Binary,
    /// `deb-src`
    Source,
}

impl ArchiveType {
    fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("deb") {
            Some(ArchiveType::Binary)
        } else if token.eq_ignore_ascii_case("deb-src") {
            Some(ArchiveType::Source)
        } else {
            None
        }
    }
}

/// The fields of an active one-line entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub archive_type: ArchiveType,
    /// The raw `[ ... ]` options block, brackets included.
    pub options: Option<String>,
    pub uri: String,
    pub suite: String,
    pub components: Vec<String>,
}

impl SourceEntry {
    /// Parse a line body.
    ///
    /// Returns `Ok(None)` when the line is not an active entry, and the entry
    /// together with the byte offset right after its last component (or its
    /// suite, when it has none) otherwise.
    pub fn parse(text: &str) -> Result<Option<(SourceEntry, usize)>, String> {
        let toks = tokens(text);
        let (type_start, first) = match toks.first() {
            Some(tok) => *tok,
            None => return Ok(None),
        };
        let archive_type = match ArchiveType::from_token(first) {
            Some(archive_type) => archive_type,
            None => return Ok(None),
        };

        let mut fields_start = type_start + first.len();
        let mut options = None;
        if let Some((start, tok)) = toks.get(1) {
            if tok.starts_with('[') {
                let (end_start, end_tok) = toks[1..]
                    .iter()
                    .find(|(_, t)| t.ends_with(']'))
                    .copied()
                    .ok_or_else(|| "unterminated options block".to_string())?;
                fields_start = end_start + end_tok.len();
                options = Some(text[*start..fields_start].to_string());
            }
        }

        // Everything from the first `#` after the options is a comment, even
        // inside a token.
        let fields_end = text[fields_start..]
            .find('#')
            .map_or(text.len(), |at| fields_start + at);
        let fields: Vec<(usize, &str)> = tokens(&text[fields_start..fields_end])
            .into_iter()
            .map(|(at, tok)| (fields_start + at, tok))
            .collect();

        let uri = match fields.first() {
            Some((_, t)) => *t,
            None => return Err("missing repository URI".to_string()),
        };
        let (suite_start, suite) = match fields.get(1) {
            Some(field) => *field,
            None => return Err(format!("missing suite after '{}'", uri)),
        };

        let mut insert_at = suite_start + suite.len();
        let mut components = Vec::new();
        for (start, tok) in &fields[2..] {
            components.push(tok.to_string());
            insert_at = start + tok.len();
        }

        Ok(Some((
            SourceEntry {
                archive_type,
                options,
                uri: uri.to_string(),
                suite: suite.to_string(),
                components,
            },
            insert_at,
        )))
    }

    /// A suite ending in `/` names an exact path and takes no components.
    pub fn is_flat(&self) -> bool {
        self.suite.ends_with('/')
    }
}

/// An active entry together with the exact text it came from.
#[derive(Debug, Clone)]
pub struct EntryLine {
    text: String,
    eol: String,
    entry: SourceEntry,
    insert_at: usize,
}

impl RepositoryEntry for EntryLine {
    fn is_eligible(&self) -> bool {
        !self.entry.is_flat()
    }

    fn uris(&self) -> Vec<&str> {
        vec![self.entry.uri.as_str()]
    }

    fn components(&self) -> Vec<&str> {
        self.entry.components.iter().map(String::as_str).collect()
    }

    fn append_components(&mut self, names: &[&str]) {
        let insertion = insertion_text(names);
        self.text.insert_str(self.insert_at, &insertion);
        self.insert_at += insertion.len();
        self.entry
            .components
            .extend(names.iter().map(|name| name.to_string()));
    }
}

/// One line of a one-line format file.
#[derive(Debug, Clone)]
pub enum ListLine {
    Entry(EntryLine),
    /// A `# deb ...` line. Never mutated.
    Commented { text: String, eol: String },
    /// Comments, blank lines and anything unrecognised.
    Verbatim { text: String, eol: String },
}

fn is_commented_entry(text: &str) -> bool {
    let rest = match text.trim_start().strip_prefix('#') {
        Some(rest) => rest,
        None => return false,
    };
    let rest = rest.trim_start_matches(|c: char| c == '#' || c.is_whitespace());
    rest.split_whitespace()
        .next()
        .and_then(ArchiveType::from_token)
        .is_some()
}

/// A parsed one-line format file.
#[derive(Debug, Clone, Default)]
pub struct ListDocument {
    lines: Vec<ListLine>,
}

impl ListDocument {
    pub fn parse(content: &str) -> Result<Self, LineError> {
        let mut lines = Vec::new();

        for (idx, (text, eol)) in split_lines(content).enumerate() {
            let line = match SourceEntry::parse(text).map_err(|msg| LineError::new(idx + 1, msg))? {
                Some((entry, insert_at)) => ListLine::Entry(EntryLine {
                    text: text.to_string(),
                    eol: eol.to_string(),
                    entry,
                    insert_at,
                }),
                None if is_commented_entry(text) => ListLine::Commented {
                    text: text.to_string(),
                    eol: eol.to_string(),
                },
                None => ListLine::Verbatim {
                    text: text.to_string(),
                    eol: eol.to_string(),
                },
            };
            lines.push(line);
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[ListLine] {
        &self.lines
    }

    pub fn entries(&self) -> impl Iterator<Item = &EntryLine> {
        self.lines.iter().filter_map(|line| match line {
            ListLine::Entry(entry) => Some(entry),
            _ => None,
        })
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut EntryLine> {
        self.lines.iter_mut().filter_map(|line| match line {
            ListLine::Entry(entry) => Some(entry),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            let (text, eol) = match line {
                ListLine::Entry(entry) => (&entry.text, &entry.eol),
                ListLine::Commented { text, eol } | ListLine::Verbatim { text, eol } => (text, eol),
            };
            out.push_str(text);
            out.push_str(eol);
        }
        out
    }
}

// ============================================================================
// deb822 format
// ============================================================================

#[derive(Debug, Clone)]
struct StanzaLine {
    text: String,
    eol: String,
}

impl StanzaLine {
    fn is_comment(&self) -> bool {
        self.text.starts_with('#')
    }
}

/// A field's span inside its stanza's lines.
#[derive(Debug, Clone)]
struct Field {
    name: String,
    first: usize,
    last: usize,
}

/// One deb822 paragraph.
#[derive(Debug, Clone, Default)]
pub struct SourceStanza {
    lines: Vec<StanzaLine>,
    fields: Vec<Field>,
}

impl SourceStanza {
    fn find(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    /// Whether the stanza declares `name` (field names are case-insensitive).
    pub fn has_field(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Whitespace-separated tokens of a field, continuation lines included.
    pub fn field_tokens(&self, name: &str) -> Vec<&str> {
        let field = match self.find(name) {
            Some(field) => field,
            None => return Vec::new(),
        };

        let mut out = Vec::new();
        for idx in field.first..=field.last {
            let line = &self.lines[idx];
            if line.is_comment() {
                continue;
            }
            let value = if idx == field.first {
                line.text
                    .split_once(':')
                    .map(|(_, value)| value)
                    .unwrap_or_default()
            } else {
                line.text.as_str()
            };
            out.extend(value.split_whitespace());
        }
        out
    }

    /// `Enabled: no` switches a stanza off.
    pub fn is_enabled(&self) -> bool {
        match self.field_tokens("Enabled").first() {
            Some(value) => !matches!(value.to_ascii_lowercase().as_str(), "no" | "false" | "0"),
            None => true,
        }
    }

    fn push_line(&mut self, text: &str, eol: &str) -> usize {
        self.lines.push(StanzaLine {
            text: text.to_string(),
            eol: eol.to_string(),
        });
        self.lines.len() - 1
    }

    fn render_into(&self, out: &mut String) {
        for line in &self.lines {
            out.push_str(&line.text);
            out.push_str(&line.eol);
        }
    }
}

impl RepositoryEntry for SourceStanza {
    fn is_eligible(&self) -> bool {
        self.has_field("Types") && self.has_field("Components") && self.is_enabled()
    }

    fn uris(&self) -> Vec<&str> {
        self.field_tokens("URIs")
    }

    fn components(&self) -> Vec<&str> {
        self.field_tokens("Components")
    }

    fn append_components(&mut self, names: &[&str]) {
        let last = match self.find("Components") {
            Some(field) => field.last,
            None => return,
        };
        let line = &mut self.lines[last];
        let end = line.text.trim_end().len();
        line.text.insert_str(end, &insertion_text(names));
    }
}

/// A block of a deb822 file.
#[derive(Debug, Clone)]
pub enum Block {
    Stanza(SourceStanza),
    /// Blank lines between stanzas, verbatim.
    Separator(String),
}

/// A parsed deb822 file.
#[derive(Debug, Clone, Default)]
pub struct StanzaDocument {
    blocks: Vec<Block>,
}

impl StanzaDocument {
    pub fn parse(content: &str) -> Result<Self, LineError> {
        let mut blocks = Vec::new();
        let mut current: Option<SourceStanza> = None;
        let mut separator = String::new();

        for (idx, (text, eol)) in split_lines(content).enumerate() {
            let lineno = idx + 1;

            if text.trim().is_empty() {
                if let Some(stanza) = current.take() {
                    blocks.push(Block::Stanza(stanza));
                }
                separator.push_str(text);
                separator.push_str(eol);
                continue;
            }

            if !separator.is_empty() {
                blocks.push(Block::Separator(std::mem::take(&mut separator)));
            }

            if text.starts_with('#') {
                current.get_or_insert_with(SourceStanza::default).push_line(text, eol);
                continue;
            }

            if text.starts_with(' ') || text.starts_with('\t') {
                let stanza = match current.as_mut() {
                    Some(stanza) if !stanza.fields.is_empty() => stanza,
                    _ => {
                        return Err(LineError::new(
                            lineno,
                            "continuation line without a preceding field",
                        ))
                    }
                };
                let at = stanza.push_line(text, eol);
                if let Some(field) = stanza.fields.last_mut() {
                    field.last = at;
                }
                continue;
            }

            let name = match text.split_once(':') {
                Some((name, _)) if !name.is_empty() && !name.contains(char::is_whitespace) => name,
                Some(_) => {
                    return Err(LineError::new(lineno, format!("invalid field name in '{}'", text)))
                }
                None => {
                    return Err(LineError::new(
                        lineno,
                        format!("expected 'Key: value', found '{}'", text),
                    ))
                }
            };

            let starts_new_declaration = name.eq_ignore_ascii_case("Types")
                && current.as_ref().is_some_and(|s| s.has_field("Types"));
            if starts_new_declaration {
                if let Some(stanza) = current.take() {
                    blocks.push(Block::Stanza(stanza));
                }
            }

            let stanza = current.get_or_insert_with(SourceStanza::default);
            let at = stanza.push_line(text, eol);
            stanza.fields.push(Field {
                name: name.to_string(),
                first: at,
                last: at,
            });
        }

        if let Some(stanza) = current.take() {
            blocks.push(Block::Stanza(stanza));
        }
        if !separator.is_empty() {
            blocks.push(Block::Separator(separator));
        }

        Ok(Self { blocks })
    }

    pub fn stanzas(&self) -> impl Iterator<Item = &SourceStanza> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Stanza(stanza) => Some(stanza),
            Block::Separator(_) => None,
        })
    }

    pub fn stanzas_mut(&mut self) -> impl Iterator<Item = &mut SourceStanza> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::Stanza(stanza) => Some(stanza),
            Block::Separator(_) => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Stanza(stanza) => stanza.render_into(&mut out),
                Block::Separator(text) => out.push_str(text),
            }
        }
        out
    }
}
