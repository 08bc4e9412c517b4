//! Export-line extraction.
//!
//! Pulls `export KEY=value` assignments out of a block so they can be
//! verified in-process. This is a line scanner, not a shell parser: anything
//! that is not a plain assignment is ignored.

/// How the value was quoted in the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// No surrounding quotes.
    Bare,
    /// `"..."`; the shell expands `$VAR` and honours backslash escapes inside.
    Double,
    /// `'...'`; taken literally by the shell.
    Single,
}

/// A single variable assignment found in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Variable name.
    pub key: String,
    /// Value as written, surrounding quotes removed and backslash escapes
    /// kept. See `shell::resolve_value` for what the shell would assign.
    pub value: String,
    /// Quoting style of the original value.
    pub quoting: Quoting,
}

/// Parses variable assignments out of block text.
///
/// # Supported Formats
///
/// - `export KEY=value`
/// - `KEY=value`
/// - Quoted: `KEY="value with spaces"` or `KEY='single quoted'`
/// - Empty: `KEY=`
/// - Comments and blank lines are skipped
///
/// # Example
///
/// ```
/// use blockup::block::ExportParser;
///
/// let content = r##"
/// # >>> Swisseph Configuration >>>
/// export SE_EPHE_PATH="$HOME/.swisseph/ephe"
/// export SE_MODE=moshier
/// "##;
///
/// let exports = ExportParser::parse(content);
/// assert_eq!(exports.len(), 2);
/// assert_eq!(exports[0].key, "SE_EPHE_PATH");
/// assert_eq!(exports[1].value, "moshier");
/// ```
pub struct ExportParser;

impl ExportParser {
    /// Parse block text into assignments, in order of appearance.
    pub fn parse(content: &str) -> Vec<Export> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> Option<Export> {
        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
        let (key, value) = line.split_once('=')?;

        // Shell assignments allow no whitespace around `=`
        if !is_identifier(key) {
            return None;
        }

        let (value, quoting) = Self::unquote(value.trim_end());
        Some(Export {
            key: key.to_string(),
            value,
            quoting,
        })
    }

    fn unquote(value: &str) -> (String, Quoting) {
        if value.len() >= 2 {
            if value.starts_with('"') && value.ends_with('"') {
                return (value[1..value.len() - 1].to_string(), Quoting::Double);
            }
            if value.starts_with('\'') && value.ends_with('\'') {
                return (value[1..value.len() - 1].to_string(), Quoting::Single);
            }
        }
        (value.to_string(), Quoting::Bare)
    }
}

/// Whether `name` is a valid shell variable name.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
