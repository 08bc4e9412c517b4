//! Config blocks and their markers.
//!
//! A [`ConfigBlock`] is the literal text inserted into a target file together
//! with the marker used to detect it on later runs.

pub mod exports;

pub use exports::{Export, ExportParser, Quoting};

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{BlockupError, Result, Step};

/// Literal block text plus the marker that identifies it.
///
/// # Example
///
/// ```
/// use blockup::block::ConfigBlock;
///
/// let block = ConfigBlock::delimited("FOO Configuration", [("FOO", "1")]).unwrap();
/// assert_eq!(
///     block.text(),
///     "# >>> FOO Configuration >>>\nexport FOO=\"1\"\n# <<< FOO Configuration <<<\n"
/// );
/// assert!(block.is_present_in(b"# >>> FOO Configuration >>>"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBlock {
    marker: String,
    text: String,
}

impl ConfigBlock {
    /// Create a block from its marker and literal text.
    ///
    /// Fails if the marker is empty, since an empty marker matches every file.
    pub fn new(marker: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(BlockupError::InvalidBlock {
                message: "marker must not be empty".to_string(),
            });
        }

        Ok(Self {
            marker,
            text: text.into(),
        })
    }

    /// Read the block text from a file.
    pub fn from_file(marker: impl Into<String>, path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).map_err(|e| BlockupError::io(Step::ReadBlock, path, e))?;
        Self::new(marker, text)
    }

    /// Build a `# >>> marker >>>` / `# <<< marker <<<` delimited block of exports.
    ///
    /// Values are written double-quoted so the shell still expands `$VAR`
    /// references; embedded `"` and `\` are escaped.
    pub fn delimited<K, V>(
        marker: impl Into<String>,
        exports: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let marker = marker.into();
        let mut text = format!("# >>> {marker} >>>\n");

        for (key, value) in exports {
            let key = key.as_ref();
            if !exports::is_identifier(key) {
                return Err(BlockupError::InvalidBlock {
                    message: format!("'{key}' is not a valid variable name"),
                });
            }
            let escaped = value.as_ref().replace('\\', "\\\\").replace('"', "\\\"");
            let _ = writeln!(text, "export {key}=\"{escaped}\"");
        }

        let _ = writeln!(text, "# <<< {marker} <<<");
        Self::new(marker, text)
    }

    /// The marker substring.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// The literal block text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the block text itself carries the marker.
    pub fn contains_marker(&self) -> bool {
        self.text.contains(&self.marker)
    }

    /// Literal substring check against existing file content.
    ///
    /// Takes bytes so files that are not valid UTF-8 can still be checked.
    pub fn is_present_in(&self, content: &[u8]) -> bool {
        find(content, self.marker.as_bytes()).is_some()
    }

    /// Variable assignments declared by the block.
    pub fn exports(&self) -> Vec<Export> {
        ExportParser::parse(&self.text)
    }
}

/// Non-overlapping occurrences of `needle` in `haystack`.
pub(crate) fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut rest = haystack;
    while let Some(pos) = find(rest, needle) {
        count += 1;
        rest = &rest[pos + needle.len()..];
    }
    count
}

/// Byte offset of the first `needle` in `haystack`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
