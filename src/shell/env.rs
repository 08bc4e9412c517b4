//! In-process export verification.
//!
//! A child process cannot change its parent's environment. Loading a block's
//! exports here only affects this process and anything it spawns; the shell
//! that launched us keeps its old values until the startup file is re-read.

use serde::Serialize;

use crate::block::{Export, Quoting};

/// Printed after verification so nobody mistakes it for a shell reload.
pub const PARENT_SHELL_NOTE: &str =
    "These values are set for this process only; your current shell is unchanged until it re-reads the file.";

/// One export after being applied to the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportCheck {
    /// Variable name.
    pub key: String,
    /// Value after escape removal and `$VAR` expansion.
    pub expected: String,
    /// Value read back from the environment.
    pub actual: Option<String>,
}

impl ExportCheck {
    /// Whether the environment now holds the expected value.
    pub fn matches(&self) -> bool {
        self.actual.as_deref() == Some(self.expected.as_str())
    }
}

/// Set each export in this process, in order, and read it back.
///
/// Later exports see earlier ones, so `PATH="$FOO/bin:$PATH"` after
/// `FOO=...` expands the way the shell would.
pub fn load_exports(exports: &[Export]) -> Vec<ExportCheck> {
    exports
        .iter()
        .map(|export| {
            let expected = resolve_value(export, |name| std::env::var(name).ok());

            tracing::debug!("Setting {}={} in process environment", export.key, expected);
            std::env::set_var(&export.key, &expected);

            ExportCheck {
                key: export.key.clone(),
                actual: std::env::var(&export.key).ok(),
                expected,
            }
        })
        .collect()
}

/// The value the shell would assign for `export`.
///
/// Single-quoted values are taken literally. Double-quoted values honour
/// `\"`, `\\`, `\$` and `` \` `` escapes; bare values drop the backslash
/// before any character. `$NAME` and `${NAME}` expand through `lookup`, and
/// unknown names expand to empty.
///
/// Special parameters are not supported: `$$` is left as written rather
/// than replaced with a process id, and a `$` not followed by a name is
/// kept as is.
///
/// # Example
///
/// ```
/// use blockup::block::ExportParser;
/// use blockup::shell::resolve_value;
///
/// let lookup = |name: &str| (name == "HOME").then(|| "/home/me".to_string());
/// let exports = ExportParser::parse(
///     "export A=\"$HOME/.swisseph\"\nexport B=\"\\$HOME costs $5, pid $$\"\nexport C='$HOME'\n",
/// );
///
/// assert_eq!(resolve_value(&exports[0], lookup), "/home/me/.swisseph");
/// assert_eq!(resolve_value(&exports[1], lookup), "$HOME costs $5, pid $$");
/// assert_eq!(resolve_value(&exports[2], lookup), "$HOME");
/// ```
pub fn resolve_value<F>(export: &Export, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match export.quoting {
        Quoting::Single => export.value.clone(),
        Quoting::Double => expand(&export.value, Escapes::DoubleQuoted, lookup),
        Quoting::Bare => expand(&export.value, Escapes::Bare, lookup),
    }
}

/// Backslash handling in effect while expanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escapes {
    DoubleQuoted,
    Bare,
}

fn expand<F>(input: &str, escapes: Escapes, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&next)
                    if escapes == Escapes::Bare || matches!(next, '$' | '`' | '"' | '\\') =>
                {
                    chars.next();
                    out.push(next);
                }
                _ => out.push('\\'),
            }
            continue;
        }

        if c != '$' {
            out.push(c);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if closed {
                    out.push_str(&lookup(&name).unwrap_or_default());
                } else {
                    out.push_str("${");
                    out.push_str(&name);
                }
            }
            Some(&next) if next.is_ascii_alphabetic() || next == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(&lookup(&name).unwrap_or_default());
            }
            _ => out.push('$'),
        }
    }

    out
}
