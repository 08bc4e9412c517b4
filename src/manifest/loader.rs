//! Manifest loading and resolution.

use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::block::ConfigBlock;
use crate::error::{BlockupError, Result, Step};
use crate::shell::{expand_home_with, resolve_target};
use crate::upsert::UpsertOptions;

use super::schema::{BlockEntry, Manifest};

/// A manifest entry with paths, text, and options settled.
#[derive(Debug, Clone)]
pub struct ResolvedBlock {
    /// Display name.
    pub name: String,
    /// Absolute or manifest-relative target path.
    pub target: PathBuf,
    /// Block text and marker.
    pub block: ConfigBlock,
    /// Effective options.
    pub options: UpsertOptions,
}

/// Load and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content =
        fs::read_to_string(path).map_err(|e| BlockupError::io(Step::ReadManifest, path, e))?;

    parse_manifest(&content, path)
}

/// Parse YAML content into a [`Manifest`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_manifest(content: &str, source_path: &Path) -> Result<Manifest> {
    serde_yaml::from_str(content).map_err(|e| BlockupError::ManifestParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Where a manifest's relative and `~` paths resolve from.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Directory holding the manifest.
    pub base_dir: &'a Path,
    /// Target for entries that name none (`apply --target`).
    pub default_target: Option<&'a Path>,
    /// Home directory for `~` and the `~/.bashrc` fallback.
    pub home: Option<&'a Path>,
}

impl<'a> ResolveContext<'a> {
    /// Context with only a base directory.
    pub fn new(base_dir: &'a Path) -> Self {
        Self {
            base_dir,
            default_target: None,
            home: None,
        }
    }

    /// Set the fallback target.
    pub fn with_default_target(mut self, target: Option<&'a Path>) -> Self {
        self.default_target = target;
        self
    }

    /// Set the home directory.
    pub fn with_home(mut self, home: Option<&'a Path>) -> Self {
        self.home = home;
        self
    }

    fn path(&self, path: &Path) -> PathBuf {
        let expanded = expand_home_with(path, self.home);
        if expanded.is_absolute() {
            expanded
        } else {
            self.base_dir.join(expanded)
        }
    }
}

impl Manifest {
    /// Resolve every entry against `ctx`.
    ///
    /// Target precedence: entry `target`, then manifest `target`, then
    /// `ctx.default_target`, then `~/.bashrc`. The fallback is only required
    /// for entries that name no target.
    pub fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Vec<ResolvedBlock>> {
        if self.blocks.is_empty() {
            return Err(BlockupError::ManifestInvalid {
                message: "manifest defines no blocks".to_string(),
            });
        }

        self.blocks
            .iter()
            .map(|entry| self.resolve_entry(entry, ctx))
            .collect()
    }

    fn resolve_entry(
        &self,
        entry: &BlockEntry,
        ctx: &ResolveContext<'_>,
    ) -> Result<ResolvedBlock> {
        let name = entry.display_name().to_string();

        let block = match (&entry.block, &entry.block_file, &entry.exports) {
            (Some(text), None, None) => ConfigBlock::new(&entry.marker, text.as_str())?,
            (None, Some(file), None) => {
                ConfigBlock::from_file(&entry.marker, &ctx.path(file))?
            }
            (None, None, Some(exports)) => {
                ConfigBlock::delimited(&entry.marker, export_pairs(&name, exports)?)?
            }
            _ => {
                return Err(BlockupError::ManifestInvalid {
                    message: format!(
                        "block '{name}' must set exactly one of block, block_file, exports"
                    ),
                })
            }
        };

        let target = match entry.target.as_ref().or(self.target.as_ref()) {
            Some(t) => ctx.path(t),
            None => resolve_target(ctx.default_target, ctx.home)?,
        };

        let options = UpsertOptions {
            backup: entry.backup.or(self.backup).unwrap_or(true),
            check_marker: entry.check_marker.unwrap_or(true),
        };

        Ok(ResolvedBlock {
            name,
            target,
            block,
            options,
        })
    }
}

fn export_pairs(name: &str, exports: &serde_yaml::Mapping) -> Result<Vec<(String, String)>> {
    exports
        .iter()
        .map(|(key, value)| {
            let key = key.as_str().ok_or_else(|| BlockupError::ManifestInvalid {
                message: format!("block '{name}' has a non-string export name"),
            })?;
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                _ => {
                    return Err(BlockupError::ManifestInvalid {
                        message: format!("export '{key}' in block '{name}' must be a scalar"),
                    })
                }
            };
            Ok((key.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(yaml: &str) -> Manifest {
        parse_manifest(yaml, Path::new("blocks.yml")).unwrap()
    }

    fn ctx(base: &'static str, target: &'static str) -> ResolveContext<'static> {
        ResolveContext::new(Path::new(base)).with_default_target(Some(Path::new(target)))
    }

    #[test]
    fn inline_block_uses_default_target() {
        let manifest = parse(
            r##"
blocks:
  - marker: FOO Configuration
    block: "# FOO Configuration\nexport FOO=1\n"
"##,
        );

        let resolved = manifest
            .resolve(&ctx("/base", "/home/me/.bashrc"))
            .unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].target, PathBuf::from("/home/me/.bashrc"));
        assert_eq!(resolved[0].options, UpsertOptions::checked());
        assert_eq!(resolved[0].name, "FOO Configuration");
    }

    #[test]
    fn entry_target_beats_manifest_target() {
        let manifest = parse(
            r##"
target: rc/manifest-default
blocks:
  - marker: A
    block: "# A\n"
  - marker: B
    block: "# B\n"
    target: /abs/.zshrc
"##,
        );

        let resolved = manifest
            .resolve(&ctx("/base", "/home/me/.bashrc"))
            .unwrap();

        assert_eq!(resolved[0].target, PathBuf::from("/base/rc/manifest-default"));
        assert_eq!(resolved[1].target, PathBuf::from("/abs/.zshrc"));
    }

    #[test]
    fn backup_and_check_overrides() {
        let manifest = parse(
            r##"
backup: false
blocks:
  - marker: A
    block: "# A\n"
  - marker: B
    block: "export B=1\n"
    backup: true
    check_marker: false
"##,
        );

        let resolved = manifest.resolve(&ctx("/base", "/t")).unwrap();

        assert!(!resolved[0].options.backup);
        assert!(resolved[0].options.check_marker);
        assert!(resolved[1].options.backup);
        assert!(!resolved[1].options.check_marker);
    }

    #[test]
    fn exports_generate_delimited_block() {
        let manifest = parse(
            r##"
blocks:
  - name: swisseph
    marker: Swisseph Configuration
    exports:
      SE_EPHE_PATH: $HOME/.swisseph
      SE_SIDEREAL: 1
"##,
        );

        let resolved = manifest.resolve(&ctx("/base", "/t")).unwrap();
        let text = resolved[0].block.text();

        assert!(text.starts_with("# >>> Swisseph Configuration >>>\n"));
        assert!(text.contains("export SE_EPHE_PATH=\"$HOME/.swisseph\"\n"));
        assert!(text.contains("export SE_SIDEREAL=\"1\"\n"));
    }

    #[test]
    fn block_file_is_relative_to_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("foo.sh"), "# FOO\nexport FOO=1\n").unwrap();
        let manifest = parse(
            r##"
blocks:
  - marker: FOO
    block_file: foo.sh
"##,
        );

        let resolved = manifest
            .resolve(&ResolveContext::new(temp.path()).with_home(Some(Path::new("/home/me"))))
            .unwrap();

        assert_eq!(resolved[0].block.text(), "# FOO\nexport FOO=1\n");
    }

    #[test]
    fn rejects_multiple_sources() {
        let manifest = parse(
            r##"
blocks:
  - marker: FOO
    block: "# FOO\n"
    block_file: foo.sh
"##,
        );

        let err = manifest.resolve(&ctx("/base", "/t")).unwrap_err();

        assert!(matches!(err, BlockupError::ManifestInvalid { .. }));
    }

    #[test]
    fn rejects_missing_source() {
        let manifest = parse("blocks:\n  - marker: FOO\n");

        let err = manifest.resolve(&ctx("/base", "/t")).unwrap_err();

        assert!(err.to_string().contains("exactly one of"));
    }

    #[test]
    fn rejects_empty_manifest() {
        let manifest = parse("blocks: []\n");

        let err = manifest.resolve(&ctx("/base", "/t")).unwrap_err();

        assert!(err.to_string().contains("no blocks"));
    }

    #[test]
    fn rejects_nested_export_values() {
        let manifest = parse(
            r##"
blocks:
  - marker: FOO
    exports:
      FOO: [1, 2]
"##,
        );

        let err = manifest.resolve(&ctx("/base", "/t")).unwrap_err();

        assert!(err.to_string().contains("must be a scalar"));
    }

    #[test]
    fn manifest_target_needs_no_home() {
        let manifest = parse("target: rc\nblocks:\n  - marker: A\n    block: \"# A\\n\"\n");

        let resolved = manifest.resolve(&ResolveContext::new(Path::new("/base"))).unwrap();

        assert_eq!(resolved[0].target, PathBuf::from("/base/rc"));
    }

    #[test]
    fn untargeted_entry_without_home_is_usage_error() {
        let manifest = parse("blocks:\n  - marker: A\n    block: \"# A\\n\"\n");

        let err = manifest
            .resolve(&ResolveContext::new(Path::new("/base")))
            .unwrap_err();

        assert!(matches!(err, BlockupError::MissingArgument { .. }));
    }

    #[test]
    fn home_fallback_and_tilde_use_given_home() {
        let manifest = parse(
            r##"
blocks:
  - marker: A
    block: "# A\n"
  - marker: B
    block: "# B\n"
    target: ~/.zshrc
"##,
        );
        let ctx = ResolveContext::new(Path::new("/base")).with_home(Some(Path::new("/home/me")));

        let resolved = manifest.resolve(&ctx).unwrap();

        assert_eq!(resolved[0].target, PathBuf::from("/home/me/.bashrc"));
        assert_eq!(resolved[1].target, PathBuf::from("/home/me/.zshrc"));
    }

    #[test]
    fn parse_error_names_file() {
        let err = parse_manifest("blocks: [", Path::new("/x/blocks.yml")).unwrap_err();

        assert!(matches!(err, BlockupError::ManifestParse { .. }));
        assert!(err.to_string().contains("/x/blocks.yml"));
    }

    #[test]
    fn load_missing_manifest_reports_step() {
        let temp = TempDir::new().unwrap();
        let err = load_manifest(&temp.path().join("nope.yml")).unwrap_err();

        assert!(matches!(
            err,
            BlockupError::Io {
                step: Step::ReadManifest,
                ..
            }
        ));
    }
}
