//! Output verbosity.

/// Output verbosity mode, chosen by `--verbose` / `--quiet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show everything, including the lines a dry run would append.
    Verbose,
    /// Show results and follow-up hints.
    #[default]
    Normal,
    /// Show results only.
    Quiet,
}

impl OutputMode {
    /// Pick the mode from the global flags; `--quiet` wins over `--verbose`.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if this mode shows detail lines (appended text in a dry run).
    pub fn shows_details(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows follow-up hints.
    pub fn shows_hints(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }
}
