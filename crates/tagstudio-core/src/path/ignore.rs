//! Gitignore-like pattern compilation (`spec.md` §4.A).
//!
//! Compiling a pattern list yields two artefacts: a fused [`globset::GlobSet`]
//! for in-process filtering, and the original pattern text for handoff to
//! an external scanner's `--ignore-file` flag. Grounded on the `ignore`/
//! `globset` pairing used by the reference corpus's own gitignore-style
//! matchers.

use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};

/// A compiled set of ignore patterns.
#[derive(Clone)]
pub struct CompiledIgnore {
    patterns: Vec<String>,
    set: GlobSet,
}

impl CompiledIgnore {
    /// Compile a list of gitignore-syntax patterns. Lines that are empty
    /// or start with `#` are comments and are skipped for matching but
    /// still preserved verbatim in [`Self::pattern_file_contents`], so a
    /// round trip through the external scanner's ignore file looks the
    /// same as what the user authored.
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for line in patterns {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            for glob_pattern in to_glob_patterns(trimmed) {
                let glob = Glob::new(&glob_pattern).map_err(|e| {
                    crate::error::Error::ParseError {
                        span: crate::error::Span::point(0),
                        message: format!("invalid ignore pattern '{trimmed}': {e}"),
                    }
                })?;
                builder.add(glob);
            }
        }
        let set = builder.build().map_err(|e| crate::error::Error::ParseError {
            span: crate::error::Span::point(0),
            message: format!("failed to build ignore set: {e}"),
        })?;
        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    /// Does `relative_posix_path` match any compiled pattern?
    pub fn is_ignored(&self, relative_posix_path: &str) -> bool {
        self.set.is_match(relative_posix_path)
    }

    /// The newline-joined pattern text, suitable for writing to
    /// `.tagstudio/.compiled_ignore` and passing to an external scanner's
    /// `--ignore-file`.
    pub fn pattern_file_contents(&self) -> String {
        self.patterns.join("\n")
    }
}

/// Translate a gitignore-style line into the `globset::Glob` pattern(s)
/// that cover it. A bare name with no slash or glob metacharacters (e.g.
/// `.git`) is a directory-or-file name that should be ignored wherever it
/// appears *and* everything beneath it if it is a directory — gitignore's
/// own rule for untethered patterns — so it expands to both `**/name` and
/// `**/name/**`. A pattern already containing `/`, `*`, or `?` is passed
/// through as a single glob, trusting the author's anchoring.
fn to_glob_patterns(pattern: &str) -> Vec<String> {
    if pattern.contains('/') || pattern.contains('*') || pattern.contains('?') {
        vec![pattern.to_string()]
    } else {
        vec![format!("**/{pattern}"), format!("**/{pattern}/**")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_literal_directory_name_anywhere() {
        let compiled =
            CompiledIgnore::compile(&[".git".to_string(), "node_modules".to_string()]).unwrap();
        assert!(compiled.is_ignored(".git/HEAD"));
        assert!(compiled.is_ignored("a/b/node_modules/pkg"));
        assert!(!compiled.is_ignored("src/main.rs"));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let compiled = CompiledIgnore::compile(&[
            "# a comment".to_string(),
            "".to_string(),
            "*.tmp".to_string(),
        ])
        .unwrap();
        assert!(compiled.is_ignored("foo.tmp"));
        assert!(!compiled.is_ignored("foo.txt"));
    }

    #[test]
    fn pattern_file_preserves_comments() {
        let compiled =
            CompiledIgnore::compile(&["# keep me".to_string(), "*.log".to_string()]).unwrap();
        assert_eq!(compiled.pattern_file_contents(), "# keep me\n*.log");
    }
}
