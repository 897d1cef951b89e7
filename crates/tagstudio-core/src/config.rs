//! # Engine configuration
//!
//! Process-wide knobs, layered by [`confique`] from (in priority order)
//! environment variables, a project-level `tagstudio.toml`, and compiled
//! defaults — the same layering the teacher uses for its own `PadzConfig`.
//!
//! This is distinct from the DB-backed `Preferences` store (see
//! [`crate::model::preferences`]): `EngineConfig` seeds defaults a fresh
//! library is opened with, but once a library exists, its `Preferences`
//! rows are authoritative and `EngineConfig` is never consulted again for
//! that library's settings.

use confique::Config;
use serde::{Deserialize, Serialize};

fn default_ignore_extensions() -> Vec<String> {
    vec![".git".to_string(), ".tagstudio".to_string()]
}

/// Engine-wide configuration, loadable from `tagstudio.toml` / env vars.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Default glob/literal ignore patterns applied to every fresh library.
    #[config(default = [".git", ".tagstudio"])]
    pub default_ignore_patterns: Vec<String>,

    /// Per-folder shard size cap for the thumbnail cache, in megabytes.
    #[config(default = 10)]
    pub thumb_cache_folder_mb: u64,

    /// Total size cap for the thumbnail cache, in megabytes.
    #[config(default = 500)]
    pub thumb_cache_total_mb: u64,

    /// Name of the external fast-scanner binary to look up on `PATH`.
    #[config(default = "rg")]
    pub scanner_binary: String,

    /// Page size used by `search_library` when the caller does not specify one.
    #[config(default = 200)]
    pub default_page_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_ignore_patterns: default_ignore_extensions(),
            thumb_cache_folder_mb: 10,
            thumb_cache_total_mb: 500,
            scanner_binary: "rg".to_string(),
            default_page_size: 200,
        }
    }
}

impl EngineConfig {
    /// Load configuration layered from `<dir>/tagstudio.toml`, environment
    /// variables (`TAGSTUDIO__*`), and compiled defaults. Missing file is
    /// not an error — defaults are used.
    pub fn load(dir: &std::path::Path) -> Self {
        let path = dir.join("tagstudio.toml");
        if !path.exists() {
            return Self::default();
        }
        EngineConfig::builder()
            .env()
            .file(&path)
            .load()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.thumb_cache_folder_mb, 10);
        assert!(cfg.thumb_cache_total_mb >= cfg.thumb_cache_folder_mb);
        assert_eq!(cfg.scanner_binary, "rg");
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = EngineConfig::load(dir.path());
        assert_eq!(cfg, EngineConfig::default());
    }
}
