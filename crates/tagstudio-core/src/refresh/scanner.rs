//! The fast-scanner strategy contract (`spec.md` §4.F.1, §9:
//! "Model the fast scanner as an injectable strategy with a two-method
//! contract (`available()`, `scan(root, patterns) -> iterator<path>`)").
//!
//! [`ExternalScanner`] shells out to a `ripgrep`-like binary found on
//! `PATH`; [`InternalWalker`] is the always-available fallback that
//! implements the same contract with a plain recursive directory walk.
//! Both produce a [`ScanStream`] that [`super::tracker::ScanProgress`]
//! drains one path at a time.

use crate::error::{Error, Result};
use crate::path::CompiledIgnore;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

/// A source of candidate file paths, relative to `root`, in POSIX form.
pub trait ScannerStrategy {
    /// Is this strategy usable in the current environment?
    fn available(&self) -> bool;

    /// Start a scan rooted at `root`, honoring the compiled ignore set.
    fn spawn(&self, root: &Path, ignore: &CompiledIgnore) -> Result<ScanStream>;
}

/// Either a child process's stdout, or an in-memory walker, drained
/// line-by-line / path-by-path by the tracker's progress iterator.
pub enum ScanStream {
    Process {
        child: Child,
        reader: BufReader<ChildStdout>,
        // Kept alive until the scan finishes so `--ignore-file` stays
        // readable; removed automatically on drop (`spec.md` §4.F.1:
        // "Temporary file is deleted after the call (guaranteed on all
        // exit paths)").
        _ignore_file: tempfile::NamedTempFile,
    },
    Walker(Box<InternalWalkIter>),
}

impl ScanStream {
    /// Pull the next path, or `None` at end of stream. For the process
    /// variant, `None` also means the child has been waited on; its exit
    /// status is not currently surfaced beyond a `tracing` event, matching
    /// `spec.md` §7's "log the stderr and transparently fall back" policy
    /// being applied by the *caller* before spawning, not after.
    pub fn next_path(&mut self) -> Option<Result<String>> {
        match self {
            ScanStream::Process { reader, child, .. } => {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => {
                        let _ = child.wait();
                        None
                    }
                    Ok(_) => {
                        let trimmed = line.trim_end_matches(['\n', '\r']);
                        if trimmed.is_empty() {
                            self.next_path()
                        } else {
                            Some(Ok(trimmed.to_string()))
                        }
                    }
                    Err(e) => Some(Err(Error::io_failure("scanner stdout", e))),
                }
            }
            ScanStream::Walker(walker) => walker.next_path(),
        }
    }
}

/// Looks up `binary_name` on `PATH` and invokes it with a `ripgrep`-like
/// `--files --follow --hidden --ignore-file P` contract
/// (`spec.md` §4.F.1).
pub struct ExternalScanner {
    pub binary_name: String,
}

impl ExternalScanner {
    pub fn new(binary_name: impl Into<String>) -> Self {
        Self {
            binary_name: binary_name.into(),
        }
    }

    fn resolve_on_path(&self) -> Option<PathBuf> {
        let path_var = std::env::var_os("PATH")?;
        std::env::split_paths(&path_var).find_map(|dir| {
            let candidate = dir.join(&self.binary_name);
            candidate.is_file().then_some(candidate)
        })
    }
}

impl ScannerStrategy for ExternalScanner {
    fn available(&self) -> bool {
        self.resolve_on_path().is_some()
    }

    fn spawn(&self, root: &Path, ignore: &CompiledIgnore) -> Result<ScanStream> {
        let binary = self
            .resolve_on_path()
            .ok_or_else(|| Error::io_failure(&self.binary_name, "not found on PATH"))?;

        let mut ignore_file = tempfile::NamedTempFile::new().map_err(|e| Error::io_failure(root, e))?;
        ignore_file
            .write_all(ignore.pattern_file_contents().as_bytes())
            .map_err(|e| Error::io_failure(ignore_file.path(), e))?;

        let mut child = Command::new(&binary)
            .arg("--files")
            .arg("--follow")
            .arg("--hidden")
            .arg("--ignore-file")
            .arg(ignore_file.path())
            .current_dir(root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::io_failure(&binary, e))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::io_failure(&binary, "no stdout pipe"))?;
        Ok(ScanStream::Process {
            child,
            reader: BufReader::new(stdout),
            _ignore_file: ignore_file,
        })
    }
}

/// The always-available fallback strategy (`spec.md` §4.F.1 step 3).
pub struct InternalWalker;

impl ScannerStrategy for InternalWalker {
    fn available(&self) -> bool {
        true
    }

    fn spawn(&self, root: &Path, ignore: &CompiledIgnore) -> Result<ScanStream> {
        Ok(ScanStream::Walker(Box::new(InternalWalkIter::new(
            root,
            ignore.clone(),
        ))))
    }
}

/// Recursive directory walk applying `ignore` via glob matching, used
/// whenever no external scanner is available or its invocation failed.
pub struct InternalWalkIter {
    dir_stack: Vec<PathBuf>,
    file_buffer: Vec<String>,
    root: PathBuf,
    ignore: CompiledIgnore,
}

impl InternalWalkIter {
    pub fn new(root: &Path, ignore: CompiledIgnore) -> Self {
        Self {
            dir_stack: vec![root.to_path_buf()],
            file_buffer: Vec::new(),
            root: root.to_path_buf(),
            ignore,
        }
    }

    /// Pull the next matching relative path, or `None` once the walk is
    /// exhausted. Each call drains the file buffer first; once empty it
    /// reads one more directory off the stack, queuing its subdirectories
    /// and files, so one call does at most one `read_dir`.
    pub fn next_path(&mut self) -> Option<Result<String>> {
        loop {
            if let Some(path) = self.file_buffer.pop() {
                return Some(Ok(path));
            }
            let dir = self.dir_stack.pop()?;
            let entries = match std::fs::read_dir(&dir) {
                Ok(e) => e,
                Err(e) => return Some(Err(Error::io_failure(dir, e))),
            };
            for entry in entries {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => return Some(Err(Error::io_failure(&dir, e))),
                };
                let path = entry.path();
                let relative = path.strip_prefix(&self.root).unwrap_or(&path);
                let relative_posix = crate::path::normalize::to_posix_string(relative);
                if self.ignore.is_ignored(&relative_posix) {
                    continue;
                }
                let file_type = match entry.file_type() {
                    Ok(t) => t,
                    Err(e) => return Some(Err(Error::io_failure(&path, e))),
                };
                if file_type.is_dir() {
                    self.dir_stack.push(path);
                } else if file_type.is_file() {
                    self.file_buffer.push(relative_posix);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn walker_finds_nested_files_and_skips_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.txt"), b"y").unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".git/HEAD"), b"z").unwrap();

        let ignore = CompiledIgnore::compile(&[".git".to_string()]).unwrap();
        let mut walker = InternalWalkIter::new(dir.path(), ignore);
        let mut found = HashSet::new();
        while let Some(result) = walker.next_path() {
            found.insert(result.unwrap());
        }
        assert_eq!(
            found,
            HashSet::from(["a.txt".to_string(), "sub/b.txt".to_string()])
        );
    }

    #[test]
    fn internal_walker_is_always_available() {
        assert!(InternalWalker.available());
    }

    #[test]
    fn external_scanner_missing_binary_is_unavailable() {
        let scanner = ExternalScanner::new("definitely-not-a-real-binary-xyz");
        assert!(!scanner.available());
    }
}
