//! # Refresh Tracker
//!
//! Reconciles a library's stored entries against what is actually on disk
//! (`spec.md` §4.F): scan the root for candidate paths, diff against
//! stored paths, relink moved files by basename, and commit the new/missing
//! sets. Scanning itself is delegated to an injectable [`ScannerStrategy`]
//! (`spec.md` §9) so callers can swap in a faster external tool without the
//! tracker's diff/relink/commit logic changing.

mod scanner;
mod tracker;

pub use scanner::{ExternalScanner, InternalWalker, ScanStream, ScannerStrategy};
pub use tracker::{RefreshTracker, SaveProgress, ScanProgress};
