//! Argument parsing via `clap`'s derive API (`spec.md` §4.K).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tagstudio", bin_name = "tagstudio", version)]
#[command(about = "Local, file-oriented metadata library engine", long_about = None)]
pub struct Cli {
    /// Library directory. Defaults to the current directory.
    #[arg(short, long, global = true, value_name = "DIR")]
    pub library: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the library root, relink moved files, and reconcile new/missing entries.
    Scan,

    /// Run a query against the library and print a page of matching paths.
    Search {
        /// Query text (`spec.md` §4.D). Empty matches every entry.
        #[arg(default_value = "")]
        query: String,

        /// Zero-indexed page number.
        #[arg(short, long, default_value_t = 0)]
        page: u32,

        /// Entries per page.
        #[arg(long, default_value_t = 50)]
        page_size: u32,

        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKeyArg::Path)]
        sort: SortKeyArg,

        /// Sort in descending order.
        #[arg(long)]
        desc: bool,
    },

    /// Tag management.
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Thumbnail cache maintenance.
    ThumbCache {
        #[command(subcommand)]
        action: ThumbCacheAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagAction {
    /// Create a tag.
    Add {
        /// Tag name.
        name: String,

        /// Shorthand display name.
        #[arg(long)]
        shorthand: Option<String>,

        /// Mark this tag as a category.
        #[arg(long)]
        category: bool,
    },

    /// Delete a tag by id.
    Rm {
        /// Tag id.
        id: i64,
    },

    /// List every tag in the library.
    Ls,
}

#[derive(Subcommand, Debug)]
pub enum ThumbCacheAction {
    /// Evict nothing proactively; just print current occupancy.
    Stats,

    /// Remove every shard and the cache root.
    Gc,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SortKeyArg {
    Path,
    DateAdded,
    DateCreated,
    DateModified,
    Name,
}
