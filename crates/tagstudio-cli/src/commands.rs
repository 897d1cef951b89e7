//! Command dispatch: one function per subcommand, each a direct call into
//! [`tagstudio_core::engine::Library`] followed by a call into [`crate::render`].
//! No business logic lives here (`spec.md` §4.K).

use crate::args::{Cli, Commands, SortKeyArg, TagAction, ThumbCacheAction};
use crate::render;
use tagstudio_core::engine::{FilterState, Library, SortDirection, SortKey};
use tagstudio_core::model::{Tag, TagId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] tagstudio_core::Error),
    #[error("could not determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    let root = match cli.library {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(CliError::CurrentDir)?,
    };
    let library = Library::open(&root)?;

    match cli.command {
        Commands::Scan => scan(&library),
        Commands::Search {
            query,
            page,
            page_size,
            sort,
            desc,
        } => search(&library, query, page, page_size, sort, desc),
        Commands::Tag { action } => tag(&library, action),
        Commands::ThumbCache { action } => thumb_cache(&library, action),
    }
}

fn scan(library: &Library) -> Result<(), CliError> {
    let ignore = library.compiled_ignore()?;
    let scanner = library.external_scanner();
    let mut tracker = library.refresh_tracker()?;

    let found = tracker
        .scan(&scanner, &ignore)?
        .collect::<tagstudio_core::Result<Vec<usize>>>()?
        .last()
        .copied()
        .unwrap_or(0);
    let relinked = tracker.fix_unlinked_entries()?;
    let saved = tracker
        .save_new_files()
        .collect::<tagstudio_core::Result<Vec<usize>>>()?
        .last()
        .copied()
        .unwrap_or(0);
    let removed = tracker.remove_unlinked_entries()?;

    render::scan_summary(found, relinked, saved, removed);
    Ok(())
}

fn search(
    library: &Library,
    query: String,
    page: u32,
    page_size: u32,
    sort: SortKeyArg,
    desc: bool,
) -> Result<(), CliError> {
    let filter = FilterState {
        query,
        page,
        page_size,
        sort_key: match sort {
            SortKeyArg::Path => SortKey::Path,
            SortKeyArg::DateAdded => SortKey::DateAdded,
            SortKeyArg::DateCreated => SortKey::DateCreated,
            SortKeyArg::DateModified => SortKey::DateModified,
            SortKeyArg::Name => SortKey::Name,
        },
        sort_dir: if desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        },
    };
    let result = library.search_library(&filter)?;
    render::search_results(&result);
    Ok(())
}

fn tag(library: &Library, action: TagAction) -> Result<(), CliError> {
    match action {
        TagAction::Add {
            name,
            shorthand,
            category,
        } => {
            let mut new_tag = Tag::new(&name);
            new_tag.shorthand = shorthand;
            new_tag.is_category = category;
            let id = library.add_tag(&new_tag)?;
            render::tag_created(id, &name);
        }
        TagAction::Rm { id } => {
            let id = TagId(id);
            library.remove_tag(id)?;
            render::tag_removed(id);
        }
        TagAction::Ls => {
            let tags = library.list_tags()?;
            let ids: Vec<TagId> = tags.iter().map(|t| t.id).collect();
            render::tag_list(&tags, &ids);
        }
    }
    Ok(())
}

fn thumb_cache(library: &Library, action: ThumbCacheAction) -> Result<(), CliError> {
    let cache = library.thumb_cache()?;
    match action {
        ThumbCacheAction::Stats => render::thumb_cache_stats(cache.stats()),
        ThumbCacheAction::Gc => render::thumb_cache_cleared(cache.clear()?),
    }
    Ok(())
}
