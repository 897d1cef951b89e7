//! Terminal rendering. Every `print!`/`println!` in this crate goes
//! through here — commands hand back plain data, this module is the only
//! place that knows about color (`spec.md` §4.K).

use colored::Colorize;
use tagstudio_core::engine::SearchResult;
use tagstudio_core::model::Tag;

pub fn error_prefix() -> console::StyledObject<&'static str> {
    console::style("error:").red().bold()
}

pub fn scan_summary(found: usize, relinked: usize, saved: usize, removed: usize) {
    println!("{} {found} paths scanned", "scan:".cyan().bold());
    if relinked > 0 {
        println!("  {} {relinked} relinked by basename", "~".yellow());
    }
    if saved > 0 {
        println!("  {} {saved} new entries saved", "+".green());
    }
    if removed > 0 {
        println!("  {} {removed} missing entries removed", "-".red());
    }
}

pub fn search_results(result: &SearchResult) {
    println!(
        "{} {} of {}",
        "matches:".cyan().bold(),
        result.items.len(),
        result.total_count
    );
    for (id, path) in &result.items {
        println!("  {} {}", format!("#{id}").dimmed(), path);
    }
}

pub fn tag_created(id: tagstudio_core::model::TagId, name: &str) {
    println!("{} #{id} {name}", "created:".green().bold());
}

pub fn tag_removed(id: tagstudio_core::model::TagId) {
    println!("{} #{id}", "removed:".red().bold());
}

pub fn tag_list(tags: &[Tag], ids: &[tagstudio_core::model::TagId]) {
    for (tag, id) in tags.iter().zip(ids) {
        let marker = if tag.is_category { "category".dimmed() } else { "".dimmed() };
        println!("  {} {} {marker}", format!("#{id}").dimmed(), tag.name.bold());
    }
}

pub fn thumb_cache_stats(stats: tagstudio_core::thumb_cache::CacheStats) {
    println!(
        "{} {} shards, {} bytes",
        "thumb-cache:".cyan().bold(),
        stats.shard_count,
        stats.total_size_bytes
    );
}

pub fn thumb_cache_cleared(outcome: tagstudio_core::thumb_cache::ClearOutcome) {
    print!(
        "{} {} shards removed",
        "thumb-cache:".cyan().bold(),
        outcome.shards_removed
    );
    if outcome.fully_cleared {
        println!();
    } else {
        println!(" {}", "(partial)".yellow());
    }
}

