//! Static media-type classification table (`spec.md` §4.A).
//!
//! Each [`MediaCategory`] owns a fixed suffix set. `mime_guess` backs a
//! fallback for suffixes absent from every category table. A separate
//! equivalence list (`jpg`/`jpeg`, etc.) backs the `FileType` query
//! constraint.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    ImageRaster,
    ImageRaw,
    ImageAnimated,
    ImageVector,
    Video,
    Audio,
    Font,
    Document,
}

impl MediaCategory {
    pub fn name(&self) -> &'static str {
        match self {
            MediaCategory::ImageRaster => "IMAGE_RASTER",
            MediaCategory::ImageRaw => "IMAGE_RAW",
            MediaCategory::ImageAnimated => "IMAGE_ANIMATED",
            MediaCategory::ImageVector => "IMAGE_VECTOR",
            MediaCategory::Video => "VIDEO",
            MediaCategory::Audio => "AUDIO",
            MediaCategory::Font => "FONT",
            MediaCategory::Document => "DOCUMENT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "IMAGE_RASTER" => Some(MediaCategory::ImageRaster),
            "IMAGE_RAW" => Some(MediaCategory::ImageRaw),
            "IMAGE_ANIMATED" => Some(MediaCategory::ImageAnimated),
            "IMAGE_VECTOR" => Some(MediaCategory::ImageVector),
            "VIDEO" => Some(MediaCategory::Video),
            "AUDIO" => Some(MediaCategory::Audio),
            "FONT" => Some(MediaCategory::Font),
            "DOCUMENT" => Some(MediaCategory::Document),
            _ => None,
        }
    }

    pub fn all() -> &'static [MediaCategory] {
        &[
            MediaCategory::ImageRaster,
            MediaCategory::ImageRaw,
            MediaCategory::ImageAnimated,
            MediaCategory::ImageVector,
            MediaCategory::Video,
            MediaCategory::Audio,
            MediaCategory::Font,
            MediaCategory::Document,
        ]
    }
}

static CATEGORY_TABLE: Lazy<HashMap<MediaCategory, HashSet<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        MediaCategory::ImageRaster,
        ["jpg", "jpeg", "png", "bmp", "webp", "tiff", "tif"]
            .into_iter()
            .collect(),
    );
    m.insert(
        MediaCategory::ImageRaw,
        ["raw", "cr2", "nef", "arw", "dng", "orf"].into_iter().collect(),
    );
    m.insert(
        MediaCategory::ImageAnimated,
        ["gif", "apng"].into_iter().collect(),
    );
    m.insert(
        MediaCategory::ImageVector,
        ["svg", "eps", "ai"].into_iter().collect(),
    );
    m.insert(
        MediaCategory::Video,
        ["mp4", "mkv", "mov", "avi", "webm", "flv"].into_iter().collect(),
    );
    m.insert(
        MediaCategory::Audio,
        ["mp3", "wav", "flac", "ogg", "m4a", "aac"].into_iter().collect(),
    );
    m.insert(MediaCategory::Font, ["ttf", "otf", "woff", "woff2"].into_iter().collect());
    m.insert(
        MediaCategory::Document,
        ["pdf", "doc", "docx", "txt", "md", "odt"].into_iter().collect(),
    );
    m
});

/// Extensions that are treated as interchangeable by the `FileType` query
/// constraint (`spec.md` §4.D.3).
static EQUIVALENCE_GROUPS: Lazy<Vec<HashSet<&'static str>>> = Lazy::new(|| {
    vec![
        ["jpg", "jpeg"].into_iter().collect(),
        ["tif", "tiff"].into_iter().collect(),
        ["yml", "yaml"].into_iter().collect(),
        ["htm", "html"].into_iter().collect(),
    ]
});

/// Every suffix that belongs to `category`.
pub fn suffixes_for(category: MediaCategory) -> &'static HashSet<&'static str> {
    CATEGORY_TABLE.get(&category).expect("category table is exhaustive")
}

/// Resolve a `MediaType` query value to its suffix set, accepting both a
/// specific category name and the bare `IMAGE` alias (`spec.md` §6,
/// `mediatype:IMAGE`), which expands to every `IMAGE_*` category.
pub fn suffixes_for_query(name: &str) -> Option<HashSet<&'static str>> {
    if name.eq_ignore_ascii_case("IMAGE") {
        return Some(
            [
                MediaCategory::ImageRaster,
                MediaCategory::ImageRaw,
                MediaCategory::ImageAnimated,
                MediaCategory::ImageVector,
            ]
            .into_iter()
            .flat_map(|c| suffixes_for(c).iter().copied())
            .collect(),
        );
    }
    MediaCategory::from_name(name).map(|c| suffixes_for(c).clone())
}

/// Does `suffix` (already lower-cased, no leading dot) belong to `category`?
/// Falls back to a MIME-based guess when the suffix is in none of the
/// static tables, so unlisted-but-plausible extensions still classify.
pub fn suffix_in_category(suffix: &str, category: MediaCategory) -> bool {
    if suffixes_for(category).contains(suffix) {
        return true;
    }
    if CATEGORY_TABLE.values().any(|set| set.contains(suffix)) {
        // Known to some other category: do not fall back to MIME guessing,
        // which could disagree with our own table.
        return false;
    }
    mime_category(suffix) == Some(category)
}

fn mime_category(suffix: &str) -> Option<MediaCategory> {
    let guess = mime_guess::from_ext(suffix).first()?;
    match guess.type_().as_str() {
        "image" => Some(MediaCategory::ImageRaster),
        "video" => Some(MediaCategory::Video),
        "audio" => Some(MediaCategory::Audio),
        "font" => Some(MediaCategory::Font),
        _ if guess.subtype() == "pdf" => Some(MediaCategory::Document),
        _ => None,
    }
}

/// The suffixes in the same equivalence class as `suffix` (always includes
/// `suffix` itself, even when it belongs to no declared group or category).
pub fn equivalence_class(suffix: &str) -> HashSet<String> {
    for group in EQUIVALENCE_GROUPS.iter() {
        if group.contains(suffix) {
            return group.iter().map(|s| s.to_string()).collect();
        }
    }
    std::iter::once(suffix.to_string()).collect()
}
