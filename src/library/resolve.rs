//! Per-field metadata resolution: override, then embedded tag, then fallback.

use super::model::UNKNOWN_ARTIST;
use super::overrides::OverrideEntry;
use super::tags::EmbeddedTags;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub cover: Option<String>,
    pub duration: Option<f64>,
}

/// First candidate that is present and not blank, returned as written.
fn first_text<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
}

fn first_duration(candidates: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    candidates
        .into_iter()
        .flatten()
        .find(|d| d.is_finite() && *d > 0.0)
}

/// `song.final.mp3` -> `song.final`. Names without an extension are kept whole.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

pub fn resolve(
    filename: &str,
    entry: Option<&OverrideEntry>,
    tags: Option<&EmbeddedTags>,
) -> ResolvedMetadata {
    let title = first_text([
        entry.and_then(|e| e.title.as_deref()),
        tags.and_then(|t| t.title.as_deref()),
        Some(strip_extension(filename)),
    ])
    .unwrap_or(filename);

    let artist = first_text([
        entry.and_then(|e| e.artist.as_deref()),
        tags.and_then(|t| t.artist.as_deref()),
        tags.and_then(|t| t.album_artist.as_deref()),
    ])
    .unwrap_or(UNKNOWN_ARTIST);

    let album = first_text([
        entry.and_then(|e| e.album.as_deref()),
        tags.and_then(|t| t.album.as_deref()),
    ]);
    let genre = first_text([
        entry.and_then(|e| e.genre.as_deref()),
        tags.and_then(|t| t.genre.as_deref()),
    ]);
    let cover = first_text([entry.and_then(|e| e.cover.as_deref())]);
    let duration = first_duration([
        entry.and_then(|e| e.duration),
        tags.and_then(|t| t.duration),
    ]);

    ResolvedMetadata {
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.map(str::to_string),
        genre: genre.map(str::to_string),
        cover: cover.map(str::to_string),
        duration,
    }
}
