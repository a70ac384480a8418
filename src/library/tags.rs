use std::path::Path;

use lofty::error::LoftyError;
use lofty::prelude::{AudioFile, TaggedFileExt};
use lofty::tag::{Accessor, ItemKey};

/// Metadata read from the file's own container tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// Whole seconds.
    pub duration: Option<f64>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse the primary (or first) tag and the stream duration of an audio file.
pub fn read_embedded(path: &Path) -> Result<EmbeddedTags, LoftyError> {
    let tagged = lofty::read_from_path(path)?;

    let seconds = tagged.properties().duration().as_secs_f64();
    let mut tags = EmbeddedTags {
        duration: (seconds > 0.0).then(|| seconds.round()),
        ..EmbeddedTags::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        tags.title = non_empty(tag.title().as_deref());
        tags.artist = non_empty(tag.artist().as_deref());
        tags.album = non_empty(tag.album().as_deref());
        tags.genre = non_empty(tag.genre().as_deref());
        tags.album_artist = tag
            .items()
            .find(|item| matches!(item.key(), ItemKey::AlbumArtist))
            .and_then(|item| non_empty(item.value().text()));
    }

    Ok(tags)
}
