use std::fs;
use std::path::Path;

use lofty::error::LoftyError;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{TrackDescriptor, stream_url, track_id};
use super::overrides::{Overrides, load_overrides};
use super::resolve::resolve;
use super::tags::{EmbeddedTags, read_embedded};

/// Lowercased extension of `filename` if it is one of the configured audio formats.
///
/// The extension is whatever follows the last `.`, so `.mp3` counts as an mp3.
pub(crate) fn audio_extension(filename: &str, settings: &LibrarySettings) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();

    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.'))
        .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(&ext))
        .then_some(ext)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn stays_within(canonical_root: &Path, path: &Path) -> bool {
    path.canonicalize()
        .map(|resolved| resolved.starts_with(canonical_root))
        .unwrap_or(false)
}

/// `/`-joined path of `path` below `root`, or `None` for non UTF-8 names.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        parts.push(component.as_os_str().to_str()?);
    }
    Some(parts.join("/"))
}

/// Load the sidecar below `settings.root` and scan the library with it.
pub fn build_catalog(settings: &LibrarySettings) -> Vec<TrackDescriptor> {
    let overrides = load_overrides(&settings.metadata_path());
    scan(&settings.root, settings, &overrides)
}

pub fn scan(root: &Path, settings: &LibrarySettings, overrides: &Overrides) -> Vec<TrackDescriptor> {
    scan_with(root, settings, overrides, read_embedded)
}

/// Walk `root` and describe every audio file, reading embedded tags with `read_tags`
/// for files that have no override.
pub(crate) fn scan_with<F>(
    root: &Path,
    settings: &LibrarySettings,
    overrides: &Overrides,
    read_tags: F,
) -> Vec<TrackDescriptor>
where
    F: Fn(&Path) -> Result<EmbeddedTags, LoftyError>,
{
    let mut tracks: Vec<TrackDescriptor> = Vec::new();

    // Files reached through symlinks must still resolve inside the root, or
    // the stream endpoint would refuse the URLs we hand out.
    let canonical_root = match root.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            warn!(root = %root.display(), error = %e, "library root is not accessible");
            return tracks;
        }
    };

    let mut walker = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        // An unreadable directory drops its subtree; the walk carries on.
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = ?e.path(), error = %e, "skipping unreadable library entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if settings.follow_links && !stays_within(&canonical_root, entry.path()) {
            warn!(path = %entry.path().display(), "symlinked file resolves outside the library root, skipping it");
            continue;
        }

        if let Some(track) = describe(root, entry.path(), settings, overrides, &read_tags) {
            tracks.push(track);
        }
    }

    debug!(root = %root.display(), count = tracks.len(), "library scan finished");
    tracks
}

fn describe<F>(
    root: &Path,
    path: &Path,
    settings: &LibrarySettings,
    overrides: &Overrides,
    read_tags: &F,
) -> Option<TrackDescriptor>
where
    F: Fn(&Path) -> Result<EmbeddedTags, LoftyError>,
{
    let filename = path.file_name()?.to_str()?;
    let format = audio_extension(filename, settings)?;
    let relative_path = relative_path(root, path)?;

    let size_bytes = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot stat audio file, skipping it");
            return None;
        }
    };

    let entry = overrides.lookup(&relative_path, filename);

    // Sidecar entries win outright; tags are only read when there is none.
    let tags = match entry {
        Some(_) => None,
        None => match read_tags(path) {
            Ok(tags) => Some(tags),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no readable tags, using file name");
                None
            }
        },
    };

    let meta = resolve(filename, entry, tags.as_ref());

    Some(TrackDescriptor {
        id: track_id(&relative_path),
        filename: filename.to_string(),
        stream_url: stream_url(&relative_path),
        relative_path,
        title: meta.title,
        artist: meta.artist,
        album: meta.album,
        genre: meta.genre,
        cover: meta.cover,
        duration: meta.duration,
        format,
        size_bytes,
    })
}
