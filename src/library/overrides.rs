//! Sidecar metadata overrides.
//!
//! The sidecar is a JSON array of entries keyed by `filename`. A key may be a
//! bare file name (`song.mp3`, applies in every directory) or a relative path
//! (`Live/song.mp3`, applies to that file only). Path keys win.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OverrideEntry {
    pub filename: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    by_key: HashMap<String, OverrideEntry>,
}

impl Overrides {
    /// Index entries by their `filename` key. Later duplicates replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = OverrideEntry>) -> Self {
        let mut by_key = HashMap::new();
        for entry in entries {
            by_key.insert(entry.filename.clone(), entry);
        }
        Self { by_key }
    }

    /// Find the override for a file, trying its relative path before its bare name.
    pub fn lookup(&self, relative_path: &str, filename: &str) -> Option<&OverrideEntry> {
        self.by_key
            .get(relative_path)
            .or_else(|| self.by_key.get(filename))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Load the sidecar at `path`.
///
/// Never fails: a missing, unreadable or malformed file yields no overrides.
pub fn load_overrides(path: &Path) -> Overrides {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no metadata sidecar");
            return Overrides::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read metadata sidecar, ignoring it");
            return Overrides::default();
        }
    };

    match serde_json::from_str::<Vec<OverrideEntry>>(&content) {
        Ok(entries) => {
            let overrides = Overrides::from_entries(entries);
            debug!(path = %path.display(), count = overrides.len(), "loaded metadata overrides");
            overrides
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed metadata sidecar, ignoring it");
            Overrides::default()
        }
    }
}
