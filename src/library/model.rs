use serde::Serialize;

/// Route that serves audio bytes; descriptors link to it.
pub const STREAM_ENDPOINT: &str = "/api/music/stream";

/// Artist reported when neither the sidecar nor the file names one.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// One playable file in the catalog, as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDescriptor {
    pub id: String,
    pub filename: String,
    /// `/`-separated path below the library root.
    pub relative_path: String,
    pub stream_url: String,
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub format: String,
    pub size_bytes: u64,
}

/// Derive a track id from its relative path.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, so distinct paths can
/// collapse onto the same id (`a-b.mp3` and `a_b.mp3`).
pub fn track_id(relative_path: &str) -> String {
    relative_path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Playback URL for a track, with the relative path percent-encoded.
pub fn stream_url(relative_path: &str) -> String {
    format!(
        "{STREAM_ENDPOINT}?file={}",
        urlencoding::encode(relative_path)
    )
}
