use std::path::Path;

/// Served when the extension is not in the table.
pub const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("opus") => "audio/ogg; codecs=opus",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",
        Some("wav") => "audio/wav",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
