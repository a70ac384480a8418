use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncSeekExt;
use tracing::debug;

use super::mime::content_type_for;
use super::path::resolve_within;
use super::range::{ByteRange, parse_range_header};
use crate::error::StreamError;

/// An open file positioned at the first byte to send.
#[derive(Debug)]
pub struct MediaSlice {
    pub file: File,
    pub content_type: &'static str,
    /// Size of the whole file.
    pub total_len: u64,
    /// `None` when the whole file is sent.
    pub range: Option<ByteRange>,
}

impl MediaSlice {
    /// Number of body bytes to send.
    pub fn len(&self) -> u64 {
        self.range.map_or(self.total_len, |r| r.len())
    }
}

/// Resolve `requested` under `root` and open the part selected by `range_header`.
pub async fn open_slice(
    root: &Path,
    requested: &str,
    range_header: Option<&str>,
) -> Result<MediaSlice, StreamError> {
    let path = confine(root.to_path_buf(), requested.to_string()).await?;

    let mut file = File::open(&path).await?;
    let total_len = file.metadata().await?.len();

    let range = match range_header.and_then(parse_range_header) {
        Some(spec) => Some(
            spec.resolve(total_len)
                .map_err(|_| StreamError::RangeNotSatisfiable { size: total_len })?,
        ),
        None => None,
    };

    if let Some(r) = range {
        if r.start > 0 {
            file.seek(SeekFrom::Start(r.start)).await?;
        }
    }

    debug!(path = %path.display(), total_len, ?range, "serving audio");

    Ok(MediaSlice {
        file,
        content_type: content_type_for(&path),
        total_len,
        range,
    })
}

/// Path confinement touches the filesystem synchronously; keep it off the reactor.
async fn confine(root: PathBuf, requested: String) -> Result<PathBuf, StreamError> {
    tokio::task::spawn_blocking(move || resolve_within(&root, &requested))
        .await
        .map_err(|e| StreamError::Io(std::io::Error::other(e)))?
}
