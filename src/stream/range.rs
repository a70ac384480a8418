//! Single-range `Range: bytes=...` handling.

/// A syntactically valid single byte range, not yet checked against a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// `bytes=<start>-` or `bytes=<start>-<end>`.
    FromTo { start: u64, end: Option<u64> },
    /// `bytes=-<n>`: the last `n` bytes.
    Suffix(u64),
}

/// Inclusive byte span inside a file; `start <= end < size` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeNotSatisfiable;

impl ByteRange {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a file of `size` bytes.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// Parse a `Range` header value.
///
/// Returns `None` for anything that is not one `bytes` range: other units,
/// garbage and multi-range lists. Callers then ignore the header and serve
/// the whole file.
pub fn parse_range_header(value: &str) -> Option<RangeSpec> {
    let spec = value.trim().strip_prefix("bytes=")?.trim();
    if spec.contains(',') {
        return None;
    }

    let (start, end) = spec.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());

    if start.is_empty() {
        return end.parse().ok().map(RangeSpec::Suffix);
    }

    let start = start.parse().ok()?;
    let end = if end.is_empty() {
        None
    } else {
        Some(end.parse().ok()?)
    };
    Some(RangeSpec::FromTo { start, end })
}

impl RangeSpec {
    /// Pin the range to a file of `size` bytes.
    ///
    /// An `end` past the last byte is clamped. A start past the last byte, an
    /// inverted range, an empty suffix or any range on an empty file cannot
    /// be satisfied.
    pub fn resolve(self, size: u64) -> Result<ByteRange, RangeNotSatisfiable> {
        if size == 0 {
            return Err(RangeNotSatisfiable);
        }
        let last = size - 1;

        match self {
            RangeSpec::FromTo { start, end } => {
                if start > last {
                    return Err(RangeNotSatisfiable);
                }
                let end = end.unwrap_or(last);
                if end < start {
                    return Err(RangeNotSatisfiable);
                }
                Ok(ByteRange {
                    start,
                    end: end.min(last),
                })
            }
            RangeSpec::Suffix(0) => Err(RangeNotSatisfiable),
            RangeSpec::Suffix(n) => Ok(ByteRange {
                start: size.saturating_sub(n),
                end: last,
            }),
        }
    }
}
