//! Byte-range streaming of library files.
//!
//! Requests name a file relative to the library root. The path is confined to
//! the root, the `Range` header is resolved against the file size and the
//! selected bytes are read straight from an open file handle.

mod mime;
mod path;
mod range;
mod slice;

pub use mime::content_type_for;
pub use path::resolve_within;
pub use range::{ByteRange, RangeNotSatisfiable, RangeSpec, parse_range_header};
pub use slice::{MediaSlice, open_slice};
