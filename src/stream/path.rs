use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::error::StreamError;

/// Resolve `requested` below `root`, refusing anything that lands outside it.
///
/// The check runs twice: lexically, so `../` and absolute paths are refused
/// before touching the filesystem, and again on the canonical path, so a
/// symlink pointing out of the library is refused as well.
pub fn resolve_within(root: &Path, requested: &str) -> Result<PathBuf, StreamError> {
    let mut relative = PathBuf::new();
    for component in Path::new(requested).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    warn!(requested, "path escapes the library root");
                    return Err(StreamError::Forbidden);
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                warn!(requested, "absolute path requested");
                return Err(StreamError::Forbidden);
            }
        }
    }

    let root = root.canonicalize().map_err(|e| {
        warn!(root = %root.display(), error = %e, "library root is not accessible");
        StreamError::NotFound
    })?;

    let resolved = root
        .join(&relative)
        .canonicalize()
        .map_err(|_| StreamError::NotFound)?;

    if !resolved.starts_with(&root) {
        warn!(requested, resolved = %resolved.display(), "path resolves outside the library root");
        return Err(StreamError::Forbidden);
    }

    if !resolved.is_file() {
        return Err(StreamError::NotFound);
    }

    Ok(resolved)
}
