//! `file://` URIs for content on the local filesystem.

use std::io;
use std::path::{Component, Path, Prefix};

/// Resolve `path` (which must exist) and render it as a `file://` URI with
/// every segment percent-escaped.
pub fn file_uri(path: &Path) -> io::Result<String> {
    let absolute = path.canonicalize()?;
    Ok(path_to_uri(&absolute))
}

/// Render an absolute path as a `file://` URI without touching the
/// filesystem.
pub fn path_to_uri(absolute: &Path) -> String {
    let mut segments: Vec<String> = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(prefix) => segments.push(match prefix.kind() {
                Prefix::Disk(drive) | Prefix::VerbatimDisk(drive) => {
                    format!("{}:", drive as char)
                }
                _ => prefix.as_os_str().to_string_lossy().into_owned(),
            }),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => segments.push("..".to_string()),
            Component::Normal(segment) => {
                segments.push(urlencoding::encode(&segment.to_string_lossy()).into_owned())
            }
        }
    }
    format!("file:///{}", segments.join("/"))
}
