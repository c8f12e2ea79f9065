//! Document loading and persistence.
//!
//! The existence probe used by [`load_with_default`] and [`write_if_absent`]
//! is a stat followed by an open, not a lock. At most one materialization may
//! run against a configuration directory at a time.

use crate::document::ConfigDocument;
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::debug;

const INDENT: &[u8] = b"    ";
const BOM: char = '\u{feff}';

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOrigin {
    /// The live file existed and was loaded verbatim.
    Existing,
    /// The live file was missing and has been seeded from the template.
    Seeded,
    /// The live file was missing; the template was loaded without seeding.
    Template,
}

/// A loaded document and its origin.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub document: ConfigDocument,
    pub origin: DocumentOrigin,
}

/// Whether `path` is a regular file that can be opened for reading.
pub fn is_readable(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

/// Read and parse a JSON document.
pub fn load(name: &str, path: &Path) -> Result<ConfigDocument> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let content = content.strip_prefix(BOM).unwrap_or(&content);
    let value: Value =
        serde_json::from_str(content).map_err(|e| Error::malformed(path, e.to_string()))?;
    ConfigDocument::from_value(name, value)
        .ok_or_else(|| Error::malformed(path, "top-level value is not a JSON object"))
}

/// Load `path`, seeding it from `default_path` first if it is missing.
///
/// A seeded document is re-read from `path` after writing, so the returned
/// value always comes from a file that was persisted successfully.
pub fn load_with_default(name: &str, path: &Path, default_path: &Path) -> Result<Loaded> {
    if is_readable(path) {
        return Ok(Loaded {
            document: load(name, path)?,
            origin: DocumentOrigin::Existing,
        });
    }

    let template = load(name, default_path)?;
    write_document(path, &template)?;
    debug!(
        document = name,
        from = %default_path.display(),
        to = %path.display(),
        "Seeded document from default template"
    );

    Ok(Loaded {
        document: load(name, path)?,
        origin: DocumentOrigin::Seeded,
    })
}

/// Load `path` if present, otherwise the template at `default_path`. Never
/// writes.
pub fn load_or_default(name: &str, path: &Path, default_path: &Path) -> Result<Loaded> {
    if is_readable(path) {
        Ok(Loaded {
            document: load(name, path)?,
            origin: DocumentOrigin::Existing,
        })
    } else {
        Ok(Loaded {
            document: load(name, default_path)?,
            origin: DocumentOrigin::Template,
        })
    }
}

/// Serialize a document with 4-space indentation.
pub fn to_pretty_json(doc: &ConfigDocument) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    doc.fields().serialize(&mut ser).map_err(|e| Error::Serialize {
        name: doc.name().to_string(),
        source: e,
    })?;
    Ok(buf)
}

/// Write a document, replacing the contents of whatever is at `path`.
///
/// The file is truncated and rewritten in place, so an existing file keeps
/// its permissions and inode, and a symlinked path writes through to its
/// target.
pub fn write_document(path: &Path, doc: &ConfigDocument) -> Result<()> {
    let content = to_pretty_json(doc)?;
    write_in_place(path, &content)
}

/// Write a document only if nothing readable exists at `path` yet.
///
/// Returns `true` if the file was written.
pub fn write_if_absent(path: &Path, doc: &ConfigDocument) -> Result<bool> {
    if is_readable(path) {
        debug!(document = doc.name(), path = %path.display(), "Kept existing file");
        return Ok(false);
    }
    write_document(path, doc)?;
    Ok(true)
}

fn write_in_place(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut file = File::create(path).map_err(|e| Error::io(path, e))?;
    file.write_all(content).map_err(|e| Error::io(path, e))?;
    file.sync_all().map_err(|e| Error::io(path, e))
}
