//! STL plus sidecar, written side by side.

use std::path::{Path, PathBuf};

use scaffold_types::TriangleMesh;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{IoError, IoResult};
use crate::metadata::{save_metadata, ExportRecord};
use crate::stl::{save_stl_named, StlFormat, DEFAULT_SOLID_NAME};

/// Options for [`export_bundle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// STL encoding. Default: ASCII
    #[serde(default)]
    pub format: StlFormat,
    /// STL solid name. Default: `"scaffold"`
    #[serde(default = "default_solid_name")]
    pub solid_name: String,
}

fn default_solid_name() -> String {
    DEFAULT_SOLID_NAME.to_string()
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: StlFormat::default(),
            solid_name: default_solid_name(),
        }
    }
}

impl ExportOptions {
    /// ASCII STL named `"scaffold"`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the STL encoding.
    #[must_use]
    pub const fn with_format(mut self, format: StlFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the STL solid name.
    #[must_use]
    pub fn with_solid_name(mut self, name: impl Into<String>) -> Self {
        self.solid_name = name.into();
        self
    }
}

/// Paths written by [`export_bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    /// `<dir>/<stem>.stl`
    pub stl: PathBuf,
    /// `<dir>/<stem>.json`
    pub metadata: PathBuf,
}

/// Write `<stem>.stl` and `<stem>.json` into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`IoError::InvalidContent`] if `stem` is empty or contains a path
/// separator, or any error from the two writers.
///
/// # Example
///
/// ```no_run
/// use scaffold_io::{export_bundle, load_metadata, ExportOptions};
/// # fn record() -> scaffold_io::ExportRecord { unimplemented!() }
/// # let mesh = scaffold_types::TriangleMesh::new();
///
/// let paths = export_bundle("out", "scaffold_001", &mesh, &record(), &ExportOptions::default()).unwrap();
/// let back = load_metadata(&paths.metadata).unwrap();
/// ```
pub fn export_bundle<P: AsRef<Path>>(
    dir: P,
    stem: &str,
    mesh: &TriangleMesh,
    record: &ExportRecord,
    options: &ExportOptions,
) -> IoResult<ExportPaths> {
    if stem.is_empty() || stem.contains(['/', '\\']) {
        return Err(IoError::invalid_content(format!(
            "export stem '{stem}' must be a plain file name"
        )));
    }
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let paths = ExportPaths {
        stl: dir.join(format!("{stem}.stl")),
        metadata: dir.join(format!("{stem}.json")),
    };
    save_stl_named(mesh, &paths.stl, options.format, &options.solid_name)?;
    save_metadata(record, &paths.metadata)?;

    info!(
        stl = %paths.stl.display(),
        metadata = %paths.metadata.display(),
        "Exported scaffold bundle"
    );
    Ok(paths)
}
