//! Image export.
//!
//! Rasterizing is the host's job ([`ImageEncoder`]). The bytes go to a
//! user-picked location through a [`FileSink`] when the host has one, and
//! fall back to a plain download otherwise or when the write fails.

use std::fs;
use std::io;
use std::path::PathBuf;

pub const DEFAULT_EXPORT_NAME: &str = "wardley-map.png";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode image: {0}")]
    Encode(String),
    #[error("failed to write {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Produces PNG bytes of the current canvas.
pub trait ImageEncoder {
    fn encode_png(&self) -> Result<Vec<u8>, ExportError>;
}

/// A writable location chosen by the user (a save dialog, a directory).
pub trait FileSink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

/// Last-resort delivery, e.g. a browser download.
pub trait DownloadSink {
    fn download(&mut self, name: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(String),
    Downloaded(String),
}

/// `title` with every non-alphanumeric character replaced by `-`, plus
/// `.png`. An empty title gives [`DEFAULT_EXPORT_NAME`].
pub fn export_filename(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return DEFAULT_EXPORT_NAME.to_string();
    }
    let stem: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!("{stem}.png")
}

pub fn export_image(
    title: &str,
    encoder: &dyn ImageEncoder,
    file_sink: Option<&mut dyn FileSink>,
    download: &mut dyn DownloadSink,
) -> Result<ExportOutcome, ExportError> {
    let name = export_filename(title);
    let bytes = encoder.encode_png()?;
    if let Some(sink) = file_sink {
        match sink.write(&name, &bytes) {
            Ok(()) => return Ok(ExportOutcome::Written(name)),
            Err(e) => log::warn!("file export failed, falling back to download: {e}"),
        }
    }
    download.download(&name, &bytes)?;
    Ok(ExportOutcome::Downloaded(name))
}

/// Writes exports into a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSink for DirectorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), ExportError> {
        fs::write(self.dir.join(name), bytes).map_err(|source| ExportError::Write {
            name: name.to_string(),
            source,
        })
    }
}
