//! The file-system and dialog boundary around [`parse_edl`] and
//! [`format_edl`].

use std::path::{Path, PathBuf};

use cutlist_core::Result;
use cutlist_segments::Segment;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::format::{format_edl, parse_edl, EdlFormat, EdlInput, ExportParams, ImportParams};

/// Reads and writes whole files.
pub trait FileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    fn write(&self, path: &Path, data: &[u8]) -> Result<()>;
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        Ok(std::fs::write(path, data)?)
    }
}

/// A file-type filter shown in open and save dialogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

/// Asks the user for a path. `None` means the dialog was canceled.
pub trait FileDialog {
    fn show_open_dialog(&self, title: &str, filters: &[DialogFilter]) -> Option<PathBuf>;
    fn show_save_dialog(
        &self,
        title: &str,
        default_path: &Path,
        filters: &[DialogFilter],
    ) -> Option<PathBuf>;
}

/// A dialog that is always canceled, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDialog;

impl FileDialog for NoDialog {
    fn show_open_dialog(&self, _title: &str, _filters: &[DialogFilter]) -> Option<PathBuf> {
        None
    }

    fn show_save_dialog(
        &self,
        _title: &str,
        _default_path: &Path,
        _filters: &[DialogFilter],
    ) -> Option<PathBuf> {
        None
    }
}

/// What is known about the media being cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Seconds, once probed.
    pub duration: Option<f64>,
    pub fps: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct ReadRequest<'a> {
    pub format: EdlFormat,
    pub path: &'a Path,
    pub fps: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub format: EdlFormat,
    pub segments: &'a [Segment],
    pub path: &'a Path,
    pub fps: Option<f64>,
    pub media_file_name: Option<&'a str>,
}

/// Routes imports and exports between files and the codecs.
#[derive(Debug, Clone, Default)]
pub struct Interchange<F, D> {
    fs: F,
    dialog: D,
}

impl Interchange<StdFileSystem, NoDialog> {
    /// Real files, no dialogs.
    pub fn headless() -> Self {
        Self::new(StdFileSystem, NoDialog)
    }
}

impl<F: FileSystem, D: FileDialog> Interchange<F, D> {
    pub fn new(fs: F, dialog: D) -> Self {
        Self { fs, dialog }
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Read and parse an EDL file.
    pub fn read_edl_file(&self, request: &ReadRequest<'_>) -> Result<Vec<Segment>> {
        let descriptor = request.format.descriptor();
        let data = self.fs.read(request.path)?;
        let input = match descriptor.import {
            Some(spec) if spec.binary => EdlInput::Bytes(data),
            _ => EdlInput::Text(String::from_utf8_lossy(&data).into_owned()),
        };

        let segments = parse_edl(
            request.format,
            &input,
            &ImportParams { fps: request.fps },
        )?;
        info!(
            path = %request.path.display(),
            format = %request.format,
            segments = segments.len(),
            "imported edl"
        );
        Ok(segments)
    }

    /// Format segments and write them to a file.
    pub fn export_edl_file(&self, request: &ExportRequest<'_>) -> Result<()> {
        let params = ExportParams {
            fps: request.fps,
            media_file_name: request.media_file_name.map(str::to_string),
        };
        let text = format_edl(request.format, request.segments, &params)?;
        self.fs.write(request.path, text.as_bytes())?;
        info!(
            path = %request.path.display(),
            format = %request.format,
            segments = request.segments.len(),
            "exported edl"
        );
        Ok(())
    }

    /// Let the user pick a file and import it. `Ok(None)` if canceled.
    pub fn ask_for_edl_import(
        &self,
        format: EdlFormat,
        media: &MediaInfo,
    ) -> Result<Option<Vec<Segment>>> {
        let descriptor = format.descriptor();
        let filters: Vec<DialogFilter> = descriptor
            .import
            .iter()
            .map(|spec| DialogFilter {
                name: descriptor.label.to_string(),
                extensions: spec.extensions.iter().map(|e| e.to_string()).collect(),
            })
            .collect();

        let title = format!("Import {}", descriptor.label);
        let Some(path) = self.dialog.show_open_dialog(&title, &filters) else {
            return Ok(None);
        };

        self.read_edl_file(&ReadRequest {
            format,
            path: &path,
            fps: media.fps,
        })
        .map(Some)
    }

    /// Let the user pick a destination and export to it.
    ///
    /// The proposed path is `default_path` with the format's extension.
    /// Returns the chosen path, or `Ok(None)` if canceled.
    pub fn ask_for_edl_export(
        &self,
        format: EdlFormat,
        segments: &[Segment],
        default_path: &Path,
        media: &MediaInfo,
    ) -> Result<Option<PathBuf>> {
        let descriptor = format.descriptor();
        let proposed = match descriptor.export {
            Some(spec) => default_path.with_extension(spec.extension),
            None => default_path.to_path_buf(),
        };
        let filters: Vec<DialogFilter> = descriptor
            .export
            .iter()
            .map(|spec| DialogFilter {
                name: spec.filter_label.to_string(),
                extensions: vec![spec.extension.to_string()],
            })
            .collect();

        let title = format!("Export {}", descriptor.label);
        let Some(path) = self.dialog.show_save_dialog(&title, &proposed, &filters) else {
            return Ok(None);
        };

        let media_file_name = default_path.file_name().and_then(|n| n.to_str());
        self.export_edl_file(&ExportRequest {
            format,
            segments,
            path: &path,
            fps: media.fps,
            media_file_name,
        })?;
        Ok(Some(path))
    }
}
