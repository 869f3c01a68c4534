//! Subcommand implementations.

use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, Result};
use cutlist_core::{format_duration, CutError, Message};
use cutlist_edl::{
    format_edl, EdlFormat, ExportParams, ExportRequest, Interchange, MediaInfo, NoDialog,
    ReadRequest, StdFileSystem, DESCRIPTORS,
};
use cutlist_segments::{partition_into_overlapping_ranges, Segment, SegmentList};
use tracing::info;

use crate::config::Config;

/// Loaded configuration plus the file boundary.
pub struct Context {
    pub config: Config,
    pub interchange: Interchange<StdFileSystem, NoDialog>,
}

/// Where transformed segments go.
pub struct Output<'a> {
    pub format: Option<EdlFormat>,
    pub path: Option<&'a Path>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            interchange: Interchange::headless(),
        }
    }

    fn import(&self, path: &Path, format: EdlFormat, media: &MediaInfo) -> Result<SegmentList> {
        let segments = self
            .interchange
            .read_edl_file(&ReadRequest {
                format,
                path,
                fps: media.fps,
            })
            .with_context(|| format!("Failed to import {}", path.display()))?;
        Ok(SegmentList::from_segments(segments))
    }

    fn emit(&self, segments: &[Segment], output: &Output<'_>, media: &MediaInfo) -> Result<()> {
        let format = output.format.unwrap_or(self.config.export.format);
        match output.path {
            Some(path) => {
                self.interchange
                    .export_edl_file(&ExportRequest {
                        format,
                        segments,
                        path,
                        fps: media.fps,
                        media_file_name: None,
                    })
                    .with_context(|| format!("Failed to export {}", path.display()))?;
            }
            None => {
                let params = ExportParams {
                    fps: media.fps,
                    media_file_name: None,
                };
                let text = format_edl(format, segments, &params)?;
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                if !text.ends_with('\n') {
                    writeln!(stdout)?;
                }
            }
        }
        Ok(())
    }

    /// Re-encode a cut list, optionally resolving open bounds first.
    pub fn convert(
        &self,
        input: &Path,
        from: EdlFormat,
        output: &Output<'_>,
        media: &MediaInfo,
        clean: bool,
    ) -> Result<()> {
        let list = self.import(input, from, media)?;
        let segments = if clean {
            list.clean_segments(media.duration)
        } else {
            list.into_vec()
        };
        info!(segments = segments.len(), "converting");
        self.emit(&segments, output, media)
    }

    /// Print a segment table and an overlap report.
    pub fn inspect(
        &self,
        input: &Path,
        from: EdlFormat,
        media: &MediaInfo,
        json: bool,
    ) -> Result<()> {
        let list = self.import(input, from, media)?;
        if json {
            println!("{}", serde_json::to_string_pretty(list.as_slice())?);
            return Ok(());
        }

        println!("{:>3}  {:<12}  {:<12}  {:<12}  name", "#", "start", "end", "length");
        for (i, segment) in list.iter().enumerate() {
            let end = segment.end.or(media.duration);
            println!(
                "{:>3}  {:<12}  {:<12}  {:<12}  {}",
                i + 1,
                format_duration(segment.apparent_start()),
                end.map(format_duration).unwrap_or_else(|| "-".into()),
                end.map(|e| format_duration(e - segment.apparent_start()))
                    .unwrap_or_else(|| "-".into()),
                segment.name
            );
        }
        println!(
            "{} segments, {} valid",
            list.len(),
            list.valid_count(media.duration)
        );

        let sorted = list.sorted();
        let groups = partition_into_overlapping_ranges(&sorted, Segment::apparent_start, |s| {
            s.end.or(media.duration).unwrap_or(f64::INFINITY)
        });
        for group in groups {
            let members: Vec<String> = group
                .iter()
                .filter_map(|s| list.index_of(&s.id))
                .map(|i| (i + 1).to_string())
                .collect();
            println!("overlapping: {}", members.join(", "));
        }
        Ok(())
    }

    /// Export the gaps between segments.
    pub fn invert(
        &self,
        input: &Path,
        from: EdlFormat,
        output: &Output<'_>,
        media: &MediaInfo,
        include_first: bool,
        include_last: bool,
    ) -> Result<()> {
        let list = self.import(input, from, media)?;
        let gaps = list
            .inverse(include_first, include_last, media.duration)
            .ok_or_else(|| CutError::Domain(Message::SegmentsOverlap))?;
        let segments: Vec<Segment> = gaps.iter().map(|gap| gap.to_segment()).collect();
        info!(gaps = segments.len(), "inverted");
        self.emit(&segments, output, media)
    }

    /// Merge overlapping segments and export the result.
    pub fn merge(
        &self,
        input: &Path,
        from: EdlFormat,
        output: &Output<'_>,
        media: &MediaInfo,
    ) -> Result<()> {
        let mut list = self.import(input, from, media)?;
        let before = list.len();
        list.combine_overlapping(media.duration);
        info!(before, after = list.len(), "merged overlapping segments");
        self.emit(list.as_slice(), output, media)
    }

    /// Print chapters covering the timeline.
    pub fn chapters(
        &self,
        input: &Path,
        from: EdlFormat,
        media: &MediaInfo,
        json: bool,
    ) -> Result<()> {
        let chapters = self.import(input, from, media)?.chapters()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&chapters)?);
            return Ok(());
        }
        for chapter in chapters {
            println!(
                "{}  {}  {}",
                format_duration(chapter.start),
                chapter.end.map(format_duration).unwrap_or_else(|| "-".into()),
                chapter.name
            );
        }
        Ok(())
    }
}

/// List the supported formats.
pub fn formats() {
    let mark = |supported: bool| if supported { "yes" } else { "-" };
    println!("{:<24}  {:<6}  {:<6}  description", "format", "import", "export");
    for descriptor in &DESCRIPTORS {
        println!(
            "{:<24}  {:<6}  {:<6}  {}",
            descriptor.tag,
            mark(descriptor.import.is_some()),
            mark(descriptor.export.is_some()),
            descriptor.label
        );
    }
}
