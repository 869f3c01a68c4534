//! Comma and tab separated cut lists.
//!
//! Every row holds exactly three cells: start, end and name. The time
//! cells are plain seconds, frame numbers or human timecodes depending on
//! the [`TimeColumn`] flavor. An empty time cell is an open bound.

use cutlist_core::{format_duration, parse_time, CutError, FrameRate, Message, Result};
use cutlist_segments::Segment;
use tracing::debug;

use super::format_seconds;

/// How the start and end cells are written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeColumn {
    /// Decimal seconds (`12.5`).
    Seconds,
    /// Frame numbers at the given rate.
    Frames(FrameRate),
    /// `HH:MM:SS.mmm`, read back with the loose time grammar.
    Human,
}

impl TimeColumn {
    fn parse_cell(self, cell: &str) -> Result<Option<f64>> {
        let cell = cell.trim();
        if cell.is_empty() {
            return Ok(None);
        }
        let value = match self {
            Self::Seconds => cell.parse::<f64>().ok(),
            Self::Frames(rate) => cell
                .parse::<f64>()
                .ok()
                .map(|frames| rate.frames_to_seconds(frames)),
            Self::Human => parse_time(cell).map(|parsed| parsed.time),
        };
        match value {
            Some(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(CutError::format(Message::InvalidStartOrEnd)),
        }
    }

    fn format_cell(self, value: Option<f64>) -> String {
        let Some(value) = value else {
            return String::new();
        };
        match self {
            Self::Seconds => format_seconds(value),
            Self::Frames(rate) => rate.frame_count(value).to_string(),
            Self::Human => format_duration(value),
        }
    }
}

// ── Reading ─────────────────────────────────────────────────────

/// Split delimited text into records.
///
/// Quoted fields may contain the delimiter, doubled quotes and line breaks.
/// Blank lines are skipped.
fn read_records(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // distinguishes `""` (one empty field) from a blank line
    let mut touched = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                touched = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                if touched || !field.is_empty() || !record.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                touched = false;
            }
            c if c == delimiter => {
                record.push(std::mem::take(&mut field));
                touched = true;
            }
            _ => field.push(c),
        }
    }

    if touched || !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

/// Parse a three-column cut list.
///
/// Fails if there are no rows, if any row does not have exactly three
/// cells, or if a non-empty time cell cannot be read.
pub fn parse_csv(text: &str, column: TimeColumn) -> Result<Vec<Segment>> {
    let records = read_records(text, ',');
    if records.is_empty() {
        return Err(CutError::format(Message::NoRowsFound));
    }
    if let Some(row) = records.iter().position(|r| r.len() != 3) {
        debug!(row, columns = records[row].len(), "csv row has wrong column count");
        return Err(CutError::format(Message::WrongColumnCount));
    }

    records
        .into_iter()
        .map(|mut record| {
            let name = record.pop().unwrap_or_default();
            let end = column.parse_cell(&record[1])?;
            let start = column.parse_cell(&record[0])?;
            Ok(Segment::new(start, end).with_name(name))
        })
        .collect()
}

pub fn parse_csv_seconds(text: &str) -> Result<Vec<Segment>> {
    parse_csv(text, TimeColumn::Seconds)
}

pub fn parse_csv_human(text: &str) -> Result<Vec<Segment>> {
    parse_csv(text, TimeColumn::Human)
}

pub fn parse_csv_frames(text: &str, rate: FrameRate) -> Result<Vec<Segment>> {
    parse_csv(text, TimeColumn::Frames(rate))
}

// ── Writing ─────────────────────────────────────────────────────

fn quote_field(field: &str, delimiter: char) -> String {
    if field.contains(|c| c == delimiter || c == '"' || c == '\n' || c == '\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write one `start<delim>end<delim>name` row per segment, in list order.
pub fn format_delimited(segments: &[Segment], column: TimeColumn, delimiter: char) -> String {
    let mut out = String::new();
    for segment in segments {
        let cells = [
            column.format_cell(segment.start),
            column.format_cell(segment.end),
            segment.name.clone(),
        ];
        let row: Vec<String> = cells.iter().map(|c| quote_field(c, delimiter)).collect();
        out.push_str(&row.join(&delimiter.to_string()));
        out.push('\n');
    }
    out
}

pub fn format_csv_seconds(segments: &[Segment]) -> String {
    format_delimited(segments, TimeColumn::Seconds, ',')
}

pub fn format_csv_human(segments: &[Segment]) -> String {
    format_delimited(segments, TimeColumn::Human, ',')
}

pub fn format_csv_frames(segments: &[Segment], rate: FrameRate) -> String {
    format_delimited(segments, TimeColumn::Frames(rate), ',')
}

pub fn format_tsv_human(segments: &[Segment]) -> String {
    format_delimited(segments, TimeColumn::Human, '\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(segments: &[Segment]) -> Vec<(Option<f64>, Option<f64>, &str)> {
        segments
            .iter()
            .map(|s| (s.start, s.end, s.name.as_str()))
            .collect()
    }

    #[test]
    fn test_parse_seconds() {
        let segments = parse_csv_seconds("0,1.5,intro\n2,,\n,4,\"a, b\"\n").unwrap();
        assert_eq!(
            bounds(&segments),
            vec![
                (Some(0.0), Some(1.5), "intro"),
                (Some(2.0), None, ""),
                (None, Some(4.0), "a, b"),
            ]
        );
    }

    #[test]
    fn test_wrong_column_count_anywhere_fails() {
        let err = parse_csv_seconds("0,1,a\n1,2\n").unwrap_err();
        assert!(matches!(err, CutError::Format(Message::WrongColumnCount)));
        let err = parse_csv_seconds("0,1,a,extra\n").unwrap_err();
        assert!(matches!(err, CutError::Format(Message::WrongColumnCount)));
    }

    #[test]
    fn test_empty_input_fails() {
        for input in ["", "\n\n", "\r\n"] {
            let err = parse_csv_seconds(input).unwrap_err();
            assert!(matches!(err, CutError::Format(Message::NoRowsFound)));
        }
    }

    #[test]
    fn test_invalid_time_fails() {
        let err = parse_csv_seconds("abc,1,x\n").unwrap_err();
        assert!(matches!(err, CutError::Format(Message::InvalidStartOrEnd)));
        assert!(parse_csv_seconds("inf,1,x\n").is_err());
    }

    #[test]
    fn test_parse_human() {
        let segments = parse_csv_human("00:01:00.500,1:02:03,x\r\n").unwrap();
        assert_eq!(segments[0].start, Some(60.5));
        assert_eq!(segments[0].end, Some(3723.0));
    }

    fn fps_30() -> FrameRate {
        FrameRate::from_fps(30.0).unwrap()
    }

    #[test]
    fn test_frames_round_trip_byte_for_byte() {
        let input = "0,30,a\n45,,\"quoted \"\"name\"\"\"\n,1799,\n";
        let segments = parse_csv_frames(input, fps_30()).unwrap();
        assert_eq!(segments[1].start, Some(1.5));
        assert_eq!(format_csv_frames(&segments, fps_30()), input);
    }

    #[test]
    fn test_frames_with_inexact_seconds_round_trip() {
        let input = "0,155,EP106_SQ010_SH0010\n\
                     156,251,EP106_SQ010_SH0020\n\
                     252,394,EP106_SQ010_SH0030\n";
        let segments = parse_csv_frames(input, fps_30()).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].start, Some(0.0));
        assert!((segments[0].end.unwrap() - 5.1667).abs() < 1e-4);
        assert!((segments[1].start.unwrap() - 5.2).abs() < 1e-9);
        assert_eq!(segments[2].name, "EP106_SQ010_SH0030");
        assert_eq!(format_csv_frames(&segments, fps_30()), input);
    }

    #[test]
    fn test_format_seconds_and_human() {
        let segments = vec![
            Segment::from_range(1.0, 2.25).with_name("a"),
            Segment::new(Some(3.0), None),
        ];
        assert_eq!(format_csv_seconds(&segments), "1,2.25,a\n3,,\n");
        assert_eq!(
            format_csv_human(&segments),
            "00:00:01.000,00:00:02.250,a\n00:00:03.000,,\n"
        );
        assert_eq!(
            format_tsv_human(&segments[..1]),
            "00:00:01.000\t00:00:02.250\ta\n"
        );
    }

    #[test]
    fn test_quoted_field_with_line_break() {
        let records = read_records("1,2,\"two\nlines\"\n", ',');
        assert_eq!(records, vec![vec!["1", "2", "two\nlines"]]);
    }
}
