//! Flat record list reader and writer.
//!
//! One line per image:
//!
//! ```text
//! <image_path> <object_count> <x1> <y1> <w1> <h1> <c1> [<x2> <y2> <w2> <h2> <c2> ...]
//! ```
//!
//! Boxes are absolute pixels with a top-left origin. Paths are written
//! verbatim, so a path containing whitespace cannot be told apart from the
//! numbers by position alone; the reader anchors on the count instead.

use std::fs;
use std::io::Write;
use std::path::Path;

use super::model::{AbsoluteAnnotation, ImageRecord};
use super::BBoxXYWH;
use crate::error::ConvertError;

/// Format a coordinate as its shortest round-trip decimal.
///
/// Whole numbers keep a trailing `.0` (`40.0`, not `40`).
pub fn format_value(value: f64) -> String {
    format!("{value:?}")
}

/// Render one record as an output line, without the trailing newline.
pub fn format_record_line(record: &ImageRecord) -> String {
    let mut line = format!("{} {}", record.path, record.object_count);
    for ann in &record.annotations {
        let (x, y, w, h) = ann.bbox.to_xywh();
        line.push(' ');
        line.push_str(&format_value(x));
        line.push(' ');
        line.push_str(&format_value(y));
        line.push(' ');
        line.push_str(&format_value(w));
        line.push(' ');
        line.push_str(&format_value(h));
        line.push(' ');
        line.push_str(&ann.class_code.to_string());
    }
    line
}

/// Streams records to any writer, one line each.
pub struct FlatTxtWriter<W: Write> {
    inner: W,
    lines_written: usize,
}

impl<W: Write> FlatTxtWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            lines_written: 0,
        }
    }

    /// Writes one record line. Callers decide which records qualify.
    pub fn write_record(&mut self, record: &ImageRecord) -> std::io::Result<()> {
        writeln!(self.inner, "{}", format_record_line(record))?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Read a flat record file.
pub fn read_flat_txt(path: &Path) -> Result<Vec<ImageRecord>, ConvertError> {
    let content = fs::read_to_string(path).map_err(|source| ConvertError::RecordRead {
        path: path.to_path_buf(),
        source,
    })?;
    from_flat_txt_str(&content, path)
}

/// Parse flat record text. Blank lines are skipped. `path` is only used in
/// error messages.
pub fn from_flat_txt_str(content: &str, path: &Path) -> Result<Vec<ImageRecord>, ConvertError> {
    let mut records = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_record_line(line, path, line_idx + 1)?);
    }
    Ok(records)
}

/// Parse one record line.
///
/// The path is the shortest run of leading tokens that leaves a count
/// followed by exactly five values per object. Path tokens are re-joined
/// with single spaces.
pub fn parse_record_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<ImageRecord, ConvertError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.len() < 2 {
        return Err(ConvertError::RecordParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "expected an image path and an object count, found {} field(s)",
                tokens.len()
            ),
        });
    }

    for count_idx in 1..tokens.len() {
        let Ok(count) = tokens[count_idx].parse::<usize>() else {
            continue;
        };
        let remaining = tokens.len() - count_idx - 1;
        if count.checked_mul(5) != Some(remaining) {
            continue;
        }
        let Some(annotations) = parse_annotations(&tokens[count_idx + 1..]) else {
            continue;
        };
        return Ok(ImageRecord {
            path: tokens[..count_idx].join(" "),
            object_count: count,
            annotations,
        });
    }

    Err(ConvertError::RecordParse {
        path: file_path.to_path_buf(),
        line: line_num,
        message: "no object count matches the number of box values that follow".to_string(),
    })
}

/// Fuzz-only entrypoint for single-line record parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_record_line(input: &str) -> Result<(), ConvertError> {
    let _ = parse_record_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_annotations(values: &[&str]) -> Option<Vec<AbsoluteAnnotation>> {
    values
        .chunks_exact(5)
        .map(|chunk| {
            let x = chunk[0].parse::<f64>().ok()?;
            let y = chunk[1].parse::<f64>().ok()?;
            let w = chunk[2].parse::<f64>().ok()?;
            let h = chunk[3].parse::<f64>().ok()?;
            let class_code = chunk[4].parse::<u32>().ok()?;
            Some(AbsoluteAnnotation::new(
                BBoxXYWH::from_xywh(x, y, w, h),
                class_code,
            ))
        })
        .collect()
}
