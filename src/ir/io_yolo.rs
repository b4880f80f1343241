//! YOLO label file reader.
//!
//! Each label file holds one row per object:
//! `class x_center y_center width height`, with coordinates normalized to
//! the image size. Only the first five fields are read; anything after them
//! is ignored.

use std::fs;
use std::path::{Path, PathBuf};

use super::model::NormalizedAnnotation;
use super::{BBoxCxCyWH, Normalized};
use crate::error::ConvertError;

pub const LABEL_EXTENSION: &str = "txt";

/// A fully parsed label file.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelFile {
    /// Number of lines in the file, parsed or not.
    pub line_count: usize,
    /// One annotation per line, in file order.
    pub annotations: Vec<NormalizedAnnotation>,
}

/// Result of parsing one label file.
///
/// Parsing never aborts by itself: a bad row is reported as
/// [`LabelOutcome::Malformed`] and the caller decides whether that stops
/// the whole run or just drops this file.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelOutcome {
    Parsed(LabelFile),
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Derives the label file name for an image file name.
///
/// Everything up to the last `.` is kept, so `a.b.jpg` maps to `a.b.txt`.
/// A name without a dot keeps its full name.
pub fn label_file_name(image_file_name: &str) -> String {
    let stem = image_file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(image_file_name);
    format!("{stem}.{LABEL_EXTENSION}")
}

/// Read and parse a label file.
///
/// Only I/O failures (missing permissions, invalid UTF-8) are returned as
/// errors; row-level problems come back as [`LabelOutcome::Malformed`].
pub fn read_label_file(path: &Path) -> Result<LabelOutcome, ConvertError> {
    let content = fs::read_to_string(path).map_err(|source| ConvertError::LabelRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_label_str(&content, path))
}

/// Parse the contents of a label file. `path` is only used for messages.
pub fn parse_label_str(content: &str, path: &Path) -> LabelOutcome {
    let mut annotations = Vec::new();
    let mut line_count = 0;

    for (line_idx, line) in label_lines(content).enumerate() {
        line_count += 1;
        match parse_label_line(line, path, line_idx + 1) {
            Ok(annotation) => annotations.push(annotation),
            Err(ConvertError::LabelParse {
                path,
                line,
                message,
            }) => {
                return LabelOutcome::Malformed {
                    path,
                    line,
                    message,
                }
            }
            Err(other) => {
                return LabelOutcome::Malformed {
                    path: path.to_path_buf(),
                    line: line_idx + 1,
                    message: other.to_string(),
                }
            }
        }
    }

    LabelOutcome::Parsed(LabelFile {
        line_count,
        annotations,
    })
}

/// Split label text into rows.
///
/// `\n`, `\r\n` and a lone `\r` all end a row, so files saved with classic
/// Mac line endings keep one object per row. A trailing terminator does not
/// start an extra empty row.
pub fn label_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(|c: char| c == '\n' || c == '\r') {
            Some(end) => {
                let line = &rest[..end];
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

/// Parse a single label row.
///
/// Blank rows are malformed: every line of a label file is an object.
pub fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<NormalizedAnnotation, ConvertError> {
    // Fields past the fifth are ignored, so never collect more than that.
    let tokens: Vec<&str> = line.split_whitespace().take(5).collect();

    if tokens.len() < 5 {
        return Err(ConvertError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("expected at least 5 fields, found {}", tokens.len()),
        });
    }

    let class_id = tokens[0].parse::<usize>().ok();
    let cx = parse_f64_token(tokens[1], "x_center", file_path, line_num)?;
    let cy = parse_f64_token(tokens[2], "y_center", file_path, line_num)?;
    let w = parse_f64_token(tokens[3], "width", file_path, line_num)?;
    let h = parse_f64_token(tokens[4], "height", file_path, line_num)?;

    Ok(NormalizedAnnotation::new(
        class_id,
        BBoxCxCyWH::<Normalized>::from_cxcywh(cx, cy, w, h),
    ))
}

/// Fuzz-only entrypoint for single-row label parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), ConvertError> {
    let _ = parse_label_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, ConvertError> {
    raw.parse::<f64>().map_err(|_| ConvertError::LabelParse {
        path: file_path.to_path_buf(),
        line: line_num,
        message: format!("invalid {field_name} '{raw}'; expected floating-point number"),
    })
}
