//! YOLO label directory to flat record list conversion.
//!
//! [`convert`] walks an image directory once, pairs every image with its
//! label file by stem, scales the normalized boxes to the image's pixel
//! size and writes one line per labelled image. Images without labels are
//! skipped quietly; images whose dimensions cannot be read are skipped with
//! a warning; a malformed label row aborts the run unless
//! [`MalformedPolicy::SkipFile`] is chosen.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};

use std::collections::BTreeMap;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::ConvertError;
use crate::ir::io_flat_txt::FlatTxtWriter;
use crate::ir::io_yolo::{label_file_name, read_label_file, LabelOutcome};
use crate::ir::{ImageRecord, OBJECT_CLASS_CODE};

/// Extensions (compared case-insensitively) that mark a file as an image.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Maps source class indices to destination class codes.
///
/// The default maps everything to [`OBJECT_CLASS_CODE`]. Overrides replace
/// the code for specific source classes; rows whose class field is not an
/// integer always get `default_code`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassMapping {
    pub default_code: u32,
    pub overrides: BTreeMap<usize, u32>,
}

impl ClassMapping {
    /// Every object gets the same code.
    pub fn constant(code: u32) -> Self {
        Self {
            default_code: code,
            overrides: BTreeMap::new(),
        }
    }

    /// Use `code` for source class `class_id`.
    pub fn with_override(mut self, class_id: usize, code: u32) -> Self {
        self.overrides.insert(class_id, code);
        self
    }

    pub fn code_for(&self, class_id: Option<usize>) -> u32 {
        class_id
            .and_then(|id| self.overrides.get(&id).copied())
            .unwrap_or(self.default_code)
    }

    /// Returns true if any source class can end up as code 0 (background).
    pub fn emits_background(&self) -> bool {
        self.default_code == 0 || self.overrides.values().any(|&code| code == 0)
    }
}

impl Default for ClassMapping {
    fn default() -> Self {
        Self::constant(OBJECT_CLASS_CODE)
    }
}

/// What to do when a label file contains a row that cannot be parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedPolicy {
    /// Stop the whole run with [`ConvertError::LabelParse`].
    #[default]
    Abort,
    /// Drop the image, record a warning and carry on.
    SkipFile,
}

impl MalformedPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            MalformedPolicy::Abort => "abort",
            MalformedPolicy::SkipFile => "skip-file",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "abort" => Some(MalformedPolicy::Abort),
            "skip-file" | "skip" => Some(MalformedPolicy::SkipFile),
            _ => None,
        }
    }
}

/// Options for a conversion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub class_mapping: ClassMapping,
    pub on_malformed: MalformedPolicy,
    /// Emit records in file-name order instead of directory order.
    pub sort_images: bool,
}

/// Reads the pixel size of an image.
pub trait DimensionReader {
    /// Returns `(width, height)` in pixels.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ConvertError>;
}

/// [`DimensionReader`] that parses image headers with `imagesize`.
///
/// Only the header is read; pixel data is never decoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageSizeReader;

impl DimensionReader for ImageSizeReader {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ConvertError> {
        let size = imagesize::size(path).map_err(|source| ConvertError::ImageDimensionRead {
            path: path.to_path_buf(),
            source,
        })?;

        let width: u32 = size
            .width
            .try_into()
            .map_err(|_| ConvertError::ImageDimensionRange {
                path: path.to_path_buf(),
                message: format!("width {}", size.width),
            })?;

        let height: u32 = size
            .height
            .try_into()
            .map_err(|_| ConvertError::ImageDimensionRange {
                path: path.to_path_buf(),
                message: format!("height {}", size.height),
            })?;

        Ok((width, height))
    }
}

impl<F> DimensionReader for F
where
    F: Fn(&Path) -> Result<(u32, u32), ConvertError>,
{
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ConvertError> {
        self(path)
    }
}

/// Convert with default options: every object becomes class 1, a malformed
/// label row aborts the run, and records follow directory order.
pub fn convert(
    image_dir: &Path,
    label_dir: &Path,
    output_path: &Path,
) -> Result<ConversionReport, ConvertError> {
    convert_with_options(image_dir, label_dir, output_path, &ConvertOptions::default())
}

/// Convert using `imagesize` for image dimensions.
pub fn convert_with_options(
    image_dir: &Path,
    label_dir: &Path,
    output_path: &Path,
    options: &ConvertOptions,
) -> Result<ConversionReport, ConvertError> {
    convert_with_reader(image_dir, label_dir, output_path, options, &ImageSizeReader)
}

/// Convert using a caller-supplied [`DimensionReader`].
///
/// The output file is created (or truncated) before the image directory is
/// read. On a fatal error the lines already written stay in place.
pub fn convert_with_reader<R>(
    image_dir: &Path,
    label_dir: &Path,
    output_path: &Path,
    options: &ConvertOptions,
    reader: &R,
) -> Result<ConversionReport, ConvertError>
where
    R: DimensionReader + ?Sized,
{
    let mut report = ConversionReport::new(
        image_dir.display().to_string(),
        label_dir.display().to_string(),
        output_path.display().to_string(),
    );
    add_policy_notes(options, &mut report);

    let output_error = |source| ConvertError::OutputWrite {
        path: output_path.to_path_buf(),
        source,
    };
    let file = fs::File::create(output_path).map_err(output_error)?;
    let mut writer = FlatTxtWriter::new(BufWriter::new(file));

    for image_path in list_candidate_images(image_dir, options.sort_images)? {
        report.counts.candidate_images += 1;

        let Some(record) = convert_image(&image_path, label_dir, options, reader, &mut report)?
        else {
            continue;
        };

        writer.write_record(&record).map_err(output_error)?;
        report.counts.objects_written += record.annotations.len();
    }

    writer.flush().map_err(output_error)?;
    report.counts.records_written = writer.lines_written();

    log::info!(
        "wrote {} record(s) with {} object(s) to {} ({} candidate image(s))",
        report.counts.records_written,
        report.counts.objects_written,
        output_path.display(),
        report.counts.candidate_images
    );

    Ok(report)
}

/// Build the record for one candidate image, or `None` if it is skipped.
fn convert_image<R>(
    image_path: &Path,
    label_dir: &Path,
    options: &ConvertOptions,
    reader: &R,
    report: &mut ConversionReport,
) -> Result<Option<ImageRecord>, ConvertError>
where
    R: DimensionReader + ?Sized,
{
    let file_name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let label_path = label_dir.join(label_file_name(&file_name));

    // Anything at the label path counts as a label; a directory there fails
    // the read instead of being skipped.
    if !label_path.exists() {
        log::debug!("no label file for {}, skipping", image_path.display());
        report.counts.skipped_without_labels += 1;
        return Ok(None);
    }

    let (width, height) = match reader.dimensions(image_path) {
        Ok(dims) => dims,
        Err(err) => {
            log::warn!("skipping {}: {err}", image_path.display());
            report.counts.skipped_unreadable_images += 1;
            report.add(
                ConversionIssue::warning(ConversionIssueCode::ImageUnreadable, err.to_string())
                    .with_path(image_path.display().to_string()),
            );
            return Ok(None);
        }
    };

    let label = match read_label_file(&label_path)? {
        LabelOutcome::Parsed(label) => label,
        LabelOutcome::Malformed {
            path,
            line,
            message,
        } => match options.on_malformed {
            MalformedPolicy::Abort => {
                return Err(ConvertError::LabelParse {
                    path,
                    line,
                    message,
                })
            }
            MalformedPolicy::SkipFile => {
                log::warn!(
                    "skipping {}: {} line {}: {message}",
                    image_path.display(),
                    path.display(),
                    line
                );
                report.counts.skipped_malformed_labels += 1;
                report.add(
                    ConversionIssue::warning(
                        ConversionIssueCode::MalformedLabelFile,
                        format!("{} line {}: {}", path.display(), line, message),
                    )
                    .with_path(path.display().to_string()),
                );
                return Ok(None);
            }
        },
    };

    if label.line_count == 0 {
        log::debug!("empty label file for {}, skipping", image_path.display());
        report.counts.skipped_empty_labels += 1;
        return Ok(None);
    }

    let annotations = label
        .annotations
        .iter()
        .map(|ann| ann.to_absolute(width, height, options.class_mapping.code_for(ann.class_id)))
        .collect::<Vec<_>>();

    let path = image_path.display().to_string();
    if path.chars().any(char::is_whitespace) {
        report.add(
            ConversionIssue::warning(
                ConversionIssueCode::PathContainsWhitespace,
                format!("image path '{path}' contains whitespace"),
            )
            .with_path(path.clone()),
        );
    }

    let non_finite = annotations
        .iter()
        .filter(|ann| !ann.bbox.origin.is_finite() || !ann.bbox.size.is_finite())
        .count();
    if non_finite > 0 {
        report.add(
            ConversionIssue::warning(
                ConversionIssueCode::NonFiniteBox,
                format!("{non_finite} box(es) for '{path}' have NaN or infinite coordinates"),
            )
            .with_path(path.clone()),
        );
    }

    log::debug!(
        "{}: {}x{}, {} object(s)",
        image_path.display(),
        width,
        height,
        label.line_count
    );

    Ok(Some(ImageRecord {
        path,
        object_count: label.line_count,
        annotations,
    }))
}

/// List files in `image_dir` (not recursing) whose names carry an image
/// extension.
///
/// Directories are skipped; anything else, including broken symlinks, is a
/// candidate and will surface as an unreadable image if it is one.
fn list_candidate_images(image_dir: &Path, sort: bool) -> Result<Vec<PathBuf>, ConvertError> {
    let mut walker = WalkDir::new(image_dir).min_depth(1).max_depth(1);
    if sort {
        walker = walker.sort_by_file_name();
    }

    let mut images = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| ConvertError::DirectoryRead {
            path: image_dir.to_path_buf(),
            message: source.to_string(),
        })?;

        if entry.path().is_dir() {
            continue;
        }

        if has_image_extension(&entry.file_name().to_string_lossy()) {
            images.push(entry.into_path());
        }
    }

    Ok(images)
}

fn has_image_extension(file_name: &str) -> bool {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return false;
    };
    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

fn add_policy_notes(options: &ConvertOptions, report: &mut ConversionReport) {
    if options.class_mapping.emits_background() {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::BackgroundClassCode,
            "class mapping emits code 0, which the output format reserves for background",
        ));
    }

    if !options.sort_images {
        report.add(ConversionIssue::info(
            ConversionIssueCode::EnumerationOrder,
            "records follow directory enumeration order",
        ));
    }
}
