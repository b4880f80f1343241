//! Conversion report types for tracking skipped images and policy notes.

use serde::Serialize;
use std::fmt;

/// A report generated by a conversion run.
///
/// Tracks how many images were considered, written and skipped (and why),
/// so that a run which quietly drops half a dataset is visible.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Image directory that was scanned.
    pub image_dir: String,
    /// Label directory that was matched against.
    pub label_dir: String,
    /// Flat record file that was written.
    pub output: String,
    /// What happened to the candidate images.
    pub counts: ConversionCounts,
    /// Issues discovered during conversion.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    /// Create a new empty report for one run.
    pub fn new(
        image_dir: impl Into<String>,
        label_dir: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            image_dir: image_dir.into(),
            label_dir: label_dir.into(),
            output: output.into(),
            ..Default::default()
        }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Count of warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    /// Count of info-level issues.
    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// Returns true if any image was dropped for a reason other than
    /// simply having no (or an empty) label file.
    pub fn has_skipped_images(&self) -> bool {
        self.counts.skipped_unreadable_images > 0 || self.counts.skipped_malformed_labels > 0
    }

    /// Issues with the given code.
    pub fn issues_with_code(
        &self,
        code: ConversionIssueCode,
    ) -> impl Iterator<Item = &ConversionIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        writeln!(
            f,
            "  {} candidate images, {} records written, {} objects",
            c.candidate_images, c.records_written, c.objects_written
        )?;

        let skipped = c.skipped_without_labels
            + c.skipped_empty_labels
            + c.skipped_unreadable_images
            + c.skipped_malformed_labels;
        if skipped > 0 {
            writeln!(
                f,
                "  skipped: {} without labels, {} empty labels, {} unreadable images, {} malformed labels",
                c.skipped_without_labels,
                c.skipped_empty_labels,
                c.skipped_unreadable_images,
                c.skipped_malformed_labels
            )?;
        }

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Warning)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

/// Per-run tallies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    /// Files in the image directory with an image extension.
    pub candidate_images: usize,
    /// Lines written to the output file.
    pub records_written: usize,
    /// Object tuples written across all lines.
    pub objects_written: usize,
    /// Candidates with no label file.
    pub skipped_without_labels: usize,
    /// Candidates whose label file has no lines.
    pub skipped_empty_labels: usize,
    /// Candidates whose dimensions could not be read.
    pub skipped_unreadable_images: usize,
    /// Candidates dropped under the skip-file malformed policy.
    pub skipped_malformed_labels: usize,
}

/// A single issue discovered during conversion.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
    /// File the issue is about, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ConversionIssue {
    /// Create a warning-level issue.
    pub fn warning(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Create an info-level issue.
    pub fn info(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Attach the file this issue refers to.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Severity level for conversion issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// Data was dropped or may be misread downstream.
    Warning,
    /// A policy note; nothing was lost.
    Info,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON report and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// Image dimensions could not be read; the image was skipped.
    ImageUnreadable,
    /// A label file had a malformed row and was skipped.
    MalformedLabelFile,
    /// An image path contains whitespace, which whitespace-split readers
    /// of the output will misparse.
    PathContainsWhitespace,
    /// A box has a NaN or infinite coordinate.
    NonFiniteBox,
    /// The class mapping emits code 0, which the output format treats as
    /// background.
    BackgroundClassCode,
    /// Records follow directory enumeration order, not sorted order.
    EnumerationOrder,
}
