//! Record types for both sides of the conversion.
//!
//! A YOLO label row becomes a [`NormalizedAnnotation`]; once the image
//! dimensions are known it turns into an [`AbsoluteAnnotation`], and all of
//! an image's absolute annotations make up one [`ImageRecord`] (one line of
//! the flat output file).

use super::bbox::{BBoxCxCyWH, BBoxXYWH};
use super::space::{Normalized, Pixel};

/// Class code the flat format uses for "object". `0` is background.
pub const OBJECT_CLASS_CODE: u32 = 1;

/// One object as written in a YOLO label file.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedAnnotation {
    /// Source class index. `None` when the first field is not a
    /// non-negative integer; the converter does not require it.
    pub class_id: Option<usize>,

    /// Center-form box, relative to image width and height.
    pub bbox: BBoxCxCyWH<Normalized>,
}

impl NormalizedAnnotation {
    pub fn new(class_id: Option<usize>, bbox: BBoxCxCyWH<Normalized>) -> Self {
        Self { class_id, bbox }
    }

    /// Scales this annotation to an image of the given pixel size.
    pub fn to_absolute(
        &self,
        image_width: u32,
        image_height: u32,
        class_code: u32,
    ) -> AbsoluteAnnotation {
        AbsoluteAnnotation {
            bbox: self
                .bbox
                .to_pixel_xywh(image_width as f64, image_height as f64),
            class_code,
        }
    }
}

/// One object as written in the flat output format.
#[derive(Clone, Debug, PartialEq)]
pub struct AbsoluteAnnotation {
    /// Top-left box in pixels. Not clamped to the image.
    pub bbox: BBoxXYWH<Pixel>,

    /// Destination class code.
    pub class_code: u32,
}

impl AbsoluteAnnotation {
    pub fn new(bbox: BBoxXYWH<Pixel>, class_code: u32) -> Self {
        Self { bbox, class_code }
    }
}

/// One output line: an image path with all of its objects.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRecord {
    /// Image path as enumerated from the image directory.
    pub path: String,

    /// Number of lines in the image's label file.
    pub object_count: usize,

    /// Absolute annotations, in label-file line order.
    pub annotations: Vec<AbsoluteAnnotation>,
}

impl ImageRecord {
    /// Builds a record whose count matches its annotation list.
    pub fn new(path: impl Into<String>, annotations: Vec<AbsoluteAnnotation>) -> Self {
        Self {
            path: path.into(),
            object_count: annotations.len(),
            annotations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_absolute_applies_class_code() {
        let ann = NormalizedAnnotation::new(
            Some(7),
            BBoxCxCyWH::from_cxcywh(0.5, 0.5, 0.2, 0.4),
        );
        let abs = ann.to_absolute(100, 200, OBJECT_CLASS_CODE);
        assert_eq!(abs.class_code, 1);
        assert_eq!(abs.bbox.to_xywh(), (40.0, 60.0, 20.0, 80.0));
    }

    #[test]
    fn new_record_counts_its_annotations() {
        let record = ImageRecord::new(
            "images/a.jpg",
            vec![
                AbsoluteAnnotation::new(BBoxXYWH::from_xywh(1.0, 2.0, 3.0, 4.0), 1),
                AbsoluteAnnotation::new(BBoxXYWH::from_xywh(5.0, 6.0, 7.0, 8.0), 1),
            ],
        );
        assert_eq!(record.object_count, 2);
        assert_eq!(record.annotations.len(), 2);
    }
}
