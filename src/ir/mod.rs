//! Annotation records and the two text formats they move between.
//!
//! # Design Principles
//!
//! 1. **Type Safety**: marker types keep normalized label values and
//!    absolute pixel values apart at compile time.
//!
//! 2. **No Silent Fixups**: boxes are never clamped or reordered. A label
//!    whose box hangs off the image produces a negative origin, exactly as
//!    the arithmetic says.
//!
//! # Example
//!
//! ```
//! use yolo2flat::ir::{BBoxCxCyWH, NormalizedAnnotation, OBJECT_CLASS_CODE};
//!
//! let ann = NormalizedAnnotation::new(Some(0), BBoxCxCyWH::from_cxcywh(0.5, 0.5, 0.2, 0.4));
//! let abs = ann.to_absolute(100, 200, OBJECT_CLASS_CODE);
//! assert_eq!(abs.bbox.to_xywh(), (40.0, 60.0, 20.0, 80.0));
//! ```

mod bbox;
mod coord;
pub mod io_flat_txt;
pub mod io_yolo;
mod model;
mod space;

pub use bbox::{BBoxCxCyWH, BBoxXYWH};
pub use coord::Coord;
pub use model::{AbsoluteAnnotation, ImageRecord, NormalizedAnnotation, OBJECT_CLASS_CODE};
pub use space::{Normalized, Pixel};
