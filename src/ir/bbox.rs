//! Bounding box types for the two encodings the converter bridges.

use super::coord::Coord;
use super::{Normalized, Pixel};

/// An axis-aligned box stored as center point plus size.
///
/// This is how YOLO label rows describe objects, always in
/// [`Normalized`] space there.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxCxCyWH<TSpace> {
    pub center: Coord<TSpace>,
    pub size: Coord<TSpace>,
}

/// An axis-aligned box stored as top-left corner plus size.
///
/// The constructor does not clamp or reorder anything: a box that hangs
/// off the image edge keeps its negative origin.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYWH<TSpace> {
    pub origin: Coord<TSpace>,
    pub size: Coord<TSpace>,
}

impl<TSpace> BBoxCxCyWH<TSpace> {
    #[inline]
    pub fn from_cxcywh(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            center: Coord::new(cx, cy),
            size: Coord::new(width, height),
        }
    }

    #[inline]
    pub fn cx(&self) -> f64 {
        self.center.x
    }

    #[inline]
    pub fn cy(&self) -> f64 {
        self.center.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Returns true if all four values are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.size.is_finite()
    }
}

impl<TSpace> BBoxXYWH<TSpace> {
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Coord::new(x, y),
            size: Coord::new(width, height),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.origin.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.origin.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Returns `(x, y, width, height)`.
    #[inline]
    pub fn to_xywh(&self) -> (f64, f64, f64, f64) {
        (self.x(), self.y(), self.width(), self.height())
    }
}

impl BBoxCxCyWH<Normalized> {
    /// Converts a normalized center box to a top-left pixel box.
    ///
    /// The size is scaled first and the origin is derived from the scaled
    /// center minus half the scaled size, so `x = cx * W - (w * W) / 2`.
    /// Output values must be bit-identical to that formula.
    pub fn to_pixel_xywh(&self, image_width: f64, image_height: f64) -> BBoxXYWH<Pixel> {
        let width = self.width() * image_width;
        let height = self.height() * image_height;
        let x = self.cx() * image_width - width / 2.0;
        let y = self.cy() * image_height - height / 2.0;
        BBoxXYWH::from_xywh(x, y, width, height)
    }
}

impl<TSpace> std::fmt::Debug for BBoxCxCyWH<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxCxCyWH")
            .field("cx", &self.center.x)
            .field("cy", &self.center.y)
            .field("w", &self.size.x)
            .field("h", &self.size.y)
            .finish()
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYWH<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYWH")
            .field("x", &self.origin.x)
            .field("y", &self.origin.y)
            .field("w", &self.size.x)
            .field("h", &self.size.y)
            .finish()
    }
}
