//! Coordinate space marker types.
//!
//! Zero-sized types used as type parameters so that normalized label values
//! and absolute pixel values cannot be mixed up at compile time.

use std::fmt;

/// Marker for absolute pixel space, origin at the image's top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker for normalized space, where 1.0 spans the full image width or height.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
