// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Output size normalization.

/// The default output width and height in pixels.
pub const DEFAULT_SIZE: u32 = 512;

/// A natural size declared by an SVG document.
///
/// Comes from the `viewBox` when present, otherwise from the root
/// `width` and `height` attributes. Either axis can be non-positive
/// when the document doesn't declare it in absolute units.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct IntrinsicSize {
    /// Width in user units.
    pub width: f32,
    /// Height in user units.
    pub height: f32,
}

impl IntrinsicSize {
    /// Creates a new `IntrinsicSize`.
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        IntrinsicSize { width, height }
    }
}

/// A requested output size in pixels.
///
/// Both dimensions are guaranteed to be positive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TargetSize {
    width: u32,
    height: u32,
}

impl TargetSize {
    /// Creates a new `TargetSize`.
    ///
    /// Returns `None` when any of the dimensions is zero.
    #[inline]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width > 0 && height > 0 {
            Some(TargetSize { width, height })
        } else {
            None
        }
    }

    /// Returns the width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        TargetSize {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
        }
    }
}

/// Per-axis scale that maps document units onto output pixels.
///
/// Both factors are always positive.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ScaleFactor {
    /// Horizontal scale.
    pub x: f32,
    /// Vertical scale.
    pub y: f32,
}

/// Computes the scale factors needed to stretch a document onto `target`.
///
/// An axis with an unknown, non-positive or non-finite intrinsic length
/// falls back to the target length, i.e. to a scale of 1.
pub fn resolve_scale(intrinsic: Option<IntrinsicSize>, target: TargetSize) -> ScaleFactor {
    let target_w = target.width() as f32;
    let target_h = target.height() as f32;

    let source_w = intrinsic
        .map(|s| s.width)
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(target_w);
    let source_h = intrinsic
        .map(|s| s.height)
        .filter(|h| h.is_finite() && *h > 0.0)
        .unwrap_or(target_h);

    ScaleFactor {
        x: target_w / source_w,
        y: target_h / source_h,
    }
}
