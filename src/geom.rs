// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Root `svg` element geometry.

use std::str::FromStr;

use tiny_skia::Transform;
use svgtypes::{Align, AspectRatio, Length, LengthUnit as Unit};

use crate::{Error, IntrinsicSize, Result, ScaleFactor};

/// A parsed `viewBox` together with its `preserveAspectRatio`.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ViewBox {
    pub x: f32,
    pub y: f32,
    /// Always positive.
    pub width: f32,
    /// Always positive.
    pub height: f32,
    pub aspect: AspectRatio,
}

/// Values used to convert absolute units into pixels.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Units {
    pub dpi: f32,
    pub font_size: f32,
}

impl Default for Units {
    fn default() -> Self {
        Units {
            dpi: 96.0,
            font_size: 12.0,
        }
    }
}

/// Size-related attributes of the root `svg` element.
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct Dimensions {
    /// A valid `viewBox`, if any.
    pub view_box: Option<ViewBox>,
    /// `width` in pixels. `None` when missing or relative.
    pub width: Option<f32>,
    /// `height` in pixels. `None` when missing or relative.
    pub height: Option<f32>,
}

impl Dimensions {
    /// Reads dimensions from an SVG or SVGZ data.
    pub fn from_data(data: &[u8], units: Units) -> Result<Self> {
        if data.starts_with(&[0x1f, 0x8b]) {
            let data = resvg::usvg::decompress_svgz(data)?;
            Self::from_utf8(&data, units)
        } else {
            Self::from_utf8(data, units)
        }
    }

    fn from_utf8(data: &[u8], units: Units) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|_| Error::Parse("provided data has not an UTF-8 encoding".to_string()))?;
        Self::from_text(text, units)
    }

    /// Reads dimensions from an SVG string.
    pub fn from_text(text: &str, units: Units) -> Result<Self> {
        let xml_opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        let doc = roxmltree::Document::parse_with_options(text, xml_opt)
            .map_err(|e| Error::Parse(e.to_string()))?;

        let root = doc.root_element();
        if !root.has_tag_name("svg") {
            log::warn!("The root element is '{}' and not 'svg'.", root.tag_name().name());
            return Ok(Dimensions::default());
        }

        let aspect = root
            .attribute("preserveAspectRatio")
            .and_then(|v| AspectRatio::from_str(v).ok())
            .unwrap_or(AspectRatio {
                defer: false,
                align: Align::XMidYMid,
                slice: false,
            });

        let view_box = root
            .attribute("viewBox")
            .and_then(|v| svgtypes::ViewBox::from_str(v).ok())
            .filter(|vb| vb.w > 0.0 && vb.h > 0.0)
            .map(|vb| ViewBox {
                x: vb.x as f32,
                y: vb.y as f32,
                width: vb.w as f32,
                height: vb.h as f32,
                aspect,
            });

        Ok(Dimensions {
            view_box,
            width: root.attribute("width").and_then(|v| convert_length(v, units)),
            height: root.attribute("height").and_then(|v| convert_length(v, units)),
        })
    }

    /// Returns the natural size of the document.
    ///
    /// The `viewBox` has priority over `width` and `height`.
    /// A missing or relative side is reported as zero.
    pub fn intrinsic_size(&self) -> Option<IntrinsicSize> {
        if let Some(vb) = self.view_box {
            return Some(IntrinsicSize::new(vb.width, vb.height));
        }

        if self.width.is_none() && self.height.is_none() {
            return None;
        }

        Some(IntrinsicSize::new(
            self.width.unwrap_or(0.0),
            self.height.unwrap_or(0.0),
        ))
    }

    /// Returns a transform that renders a tree of `tree_width`x`tree_height`
    /// with the `viewBox` origin at zero, scaled by `scale`.
    pub fn render_transform(&self, tree_width: f32, tree_height: f32, scale: ScaleFactor) -> Transform {
        let ts = Transform::from_scale(scale.x, scale.y);

        let vb = match self.view_box {
            Some(vb) => vb,
            None => return ts,
        };

        let to_tree = view_box_to_transform(vb, tree_width, tree_height);
        match to_tree.invert() {
            Some(to_view_box) => ts.pre_translate(-vb.x, -vb.y).pre_concat(to_view_box),
            None => ts,
        }
    }
}

fn convert_length(text: &str, units: Units) -> Option<f32> {
    let length = Length::from_str(text).ok()?;
    let n = length.number as f32;
    let dpi = units.dpi;
    let px = match length.unit {
        Unit::None | Unit::Px => n,
        Unit::Em => n * units.font_size,
        Unit::Ex => n * units.font_size / 2.0,
        Unit::In => n * dpi,
        Unit::Cm => n * dpi / 2.54,
        Unit::Mm => n * dpi / 25.4,
        Unit::Pt => n * dpi / 72.0,
        Unit::Pc => n * dpi / 6.0,
        Unit::Percent => return None,
    };

    Some(px)
}

/// Converts `viewBox` to `Transform`.
pub fn view_box_to_transform(view_box: ViewBox, img_width: f32, img_height: f32) -> Transform {
    let vr = view_box;

    let sx = img_width / vr.width;
    let sy = img_height / vr.height;

    let (sx, sy) = if vr.aspect.align == Align::None {
        (sx, sy)
    } else {
        let s = if vr.aspect.slice {
            sx.max(sy)
        } else {
            sx.min(sy)
        };

        (s, s)
    };

    let x = -vr.x * sx;
    let y = -vr.y * sy;
    let w = img_width - vr.width * sx;
    let h = img_height - vr.height * sy;

    let (tx, ty) = aligned_pos(vr.aspect.align, x, y, w, h);
    Transform::from_row(sx, 0.0, 0.0, sy, tx, ty)
}

/// Returns object aligned position.
fn aligned_pos(align: Align, x: f32, y: f32, w: f32, h: f32) -> (f32, f32) {
    match align {
        Align::None => (x, y),
        Align::XMinYMin => (x, y),
        Align::XMidYMin => (x + w / 2.0, y),
        Align::XMaxYMin => (x + w, y),
        Align::XMinYMid => (x, y + h / 2.0),
        Align::XMidYMid => (x + w / 2.0, y + h / 2.0),
        Align::XMaxYMid => (x + w, y + h / 2.0),
        Align::XMinYMax => (x, y + h),
        Align::XMidYMax => (x + w / 2.0, y + h),
        Align::XMaxYMax => (x + w, y + h),
    }
}
