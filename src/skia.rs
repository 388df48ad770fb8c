// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use resvg::usvg;

use crate::geom::{Dimensions, Units};
use crate::{Error, IntrinsicSize, Result, ScaleFactor, SvgRenderer, TargetSize};

/// A parsed SVG document.
pub struct Document {
    tree: usvg::Tree,
    dimensions: Dimensions,
}

/// The largest bitmap allowed by default, in pixels. 1 GiB of RGBA data.
pub const DEFAULT_MAX_PIXELS: u64 = 16384 * 16384;

/// An [`SvgRenderer`] backed by `resvg` and `tiny-skia`.
pub struct SkiaRenderer {
    opt: usvg::Options<'static>,
    background: Option<tiny_skia::Color>,
    max_pixels: u64,
}

impl SkiaRenderer {
    /// Creates a new renderer.
    pub fn new(opt: usvg::Options<'static>) -> Self {
        SkiaRenderer {
            opt,
            background: None,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Sets the largest bitmap area, in pixels.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// Sets a color the bitmap is filled with before rendering.
    ///
    /// `None` equals to transparent.
    pub fn with_background(mut self, color: Option<svgtypes::Color>) -> Self {
        self.background =
            color.map(|c| tiny_skia::Color::from_rgba8(c.red, c.green, c.blue, c.alpha));
        self
    }

    fn units(&self) -> Units {
        Units {
            dpi: self.opt.dpi,
            font_size: self.opt.font_size,
        }
    }
}

impl Default for SkiaRenderer {
    fn default() -> Self {
        SkiaRenderer::new(usvg::Options::default())
    }
}

impl SvgRenderer for SkiaRenderer {
    type Document = Document;
    type Bitmap = tiny_skia::Pixmap;

    fn parse(&self, data: &[u8]) -> Result<Document> {
        let tree = usvg::Tree::from_data(data, &self.opt)?;
        let dimensions = Dimensions::from_data(data, self.units())?;
        Ok(Document { tree, dimensions })
    }

    fn intrinsic_size(&self, doc: &Document) -> Option<IntrinsicSize> {
        doc.dimensions.intrinsic_size()
    }

    fn rasterize(
        &self,
        doc: &Document,
        scale: ScaleFactor,
        target: TargetSize,
    ) -> Result<tiny_skia::Pixmap> {
        let pixels = target.width() as u64 * target.height() as u64;
        if pixels > self.max_pixels {
            return Err(Error::Render(format!(
                "a {}x{} bitmap exceeds the limit of {} pixels",
                target.width(),
                target.height(),
                self.max_pixels
            )));
        }

        let mut pixmap = tiny_skia::Pixmap::new(target.width(), target.height()).ok_or_else(|| {
            Error::Render(format!(
                "failed to allocate a {}x{} bitmap",
                target.width(),
                target.height()
            ))
        })?;

        if let Some(color) = self.background {
            pixmap.fill(color);
        }

        let size = doc.tree.size();
        let ts = doc
            .dimensions
            .render_transform(size.width(), size.height(), scale);
        resvg::render(&doc.tree, ts, &mut pixmap.as_mut());

        Ok(pixmap)
    }

    fn encode_png(&self, pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>> {
        pixmap
            .encode_png()
            .map_err(|e| Error::Encode(e.to_string()))
    }
}
