// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use crate::task::{self, Pending};
use crate::{resolve_scale, Error, IntrinsicSize, RenderRequest, Result, ScaleFactor, Source, TargetSize};

/// A set of capabilities provided by an SVG rendering library.
pub trait SvgRenderer: Send + Sync {
    /// A parsed SVG document.
    type Document;
    /// A rasterized image.
    type Bitmap;

    /// Parses an SVG data.
    fn parse(&self, data: &[u8]) -> Result<Self::Document>;

    /// Returns a natural document size, if any.
    fn intrinsic_size(&self, doc: &Self::Document) -> Option<IntrinsicSize>;

    /// Renders a document onto a new bitmap of the `target` size.
    ///
    /// Document units are multiplied by `scale`.
    fn rasterize(
        &self,
        doc: &Self::Document,
        scale: ScaleFactor,
        target: TargetSize,
    ) -> Result<Self::Bitmap>;

    /// Serializes a bitmap into PNG.
    fn encode_png(&self, bitmap: &Self::Bitmap) -> Result<Vec<u8>>;
}

/// A network collaborator that downloads SVG files.
pub trait Fetcher: Send + Sync {
    /// Returns the response body.
    fn fetch(&self, url: &url::Url) -> Result<Vec<u8>>;
}

/// A fetcher that rejects every request.
///
/// Used when the crate is built without the `http` feature.
#[derive(Clone, Copy, Default, Debug)]
pub struct NoFetcher;

impl Fetcher for NoFetcher {
    fn fetch(&self, url: &url::Url) -> Result<Vec<u8>> {
        Err(Error::Fetch(format!(
            "cannot load '{}', network support is disabled",
            url
        )))
    }
}

/// An SVG to PNG converter.
///
/// Cheap to clone. Clones share the same renderer and fetcher.
pub struct Converter<R, F> {
    renderer: Arc<R>,
    fetcher: Arc<F>,
}

impl<R, F> Clone for Converter<R, F> {
    fn clone(&self) -> Self {
        Converter {
            renderer: self.renderer.clone(),
            fetcher: self.fetcher.clone(),
        }
    }
}

impl<R: SvgRenderer, F: Fetcher> Converter<R, F> {
    /// Creates a new converter.
    pub fn new(renderer: R, fetcher: F) -> Self {
        Converter {
            renderer: Arc::new(renderer),
            fetcher: Arc::new(fetcher),
        }
    }

    /// Renders an SVG data into PNG.
    pub fn render(&self, data: &[u8], target: TargetSize) -> Result<Vec<u8>> {
        let doc = self.renderer.parse(data).map_err(|e| {
            log::warn!("{}.", e);
            e
        })?;

        let intrinsic = self.renderer.intrinsic_size(&doc);
        let scale = resolve_scale(intrinsic, target);
        log::debug!(
            "Rendering {:?} into {}x{} with {:?}.",
            intrinsic,
            target.width(),
            target.height(),
            scale
        );

        let bitmap = self.renderer.rasterize(&doc, scale, target)?;
        let png = self.renderer.encode_png(&bitmap)?;
        log::trace!("Encoded {} bytes of PNG.", png.len());
        Ok(png)
    }

    /// Downloads an SVG file and renders it into PNG.
    pub fn render_url(&self, url: &url::Url, target: TargetSize) -> Result<Vec<u8>> {
        log::debug!("Fetching '{}'.", url);
        let data = self.fetcher.fetch(url).map_err(|e| {
            log::warn!("Failed to fetch '{}': {}.", url, e);
            e
        })?;

        if data.is_empty() {
            log::warn!("'{}' has no data.", url);
            return Err(Error::NoData);
        }

        self.render(&data, target)
    }

    /// Processes a request on the current thread.
    pub fn render_request(&self, req: &RenderRequest) -> Result<Vec<u8>> {
        match req.source {
            Source::Bytes(ref data) => self.render(data, req.target),
            Source::Url(ref url) => self.render_url(url, req.target),
        }
    }
}

impl<R, F> Converter<R, F>
where
    R: SvgRenderer + 'static,
    F: Fetcher + 'static,
{
    /// Processes a request on a background thread.
    pub fn submit(&self, req: RenderRequest) -> Pending<Vec<u8>> {
        let converter = self.clone();
        task::submit(move || converter.render_request(&req))
    }

    /// Processes a request on a background thread and passes the result to `callback`.
    ///
    /// `callback` is called exactly once, on the background thread.
    pub fn submit_with<C>(&self, req: RenderRequest, callback: C)
    where
        C: FnOnce(Result<Vec<u8>>) + Send + 'static,
    {
        let converter = self.clone();
        task::submit_with(move || converter.render_request(&req), callback)
    }
}
