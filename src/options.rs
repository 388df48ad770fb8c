// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use resvg::usvg;

#[cfg(feature = "http")]
use crate::fetch::{FetchOptions, HttpFetcher};
#[cfg(not(feature = "http"))]
use crate::NoFetcher;
use crate::skia::DEFAULT_MAX_PIXELS;
use crate::{Converter, MethodChannel, SkiaRenderer, TargetSize, DEFAULT_SIZE};

/// A fetcher used by [`Options::converter`].
#[cfg(feature = "http")]
pub type DefaultFetcher = HttpFetcher;
/// A fetcher used by [`Options::converter`].
#[cfg(not(feature = "http"))]
pub type DefaultFetcher = NoFetcher;

/// Conversion options.
#[derive(Clone, Debug)]
pub struct Options {
    /// An output size used when a caller doesn't specify one.
    ///
    /// Default: 512
    pub default_size: u32,

    /// An image background color.
    ///
    /// `None` equals to transparent.
    pub background: Option<svgtypes::Color>,

    /// Target DPI.
    ///
    /// Impacts units conversion.
    ///
    /// Default: 96
    pub dpi: f32,

    /// A default font family.
    ///
    /// Default: Times New Roman
    pub font_family: String,

    /// A default font size.
    ///
    /// Default: 12
    pub font_size: f32,

    /// Languages used to resolve the `systemLanguage` attribute.
    ///
    /// Default: `[en]`
    pub languages: Vec<String>,

    /// Directory used to resolve relative paths of `image` elements.
    pub resources_dir: Option<PathBuf>,

    /// Font files to load in addition to system fonts.
    pub font_files: Vec<PathBuf>,

    /// Directories to load fonts from.
    pub font_dirs: Vec<PathBuf>,

    /// The largest output bitmap area, in pixels.
    ///
    /// Default: 16384 * 16384
    pub max_pixels: u64,

    /// Load system fonts.
    ///
    /// Default: true
    pub system_fonts: bool,

    /// HTTP options.
    #[cfg(feature = "http")]
    pub fetch: FetchOptions,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            default_size: DEFAULT_SIZE,
            background: None,
            dpi: 96.0,
            font_family: "Times New Roman".to_string(),
            font_size: 12.0,
            languages: vec!["en".to_string()],
            resources_dir: None,
            font_files: Vec::new(),
            font_dirs: Vec::new(),
            max_pixels: DEFAULT_MAX_PIXELS,
            system_fonts: true,
            #[cfg(feature = "http")]
            fetch: FetchOptions::default(),
        }
    }
}

impl Options {
    /// Returns an output size used for missing dimensions.
    pub fn default_target(&self) -> TargetSize {
        TargetSize::new(self.default_size, self.default_size).unwrap_or_default()
    }

    /// Converts options into `usvg` ones.
    ///
    /// Loads fonts when the `text` feature is enabled.
    pub fn to_usvg(&self) -> usvg::Options<'static> {
        let mut opt = usvg::Options::default();
        opt.dpi = self.dpi;
        opt.font_family = self.font_family.clone();
        opt.font_size = self.font_size;
        opt.languages = self.languages.clone();
        opt.resources_dir = self.resources_dir.clone();

        #[cfg(feature = "text")]
        self.load_fonts(opt.fontdb_mut());

        opt
    }

    #[cfg(feature = "text")]
    fn load_fonts(&self, fontdb: &mut usvg::fontdb::Database) {
        if self.system_fonts {
            fontdb.load_system_fonts();
        }

        for path in &self.font_files {
            if let Err(e) = fontdb.load_font_file(path) {
                log::warn!("Failed to load '{}' cause {}.", path.display(), e);
            }
        }

        for path in &self.font_dirs {
            fontdb.load_fonts_dir(path);
        }

        log::debug!("Loaded {} font faces.", fontdb.len());
    }

    /// Creates a renderer.
    pub fn renderer(&self) -> SkiaRenderer {
        SkiaRenderer::new(self.to_usvg())
            .with_background(self.background)
            .with_max_pixels(self.max_pixels)
    }

    /// Creates a converter with the default fetcher.
    pub fn converter(&self) -> Converter<SkiaRenderer, DefaultFetcher> {
        #[cfg(feature = "http")]
        let fetcher = HttpFetcher::new(&self.fetch);
        #[cfg(not(feature = "http"))]
        let fetcher = NoFetcher;

        Converter::new(self.renderer(), fetcher)
    }

    /// Creates a method channel that falls back to [`Options::default_size`].
    pub fn channel(&self) -> MethodChannel<SkiaRenderer, DefaultFetcher> {
        MethodChannel::new(self.converter()).with_default_size(self.default_size)
    }
}
