// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svg-to-png` converts SVG data or remote SVG files into PNG images
of a requested size.

Rendering is done by [resvg](https://github.com/RazrFalcon/resvg).
The document is stretched to fill the requested width and height.

```no_run
use svg_to_png::{Options, RenderRequest, TargetSize};

let converter = Options::default().converter();
let svg = std::fs::read("icon.svg").unwrap();
let target = TargetSize::new(256, 128).unwrap();
let png = converter.render(&svg, target).unwrap();
std::fs::write("icon.png", png).unwrap();

// Or in background.
let req = RenderRequest::from_url("https://example.com/icon.svg", target).unwrap();
let png = converter.submit(req).wait().unwrap();
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::uninlined_format_args)]

pub use resvg;
pub use svgtypes;
pub use url;

pub mod channel;
mod error;
#[cfg(feature = "http")]
mod fetch;
pub mod geom;
mod logger;
mod options;
mod renderer;
mod request;
mod size;
mod skia;
pub mod task;

pub use crate::channel::{MethodCall, MethodChannel, MethodResponse};
pub use crate::error::{Error, Result};
#[cfg(feature = "http")]
pub use crate::fetch::{FetchOptions, HttpFetcher};
pub use crate::logger::init_log;
pub use crate::options::{DefaultFetcher, Options};
pub use crate::renderer::{Converter, Fetcher, NoFetcher, SvgRenderer};
pub use crate::request::{RenderRequest, Source};
pub use crate::size::{resolve_scale, IntrinsicSize, ScaleFactor, TargetSize, DEFAULT_SIZE};
pub use crate::skia::{Document, SkiaRenderer, DEFAULT_MAX_PIXELS};
pub use crate::task::Pending;
