// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Error, Result, TargetSize};

/// Where the SVG data comes from.
#[derive(Clone, PartialEq, Debug)]
pub enum Source {
    /// Raw SVG or SVGZ data.
    Bytes(Vec<u8>),
    /// A remote SVG file.
    Url(url::Url),
}

/// A single conversion request.
#[derive(Clone, PartialEq, Debug)]
pub struct RenderRequest {
    /// SVG source.
    pub source: Source,
    /// Output size.
    pub target: TargetSize,
}

impl RenderRequest {
    /// Creates a request that renders raw SVG data.
    pub fn from_bytes(data: Vec<u8>, target: TargetSize) -> Self {
        RenderRequest {
            source: Source::Bytes(data),
            target,
        }
    }

    /// Creates a request that renders a remote SVG file.
    ///
    /// Fails with [`Error::InvalidArguments`] when `url` is not an absolute URL.
    pub fn from_url(url: &str, target: TargetSize) -> Result<Self> {
        let url = parse_url(url)?;
        Ok(RenderRequest {
            source: Source::Url(url),
            target,
        })
    }
}

pub(crate) fn parse_url(text: &str) -> Result<url::Url> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidArguments("svgUrl is empty".to_string()));
    }

    url::Url::parse(text)
        .map_err(|e| Error::InvalidArguments(format!("'{}' is not a valid URL: {}", text, e)))
}
