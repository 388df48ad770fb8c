// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// A specialized `Result` type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// List of all errors.
///
/// Every error is reported to the caller as a tagged failure,
/// see [`Error::code`].
#[derive(Error, Clone, PartialEq, Debug)]
pub enum Error {
    /// A required argument is missing or malformed.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to retrieve an SVG from the network.
    #[error("failed to fetch an SVG: {0}")]
    Fetch(String),

    /// The network request succeeded, but returned no data.
    #[error("no data from URL")]
    NoData,

    /// The provided data is not a valid SVG.
    #[error("cannot parse SVG: {0}")]
    Parse(String),

    /// Failed to allocate a bitmap.
    ///
    /// Probably because it's too big or there is not enough memory.
    #[error("failed to render SVG: {0}")]
    Render(String),

    /// Failed to serialize a bitmap into PNG.
    #[error("failed to convert PNG: {0}")]
    Encode(String),

    /// A background task stopped before producing a result.
    #[error("the rendering task was interrupted")]
    Interrupted,
}

impl Error {
    /// Returns an error tag that is stable across releases.
    ///
    /// Hosts receive it as the error code of a failed method call.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArguments(_) => "INVALID_ARGS",
            Error::Fetch(_) => "HTTP_ERROR",
            Error::NoData => "NO_DATA",
            Error::Parse(_) => "SVG_ERROR",
            Error::Render(_) | Error::Interrupted => "RENDER_ERROR",
            Error::Encode(_) => "PNG_ERROR",
        }
    }
}

impl From<resvg::usvg::Error> for Error {
    fn from(e: resvg::usvg::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(Error::InvalidArguments("x".into()).code(), "INVALID_ARGS");
        assert_eq!(Error::Fetch("x".into()).code(), "HTTP_ERROR");
        assert_eq!(Error::NoData.code(), "NO_DATA");
        assert_eq!(Error::Parse("x".into()).code(), "SVG_ERROR");
        assert_eq!(Error::Render("x".into()).code(), "RENDER_ERROR");
        assert_eq!(Error::Interrupted.code(), "RENDER_ERROR");
        assert_eq!(Error::Encode("x".into()).code(), "PNG_ERROR");
    }

    #[test]
    fn parse_error_message() {
        let e = Error::from(resvg::usvg::Error::NotAnUtf8Str);
        assert_eq!(e.code(), "SVG_ERROR");
        assert!(e.to_string().starts_with("cannot parse SVG: "));
    }
}
