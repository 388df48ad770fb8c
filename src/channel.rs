// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A method-call interface for UI frameworks.
//!
//! A host sends a [`MethodCall`] with a method name and a map of arguments
//! and receives a single [`MethodResponse`].

use std::collections::HashMap;

use crate::request::parse_url;
use crate::{
    Converter, Error, Fetcher, RenderRequest, Result, Source, SvgRenderer, TargetSize,
    DEFAULT_SIZE,
};

/// The channel name hosts register the handler under.
pub const CHANNEL_NAME: &str = "svg_to_png";

/// Renders `svgBytes`.
pub const FROM_BYTES: &str = "fromBytes";

/// Downloads and renders `svgUrl`.
pub const FROM_URL: &str = "fromUrl";

/// A dynamically typed argument value.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    fn as_number(&self) -> Option<f64> {
        match *self {
            Value::Int(n) => Some(n as f64),
            Value::Float(n) => Some(n),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

/// An incoming call.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Default, Debug)]
pub struct MethodCall {
    pub method: String,
    pub arguments: HashMap<String, Value>,
}

impl MethodCall {
    /// Creates a call without arguments.
    pub fn new(method: &str) -> Self {
        MethodCall {
            method: method.to_string(),
            arguments: HashMap::new(),
        }
    }

    /// Adds an argument.
    pub fn arg<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.arguments.insert(name.to_string(), value.into());
        self
    }

    fn get(&self, name: &str) -> Option<&Value> {
        match self.arguments.get(name) {
            Some(Value::Null) | None => None,
            v => v,
        }
    }
}

/// A reply to a [`MethodCall`].
#[derive(Clone, PartialEq, Debug)]
pub enum MethodResponse {
    /// PNG data.
    Success(Vec<u8>),
    /// A tagged failure.
    #[allow(missing_docs)]
    Error { code: String, message: String },
    /// The method is unknown.
    NotImplemented,
}

impl From<Result<Vec<u8>>> for MethodResponse {
    fn from(res: Result<Vec<u8>>) -> Self {
        match res {
            Ok(png) => MethodResponse::Success(png),
            Err(e) => MethodResponse::Error {
                code: e.code().to_string(),
                message: e.to_string(),
            },
        }
    }
}

/// Dispatches method calls to a [`Converter`].
pub struct MethodChannel<R, F> {
    converter: Converter<R, F>,
    default_size: u32,
}

impl<R, F> MethodChannel<R, F>
where
    R: SvgRenderer + 'static,
    F: Fetcher + 'static,
{
    /// Creates a new channel.
    pub fn new(converter: Converter<R, F>) -> Self {
        MethodChannel {
            converter,
            default_size: DEFAULT_SIZE,
        }
    }

    /// Sets a size used for missing or malformed `width` and `height`.
    pub fn with_default_size(mut self, size: u32) -> Self {
        if size > 0 {
            self.default_size = size;
        }
        self
    }

    /// Returns the channel name.
    pub fn name(&self) -> &'static str {
        CHANNEL_NAME
    }

    /// Handles a call.
    ///
    /// Argument errors are reported immediately, on the calling thread.
    /// Otherwise the request is processed on a background thread
    /// and `reply` is called from there. `reply` is called exactly once.
    pub fn handle<C>(&self, call: MethodCall, reply: C)
    where
        C: FnOnce(MethodResponse) + Send + 'static,
    {
        log::debug!("Method call '{}'.", call.method);

        let req = match call.method.as_str() {
            FROM_BYTES => self.bytes_request(&call),
            FROM_URL => self.url_request(&call),
            _ => {
                log::warn!("'{}' is not implemented.", call.method);
                reply(MethodResponse::NotImplemented);
                return;
            }
        };

        match req {
            Ok(req) => self
                .converter
                .submit_with(req, move |res| reply(MethodResponse::from(res))),
            Err(e) => {
                log::warn!("{}.", e);
                reply(MethodResponse::from(Err(e)));
            }
        }
    }

    fn bytes_request(&self, call: &MethodCall) -> Result<RenderRequest> {
        let data = match call.get("svgBytes") {
            Some(Value::Bytes(data)) => data.clone(),
            Some(_) => {
                return Err(Error::InvalidArguments(
                    "svgBytes is not a byte array".to_string(),
                ))
            }
            None => return Err(Error::InvalidArguments("svgBytes is null".to_string())),
        };

        Ok(RenderRequest::from_bytes(data, self.target(call)))
    }

    fn url_request(&self, call: &MethodCall) -> Result<RenderRequest> {
        let url = match call.get("svgUrl").or_else(|| call.get("url")) {
            Some(Value::String(url)) => parse_url(url)?,
            Some(_) => return Err(Error::InvalidArguments("svgUrl is not a string".to_string())),
            None => return Err(Error::InvalidArguments("svgUrl is null".to_string())),
        };

        Ok(RenderRequest {
            source: Source::Url(url),
            target: self.target(call),
        })
    }

    fn target(&self, call: &MethodCall) -> TargetSize {
        let width = self.dimension(call, "width");
        let height = self.dimension(call, "height");
        TargetSize::new(width, height).unwrap_or_default()
    }

    fn dimension(&self, call: &MethodCall, name: &str) -> u32 {
        let n = match call.get(name).and_then(Value::as_number) {
            Some(n) => n.round(),
            None => return self.default_size,
        };

        if n.is_finite() && n >= 1.0 && n <= u32::MAX as f64 {
            n as u32
        } else {
            log::warn!("Invalid '{}' value: {}. Using {}.", name, n, self.default_size);
            self.default_size
        }
    }
}
