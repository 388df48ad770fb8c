// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! C bindings.
//!
//! Intended for UI framework plugins: the host calls either a blocking
//! function from its own worker, or an `_async` one that renders on a
//! background thread and reports through a callback.

#![allow(non_camel_case_types)]
#![warn(missing_docs)]
#![warn(missing_copy_implementations)]

use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::slice;

use once_cell::sync::OnceCell;
use svg_to_png::{
    Converter, DefaultFetcher, Error, Options, RenderRequest, SkiaRenderer, TargetSize,
};

/// @brief List of possible errors.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum svg_to_png_error {
    /// Everything is ok.
    OK = 0,
    /// A required argument is NULL or malformed.
    INVALID_ARGS,
    /// Failed to download an SVG.
    HTTP_ERROR,
    /// The server returned no data.
    NO_DATA,
    /// Failed to parse an SVG data.
    SVG_ERROR,
    /// Failed to render an SVG.
    ///
    /// Usually means that the requested size is too big.
    RENDER_ERROR,
    /// Failed to encode PNG.
    PNG_ERROR,
}

impl From<&Error> for svg_to_png_error {
    fn from(e: &Error) -> Self {
        match e {
            Error::InvalidArguments(_) => svg_to_png_error::INVALID_ARGS,
            Error::Fetch(_) => svg_to_png_error::HTTP_ERROR,
            Error::NoData => svg_to_png_error::NO_DATA,
            Error::Parse(_) => svg_to_png_error::SVG_ERROR,
            Error::Render(_) | Error::Interrupted => svg_to_png_error::RENDER_ERROR,
            Error::Encode(_) => svg_to_png_error::PNG_ERROR,
        }
    }
}

/// @brief PNG data.
///
/// Should be destroyed via #svg_to_png_data_destroy.
#[repr(C)]
#[derive(Debug)]
pub struct svg_to_png_data {
    /// PNG bytes.
    pub data: *mut u8,
    /// Number of bytes.
    pub len: usize,
}

impl svg_to_png_data {
    fn from_vec(data: Vec<u8>) -> Self {
        let len = data.len();
        let data = Box::into_raw(data.into_boxed_slice()) as *mut u8;
        svg_to_png_data { data, len }
    }
}

/// @brief A completion callback.
///
/// `data` is NULL on error. It's valid only during the call and must be copied.
///
/// Called from a background thread.
pub type svg_to_png_callback = extern "C" fn(
    user_data: *mut c_void,
    error: svg_to_png_error,
    data: *const u8,
    len: usize,
);

/// @brief Initializes the library log.
///
/// Use it if you want to see any warnings.
///
/// Must be called only once.
///
/// All warnings will be printed to the `stderr`.
#[no_mangle]
pub extern "C" fn svg_to_png_init_log() {
    svg_to_png::init_log();
}

static CONVERTER: OnceCell<Converter<SkiaRenderer, DefaultFetcher>> = OnceCell::new();

// Fonts loading is expensive, so a single converter is shared by all calls.
fn converter() -> &'static Converter<SkiaRenderer, DefaultFetcher> {
    CONVERTER.get_or_init(|| Options::default().converter())
}

fn target_size(width: u32, height: u32) -> TargetSize {
    let def = TargetSize::default();
    let width = if width == 0 { def.width() } else { width };
    let height = if height == 0 { def.height() } else { height };
    TargetSize::new(width, height).unwrap_or(def)
}

fn bytes_request(data: *const c_char, len: usize, width: u32, height: u32) -> Result<RenderRequest, Error> {
    if data.is_null() {
        return Err(Error::InvalidArguments("svgBytes is null".to_string()));
    }

    let data = unsafe { slice::from_raw_parts(data as *const u8, len) };
    Ok(RenderRequest::from_bytes(data.to_vec(), target_size(width, height)))
}

fn url_request(url: *const c_char, width: u32, height: u32) -> Result<RenderRequest, Error> {
    let url = cstr_to_str(url)
        .ok_or_else(|| Error::InvalidArguments("svgUrl is not a UTF-8 string".to_string()))?;
    RenderRequest::from_url(url, target_size(width, height))
}

fn finish(res: Result<Vec<u8>, Error>, out: *mut svg_to_png_data) -> svg_to_png_error {
    match res {
        Ok(png) => {
            unsafe {
                *out = svg_to_png_data::from_vec(png);
            }
            svg_to_png_error::OK
        }
        Err(e) => {
            log::warn!("{}.", e);
            svg_to_png_error::from(&e)
        }
    }
}

/// @brief Renders an SVG data into PNG.
///
/// Blocks the calling thread.
///
/// @param data SVG or SVGZ data. Must not be NULL.
/// @param len Data length.
/// @param width Output width. 0 means 512.
/// @param height Output height. 0 means 512.
/// @param out PNG data. Set only on success. Must not be NULL.
#[no_mangle]
pub extern "C" fn svg_to_png_from_bytes(
    data: *const c_char,
    len: usize,
    width: u32,
    height: u32,
    out: *mut svg_to_png_data,
) -> svg_to_png_error {
    assert!(!out.is_null());

    let res = bytes_request(data, len, width, height)
        .and_then(|req| converter().render_request(&req));
    finish(res, out)
}

/// @brief Downloads an SVG file and renders it into PNG.
///
/// Blocks the calling thread.
///
/// @param url An absolute URL. Must be UTF-8. Must not be NULL.
/// @param width Output width. 0 means 512.
/// @param height Output height. 0 means 512.
/// @param out PNG data. Set only on success. Must not be NULL.
#[no_mangle]
pub extern "C" fn svg_to_png_from_url(
    url: *const c_char,
    width: u32,
    height: u32,
    out: *mut svg_to_png_data,
) -> svg_to_png_error {
    assert!(!out.is_null());

    let res = url_request(url, width, height).and_then(|req| converter().render_request(&req));
    finish(res, out)
}

struct UserData(*mut c_void);

// The host guarantees that `user_data` can be used from any thread.
unsafe impl Send for UserData {}

fn submit(req: Result<RenderRequest, Error>, callback: svg_to_png_callback, user_data: *mut c_void) {
    let user_data = UserData(user_data);
    let reply = move |res: Result<Vec<u8>, Error>| {
        let user_data = user_data;
        match res {
            Ok(png) => callback(user_data.0, svg_to_png_error::OK, png.as_ptr(), png.len()),
            Err(e) => {
                log::warn!("{}.", e);
                callback(user_data.0, svg_to_png_error::from(&e), std::ptr::null(), 0)
            }
        }
    };

    match req {
        Ok(req) => converter().submit_with(req, reply),
        Err(e) => reply(Err(e)),
    }
}

/// @brief Renders an SVG data into PNG on a background thread.
///
/// `data` is copied before returning.
///
/// `callback` is called exactly once. Argument errors are reported
/// from the calling thread, everything else from a background one.
///
/// @param data SVG or SVGZ data. Must not be NULL.
/// @param len Data length.
/// @param width Output width. 0 means 512.
/// @param height Output height. 0 means 512.
/// @param callback Completion callback.
/// @param user_data Passed to `callback` as is.
#[no_mangle]
pub extern "C" fn svg_to_png_from_bytes_async(
    data: *const c_char,
    len: usize,
    width: u32,
    height: u32,
    callback: svg_to_png_callback,
    user_data: *mut c_void,
) {
    submit(bytes_request(data, len, width, height), callback, user_data);
}

/// @brief Downloads an SVG file and renders it into PNG on a background thread.
///
/// `callback` is called exactly once. Argument errors are reported
/// from the calling thread, everything else from a background one.
///
/// @param url An absolute URL. Must be UTF-8. Must not be NULL.
/// @param width Output width. 0 means 512.
/// @param height Output height. 0 means 512.
/// @param callback Completion callback.
/// @param user_data Passed to `callback` as is.
#[no_mangle]
pub extern "C" fn svg_to_png_from_url_async(
    url: *const c_char,
    width: u32,
    height: u32,
    callback: svg_to_png_callback,
    user_data: *mut c_void,
) {
    submit(url_request(url, width, height), callback, user_data);
}

/// @brief Destroys the #svg_to_png_data.
///
/// Resets the pointer and length. Can be called on an already destroyed data.
#[no_mangle]
pub extern "C" fn svg_to_png_data_destroy(data: *mut svg_to_png_data) {
    let data = unsafe {
        assert!(!data.is_null());
        &mut *data
    };

    if !data.data.is_null() {
        unsafe {
            let _ = Box::from_raw(std::ptr::slice_from_raw_parts_mut(data.data, data.len));
        }
    }

    data.data = std::ptr::null_mut();
    data.len = 0;
}

fn cstr_to_str(text: *const c_char) -> Option<&'static str> {
    if text.is_null() {
        return None;
    }

    let text = unsafe { CStr::from_ptr(text) };
    text.to_str().ok()
}
