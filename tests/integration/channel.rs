use std::sync::mpsc;
use std::time::Duration;

use svg_to_png::channel::{CHANNEL_NAME, FROM_BYTES, FROM_URL};
use svg_to_png::{MethodCall, MethodResponse, Options};

use crate::{decode_png, fixture, options};

fn call(call: MethodCall) -> MethodResponse {
    call_with(&options(), call)
}

fn call_with(opt: &Options, call: MethodCall) -> MethodResponse {
    let ch = opt.channel();
    assert_eq!(ch.name(), CHANNEL_NAME);

    let (tx, rx) = mpsc::channel();
    ch.handle(call, move |res| tx.send(res).unwrap());
    rx.recv_timeout(Duration::from_secs(60)).unwrap()
}

fn png_size(res: MethodResponse) -> (u32, u32) {
    match res {
        MethodResponse::Success(png) => {
            let img = decode_png(&png);
            (img.width, img.height)
        }
        res => panic!("unexpected response: {:?}", res),
    }
}

fn error_code(res: MethodResponse) -> String {
    match res {
        MethodResponse::Error { code, .. } => code,
        res => panic!("unexpected response: {:?}", res),
    }
}

#[test]
fn from_bytes() {
    let res = call(
        MethodCall::new(FROM_BYTES)
            .arg("svgBytes", fixture("red-square.svg"))
            .arg("width", 120i64)
            .arg("height", 30i64),
    );
    assert_eq!(png_size(res), (120, 30));
}

#[test]
fn from_bytes_default_size() {
    let res = call(MethodCall::new(FROM_BYTES).arg("svgBytes", fixture("red-square.svg")));
    assert_eq!(png_size(res), (512, 512));
}

#[test]
fn from_bytes_configured_default_size() {
    let opt = Options {
        default_size: 48,
        ..options()
    };
    let res = call_with(
        &opt,
        MethodCall::new(FROM_BYTES)
            .arg("svgBytes", fixture("red-square.svg"))
            .arg("height", 0i64),
    );
    assert_eq!(png_size(res), (48, 48));
}

#[test]
fn from_bytes_fractional_size() {
    let res = call(
        MethodCall::new(FROM_BYTES)
            .arg("svgBytes", fixture("red-square.svg"))
            .arg("width", 99.6)
            .arg("height", -3.0),
    );
    assert_eq!(png_size(res), (100, 512));
}

#[test]
fn from_bytes_without_data() {
    let res = call(MethodCall::new(FROM_BYTES).arg("width", 10i64));
    assert_eq!(error_code(res), "INVALID_ARGS");
}

#[test]
fn from_bytes_invalid_svg() {
    let res = call(MethodCall::new(FROM_BYTES).arg("svgBytes", b"<svg".to_vec()));
    assert_eq!(error_code(res), "SVG_ERROR");
}

#[test]
fn from_url_invalid() {
    let res = call(MethodCall::new(FROM_URL).arg("svgUrl", "not a url"));
    assert_eq!(error_code(res), "INVALID_ARGS");

    let res = call(MethodCall::new(FROM_URL));
    assert_eq!(error_code(res), "INVALID_ARGS");
}

#[cfg(feature = "http")]
#[test]
fn from_url() {
    let base = crate::serve();
    let res = call(
        MethodCall::new(FROM_URL)
            .arg("svgUrl", format!("{}/size-only.svg", base).as_str())
            .arg("width", 16i64)
            .arg("height", 8i64),
    );
    assert_eq!(png_size(res), (16, 8));

    let res = call(MethodCall::new(FROM_URL).arg("url", format!("{}/empty", base).as_str()));
    assert_eq!(error_code(res), "NO_DATA");
}

#[test]
fn unknown_method() {
    assert_eq!(call(MethodCall::new("fromFile")), MethodResponse::NotImplemented);
}
