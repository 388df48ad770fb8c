use svg_to_png::{Converter, FetchOptions, HttpFetcher, Options, RenderRequest, TargetSize};

use crate::{converter, decode_png, serve};

fn url(base: &str, path: &str) -> svg_to_png::url::Url {
    format!("{}/{}", base, path).parse().unwrap()
}

#[test]
fn render_url() {
    let base = serve();
    let target = TargetSize::new(20, 10).unwrap();
    let png = converter()
        .render_url(&url(&base, "red-square.svg"), target)
        .unwrap();
    let img = decode_png(&png);
    assert_eq!(img.pixel(19, 9), crate::RED);
}

#[test]
fn render_url_request() {
    let base = serve();
    let req = RenderRequest::from_url(&format!("{}/halves.svg", base), TargetSize::default()).unwrap();
    let img = decode_png(&converter().submit(req).wait().unwrap());
    assert_eq!(img.pixel(10, 10), crate::RED);
    assert_eq!(img.pixel(500, 10), crate::BLUE);
}

#[test]
fn not_found() {
    let base = serve();
    let e = converter()
        .render_url(&url(&base, "missing.svg"), TargetSize::default())
        .unwrap_err();
    assert_eq!(e.code(), "HTTP_ERROR");
}

#[test]
fn empty_response() {
    let base = serve();
    let e = converter()
        .render_url(&url(&base, "empty"), TargetSize::default())
        .unwrap_err();
    assert_eq!(e.code(), "NO_DATA");
}

#[test]
fn size_limit() {
    let base = serve();
    let opt = Options {
        fetch: FetchOptions {
            max_size: 16,
            ..FetchOptions::default()
        },
        ..crate::options()
    };
    let e = opt
        .converter()
        .render_url(&url(&base, "red-square.svg"), TargetSize::default())
        .unwrap_err();
    assert_eq!(e.code(), "HTTP_ERROR");
}

#[test]
fn connection_refused() {
    // Bind and drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let fetcher = HttpFetcher::new(&FetchOptions::default());
    let c = Converter::new(crate::options().renderer(), fetcher);
    let e = c
        .render_url(&url(&format!("http://127.0.0.1:{}", port), "a.svg"), TargetSize::default())
        .unwrap_err();
    assert_eq!(e.code(), "HTTP_ERROR");
}

#[tokio::test]
async fn await_url_request() {
    let base = serve();
    let c = converter();
    let req = RenderRequest::from_url(&format!("{}/red-square.svg", base), TargetSize::default()).unwrap();
    let img = decode_png(&c.submit(req).await.unwrap());
    assert_eq!(img.pixel(256, 256), crate::RED);

    // The last converter is dropped inside the runtime.
    drop(c);
}
