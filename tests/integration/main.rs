use svg_to_png::{
    Converter, DefaultFetcher, Options, RenderRequest, SkiaRenderer, TargetSize,
};

mod channel;
#[cfg(feature = "http")]
mod fetch;

type Rgba = (u8, u8, u8, u8);

const RED: Rgba = (255, 0, 0, 255);
const GREEN: Rgba = (0, 255, 0, 255);
const BLUE: Rgba = (0, 0, 255, 255);

pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = ((y * self.width + x) * 4) as usize;
        let p = &self.data[idx..idx + 4];
        (p[0], p[1], p[2], p[3])
    }
}

pub fn decode_png(data: &[u8]) -> Image {
    let decoder = png::Decoder::new(data);
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!(info.color_type, png::ColorType::Rgba);
    assert_eq!(info.bit_depth, png::BitDepth::Eight);
    buf.truncate(info.buffer_size());

    Image {
        width: info.width,
        height: info.height,
        data: buf,
    }
}

pub fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(format!("tests/fixtures/{}", name)).unwrap()
}

pub fn options() -> Options {
    // System fonts are not needed by fixtures and are slow to load.
    Options {
        system_fonts: false,
        ..Options::default()
    }
}

pub fn converter() -> Converter<SkiaRenderer, DefaultFetcher> {
    options().converter()
}

/// Starts a local server and returns its base URL.
///
/// `/empty` replies with no data and unknown paths with 404.
/// Everything else is served from `tests/fixtures`.
#[cfg(feature = "http")]
pub fn serve() -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let name = request.url().trim_start_matches('/').to_string();
            let path = format!("tests/fixtures/{}", name);
            let response = if name == "empty" {
                tiny_http::Response::from_data(Vec::new())
            } else if let Ok(data) = std::fs::read(&path) {
                tiny_http::Response::from_data(data)
            } else {
                tiny_http::Response::from_string("not found").with_status_code(404)
            };
            let _ = request.respond(response);
        }
    });

    format!("http://{}", addr)
}

fn target(w: u32, h: u32) -> TargetSize {
    TargetSize::new(w, h).unwrap()
}

fn render(name: &str, w: u32, h: u32) -> Image {
    let png = converter().render(&fixture(name), target(w, h)).unwrap();
    let img = decode_png(&png);
    assert_eq!((img.width, img.height), (w, h));
    img
}

#[test]
fn fill_requested_size() {
    let img = render("red-square.svg", 512, 512);
    assert_eq!(img.pixel(0, 0), RED);
    assert_eq!(img.pixel(511, 511), RED);
}

#[test]
fn stretch_non_uniformly() {
    let img = render("red-square.svg", 300, 17);
    assert_eq!(img.pixel(0, 0), RED);
    assert_eq!(img.pixel(299, 16), RED);
}

#[test]
fn view_box_ignores_declared_size() {
    // viewBox is 100x50, while width and height are 300x50.
    let img = render("halves.svg", 512, 512);
    assert_eq!(img.pixel(10, 10), RED);
    assert_eq!(img.pixel(250, 500), RED);
    assert_eq!(img.pixel(262, 10), BLUE);
    assert_eq!(img.pixel(511, 511), BLUE);
}

#[test]
fn view_box_without_aspect() {
    // Declared as a 100x100 square with a 100x50 viewBox stretched into it.
    let img = render("halves-no-aspect.svg", 64, 32);
    assert_eq!(img.pixel(0, 0), RED);
    assert_eq!(img.pixel(30, 31), RED);
    assert_eq!(img.pixel(34, 0), BLUE);
    assert_eq!(img.pixel(63, 31), BLUE);
}

#[test]
fn view_box_aligned_to_end() {
    // The viewBox is pushed to the right edge of a 300x50 viewport.
    let img = render("halves-aligned.svg", 200, 100);
    assert_eq!(img.pixel(0, 0), RED);
    assert_eq!(img.pixel(98, 99), RED);
    assert_eq!(img.pixel(102, 0), BLUE);
    assert_eq!(img.pixel(199, 99), BLUE);
}

#[test]
fn view_box_origin() {
    let img = render("offset-view-box.svg", 40, 40);
    assert_eq!(img.pixel(5, 20), GREEN);
    assert_eq!(img.pixel(19, 39), GREEN);
    assert_eq!(img.pixel(30, 20).3, 0);
}

#[test]
fn declared_size() {
    let img = render("size-only.svg", 10, 100);
    assert_eq!(img.pixel(5, 10), RED);
    assert_eq!(img.pixel(5, 90), BLUE);
}

#[test]
fn no_intrinsic_size() {
    let img = render("no-size.svg", 64, 64);
    assert_eq!(img.pixel(5, 5), GREEN);
    assert_eq!(img.pixel(40, 40).3, 0);
}

#[test]
fn svgz() {
    let img = render("red-square.svgz", 32, 32);
    assert_eq!(img.pixel(16, 16), RED);
}

#[test]
fn background() {
    let opt = Options {
        background: Some("#0000ff".parse().unwrap()),
        ..options()
    };
    let png = opt
        .converter()
        .render(&fixture("no-size.svg"), target(64, 64))
        .unwrap();
    let img = decode_png(&png);
    assert_eq!(img.pixel(5, 5), GREEN);
    assert_eq!(img.pixel(40, 40), BLUE);
}

#[test]
fn invalid_svg() {
    let e = converter().render(b"<svg><g></svg>", target(8, 8)).unwrap_err();
    assert_eq!(e.code(), "SVG_ERROR");

    let e = converter().render(b"", target(8, 8)).unwrap_err();
    assert_eq!(e.code(), "SVG_ERROR");
}

#[test]
fn too_big() {
    let e = converter()
        .render(&fixture("red-square.svg"), target(1_000_000, 1_000_000))
        .unwrap_err();
    assert_eq!(e.code(), "RENDER_ERROR");
}

#[test]
fn background_request() {
    let req = RenderRequest::from_bytes(fixture("red-square.svg"), TargetSize::default());
    let png = converter().submit(req).wait().unwrap();
    let img = decode_png(&png);
    assert_eq!((img.width, img.height), (512, 512));
}

#[tokio::test]
async fn await_requests() {
    let c = converter();
    let small = c.submit(RenderRequest::from_bytes(fixture("red-square.svg"), target(4, 4)));
    let large = c.submit(RenderRequest::from_bytes(fixture("halves.svg"), target(400, 100)));

    let img = decode_png(&large.await.unwrap());
    assert_eq!((img.width, img.height), (400, 100));
    let img = decode_png(&small.await.unwrap());
    assert_eq!((img.width, img.height), (4, 4));
}
