// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![allow(clippy::uninlined_format_args)]

use std::path;

use svg_to_png::{Options, RenderRequest, TargetSize};

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn timed<F, T>(perf: bool, name: &str, mut f: F) -> T
where
    F: FnMut() -> T,
{
    let now = std::time::Instant::now();
    let result = f();
    if perf {
        let elapsed = now.elapsed().as_micros() as f64 / 1000.0;
        println!("{}: {:.2}ms", name, elapsed);
    }

    result
}

fn process() -> Result<(), String> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e);
        }
    };

    if !args.quiet {
        svg_to_png::init_log();
    }

    let converter = timed(args.perf, "Setup", || args.options.converter());

    let req = match args.in_svg {
        InputFrom::Url(ref url) => {
            RenderRequest::from_url(url, args.target).map_err(|e| e.to_string())?
        }
        InputFrom::File(ref file) => {
            let data = std::fs::read(file).map_err(|_| "failed to open the provided file")?;
            RenderRequest::from_bytes(data, args.target)
        }
        InputFrom::Stdin => {
            use std::io::Read;
            let mut buf = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .map_err(|_| "failed to read stdin")?;
            RenderRequest::from_bytes(buf, args.target)
        }
    };

    let png = timed(args.perf, "Rendering", || converter.render_request(&req))
        .map_err(|e| e.to_string())?;

    match args.out_png {
        OutputTo::Stdout => {
            use std::io::Write;
            std::io::stdout()
                .write_all(&png)
                .map_err(|_| "failed to write to stdout")?;
        }
        OutputTo::File(ref file) => {
            timed(args.perf, "Saving", || std::fs::write(file, &png))
                .map_err(|_| "failed to save the output file")?;
        }
    }

    Ok(())
}

const HELP: &str = "\
svg-to-png converts SVG files into PNG images of a requested size.

The image is stretched to fill the requested width and height.

USAGE:
  svg-to-png [OPTIONS] <in-svg> <out-png>  # from file to file
  svg-to-png [OPTIONS] <in-svg> -c         # from file to stdout
  svg-to-png [OPTIONS] <url> <out-png>     # from an HTTP(S) URL to file
  svg-to-png [OPTIONS] - <out-png>         # from stdin to file

  svg-to-png -w 256 -h 128 in.svg out.png

OPTIONS:
      --help                    Prints this help
  -V, --version                 Prints version
  -c                            Prints the output PNG to the stdout

  -w, --width LENGTH            Sets the width in pixels
                                [default: 512]
  -h, --height LENGTH           Sets the height in pixels
                                [default: 512]
      --dpi DPI                 Sets the resolution
                                [default: 96] [possible values: 10..4000 (inclusive)]
      --background COLOR        Sets the background color
                                Examples: red, #fff, #fff000
      --max-pixels NUM          Sets the largest output area in pixels
                                [default: 268435456]

  --languages LANG              Sets a comma-separated list of languages that
                                will be used during the 'systemLanguage'
                                attribute resolving
                                Examples: 'en-US', 'en-US, ru-RU', 'en, ru'
                                [default: en]
  --resources-dir DIR           Sets a directory that will be used during
                                relative paths resolving.
                                [default: input file directory]

  --font-family FAMILY          Sets the default font family that will be
                                used when no 'font-family' is present
                                [default: Times New Roman]
  --font-size SIZE              Sets the default font size that will be
                                used when no 'font-size' is present
                                [default: 12] [possible values: 1..192 (inclusive)]
  --use-font-file PATH          Load a specified font file into the fonts database.
                                This option can be set multiple times
  --use-fonts-dir PATH          Loads all fonts from the specified directory
                                into the fonts database.
                                This option can be set multiple times
  --skip-system-fonts           Disables system fonts loading

  --timeout SECONDS             Sets the network request timeout
                                [default: 30]
  --user-agent STRING           Sets the User-Agent header of network requests

  --perf                        Prints performance stats
  --quiet                       Disables warnings

ARGS:
  <in-svg>                      Input file, URL or '-' for stdin
  <out-png>                     Output file
";

#[derive(Debug)]
struct CliArgs {
    width: Option<u32>,
    height: Option<u32>,
    dpi: u32,
    background: Option<svgtypes::Color>,
    max_pixels: Option<u64>,

    languages: Vec<String>,
    resources_dir: Option<path::PathBuf>,

    font_family: Option<String>,
    font_size: u32,
    font_files: Vec<path::PathBuf>,
    font_dirs: Vec<path::PathBuf>,
    skip_system_fonts: bool,

    timeout: Option<u64>,
    user_agent: Option<String>,

    perf: bool,
    quiet: bool,

    input: String,
    output: Option<String>,
}

fn collect_args() -> Result<CliArgs, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    Ok(CliArgs {
        width: input.opt_value_from_fn(["-w", "--width"], parse_length)?,
        height: input.opt_value_from_fn(["-h", "--height"], parse_length)?,
        dpi: input.opt_value_from_fn("--dpi", parse_dpi)?.unwrap_or(96),
        background: input.opt_value_from_str("--background")?,
        max_pixels: input.opt_value_from_str("--max-pixels")?,

        languages: input
            .opt_value_from_fn("--languages", parse_languages)?
            .unwrap_or_else(|| vec!["en".to_string()]),
        resources_dir: input.opt_value_from_str("--resources-dir")?,

        font_family: input.opt_value_from_str("--font-family")?,
        font_size: input
            .opt_value_from_fn("--font-size", parse_font_size)?
            .unwrap_or(12),
        font_files: input.values_from_str("--use-font-file")?,
        font_dirs: input.values_from_str("--use-fonts-dir")?,
        skip_system_fonts: input.contains("--skip-system-fonts"),

        timeout: input.opt_value_from_fn("--timeout", parse_timeout)?,
        user_agent: input.opt_value_from_str("--user-agent")?,

        perf: input.contains("--perf"),
        quiet: input.contains("--quiet"),

        input: input.free_from_str()?,
        output: input.opt_free_from_str()?,
    })
}

fn parse_dpi(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if (10..=4000).contains(&n) {
        Ok(n)
    } else {
        Err("DPI out of bounds".to_string())
    }
}

fn parse_length(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid length")?;

    if n > 0 {
        Ok(n)
    } else {
        Err("LENGTH cannot be zero".to_string())
    }
}

fn parse_font_size(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if n > 0 && n <= 192 {
        Ok(n)
    } else {
        Err("font size out of bounds".to_string())
    }
}

fn parse_timeout(s: &str) -> Result<u64, String> {
    let n: u64 = s.parse().map_err(|_| "invalid number")?;

    if n > 0 {
        Ok(n)
    } else {
        Err("timeout cannot be zero".to_string())
    }
}

fn parse_languages(s: &str) -> Result<Vec<String>, String> {
    let langs: Vec<String> = s
        .split(',')
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty())
        .collect();

    if langs.is_empty() {
        return Err("languages list cannot be empty".to_string());
    }

    Ok(langs)
}

#[derive(Clone, PartialEq, Debug)]
enum InputFrom {
    Stdin,
    File(path::PathBuf),
    Url(String),
}

#[derive(Clone, PartialEq, Debug)]
enum OutputTo {
    Stdout,
    File(path::PathBuf),
}

struct Args {
    in_svg: InputFrom,
    out_png: OutputTo,
    target: TargetSize,
    perf: bool,
    quiet: bool,
    options: Options,
}

fn parse_args() -> Result<Args, String> {
    let args = collect_args().map_err(|e| e.to_string())?;

    let in_svg = match args.input.as_str() {
        "-" => InputFrom::Stdin,
        "-c" => return Err("-c should be set after input".to_string()),
        s if s.starts_with("http://") || s.starts_with("https://") => {
            InputFrom::Url(s.to_string())
        }
        s => InputFrom::File(s.into()),
    };

    let out_png = match args.output.as_deref() {
        Some("-c") => OutputTo::Stdout,
        Some(file) => OutputTo::File(file.into()),
        None => return Err("<out-png> must be set".to_string()),
    };

    if in_svg == InputFrom::Stdin && args.resources_dir.is_none() {
        println!("Warning: Make sure to set --resources-dir when reading SVG from stdin.");
    }

    let mut options = Options::default();

    let def = options.default_target();
    let target = TargetSize::new(
        args.width.unwrap_or(def.width()),
        args.height.unwrap_or(def.height()),
    )
    .unwrap_or(def);

    options.resources_dir = match args.resources_dir {
        Some(v) => Some(v),
        None => match in_svg {
            // Get input file absolute directory.
            InputFrom::File(ref file) => std::fs::canonicalize(file)
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf())),
            _ => None,
        },
    };

    options.background = args.background;
    if let Some(max_pixels) = args.max_pixels {
        options.max_pixels = max_pixels;
    }
    options.dpi = args.dpi as f32;
    options.languages = args.languages;
    if let Some(family) = args.font_family {
        options.font_family = family;
    }
    options.font_size = args.font_size as f32;
    options.font_files = args.font_files;
    options.font_dirs = args.font_dirs;
    options.system_fonts = !args.skip_system_fonts;

    #[cfg(feature = "http")]
    {
        if let Some(secs) = args.timeout {
            options.fetch.timeout = std::time::Duration::from_secs(secs);
        }
        if let Some(user_agent) = args.user_agent {
            options.fetch.user_agent = user_agent;
        }
    }
    #[cfg(not(feature = "http"))]
    {
        if args.timeout.is_some() || args.user_agent.is_some() {
            println!("Warning: network options have no effect without the `http` feature.");
        }
    }

    Ok(Args {
        in_svg,
        out_png,
        target,
        perf: args.perf,
        quiet: args.quiet,
        options,
    })
}
