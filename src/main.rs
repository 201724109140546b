use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use npp_filters::config::{parse_noise, parse_point, parse_size};
use npp_filters::pipeline::{self, find_sample_image, Request};
use npp_filters::{CpuBackend, Error, FilterConfigBuilder, FilterKind, FilterPrimitives, Result};

/// Values are taken as plain strings: unknown filter and border names fall
/// back to their defaults instead of being rejected.
#[derive(Parser)]
#[command(name = "npp-filters")]
#[command(version, about = "Apply an image filter with a chosen border policy", long_about = None)]
struct Cli {
    /// Filter: box, sobel_h, sobel_v, roberts_up, roberts_down, laplace, gauss,
    /// highpass, lowpass, sharpen or wiener
    #[arg(long, value_name = "KIND", default_value = "box")]
    filter: String,

    /// Border policy: none or replicate
    #[arg(long, value_name = "POLICY", default_value = "replicate")]
    border: String,

    /// Input image (default: bundled Lena.png)
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output image (default: <input stem>_filter_<kind>_<border>.png)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Mask size
    #[arg(long, value_name = "WxH")]
    mask: Option<String>,

    /// Anchor inside the mask (default: mask centre)
    #[arg(long, value_name = "X,Y")]
    anchor: Option<String>,

    /// Per-channel noise for wiener, each in [0, 1]
    #[arg(long, value_name = "A,B,C")]
    noise: Option<String>,

    /// Region of interest (default: whole image)
    #[arg(long, value_name = "WxH")]
    roi: Option<String>,

    /// Region offset inside the source, bordered runs only
    #[arg(long, value_name = "X,Y")]
    offset: Option<String>,
}

impl Cli {
    fn request(self) -> Result<Request> {
        let mut config = FilterConfigBuilder::new(&self.filter, &self.border);
        if let Some(mask) = &self.mask {
            config = config.mask_size(parse_size(mask)?);
        }
        if let Some(anchor) = &self.anchor {
            config = config.anchor(parse_point(anchor)?);
        }
        if let Some(noise) = &self.noise {
            config = config.noise(parse_noise(noise)?);
        }
        if let Some(roi) = &self.roi {
            config = config.region_of_interest(parse_size(roi)?);
        }
        if let Some(offset) = &self.offset {
            config = config.source_offset(parse_point(offset)?);
        }

        let input = self.input.unwrap_or_else(find_sample_image);
        let request = Request::new(input, config);
        Ok(match self.output {
            Some(output) => request.output(output),
            None => request,
        })
    }
}

fn exit_code(err: &Error) -> u8 {
    match err {
        Error::IncompatibleBorderPolicy { .. } => 2,
        Error::InputNotFound { .. } | Error::DecodeFailed { .. } => 3,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if FilterKind::from_name(&cli.filter).is_none() {
        info!("unknown filter '{}', using {}", cli.filter, FilterKind::resolve(&cli.filter));
    }

    let backend = CpuBackend::new();
    info!("{}", backend.describe());

    let result = cli.request().and_then(|request| pipeline::run(&backend, request));
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
