//! End-to-end runs through real image files.

use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use npp_filters::io::{decode, encode, load_image};
use npp_filters::pipeline::{run, Request};
use npp_filters::{CpuBackend, Error, FilterConfigBuilder, FilterKind, HostImage, Point, Size};
use tempfile::tempdir;

fn write_gray(path: &Path, width: u32, height: u32, value: u8) {
    GrayImage::from_pixel(width, height, Luma([value])).save(path).unwrap();
}

#[test]
fn test_mid_gray_box_none_stays_mid_gray() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("gray.png");
    let output = dir.path().join("out.png");
    write_gray(&input, 10, 10, 128);

    let request = Request::new(&input, FilterConfigBuilder::new("box", "none")).output(&output);
    let written = run(&CpuBackend::new(), request).unwrap();
    assert_eq!(written, output);

    let result = image::open(&output).unwrap();
    assert_eq!(result.color(), image::ColorType::Rgb8);
    let rgb = result.to_rgb8();
    assert_eq!(rgb.dimensions(), (10, 10));
    assert!(rgb.pixels().all(|p| *p == Rgb([128, 128, 128])));
}

#[test]
fn test_default_output_name_next_to_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photo.png");
    write_gray(&input, 8, 6, 60);

    let request = Request::new(&input, FilterConfigBuilder::new("gauss", "none"));
    let written = run(&CpuBackend::new(), request).unwrap();

    assert_eq!(written, dir.path().join("photo_filter_gauss_none.png"));
    assert!(written.is_file());
}

#[test]
fn test_wiener_none_is_rejected_without_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    write_gray(&input, 4, 4, 10);

    let request = Request::new(&input, FilterConfigBuilder::new("wiener", "none")).output(&output);
    match run(&CpuBackend::new(), request) {
        Err(Error::IncompatibleBorderPolicy { filter, .. }) => assert_eq!(filter, FilterKind::Wiener),
        other => panic!("expected IncompatibleBorderPolicy, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_missing_input_reports_path() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("absent.png");

    let request = Request::new(&input, FilterConfigBuilder::new("box", "replicate"));
    match run(&CpuBackend::new(), request) {
        Err(Error::InputNotFound { path }) => assert_eq!(path, input),
        other => panic!("expected InputNotFound, got {:?}", other),
    }
}

#[test]
fn test_gray_alpha_input_is_unsupported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("la.png");
    image::GrayAlphaImage::from_pixel(3, 3, image::LumaA([1, 2])).save(&input).unwrap();

    let request = Request::new(&input, FilterConfigBuilder::new("box", "replicate"));
    let result = run(&CpuBackend::new(), request);
    assert!(matches!(result, Err(Error::UnsupportedPixelFormat { channels: 2 })));
}

#[test]
fn test_unreadable_input_is_decode_failure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("junk.png");
    std::fs::write(&input, b"not an image").unwrap();

    let result = load_image(&input);
    assert!(matches!(result, Err(Error::DecodeFailed { .. })));
}

#[test]
fn test_rgba_file_loads_as_rgb() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("rgba.png");
    RgbaImage::from_pixel(5, 2, Rgba([10, 20, 30, 0])).save(&input).unwrap();

    let raw = decode(&input).unwrap();
    assert_eq!(raw.channels, 4);

    let host = load_image(&input).unwrap();
    assert_eq!(host.size(), Size::new(5, 2));
    assert_eq!(host.pixel(4, 1), [10, 20, 30]);
}

#[test]
fn test_encode_reads_through_pitch() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("pitched.png");

    let mut host = HostImage::with_pitch(3, 2, 16);
    for y in 0..2 {
        for (x, px) in host.row_mut(y).chunks_exact_mut(3).enumerate() {
            px.copy_from_slice(&[x as u8, y as u8, 7]);
        }
    }
    encode(&output, &host).unwrap();

    let decoded = image::open(&output).unwrap().to_rgb8();
    assert_eq!(decoded, RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 7])));
}

#[test]
fn test_region_at_offset_writes_region_size() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("big.png");
    let output = dir.path().join("crop.png");
    RgbImage::from_fn(12, 10, |x, y| Rgb([x as u8 * 10, y as u8 * 10, 0]))
        .save(&input)
        .unwrap();

    let config = FilterConfigBuilder::new("box", "replicate")
        .mask_size(Size::new(1, 1))
        .source_offset(Point::new(4, 3))
        .region_of_interest(Size::new(5, 4));
    run(&CpuBackend::new(), Request::new(&input, config).output(&output)).unwrap();

    let rgb = image::open(&output).unwrap().to_rgb8();
    assert_eq!(rgb.dimensions(), (5, 4));
    assert_eq!(*rgb.get_pixel(0, 0), Rgb([40, 30, 0]));
    assert_eq!(*rgb.get_pixel(4, 3), Rgb([80, 60, 0]));
}

#[test]
fn test_wiener_replicate_runs() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("noisy.png");
    let output = dir.path().join("clean.png");
    RgbImage::from_fn(16, 16, |x, y| {
        let v = if (x * 7 + y * 13) % 5 == 0 { 200 } else { 100 };
        Rgb([v, v, v])
    })
    .save(&input)
    .unwrap();

    let config = FilterConfigBuilder::new("wiener", "replicate").mask_size(Size::new(3, 3));
    run(&CpuBackend::new(), Request::new(&input, config).output(&output)).unwrap();

    let rgb = image::open(&output).unwrap().to_rgb8();
    assert_eq!(rgb.dimensions(), (16, 16));
    assert!(rgb.pixels().all(|p| p[0] >= 100 && p[0] <= 200));
}
