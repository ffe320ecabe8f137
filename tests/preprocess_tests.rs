//! Tests for image normalization ahead of OCR: decoding, grayscale
//! conversion and dimension bounding.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use std::io::Cursor;

use numscan::errors::ScanError;
use numscan::preprocess::{self, MAX_DIMENSION, MIN_DIMENSION};

fn encode_png(img: DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn decodes_and_keeps_mid_range_dimensions() {
    let bytes = encode_png(DynamicImage::ImageLuma8(GrayImage::from_pixel(
        640,
        480,
        Luma([100u8]),
    )));

    let normalized = preprocess::normalize(&bytes).unwrap();
    assert_eq!(normalized.dimensions(), (640, 480));
}

#[test]
fn color_images_come_out_grayscale_with_same_dimensions() {
    let bytes = encode_png(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        512,
        384,
        Rgb([10u8, 200, 60]),
    )));

    let normalized = preprocess::normalize(&bytes).unwrap();
    assert_eq!(normalized.dimensions(), (512, 384));
}

#[test]
fn undersized_images_are_doubled() {
    let small = MIN_DIMENSION - 50;
    let bytes = encode_png(DynamicImage::ImageLuma8(GrayImage::from_pixel(
        small,
        600,
        Luma([100u8]),
    )));

    let normalized = preprocess::normalize(&bytes).unwrap();
    assert_eq!(normalized.dimensions(), (small * 2, 1200));
}

#[test]
fn oversized_images_are_halved() {
    let big = MAX_DIMENSION + 200;
    let bytes = encode_png(DynamicImage::ImageLuma8(GrayImage::from_pixel(
        big,
        400,
        Luma([100u8]),
    )));

    let normalized = preprocess::normalize(&bytes).unwrap();
    assert_eq!(normalized.dimensions(), (big / 2, 200));
}

#[test]
fn unreadable_bytes_fail_with_a_decode_error() {
    let err = preprocess::normalize(b"{\"not\": \"an image\"}").unwrap_err();
    assert!(matches!(err, ScanError::Decode(_)));

    // Truncated PNG header is still a decode failure, not a panic
    let err = preprocess::normalize(&[0x89, b'P', b'N', b'G']).unwrap_err();
    assert!(matches!(err, ScanError::Decode(_)));
}
