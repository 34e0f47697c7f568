//! Image to PDF conversion.

use image::{Rgb, Rgba};
use lopdf::Document;
use pdfsmith::config::{CompressionLevel, WriteOptions};
use pdfsmith::ops;
use pdfsmith::request::{ImagesRequest, InputFile, Request};
use pdfsmith::PdfSmithError;

use crate::common::{image_streams, jpeg, page_sizes, png};

fn convert(images: Vec<InputFile>, options: &WriteOptions) -> pdfsmith::Result<pdfsmith::Artifact> {
    ops::execute(&Request::Images(ImagesRequest { images }), options)
}

#[test]
fn test_one_page_per_image_in_input_order() {
    let artifact = convert(
        vec![
            InputFile::new("wide.png", png(30, 20, Rgba([0, 128, 255, 255]))),
            InputFile::new("strip.jpg", jpeg(40, 10, Rgb([200, 50, 50]))),
            InputFile::new("dot.png", png(5, 5, Rgba([0, 0, 0, 255]))),
        ],
        &WriteOptions::default(),
    )
    .unwrap();

    assert_eq!(artifact.file_name, "images.pdf");
    assert_eq!(artifact.statistics.page_count, 3);
    assert_eq!(
        page_sizes(&artifact.bytes),
        vec![(30.0, 20.0), (40.0, 10.0), (5.0, 5.0)]
    );
}

#[test]
fn test_transparent_png_becomes_white_rgb() {
    let artifact = convert(
        vec![InputFile::new("clear.png", png(4, 3, Rgba([0, 0, 0, 0])))],
        &WriteOptions::with_compression(CompressionLevel::None),
    )
    .unwrap();

    let doc = Document::load_mem(&artifact.bytes).unwrap();
    let streams = image_streams(&doc);
    assert_eq!(streams.len(), 1);

    let image = streams[0];
    assert!(image.dict.get(b"SMask").is_err());
    assert_eq!(
        image.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
        b"DeviceRGB"
    );
    assert_eq!(image.content.len(), 4 * 3 * 3);
    assert!(image.content.iter().all(|&byte| byte == 255));
}

#[test]
fn test_gif_bytes_are_unsupported() {
    let mut gif = b"GIF89a".to_vec();
    gif.extend_from_slice(&[1, 0, 1, 0, 0, 0, 0]);

    let err = convert(
        vec![InputFile::new("renamed.png", gif)],
        &WriteOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PdfSmithError::UnsupportedImage { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_truncated_png_fails_to_decode() {
    let bytes = png(32, 32, Rgba([10, 20, 30, 255]));
    let cut = bytes[..bytes.len() / 2].to_vec();

    let err = convert(vec![InputFile::new("cut.png", cut)], &WriteOptions::default()).unwrap_err();
    assert!(matches!(err, PdfSmithError::FailedToDecodeImage { .. }));
}

#[test]
fn test_gif_extension_is_rejected_before_decoding() {
    let err = convert(
        vec![
            InputFile::new("fine.png", png(2, 2, Rgba([1, 2, 3, 255]))),
            InputFile::new("photo.gif", b"GIF89a".to_vec()),
        ],
        &WriteOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PdfSmithError::UnsupportedInput { ref name, .. } if name == "photo.gif"));
}
