//! Image to PDF conversion.
//!
//! Every image becomes one page sized to its pixel dimensions at 72 dpi.
//! Images are normalized to 8-bit RGB without alpha before embedding:
//! transparent areas are composited onto white. Baseline RGB JPEGs are
//! embedded as they are (`DCTDecode`) since they already satisfy that.

use std::io::Cursor;

use image::codecs::jpeg::JpegDecoder;
use image::{
    DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat, Rgb, RgbImage, Rgba,
};
use lopdf::{Object, Stream, dictionary};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::config::WriteOptions;
use crate::error::{PdfSmithError, Result};
use crate::io::DocumentWriter;
use crate::ops::{Artifact, Operation, OperationKind, OperationStatistics, timed};
use crate::request::{ImagesRequest, InputFile};

/// How the pixel data of a [`NormalizedImage`] is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelEncoding {
    /// Original JPEG stream, three components.
    Jpeg,
    /// Uncompressed 8-bit RGB samples.
    Rgb8,
}

/// A decoded image in a form that can be placed on a PDF page.
#[derive(Clone)]
pub struct NormalizedImage {
    name: String,
    width: u32,
    height: u32,
    encoding: PixelEncoding,
    data: Vec<u8>,
    fingerprint: [u8; 32],
}

impl NormalizedImage {
    /// Decode a PNG or JPEG upload.
    ///
    /// The format is sniffed from the bytes, not taken from the name.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::UnsupportedImage`] for any other format and
    /// [`PdfSmithError::FailedToDecodeImage`] if decoding fails.
    #[instrument(skip_all, fields(name = input.name(), bytes = input.len()))]
    pub fn decode(input: &InputFile) -> Result<Self> {
        let bytes = input.bytes();
        let unsupported = || PdfSmithError::UnsupportedImage {
            name: input.name().to_string(),
        };
        let decode_error = |source| PdfSmithError::FailedToDecodeImage {
            name: input.name().to_string(),
            source,
        };

        let format = image::guess_format(bytes).map_err(|_| unsupported())?;
        let fingerprint: [u8; 32] = Sha256::digest(bytes).into();

        let (decoded, passthrough) = match format {
            ImageFormat::Jpeg => {
                let decoder = JpegDecoder::new(Cursor::new(bytes)).map_err(decode_error)?;
                let is_rgb = decoder.original_color_type() == ExtendedColorType::Rgb8;
                let decoded = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
                (decoded, is_rgb)
            }
            ImageFormat::Png => {
                let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
                    .map_err(decode_error)?;
                (decoded, false)
            }
            _ => return Err(unsupported()),
        };

        let (width, height) = (decoded.width(), decoded.height());
        let (encoding, data) = if passthrough {
            (PixelEncoding::Jpeg, bytes.to_vec())
        } else {
            (PixelEncoding::Rgb8, flatten(decoded).into_raw())
        };

        debug!(?format, width, height, ?encoding, "Image normalized");

        Ok(Self {
            name: input.name().to_string(),
            width,
            height,
            encoding,
            data,
            fingerprint,
        })
    }

    /// Display name of the source upload.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// How the pixel data is stored.
    pub fn encoding(&self) -> PixelEncoding {
        self.encoding
    }

    /// Page width and height in points.
    pub fn page_size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// SHA-256 of the source upload.
    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }

    /// The image XObject stream for this image.
    pub(crate) fn to_xobject(&self) -> Stream {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(self.width)),
            "Height" => Object::Integer(i64::from(self.height)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        if self.encoding == PixelEncoding::Jpeg {
            dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        }
        Stream::new(dict, self.data.clone())
    }
}

impl std::fmt::Debug for NormalizedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizedImage")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("encoding", &self.encoding)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Convert to 8-bit RGB, compositing any alpha channel onto white.
fn flatten(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = u16::from(a);
        let over_white =
            |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([over_white(r), over_white(g), over_white(b)])
    })
}

/// Builds a PDF with one page per image.
#[derive(Debug, Clone, Default)]
pub struct ImageConverter;

impl ImageConverter {
    /// Create a new converter.
    pub fn new() -> Self {
        Self
    }
}

impl Operation for ImageConverter {
    const KIND: OperationKind = OperationKind::Images;
    type Request = ImagesRequest;

    #[instrument(name = "images", skip_all, fields(images = request.images.len()))]
    fn execute(&self, request: &ImagesRequest, options: &WriteOptions) -> Result<Artifact> {
        if request.images.is_empty() {
            return Err(PdfSmithError::NoFilesSelected);
        }

        timed(|| {
            let mut writer = DocumentWriter::new();
            for input in &request.images {
                let image = NormalizedImage::decode(input)?;
                writer.append_image(&image)?;
            }

            let statistics = OperationStatistics {
                files_processed: request.images.len(),
                input_size: request.images.iter().map(|i| i.len() as u64).sum(),
                page_count: writer.page_count(),
                ..Default::default()
            };
            let bytes = writer.finish(options, None)?;
            Ok(Artifact::new(Self::KIND, bytes, statistics))
        })
    }
}
