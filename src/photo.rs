//! Client-side photo resizing and compression before upload.

use std::io::Cursor;

use image::{
    codecs::jpeg::JpegEncoder, imageops::FilterType, metadata::Orientation, DynamicImage,
    GenericImageView, ImageDecoder, ImageFormat, ImageReader,
};

use crate::{CantinhoError, Result};

/// Largest width or height kept after resizing.
pub const MAX_DIMENSION: u32 = 800;

/// JPEG quality used for every non-PNG photo.
pub const JPEG_QUALITY: u8 = 60;

/// Largest encoded photo accepted for upload.
pub const MAX_PHOTO_BYTES: usize = 800 * 1024;

/// Encoded photo ready to be attached to a multipart form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Photo {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// Target dimensions that fit `width`×`height` inside the bounds.
///
/// Landscape images are bounded by width, everything else by height.
/// Images already inside the bounds are never upscaled.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let scale = |side: u32, target: u32, reference: u32| -> u32 {
        let scaled = (u64::from(side) * u64::from(target) + u64::from(reference) / 2)
            / u64::from(reference);
        (scaled as u32).max(1)
    };

    if width > height {
        if width > max_width {
            return (max_width, scale(height, max_width, width));
        }
    } else if height > max_height {
        return (scale(width, max_height, height), max_height);
    }
    (width, height)
}

/// Decodes, resizes and re-encodes a photo.
///
/// JPEG, PNG, GIF, WebP and BMP are accepted. The EXIF orientation is applied
/// to the pixels, since re-encoding drops the tag. PNG input stays PNG; any
/// other format becomes JPEG at [`JPEG_QUALITY`].
pub fn prepare(bytes: &[u8], file_name: &str) -> Result<Photo> {
    let (decoded, format) = decode_upright(bytes)?;

    let (width, height) = decoded.dimensions();
    let (target_width, target_height) = fit_within(width, height, MAX_DIMENSION, MAX_DIMENSION);
    let resized = if (target_width, target_height) == (width, height) {
        decoded
    } else {
        decoded.resize_exact(target_width, target_height, FilterType::Triangle)
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(width, height, target_width, target_height, "resized photo");

    let mut encoded = Vec::new();
    let (mime, extension) = if format == ImageFormat::Png {
        resized
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .map_err(|err| CantinhoError::Photo(format!("could not encode PNG: {err}")))?;
        ("image/png", "png")
    } else {
        JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY)
            .encode_image(&resized.to_rgb8())
            .map_err(|err| CantinhoError::Photo(format!("could not encode JPEG: {err}")))?;
        ("image/jpeg", "jpg")
    };

    if encoded.len() > MAX_PHOTO_BYTES {
        return Err(CantinhoError::PhotoTooLarge {
            size: encoded.len(),
            limit: MAX_PHOTO_BYTES,
        });
    }

    let file_name = match file_name.trim() {
        "" => format!("photo.{extension}"),
        name => name.to_owned(),
    };

    Ok(Photo {
        bytes: encoded,
        mime,
        file_name,
        width: target_width,
        height: target_height,
    })
}

fn decode_upright(bytes: &[u8]) -> Result<(DynamicImage, ImageFormat)> {
    let decode_error = |err: image::ImageError| {
        CantinhoError::Photo(format!("could not decode image: {err}"))
    };

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| CantinhoError::Photo(format!("could not read image data: {err}")))?;
    let format = reader
        .format()
        .ok_or_else(|| CantinhoError::Photo("unrecognized image data".to_owned()))?;

    let mut decoder = reader.into_decoder().map_err(decode_error)?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
    image.apply_orientation(orientation);

    Ok((image, format))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{
        codecs::gif::GifEncoder, Frame, GenericImageView, ImageFormat, RgbImage, RgbaImage,
    };

    use super::{fit_within, prepare, MAX_PHOTO_BYTES};
    use crate::CantinhoError;

    fn encode(source: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, 90)
                    .encode_image(source)
                    .unwrap();
            }
            _ => source.write_to(&mut Cursor::new(&mut bytes), format).unwrap(),
        }
        bytes
    }

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        })
    }

    #[test]
    fn fit_within_bounds_landscape_by_width() {
        assert_eq!(fit_within(1600, 900, 800, 800), (800, 450));
    }

    #[test]
    fn fit_within_bounds_portrait_and_square_by_height() {
        assert_eq!(fit_within(600, 1200, 800, 800), (400, 800));
        assert_eq!(fit_within(1000, 1000, 800, 800), (800, 800));
    }

    #[test]
    fn fit_within_never_upscales() {
        assert_eq!(fit_within(320, 240, 800, 800), (320, 240));
        assert_eq!(fit_within(800, 800, 800, 800), (800, 800));
    }

    #[test]
    fn fit_within_keeps_at_least_one_pixel() {
        assert_eq!(fit_within(10_000, 1, 800, 800), (800, 1));
    }

    #[test]
    fn png_stays_png_and_is_resized() {
        let input = encode(&gradient(1600, 900), ImageFormat::Png);
        let photo = prepare(&input, "praia.png").unwrap();

        assert_eq!(photo.mime, "image/png");
        assert_eq!(photo.file_name, "praia.png");
        assert_eq!((photo.width, photo.height), (800, 450));
        let decoded = image::load_from_memory(&photo.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (800, 450));
    }

    #[test]
    fn jpeg_input_is_reencoded_as_jpeg() {
        let input = encode(&gradient(400, 300), ImageFormat::Jpeg);
        let photo = prepare(&input, "").unwrap();

        assert_eq!(photo.mime, "image/jpeg");
        assert_eq!(photo.file_name, "photo.jpg");
        assert_eq!((photo.width, photo.height), (400, 300));
        assert_eq!(
            image::guess_format(&photo.bytes).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn gif_is_converted_to_jpeg() {
        let frame = RgbaImage::from_fn(1000, 100, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 64, 255])
        });
        let mut input = Vec::new();
        {
            // The trailer is written when the encoder drops.
            let mut encoder = GifEncoder::new_with_speed(&mut input, 30);
            encoder.encode_frame(Frame::new(frame)).unwrap();
        }

        let photo = prepare(&input, "neto.gif").unwrap();

        assert_eq!(photo.mime, "image/jpeg");
        assert_eq!((photo.width, photo.height), (800, 80));
        assert_eq!(
            image::guess_format(&photo.bytes).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn webp_and_bmp_are_converted_to_jpeg() {
        for format in [ImageFormat::WebP, ImageFormat::Bmp] {
            let input = encode(&gradient(120, 90), format);

            let photo = prepare(&input, "foto").unwrap();

            assert_eq!(photo.mime, "image/jpeg", "{format:?}");
            assert_eq!((photo.width, photo.height), (120, 90), "{format:?}");
        }
    }

    /// Inserts an APP1 segment tagging the JPEG with EXIF `orientation`.
    fn with_exif_orientation(jpeg: &[u8], orientation: u8) -> Vec<u8> {
        let mut exif = b"Exif\0\0".to_vec();
        // Big-endian TIFF header with the first IFD at offset 8.
        exif.extend_from_slice(b"MM\0\x2a\0\0\0\x08");
        // One entry: tag 0x0112, type SHORT, count 1, then the value.
        exif.extend_from_slice(&[0x00, 0x01]);
        exif.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        exif.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
        exif.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let length = (exif.len() + 2) as u16;
        let mut tagged = jpeg[..2].to_vec();
        tagged.extend_from_slice(&[0xff, 0xe1]);
        tagged.extend_from_slice(&length.to_be_bytes());
        tagged.extend_from_slice(&exif);
        tagged.extend_from_slice(&jpeg[2..]);
        tagged
    }

    #[test]
    fn exif_rotation_is_applied_before_resizing() {
        let sideways = encode(&gradient(40, 20), ImageFormat::Jpeg);
        let input = with_exif_orientation(&sideways, 6);

        let photo = prepare(&input, "retrato.jpg").unwrap();

        assert_eq!((photo.width, photo.height), (20, 40));
        let decoded = image::load_from_memory(&photo.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (20, 40));
    }

    #[test]
    fn garbage_is_a_photo_error() {
        assert!(matches!(
            prepare(b"definitely not an image", "x.png"),
            Err(CantinhoError::Photo(_))
        ));
    }

    #[test]
    fn incompressible_png_is_rejected_as_too_large() {
        let mut state: u32 = 0x1234_5678;
        let noise = RgbImage::from_fn(800, 800, |_, _| {
            let mut next = || {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 0xff) as u8
            };
            image::Rgb([next(), next(), next()])
        });
        let input = encode(&noise, ImageFormat::Png);

        match prepare(&input, "noise.png") {
            Err(CantinhoError::PhotoTooLarge { size, limit }) => {
                assert_eq!(limit, MAX_PHOTO_BYTES);
                assert!(size > MAX_PHOTO_BYTES);
            }
            other => panic!("expected PhotoTooLarge, got {other:?}"),
        }
    }
}
