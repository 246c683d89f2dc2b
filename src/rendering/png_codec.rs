//! PNG decoding into [`PixelBuffer`] and encoding back out.
//!
//! Any PNG colour type and bit depth is accepted on input and normalized
//! to 8-bit RGB; alpha is dropped. Output is always 8-bit RGB, optionally
//! re-compressed with oxipng.

use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use bitdither::PixelBuffer;

use crate::error::CodecError;

/// Decode a PNG file.
pub fn load_png(path: &Path) -> Result<PixelBuffer, CodecError> {
    let file = std::fs::File::open(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(BufReader::new(file)).map_err(|message| CodecError::Decode {
        path: path.to_path_buf(),
        message,
    })
}

/// Decode PNG bytes held in memory.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
    decode(Cursor::new(bytes)).map_err(|message| CodecError::Decode {
        path: PathBuf::from("<memory>"),
        message,
    })
}

fn decode<R: Read>(reader: R) -> Result<PixelBuffer, String> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(|e| e.to_string())?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(|e| e.to_string())?;
    let data = &buf[..info.buffer_size()];

    let rgb: Vec<u8> = match info.color_type {
        png::ColorType::Rgb => data.to_vec(),
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&v| [v, v, v]).collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0]])
            .collect(),
        png::ColorType::Indexed => {
            return Err("indexed PNG was not expanded to RGB".to_string());
        }
    };

    PixelBuffer::from_rgb8(info.width as usize, info.height as usize, &rgb)
        .map_err(|e| e.to_string())
}

/// Encode as 8-bit RGB PNG.
///
/// With `optimize`, the result is re-compressed losslessly with oxipng;
/// if oxipng fails the plain encoding is returned.
pub fn encode_png(image: &PixelBuffer, optimize: bool) -> Result<Vec<u8>, CodecError> {
    let dims = (u32::try_from(image.width()), u32::try_from(image.height()));
    let (Ok(width), Ok(height)) = dims else {
        return Err(CodecError::UnsupportedDimensions {
            width: image.width(),
            height: image.height(),
        });
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        writer
            .write_image_data(&image.to_rgb8())
            .map_err(|e| CodecError::Encode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if !optimize {
        return Ok(png_bytes);
    }

    Ok(oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes))
}

/// Encode and write a PNG file.
pub fn save_png(image: &PixelBuffer, path: &Path, optimize: bool) -> Result<(), CodecError> {
    let bytes = encode_png(image, optimize)?;
    std::fs::write(path, bytes).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitdither::Rgb;

    fn encode_raw(width: u32, height: u32, color: png::ColorType, depth: png::BitDepth, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            if color == png::ColorType::Indexed {
                encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buf
    }

    #[test]
    fn test_encode_then_decode_preserves_pixels() {
        let mut image = PixelBuffer::new(3, 2);
        image.set(0, 0, Rgb::new(255, 0, 0));
        image.set(2, 1, Rgb::new(1, 2, 3));

        let bytes = encode_png(&image, false).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(decode_png(&bytes).unwrap(), image);
    }

    #[test]
    fn test_decode_grayscale() {
        let bytes = encode_raw(2, 1, png::ColorType::Grayscale, png::BitDepth::Eight, &[10, 200]);
        let image = decode_png(&bytes).unwrap();
        assert_eq!(image.pixels(), &[Rgb::gray(10), Rgb::gray(200)]);
    }

    #[test]
    fn test_decode_rgba_drops_alpha() {
        let bytes = encode_raw(1, 1, png::ColorType::Rgba, png::BitDepth::Eight, &[9, 8, 7, 0]);
        let image = decode_png(&bytes).unwrap();
        assert_eq!(image.get(0, 0), Some(Rgb::new(9, 8, 7)));
    }

    #[test]
    fn test_decode_indexed_expands_palette() {
        // 1-bit indices: pixel 0 -> red, pixel 1 -> blue
        let bytes = encode_raw(2, 1, png::ColorType::Indexed, png::BitDepth::One, &[0b0100_0000]);
        let image = decode_png(&bytes).unwrap();
        assert_eq!(image.pixels(), &[Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]);
    }

    #[test]
    fn test_decode_sixteen_bit_strips_to_eight() {
        let bytes = encode_raw(1, 1, png::ColorType::Rgb, png::BitDepth::Sixteen, &[0xAB, 0xCD, 0x12, 0x34, 0xFF, 0xFF]);
        let image = decode_png(&bytes).unwrap();
        assert_eq!(image.get(0, 0), Some(Rgb::new(0xAB, 0x12, 0xFF)));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_png(b"not a png").unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_png(Path::new("/nonexistent/input.png")).unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }));
    }

    #[test]
    fn test_optimized_output_decodes_identically() {
        let image = PixelBuffer::filled(16, 16, Rgb::gray(255));
        let plain = encode_png(&image, false).unwrap();
        let optimized = encode_png(&image, true).unwrap();
        assert_eq!(decode_png(&optimized).unwrap(), decode_png(&plain).unwrap());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.png");
        let image = PixelBuffer::filled(4, 3, Rgb::new(0, 128, 255));
        save_png(&image, &path, false).unwrap();
        assert_eq!(load_png(&path).unwrap(), image);
    }
}
