//! Minimal 8-bit indexed BMP reader and writer.
//!
//! Only the layout the converter itself produces is handled: BITMAPINFOHEADER
//! or larger, 8 bits per pixel, no compression, bottom-up rows padded to four
//! bytes, non-negative dimensions. The color table is written from the
//! container palette but ignored on read, since the sidecar carries the
//! authoritative palettes.

use thiserror::Error;

use crate::constants::{
    BMP_FILE_HEADER_SIZE, BMP_INFO_HEADER_SIZE, BMP_MAGIC, BMP_PIXEL_OFFSET, BMP_RESERVED1,
    BMP_RESERVED2, MAX_FRAME_PIXELS,
};
use crate::image::color::PaletteTable;
use crate::image::frame::Frame;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BitmapError {
    #[error("missing BM signature")]
    InvalidSignature,
    #[error("unexpected end of bitmap data")]
    UnexpectedEof,
    #[error("info header of {0} bytes is not supported")]
    UnsupportedHeader(u32),
    #[error("{0} bits per pixel is not supported, only 8")]
    UnsupportedBitDepth(u16),
    #[error("compression type {0} is not supported, only uncompressed")]
    UnsupportedCompression(u32),
    #[error("dimensions {width}x{height} are not supported")]
    InvalidDimensions { width: i32, height: i32 },
}

/// Row length in bytes, padded to a multiple of four.
pub fn row_stride(width: usize) -> usize {
    (width + 3) & !3
}

/// Writes `frame` as an 8-bit indexed BMP using `palette` as its color table.
pub fn encode_bmp(frame: &Frame, palette: &PaletteTable) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let stride = row_stride(width);
    let pixel_data_size = stride * height;
    let file_size = BMP_PIXEL_OFFSET + pixel_data_size;

    let mut out = Vec::with_capacity(file_size);

    // File header (14 bytes)
    out.extend_from_slice(&BMP_MAGIC);
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&BMP_RESERVED1.to_le_bytes());
    out.extend_from_slice(&BMP_RESERVED2.to_le_bytes());
    out.extend_from_slice(&(BMP_PIXEL_OFFSET as u32).to_le_bytes());

    // Info header (BITMAPINFOHEADER, 40 bytes)
    out.extend_from_slice(&(BMP_INFO_HEADER_SIZE as u32).to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes()); // positive = bottom-up
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&8u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    out.extend_from_slice(&0i32.to_le_bytes()); // h resolution
    out.extend_from_slice(&0i32.to_le_bytes()); // v resolution
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors

    palette.write_bytes(&mut out);

    // The grid is already bottom-up, same as the file.
    let pad_bytes = stride - width;
    for row in 0..frame.height() {
        out.extend_from_slice(frame.row(row));
        out.extend(std::iter::repeat(0u8).take(pad_bytes));
    }

    out
}

fn bytes_at<const N: usize>(data: &[u8], pos: usize) -> Result<[u8; N], BitmapError> {
    data.get(pos..pos + N)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(BitmapError::UnexpectedEof)
}

fn u16_at(data: &[u8], pos: usize) -> Result<u16, BitmapError> {
    bytes_at(data, pos).map(u16::from_le_bytes)
}

fn u32_at(data: &[u8], pos: usize) -> Result<u32, BitmapError> {
    bytes_at(data, pos).map(u32::from_le_bytes)
}

fn i32_at(data: &[u8], pos: usize) -> Result<i32, BitmapError> {
    bytes_at(data, pos).map(i32::from_le_bytes)
}

/// Reads an 8-bit indexed BMP into a frame of the bitmap's size.
///
/// The frame's anchor and offset are left at zero.
pub fn decode_bmp(data: &[u8]) -> Result<Frame, BitmapError> {
    if data.get(0..2) != Some(&BMP_MAGIC[..]) {
        return Err(BitmapError::InvalidSignature);
    }
    let pixel_offset = u32_at(data, 10)? as usize;

    let info = BMP_FILE_HEADER_SIZE;
    let info_size = u32_at(data, info)?;
    if (info_size as usize) < BMP_INFO_HEADER_SIZE {
        return Err(BitmapError::UnsupportedHeader(info_size));
    }
    let width = i32_at(data, info + 4)?;
    let height = i32_at(data, info + 8)?;
    let bit_count = u16_at(data, info + 14)?;
    let compression = u32_at(data, info + 16)?;

    if bit_count != 8 {
        return Err(BitmapError::UnsupportedBitDepth(bit_count));
    }
    if compression != 0 {
        return Err(BitmapError::UnsupportedCompression(compression));
    }
    // Zero is allowed: an empty frame is valid in a container and is written
    // out as-is.
    if width < 0
        || height < 0
        || (width as usize).saturating_mul(height as usize) > MAX_FRAME_PIXELS
    {
        return Err(BitmapError::InvalidDimensions { width, height });
    }

    let mut frame = Frame::new(width as u32, height as u32);
    let w = width as usize;
    let stride = row_stride(w);

    // The last row's padding is not required to be present.
    for row in 0..frame.height() {
        let start = pixel_offset + row as usize * stride;
        let src = data.get(start..start + w).ok_or(BitmapError::UnexpectedEof)?;
        frame.row_mut(row).copy_from_slice(src);
    }

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::color::Color;

    fn sample_frame() -> Frame {
        let mut frame = Frame::new(3, 2);
        frame.row_mut(0).copy_from_slice(&[1, 2, 3]);
        frame.row_mut(1).copy_from_slice(&[4, 5, 6]);
        frame
    }

    #[test]
    fn test_bmp_header_fields() {
        let mut palette = PaletteTable::default();
        palette.colors_mut()[1] = Color::new(10, 20, 30, 0);
        let encoded = encode_bmp(&sample_frame(), &palette);

        assert_eq!(&encoded[0..2], b"BM");
        assert_eq!(u32_at(&encoded, 2).unwrap() as usize, encoded.len());
        assert_eq!(u16_at(&encoded, 6).unwrap(), 28020);
        assert_eq!(u16_at(&encoded, 8).unwrap(), 115);
        assert_eq!(u32_at(&encoded, 10).unwrap(), 1078);
        assert_eq!(u32_at(&encoded, 14).unwrap(), 40);
        assert_eq!(i32_at(&encoded, 18).unwrap(), 3);
        assert_eq!(i32_at(&encoded, 22).unwrap(), 2);
        assert_eq!(u16_at(&encoded, 28).unwrap(), 8);
        assert_eq!(&encoded[58..62], &[10, 20, 30, 0]);
        assert_eq!(encoded.len(), 1078 + 2 * 4);
    }

    #[test]
    fn test_bmp_rows_padded_bottom_up() {
        let encoded = encode_bmp(&sample_frame(), &PaletteTable::default());
        assert_eq!(&encoded[1078..], &[1, 2, 3, 0, 4, 5, 6, 0]);
    }

    #[test]
    fn test_bmp_roundtrip() {
        let mut frame = Frame::new(5, 3);
        for (i, p) in frame.pixels_mut().iter_mut().enumerate() {
            *p = (i * 17) as u8;
        }
        let decoded = decode_bmp(&encode_bmp(&frame, &PaletteTable::grayscale())).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_bmp_honors_pixel_offset() {
        let mut encoded = encode_bmp(&sample_frame(), &PaletteTable::default());
        // Shift the pixel data by 4 bytes and point the header at it.
        for _ in 0..4 {
            encoded.insert(1078, 0xEE);
        }
        encoded[10..14].copy_from_slice(&1082u32.to_le_bytes());
        assert_eq!(decode_bmp(&encoded).unwrap(), sample_frame());
    }

    #[test]
    fn test_bmp_rejects_24_bit() {
        let mut encoded = encode_bmp(&sample_frame(), &PaletteTable::default());
        encoded[28..30].copy_from_slice(&24u16.to_le_bytes());
        assert_eq!(
            decode_bmp(&encoded),
            Err(BitmapError::UnsupportedBitDepth(24))
        );
    }

    #[test]
    fn test_bmp_rejects_rle() {
        let mut encoded = encode_bmp(&sample_frame(), &PaletteTable::default());
        encoded[30..34].copy_from_slice(&1u32.to_le_bytes());
        assert_eq!(
            decode_bmp(&encoded),
            Err(BitmapError::UnsupportedCompression(1))
        );
    }

    #[test]
    fn test_bmp_rejects_top_down() {
        let mut encoded = encode_bmp(&sample_frame(), &PaletteTable::default());
        encoded[22..26].copy_from_slice(&(-2i32).to_le_bytes());
        assert_eq!(
            decode_bmp(&encoded),
            Err(BitmapError::InvalidDimensions {
                width: 3,
                height: -2
            })
        );
    }

    #[test]
    fn test_bmp_empty_frames_roundtrip() {
        for (w, h) in [(0, 0), (0, 3), (4, 0)] {
            let frame = Frame::new(w, h);
            let encoded = encode_bmp(&frame, &PaletteTable::default());
            assert_eq!(encoded.len(), 1078);
            assert_eq!(decode_bmp(&encoded).unwrap(), frame);
        }
    }

    #[test]
    fn test_bmp_rejects_negative_width() {
        let mut encoded = encode_bmp(&sample_frame(), &PaletteTable::default());
        encoded[18..22].copy_from_slice(&(-3i32).to_le_bytes());
        assert_eq!(
            decode_bmp(&encoded),
            Err(BitmapError::InvalidDimensions {
                width: -3,
                height: 2
            })
        );
    }

    #[test]
    fn test_bmp_rejects_bad_signature() {
        assert_eq!(decode_bmp(b"PNG"), Err(BitmapError::InvalidSignature));
    }

    #[test]
    fn test_bmp_truncated_pixels() {
        let encoded = encode_bmp(&sample_frame(), &PaletteTable::default());
        assert_eq!(
            decode_bmp(&encoded[..1078 + 5]),
            Err(BitmapError::UnexpectedEof)
        );
        // Missing padding on the last row is fine.
        assert!(decode_bmp(&encoded[..1078 + 7]).is_ok());
    }
}
