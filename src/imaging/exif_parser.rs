//! Minimal EXIF reader for the IFD0 `Orientation` tag (0x0112).
//!
//! Locates the TIFF-structured EXIF block in:
//! - JPEG: APP1 segment starting with `Exif\0\0`
//! - PNG: `eXIf` chunk
//! - WebP: RIFF `EXIF` chunk (with or without the `Exif\0\0` prefix)
//! - raw TIFF data (`II*\0` / `MM\0*`)
//!
//! Any parse failure yields 0 ("no correction"). Metadata is never fatal.

const EXIF_HEADER: &[u8] = b"Exif\0\0";
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const ORIENTATION_TAG: u16 = 0x0112;
const TIFF_SHORT: u16 = 3;

/// Orientation tag (1-8) of an encoded image, or 0 when absent or invalid.
pub fn read_orientation(data: &[u8]) -> u16 {
    find_tiff_block(data)
        .and_then(orientation_from_tiff)
        .filter(|o| (1..=8).contains(o))
        .unwrap_or(0)
}

fn find_tiff_block(data: &[u8]) -> Option<&[u8]> {
    if data.starts_with(&[0xFF, 0xD8]) {
        find_jpeg_exif(data)
    } else if data.starts_with(PNG_SIGNATURE) {
        find_png_exif(data)
    } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(&b"WEBP"[..]) {
        find_webp_exif(data)
    } else if data.starts_with(b"II") || data.starts_with(b"MM") {
        Some(data)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Container scanning
// ---------------------------------------------------------------------------

/// TIFF bytes inside a JPEG's APP1 `Exif` segment.
fn find_jpeg_exif(data: &[u8]) -> Option<&[u8]> {
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        // Fill bytes before a marker
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // SOS: entropy-coded data follows, no more metadata
        if marker == 0xDA || marker == 0xD9 {
            return None;
        }
        // Markers without a length field
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }

        let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if seg_len < 2 {
            return None;
        }
        let seg_start = pos + 4;
        let seg_end = (pos + 2 + seg_len).min(data.len());

        if marker == 0xE1 {
            if let Some(tiff) = data
                .get(seg_start..seg_end)
                .and_then(|s| s.strip_prefix(EXIF_HEADER))
            {
                return Some(tiff);
            }
        }
        pos += 2 + seg_len;
    }
    None
}

/// Payload of a PNG `eXIf` chunk.
///
/// Chunk layout: length (u32 BE), type (4), data, CRC (4).
fn find_png_exif(data: &[u8]) -> Option<&[u8]> {
    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= data.len() {
        let len = u32::from_be_bytes(data[pos..pos + 4].try_into().ok()?) as usize;
        let kind = &data[pos + 4..pos + 8];
        let body = data.get(pos + 8..pos + 8 + len)?;
        match kind {
            b"eXIf" => return Some(body.strip_prefix(EXIF_HEADER).unwrap_or(body)),
            b"IEND" => return None,
            _ => {}
        }
        pos += 12 + len;
    }
    None
}

/// Payload of a WebP `EXIF` chunk.
///
/// RIFF chunk layout: FourCC (4), size (u32 LE), data, pad to even.
fn find_webp_exif(data: &[u8]) -> Option<&[u8]> {
    let mut pos = 12;
    while pos + 8 <= data.len() {
        let kind = &data[pos..pos + 4];
        let len = u32::from_le_bytes(data[pos + 4..pos + 8].try_into().ok()?) as usize;
        let body = data.get(pos + 8..pos + 8 + len)?;
        if kind == b"EXIF" {
            return Some(body.strip_prefix(EXIF_HEADER).unwrap_or(body));
        }
        pos += 8 + len + (len % 2);
    }
    None
}

// ---------------------------------------------------------------------------
// TIFF: IFD0 walk
// ---------------------------------------------------------------------------

/// Byte-order aware reader over a TIFF block. Out-of-range reads are `None`.
struct TiffReader<'a> {
    data: &'a [u8],
    big_endian: bool,
}

impl<'a> TiffReader<'a> {
    fn new(data: &'a [u8]) -> Option<Self> {
        let big_endian = match data.get(0..2)? {
            b"MM" => true,
            b"II" => false,
            _ => return None,
        };
        let reader = Self { data, big_endian };
        // TIFF magic (42)
        (reader.u16_at(2)? == 42).then_some(reader)
    }

    fn u16_at(&self, offset: usize) -> Option<u16> {
        let bytes: [u8; 2] = self.data.get(offset..offset.checked_add(2)?)?.try_into().ok()?;
        Some(if self.big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        })
    }

    fn u32_at(&self, offset: usize) -> Option<u32> {
        let bytes: [u8; 4] = self.data.get(offset..offset.checked_add(4)?)?.try_into().ok()?;
        Some(if self.big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        })
    }
}

/// Orientation value from IFD0 of a TIFF block.
///
/// IFD entry layout (12 bytes): tag (2), type (2), count (4), value/offset (4).
/// A single SHORT is stored left-justified in the value field.
fn orientation_from_tiff(data: &[u8]) -> Option<u16> {
    let tiff = TiffReader::new(data)?;
    let ifd_offset = tiff.u32_at(4)? as usize;
    let entry_count = tiff.u16_at(ifd_offset)? as usize;

    (0..entry_count)
        .map(|i| ifd_offset + 2 + i * 12)
        .find(|&entry| tiff.u16_at(entry) == Some(ORIENTATION_TAG))
        .and_then(|entry| {
            if tiff.u16_at(entry + 2)? != TIFF_SHORT {
                return None;
            }
            tiff.u16_at(entry + 8)
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal TIFF block with a single IFD0 Orientation entry.
    pub(crate) fn tiff_with_orientation(orientation: u16, big_endian: bool) -> Vec<u8> {
        let u16b = |v: u16| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        let u32b = |v: u32| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };

        let mut tiff = Vec::new();
        tiff.extend_from_slice(if big_endian { b"MM" } else { b"II" });
        tiff.extend_from_slice(&u16b(42));
        tiff.extend_from_slice(&u32b(8));
        tiff.extend_from_slice(&u16b(1));
        tiff.extend_from_slice(&u16b(ORIENTATION_TAG));
        tiff.extend_from_slice(&u16b(TIFF_SHORT));
        tiff.extend_from_slice(&u32b(1));
        tiff.extend_from_slice(&u16b(orientation));
        tiff.extend_from_slice(&[0, 0]);
        tiff.extend_from_slice(&u32b(0));
        tiff
    }

    /// Insert an APP1 Exif segment right after the SOI marker of a JPEG.
    pub(crate) fn jpeg_with_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut payload = EXIF_HEADER.to_vec();
        payload.extend(tiff_with_orientation(orientation, true));

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        out.extend(payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn reads_little_and_big_endian_tiff() {
        assert_eq!(read_orientation(&tiff_with_orientation(6, false)), 6);
        assert_eq!(read_orientation(&tiff_with_orientation(8, true)), 8);
    }

    #[test]
    fn out_of_range_orientation_is_zero() {
        assert_eq!(read_orientation(&tiff_with_orientation(9, false)), 0);
        assert_eq!(read_orientation(&tiff_with_orientation(0, false)), 0);
    }

    #[test]
    fn reads_jpeg_app1() {
        // SOI, APP0 (JFIF stub), then EOI; the APP1 goes right after SOI.
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xD9];
        assert_eq!(read_orientation(&jpeg_with_orientation(&jpeg, 3)), 3);
    }

    #[test]
    fn jpeg_without_exif_is_zero() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xDA, 0x00];
        assert_eq!(read_orientation(&jpeg), 0);
    }

    #[test]
    fn reads_png_exif_chunk() {
        let tiff = tiff_with_orientation(6, false);
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(&(tiff.len() as u32).to_be_bytes());
        png.extend_from_slice(b"eXIf");
        png.extend_from_slice(&tiff);
        png.extend_from_slice(&[0, 0, 0, 0]);
        assert_eq!(read_orientation(&png), 6);
    }

    #[test]
    fn reads_webp_exif_chunk_with_header() {
        let mut body = EXIF_HEADER.to_vec();
        body.extend(tiff_with_orientation(8, false));
        let mut webp = b"RIFF\0\0\0\0WEBP".to_vec();
        webp.extend_from_slice(b"VP8X");
        webp.extend_from_slice(&10u32.to_le_bytes());
        webp.extend_from_slice(&[0; 10]);
        webp.extend_from_slice(b"EXIF");
        webp.extend_from_slice(&(body.len() as u32).to_le_bytes());
        webp.extend_from_slice(&body);
        assert_eq!(read_orientation(&webp), 8);
    }

    #[test]
    fn garbage_and_truncated_input_is_zero() {
        assert_eq!(read_orientation(&[]), 0);
        assert_eq!(read_orientation(b"GIF89a"), 0);
        assert_eq!(read_orientation(b"II*\0\xff\xff\xff\xff"), 0);
        let tiff = tiff_with_orientation(6, false);
        assert_eq!(read_orientation(&tiff[..12]), 0);
    }
}
