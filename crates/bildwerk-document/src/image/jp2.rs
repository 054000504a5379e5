// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JPEG 2000 support.
//
// The `image` crate has no JPEG 2000 codec, so full decodes go through
// OpenJPEG via `jpeg2k`. The size filter only needs dimensions, which live in
// the `ihdr` box of a JP2 file or in the SIZ marker segment of a bare
// codestream (PDF JPXDecode streams may be either).

use std::path::Path;

use bildwerk_core::Dimensions;
use bildwerk_core::error::Result;
use image::DynamicImage;

use super::processor::unreadable;

/// JP2 signature box: length 12, type `jP  `, content `0D 0A 87 0A`.
const JP2_SIGNATURE: [u8; 12] = [
    0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20, 0x0D, 0x0A, 0x87, 0x0A,
];

/// SOC marker followed by the SIZ marker.
const CODESTREAM_START: [u8; 4] = [0xFF, 0x4F, 0xFF, 0x51];

/// Decode a JP2 file or bare codestream into a `DynamicImage`.
pub fn decode(path: &Path) -> Result<DynamicImage> {
    let data = std::fs::read(path).map_err(|err| unreadable(path, err))?;
    let image = jpeg2k::Image::from_bytes(&data).map_err(|err| unreadable(path, err))?;
    DynamicImage::try_from(&image).map_err(|err| unreadable(path, err))
}

/// Read image dimensions from JP2 or raw codestream bytes.
pub fn dimensions(data: &[u8]) -> Option<Dimensions> {
    if data.starts_with(&JP2_SIGNATURE) {
        let header = find_box(&data[JP2_SIGNATURE.len()..], b"jp2h")?;
        let ihdr = find_box(header, b"ihdr")?;
        let height = read_u32(ihdr, 0)?;
        let width = read_u32(ihdr, 4)?;
        return Some(Dimensions::new(width, height));
    }
    if data.starts_with(&CODESTREAM_START) {
        // SIZ: Lsiz(2) Rsiz(2) Xsiz(4) Ysiz(4) XOsiz(4) YOsiz(4) ...
        let siz = &data[CODESTREAM_START.len()..];
        let width = read_u32(siz, 4)?.checked_sub(read_u32(siz, 12)?)?;
        let height = read_u32(siz, 8)?.checked_sub(read_u32(siz, 16)?)?;
        return Some(Dimensions::new(width, height));
    }
    None
}

/// Contents of the first box of type `kind` at this nesting level.
fn find_box<'a>(mut data: &'a [u8], kind: &[u8; 4]) -> Option<&'a [u8]> {
    while data.len() >= 8 {
        let length = read_u32(data, 0)? as u64;
        let (header_len, box_len) = match length {
            0 => (8, data.len() as u64),
            1 => (16, read_u64(data, 8)?),
            n => (8, n),
        };
        if box_len < header_len as u64 || box_len > data.len() as u64 {
            return None;
        }
        let box_len = box_len as usize;
        if &data[4..8] == kind {
            return Some(&data[header_len..box_len]);
        }
        data = &data[box_len..];
    }
    None
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes(bytes.try_into().ok()?))
}

fn read_u64(data: &[u8], offset: usize) -> Option<u64> {
    let bytes = data.get(offset..offset + 8)?;
    Some(u64::from_be_bytes(bytes.try_into().ok()?))
}
