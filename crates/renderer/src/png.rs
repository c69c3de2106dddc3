//! PNG encoding for rendered figures.
//!
//! Two encoding modes:
//! - **Indexed PNG (color type 3)** when the image has at most 256 unique
//!   colors. Choropleths and boundary plots nearly always qualify.
//! - **RGBA PNG (color type 6)** otherwise.
//!
//! Palette order is the order in which colors first appear in scanline
//! order, so identical pixels always encode to identical bytes.

use geoplot_common::{PlotError, PlotResult};
use image::RgbaImage;
use rayon::prelude::*;
use std::collections::HashMap;
use std::io::Write;

/// The 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Content type of encoded figures.
pub const CONTENT_TYPE: &str = "image/png";

const MAX_PALETTE_SIZE: usize = 256;

/// Below this many pixels the palette is scanned on one thread.
const PARALLEL_THRESHOLD: usize = 4096;

type Rgba = [u8; 4];

/// Encode a rendered image, picking indexed or RGBA automatically.
pub fn encode_image(image: &RgbaImage) -> PlotResult<Vec<u8>> {
    encode_auto(image.as_raw(), image.width() as usize, image.height() as usize)
}

/// Encode RGBA bytes (4 per pixel, row-major), picking indexed or RGBA
/// automatically.
pub fn encode_auto(pixels: &[u8], width: usize, height: usize) -> PlotResult<Vec<u8>> {
    check_dimensions(pixels, width, height)?;

    match Palette::of(pixels) {
        Some(palette) => {
            let indices = palette.indices(pixels);
            encode_indexed(width, height, &palette.colors, &indices)
        }
        None => encode_rgba(pixels, width, height),
    }
}

fn check_dimensions(pixels: &[u8], width: usize, height: usize) -> PlotResult<()> {
    if width == 0 || height == 0 {
        return Err(PlotError::render(format!(
            "cannot encode empty {}x{} image",
            width, height
        )));
    }
    if pixels.len() != width * height * 4 {
        return Err(PlotError::render(format!(
            "pixel buffer holds {} bytes, expected {} for {}x{}",
            pixels.len(),
            width * height * 4,
            width,
            height
        )));
    }
    Ok(())
}

fn rgba(pixel: &[u8]) -> Rgba {
    [pixel[0], pixel[1], pixel[2], pixel[3]]
}

/// Distinct colors in first-seen scanline order.
#[derive(Debug, Default, PartialEq)]
struct Palette {
    colors: Vec<Rgba>,
    slots: HashMap<Rgba, u8>,
}

impl Palette {
    /// Palette of an image, or `None` past 256 colors.
    fn of(pixels: &[u8]) -> Option<Palette> {
        let count = pixels.len() / 4;
        if count < PARALLEL_THRESHOLD {
            return Self::scan(pixels);
        }

        // Chunks are merged in order, so the result equals a single scan.
        let chunk_size = (count / rayon::current_num_threads()).max(256) * 4;
        let parts: Vec<Option<Palette>> = pixels.par_chunks(chunk_size).map(Self::scan).collect();
        let mut palette = Palette::default();
        for part in parts {
            for color in part?.colors {
                if !palette.insert(color) {
                    return None;
                }
            }
        }
        Some(palette)
    }

    fn scan(pixels: &[u8]) -> Option<Palette> {
        let mut palette = Palette::default();
        for pixel in pixels.chunks_exact(4) {
            if !palette.insert(rgba(pixel)) {
                return None;
            }
        }
        Some(palette)
    }

    /// False when `color` is new and the palette is already full.
    fn insert(&mut self, color: Rgba) -> bool {
        if self.slots.contains_key(&color) {
            return true;
        }
        if self.colors.len() == MAX_PALETTE_SIZE {
            return false;
        }
        self.slots.insert(color, self.colors.len() as u8);
        self.colors.push(color);
        true
    }

    fn indices(&self, pixels: &[u8]) -> Vec<u8> {
        pixels
            .par_chunks_exact(4)
            .map(|pixel| self.slots.get(&rgba(pixel)).copied().unwrap_or(0))
            .collect()
    }
}

/// Encode an indexed PNG (color type 3) from palette and indices.
pub fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> PlotResult<Vec<u8>> {
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(PlotError::render(format!(
            "palette must hold 1..=256 colors, got {}",
            palette.len()
        )));
    }
    if indices.len() != width * height {
        return Err(PlotError::render(format!(
            "index buffer holds {} entries, expected {}",
            indices.len(),
            width * height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let plte: Vec<u8> = palette.iter().flat_map(|&[r, g, b, _]| [r, g, b]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    // tRNS only if any entry is translucent
    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode an RGBA PNG (color type 6).
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> PlotResult<Vec<u8>> {
    check_dimensions(pixels, width, height)?;

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));

    let idat = deflate_scanlines(pixels, width * 4, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Zlib-compress `height` rows of `row_bytes` each, every row prefixed with
/// filter type 0.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> PlotResult<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes).take(height) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    let compress_err = |e: std::io::Error| PlotError::render(format!("IDAT compression failed: {}", e));
    encoder.write_all(&uncompressed).map_err(compress_err)?;
    encoder.finish().map_err(compress_err)
}
