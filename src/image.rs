// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `piet-glyph-cache`.
//
// `piet-glyph-cache` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `piet-glyph-cache` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `piet-glyph-cache`. If not, see <https://www.gnu.org/licenses/>.

//! The CPU-side raster image behind every glyph page.

use super::format::ColorFormat;

use piet::Error as Pierror;
use tiny_skia::{ColorU8, Pixmap};

use std::fmt;

/// A raster image stored in one of the [`ColorFormat`]s.
///
/// Rows are tightly packed, top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct GlyphImage {
    /// The width of the image, in pixels.
    width: u32,

    /// The height of the image, in pixels.
    height: u32,

    /// The format of `data`.
    format: ColorFormat,

    /// The pixel data.
    data: Vec<u8>,
}

impl fmt::Debug for GlyphImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl GlyphImage {
    /// Create a new, fully transparent image.
    pub fn new(width: u32, height: u32, format: ColorFormat) -> Self {
        Self {
            width,
            height,
            format,
            data: vec![0; width as usize * height as usize * format.bytes_per_pixel()],
        }
    }

    /// Create an image around existing pixel data.
    pub fn from_data(
        width: u32,
        height: u32,
        format: ColorFormat,
        data: Vec<u8>,
    ) -> Result<Self, Pierror> {
        if data.len() != width as usize * height as usize * format.bytes_per_pixel() {
            return Err(Pierror::InvalidInput);
        }

        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// The width of the image.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height of the image.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The width and height of the image.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The pixel format of the image.
    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// The raw pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride() + x as usize * self.format.bytes_per_pixel()
    }

    /// Read a single pixel, or `None` if it is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<ColorU8> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let start = self.offset(x, y);
        let bpp = self.format.bytes_per_pixel();
        Some(self.format.decode(&self.data[start..start + bpp]))
    }

    /// Write a single pixel. Out of bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: ColorU8) {
        if x >= self.width || y >= self.height {
            return;
        }

        let start = self.offset(x, y);
        let bpp = self.format.bytes_per_pixel();
        self.format.encode(color, &mut self.data[start..start + bpp]);
    }

    /// Write a coverage mask of `width * height` bytes at `(x, y)`.
    ///
    /// Coverage becomes white with that coverage as alpha, which for [`ColorFormat::A8`] is
    /// a straight copy.
    pub fn write_coverage(&mut self, x: u32, y: u32, width: u32, height: u32, coverage: &[u8]) {
        for (row, line) in coverage
            .chunks(width.max(1) as usize)
            .take(height as usize)
            .enumerate()
        {
            for (col, &value) in line.iter().enumerate() {
                self.set_pixel(
                    x + col as u32,
                    y + row as u32,
                    ColorU8::from_rgba(0xFF, 0xFF, 0xFF, value),
                );
            }
        }
    }

    /// Copy a rectangle of `src` into this image.
    ///
    /// The rectangle is clipped against both images. Pixels are converted if the formats
    /// differ.
    #[allow(clippy::too_many_arguments)]
    pub fn copy_bits(
        &mut self,
        src: &GlyphImage,
        src_x: u32,
        src_y: u32,
        dst_x: u32,
        dst_y: u32,
        width: u32,
        height: u32,
    ) {
        let width = width
            .min(src.width.saturating_sub(src_x))
            .min(self.width.saturating_sub(dst_x));
        let height = height
            .min(src.height.saturating_sub(src_y))
            .min(self.height.saturating_sub(dst_y));

        if width == 0 || height == 0 {
            return;
        }

        if src.format == self.format {
            let row_len = width as usize * self.format.bytes_per_pixel();

            for row in 0..height {
                let from = src.offset(src_x, src_y + row);
                let to = self.offset(dst_x, dst_y + row);
                self.data[to..to + row_len].copy_from_slice(&src.data[from..from + row_len]);
            }
        } else {
            for row in 0..height {
                for col in 0..width {
                    if let Some(color) = src.pixel(src_x + col, src_y + row) {
                        self.set_pixel(dst_x + col, dst_y + row, color);
                    }
                }
            }
        }
    }

    /// Change the height of the image, keeping the rows that still fit.
    pub(crate) fn resize_height(&mut self, height: u32) {
        let len = height as usize * self.stride();
        self.data.resize(len, 0);
        self.height = height;
    }

    /// Get the pixels of a rectangle in the format they are uploaded to the GPU in.
    pub(crate) fn region_pixels(&self, offset: (u32, u32), size: (u32, u32)) -> RegionPixels {
        let (x, y) = offset;
        let (width, height) = size;

        match self.format {
            ColorFormat::Rgb888 | ColorFormat::Rgba8888 => {
                let row_len = width as usize * self.format.bytes_per_pixel();
                let mut bytes = Vec::with_capacity(row_len * height as usize);

                for row in y..y + height {
                    let start = self.offset(x, row);
                    bytes.extend_from_slice(&self.data[start..start + row_len]);
                }

                RegionPixels::Raw(bytes)
            }

            _ => {
                let mut buffer = Vec::with_capacity(width as usize * height as usize);

                for row in y..y + height {
                    for col in x..x + width {
                        let color = self
                            .pixel(col, row)
                            .unwrap_or_else(|| ColorU8::from_rgba(0, 0, 0, 0));
                        buffer.push(u32::from_ne_bytes([
                            color.red(),
                            color.green(),
                            color.blue(),
                            color.alpha(),
                        ]));
                    }
                }

                RegionPixels::Expanded(buffer)
            }
        }
    }

    /// Render this image into a premultiplied [`Pixmap`].
    ///
    /// Returns `None` for an empty image.
    pub fn to_pixmap(&self) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(self.width, self.height)?;
        let bpp = self.format.bytes_per_pixel();

        pixmap
            .pixels_mut()
            .iter_mut()
            .zip(self.data.chunks_exact(bpp))
            .for_each(|(out, input)| *out = self.format.decode(input).premultiply());

        Some(pixmap)
    }
}

/// Pixel data ready to be written into a texture.
pub(crate) enum RegionPixels {
    /// The image's own bytes.
    Raw(Vec<u8>),

    /// Pixels expanded to RGBA, one `u32` each.
    Expanded(Vec<u32>),
}

impl RegionPixels {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Raw(bytes) => bytes,
            Self::Expanded(buffer) => bytemuck::cast_slice::<_, u8>(buffer),
        }
    }
}
