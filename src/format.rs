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

//! Pixel formats for glyph pages.

use std::error::Error as StdError;
use std::fmt;

use tiny_skia::ColorU8;

/// The pixel format used to store a glyph page.
///
/// The numeric value of each variant is the one accepted by the `TryFrom<u32>` impl.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum ColorFormat {
    /// One byte of coverage per pixel.
    ///
    /// This is what anti-aliased glyph masks need, so it is the default.
    #[default]
    A8 = 0,

    /// Three bytes per pixel, no alpha.
    Rgb888 = 1,

    /// Five bits of red, six of green and five of blue, no alpha.
    Rgb565 = 2,

    /// Five bits per color channel and a single alpha bit.
    Rgba5551 = 3,

    /// Four bits per channel.
    Rgba4444 = 4,

    /// One byte per channel.
    Rgba8888 = 5,
}

impl ColorFormat {
    /// The number of bytes a single pixel takes up.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::A8 => 1,
            Self::Rgb565 | Self::Rgba5551 | Self::Rgba4444 => 2,
            Self::Rgb888 => 3,
            Self::Rgba8888 => 4,
        }
    }

    /// Whether this format stores an alpha channel.
    pub fn has_alpha(self) -> bool {
        !matches!(self, Self::Rgb888 | Self::Rgb565)
    }

    /// Read one pixel out of `bytes`, which must be `bytes_per_pixel` long.
    ///
    /// Coverage-only pixels decode to white with that coverage as alpha.
    pub fn decode(self, bytes: &[u8]) -> ColorU8 {
        match self {
            Self::A8 => ColorU8::from_rgba(0xFF, 0xFF, 0xFF, bytes[0]),
            Self::Rgb888 => ColorU8::from_rgba(bytes[0], bytes[1], bytes[2], 0xFF),
            Self::Rgba8888 => ColorU8::from_rgba(bytes[0], bytes[1], bytes[2], bytes[3]),
            Self::Rgb565 => {
                let v = u16::from_le_bytes([bytes[0], bytes[1]]);
                ColorU8::from_rgba(
                    expand5((v >> 11) & 0x1F),
                    expand6((v >> 5) & 0x3F),
                    expand5(v & 0x1F),
                    0xFF,
                )
            }
            Self::Rgba5551 => {
                let v = u16::from_le_bytes([bytes[0], bytes[1]]);
                ColorU8::from_rgba(
                    expand5((v >> 11) & 0x1F),
                    expand5((v >> 6) & 0x1F),
                    expand5((v >> 1) & 0x1F),
                    if v & 1 != 0 { 0xFF } else { 0 },
                )
            }
            Self::Rgba4444 => {
                let v = u16::from_le_bytes([bytes[0], bytes[1]]);
                ColorU8::from_rgba(
                    expand4((v >> 12) & 0xF),
                    expand4((v >> 8) & 0xF),
                    expand4((v >> 4) & 0xF),
                    expand4(v & 0xF),
                )
            }
        }
    }

    /// Write one pixel into `bytes`, which must be `bytes_per_pixel` long.
    pub fn encode(self, color: ColorU8, bytes: &mut [u8]) {
        let (r, g, b, a) = (
            color.red() as u16,
            color.green() as u16,
            color.blue() as u16,
            color.alpha() as u16,
        );

        match self {
            Self::A8 => bytes[0] = color.alpha(),
            Self::Rgb888 => bytes.copy_from_slice(&[color.red(), color.green(), color.blue()]),
            Self::Rgba8888 => bytes.copy_from_slice(&[
                color.red(),
                color.green(),
                color.blue(),
                color.alpha(),
            ]),
            Self::Rgb565 => {
                let v = ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3);
                bytes.copy_from_slice(&v.to_le_bytes());
            }
            Self::Rgba5551 => {
                let v = ((r >> 3) << 11) | ((g >> 3) << 6) | ((b >> 3) << 1) | (a >> 7);
                bytes.copy_from_slice(&v.to_le_bytes());
            }
            Self::Rgba4444 => {
                let v = ((r >> 4) << 12) | ((g >> 4) << 8) | ((b >> 4) << 4) | (a >> 4);
                bytes.copy_from_slice(&v.to_le_bytes());
            }
        }
    }

    /// The format that pixels of this format are uploaded to the GPU as.
    ///
    /// Formats the GPU backend can't take directly are expanded to separate-alpha RGBA.
    pub fn upload_format(self) -> piet::ImageFormat {
        match self {
            Self::Rgb888 => piet::ImageFormat::Rgb,
            _ => piet::ImageFormat::RgbaSeparate,
        }
    }
}

impl TryFrom<u32> for ColorFormat {
    type Error = InvalidColorFormat;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::A8,
            1 => Self::Rgb888,
            2 => Self::Rgb565,
            3 => Self::Rgba5551,
            4 => Self::Rgba4444,
            5 => Self::Rgba8888,
            value => return Err(InvalidColorFormat(value)),
        })
    }
}

impl From<ColorFormat> for u32 {
    fn from(format: ColorFormat) -> Self {
        format as u32
    }
}

/// A numeric color format that doesn't name any [`ColorFormat`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InvalidColorFormat(pub u32);

impl fmt::Display for InvalidColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a valid color format", self.0)
    }
}

impl StdError for InvalidColorFormat {}

fn expand4(v: u16) -> u8 {
    (v * 17) as u8
}

fn expand5(v: u16) -> u8 {
    ((v << 3) | (v >> 2)) as u8
}

fn expand6(v: u16) -> u8 {
    ((v << 2) | (v >> 4)) as u8
}
