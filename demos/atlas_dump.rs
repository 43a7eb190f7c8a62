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


//! Fill a glyph cache with generated glyphs and save the stacked pages as a PNG.
//!
//! Run with `cargo run --example atlas_dump -- [output.png]`.

use piet_glyph_cache::piet::{ImageFormat, InterpolationMode};
use piet_glyph_cache::{
    BitmapFont, CacheConfig, ColorFormat, Glyph, GlyphCache, GpuContext, RepeatStrategy,
};

use std::convert::Infallible;
use std::env;

/// A context with no GPU behind it. Textures are just counters.
struct Headless {
    textures: usize,
    bytes_uploaded: usize,
}

impl GpuContext for Headless {
    type Device = ();
    type Queue = ();
    type Texture = usize;
    type Error = Infallible;

    fn create_texture(
        &mut self,
        _device: &(),
        _interpolation: InterpolationMode,
        _repeat: RepeatStrategy,
    ) -> Result<usize, Infallible> {
        self.textures += 1;
        Ok(self.textures - 1)
    }

    fn write_texture(
        &mut self,
        _device: &(),
        _queue: &(),
        _texture: &usize,
        _size: (u32, u32),
        _format: ImageFormat,
        data: Option<&[u8]>,
    ) {
        self.bytes_uploaded += data.map_or(0, |data| data.len());
    }

    fn write_subtexture(
        &mut self,
        _device: &(),
        _queue: &(),
        _texture: &usize,
        _offset: (u32, u32),
        _size: (u32, u32),
        _format: ImageFormat,
        data: &[u8],
    ) {
        self.bytes_uploaded += data.len();
    }

    fn max_texture_size(&mut self, _device: &()) -> (u32, u32) {
        (256, 256)
    }
}

/// A filled circle with a soft edge.
fn disc(size: u32) -> Vec<u8> {
    let radius = size as f32 / 2.0;

    (0..size * size)
        .map(|i| {
            let (x, y) = ((i % size) as f32 + 0.5, (i / size) as f32 + 0.5);
            let distance = ((x - radius).powi(2) + (y - radius).powi(2)).sqrt();
            ((radius - distance + 0.5).clamp(0.0, 1.0) * 255.0) as u8
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let output = env::args().nth(1).unwrap_or_else(|| "atlas.png".into());

    let mut font = BitmapFont::new();
    for code in 0x21..0x7F {
        let size = 6 + (code * 7) % 40;
        font.insert(Glyph::new(code, size, size), disc(size))?;
    }

    let mut gpu = Headless {
        textures: 0,
        bytes_uploaded: 0,
    };
    let mut cache = GlyphCache::for_context(
        &mut gpu,
        &(),
        CacheConfig {
            color_format: ColorFormat::A8,
            page_width: 128,
            initial_page_height: 32,
            ..Default::default()
        },
    )?;

    for code in 0x21..0x7F {
        let mut glyph = font.glyph(code).ok_or("glyph missing from font")?;
        cache.place_glyph(&mut gpu, &(), &mut font, &mut glyph)?;
    }

    let uploaded = cache.flush(&mut gpu, &(), &());
    println!(
        "{} pages, {} uploaded, {} bytes",
        cache.page_count(),
        uploaded,
        gpu.bytes_uploaded
    );

    let composite = cache.image().ok_or("cache has no pages")?;
    let (width, height) = composite.size();

    let png = image::RgbaImage::from_fn(width, height, |x, y| {
        let color = composite
            .pixel(x, y)
            .unwrap_or_else(|| tiny_skia::ColorU8::from_rgba(0, 0, 0, 0));
        image::Rgba([color.red(), color.green(), color.blue(), color.alpha()])
    });
    png.save(&output)?;

    println!("wrote {}x{} atlas to {}", width, height, output);
    Ok(())
}
