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

//! A headless GPU context that records what it is asked to do.

#![allow(dead_code)]

use piet_glyph_cache::piet::{ImageFormat, InterpolationMode};
use piet_glyph_cache::{BitmapFont, Font, GlyphImage, GpuContext, Glyph, RepeatStrategy};

use std::fmt;
use std::rc::{Rc, Weak};

/// Install a subscriber so that `tracing` output shows up in failing tests.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// A texture write seen by the [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Full {
        texture: u32,
        size: (u32, u32),
        format: ImageFormat,
        len: usize,
    },
    Sub {
        texture: u32,
        offset: (u32, u32),
        size: (u32, u32),
        format: ImageFormat,
        len: usize,
    },
}

#[derive(Debug)]
pub struct TextureError;

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("out of texture memory")
    }
}

impl std::error::Error for TextureError {}

/// Records texture operations instead of talking to a GPU.
#[derive(Default)]
pub struct Recorder {
    /// What `max_texture_size` reports.
    pub max_size: (u32, u32),

    /// Make `create_texture` fail.
    pub fail_textures: bool,

    /// Every write so far.
    pub writes: Vec<Write>,

    /// The repeat strategy of every texture created so far.
    pub repeats: Vec<RepeatStrategy>,

    /// Every texture ever created, to check which ones are still alive.
    textures: Vec<Weak<u32>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            max_size: (4096, 4096),
            ..Default::default()
        }
    }

    pub fn created_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures
            .iter()
            .filter(|texture| texture.upgrade().is_some())
            .count()
    }
}

impl GpuContext for Recorder {
    type Device = ();
    type Queue = ();
    type Texture = Rc<u32>;
    type Error = TextureError;

    fn create_texture(
        &mut self,
        _device: &(),
        _interpolation: InterpolationMode,
        repeat: RepeatStrategy,
    ) -> Result<Rc<u32>, TextureError> {
        if self.fail_textures {
            return Err(TextureError);
        }

        self.repeats.push(repeat);

        let texture = Rc::new(self.textures.len() as u32);
        self.textures.push(Rc::downgrade(&texture));
        Ok(texture)
    }

    fn write_texture(
        &mut self,
        _device: &(),
        _queue: &(),
        texture: &Rc<u32>,
        size: (u32, u32),
        format: ImageFormat,
        data: Option<&[u8]>,
    ) {
        self.writes.push(Write::Full {
            texture: **texture,
            size,
            format,
            len: data.map_or(0, |data| data.len()),
        });
    }

    fn write_subtexture(
        &mut self,
        _device: &(),
        _queue: &(),
        texture: &Rc<u32>,
        offset: (u32, u32),
        size: (u32, u32),
        format: ImageFormat,
        data: &[u8],
    ) {
        self.writes.push(Write::Sub {
            texture: **texture,
            offset,
            size,
            format,
            len: data.len(),
        });
    }

    fn max_texture_size(&mut self, _device: &()) -> (u32, u32) {
        self.max_size
    }
}

/// A font where every glyph is a solid block of one coverage value.
pub fn solid_font(glyphs: &[(u32, u32, u32, u8)]) -> BitmapFont {
    let mut font = BitmapFont::new();

    for &(code, width, height, value) in glyphs {
        font.insert(
            Glyph::new(code, width, height),
            vec![value; (width * height) as usize],
        )
        .unwrap();
    }

    font
}

/// Wraps a font and remembers which glyphs it was asked to draw.
pub struct CountingFont {
    pub inner: BitmapFont,
    pub rendered: Vec<u32>,
}

impl CountingFont {
    pub fn new(inner: BitmapFont) -> Self {
        Self {
            inner,
            rendered: Vec::new(),
        }
    }
}

impl Font for CountingFont {
    type Error = <BitmapFont as Font>::Error;

    fn render_glyph(
        &mut self,
        glyph: &Glyph,
        image: &mut GlyphImage,
        x: u32,
        y: u32,
    ) -> Result<(), Self::Error> {
        self.rendered.push(glyph.code());
        self.inner.render_glyph(glyph, image, x, y)
    }
}
