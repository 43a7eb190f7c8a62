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

//! Glyphs and the fonts that draw them.

use super::image::GlyphImage;

use ahash::RandomState;
use hashbrown::HashMap;

use piet::Error as Pierror;

use std::error::Error as StdError;
use std::fmt;

/// A single character's glyph, as tracked by the cache.
///
/// A glyph starts out unplaced. Placing it records the page it lives on and where on that
/// page its pixels are. Neither changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// The character this glyph draws.
    code: u32,

    /// The width of the bitmap.
    width: u32,

    /// The height of the bitmap.
    height: u32,

    /// Horizontal offset from the pen position to the bitmap's left edge.
    bearing_x: f32,

    /// Vertical offset from the baseline to the bitmap's top edge.
    bearing_y: f32,

    /// How far the pen moves after this glyph.
    advance_x: f32,

    /// The page this glyph was placed on.
    page_id: Option<usize>,

    /// How many times the cache had been cleared when this glyph was placed.
    generation: u64,

    /// The left edge of the bitmap on its page.
    src_x: u32,

    /// The top edge of the bitmap on its page.
    src_y: u32,
}

impl Glyph {
    /// Create a new, unplaced glyph with a bitmap of the given size.
    pub fn new(code: u32, width: u32, height: u32) -> Self {
        Self {
            code,
            width,
            height,
            bearing_x: 0.0,
            bearing_y: 0.0,
            advance_x: width as f32,
            page_id: None,
            generation: 0,
            src_x: 0,
            src_y: 0,
        }
    }

    /// Set the layout metrics of this glyph.
    pub fn with_metrics(mut self, bearing_x: f32, bearing_y: f32, advance_x: f32) -> Self {
        self.bearing_x = bearing_x;
        self.bearing_y = bearing_y;
        self.advance_x = advance_x;
        self
    }

    /// The character this glyph draws.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// The width of the bitmap.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height of the bitmap.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Horizontal offset from the pen position to the bitmap's left edge.
    pub fn bearing_x(&self) -> f32 {
        self.bearing_x
    }

    /// Vertical offset from the baseline to the bitmap's top edge.
    pub fn bearing_y(&self) -> f32 {
        self.bearing_y
    }

    /// How far the pen moves after this glyph.
    pub fn advance_x(&self) -> f32 {
        self.advance_x
    }

    /// The index of the page this glyph was placed on, if it has been placed.
    pub fn page_id(&self) -> Option<usize> {
        self.page_id
    }

    /// Whether this glyph has been placed in a cache.
    pub fn is_placed(&self) -> bool {
        self.page_id.is_some()
    }

    /// The left edge of the bitmap on its page.
    pub fn src_x(&self) -> u32 {
        self.src_x
    }

    /// The top edge of the bitmap on its page.
    pub fn src_y(&self) -> u32 {
        self.src_y
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn set_page_id(&mut self, page_id: usize, generation: u64) {
        assert!(
            self.page_id.is_none(),
            "glyph {} was already placed on page {:?}",
            self.code,
            self.page_id
        );
        self.page_id = Some(page_id);
        self.generation = generation;
    }

    pub(crate) fn set_src(&mut self, x: u32, y: u32) {
        self.src_x = x;
        self.src_y = y;
    }
}

/// Something that can draw glyphs into a page.
///
/// The cache never looks at the font itself; it only hands it to the page that the glyph
/// ends up on.
pub trait Font {
    /// The error type for failed rendering.
    type Error: StdError + 'static;

    /// Draw `glyph` into `image` with its top left corner at `(x, y)`.
    ///
    /// The space reserved is exactly `glyph.width()` by `glyph.height()` pixels.
    fn render_glyph(
        &mut self,
        glyph: &Glyph,
        image: &mut GlyphImage,
        x: u32,
        y: u32,
    ) -> Result<(), Self::Error>;
}

impl<F: Font + ?Sized> Font for &mut F {
    type Error = F::Error;

    fn render_glyph(
        &mut self,
        glyph: &Glyph,
        image: &mut GlyphImage,
        x: u32,
        y: u32,
    ) -> Result<(), Self::Error> {
        (**self).render_glyph(glyph, image, x, y)
    }
}

/// A font made of coverage bitmaps that were rasterized ahead of time.
#[derive(Debug)]
pub struct BitmapFont {
    glyphs: HashMap<u32, Bitmap, RandomState>,
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self {
            glyphs: HashMap::with_hasher(RandomState::new()),
        }
    }
}

#[derive(Debug)]
struct Bitmap {
    /// Metrics of the glyph, unplaced.
    glyph: Glyph,

    /// One byte of coverage per pixel.
    coverage: Vec<u8>,
}

impl BitmapFont {
    /// Create an empty font.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a glyph's bitmap to the font, replacing any previous one for the same code.
    ///
    /// `coverage` holds one byte per pixel, row by row.
    pub fn insert(&mut self, glyph: Glyph, coverage: Vec<u8>) -> Result<(), Pierror> {
        if glyph.is_placed()
            || coverage.len() != glyph.width() as usize * glyph.height() as usize
        {
            return Err(Pierror::InvalidInput);
        }

        self.glyphs.insert(glyph.code(), Bitmap { glyph, coverage });
        Ok(())
    }

    /// Get an unplaced glyph for the given character.
    pub fn glyph(&self, code: u32) -> Option<Glyph> {
        self.glyphs.get(&code).map(|bitmap| bitmap.glyph.clone())
    }

    /// The number of glyphs in the font.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the font has no glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl Font for BitmapFont {
    type Error = MissingGlyph;

    fn render_glyph(
        &mut self,
        glyph: &Glyph,
        image: &mut GlyphImage,
        x: u32,
        y: u32,
    ) -> Result<(), Self::Error> {
        let bitmap = self
            .glyphs
            .get(&glyph.code())
            .ok_or(MissingGlyph(glyph.code()))?;

        // Never draw outside the space reserved for `glyph`, even if it is smaller than
        // the stored bitmap.
        let stride = bitmap.glyph.width() as usize;
        let width = glyph.width().min(bitmap.glyph.width());
        let height = glyph.height().min(bitmap.glyph.height());

        for (row, line) in bitmap
            .coverage
            .chunks(stride.max(1))
            .take(height as usize)
            .enumerate()
        {
            image.write_coverage(x, y + row as u32, width, 1, &line[..width as usize]);
        }

        Ok(())
    }
}

/// A font was asked to draw a character it doesn't have.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MissingGlyph(pub u32);

impl fmt::Display for MissingGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font has no glyph for U+{:04X}", self.0)
    }
}

impl StdError for MissingGlyph {}
