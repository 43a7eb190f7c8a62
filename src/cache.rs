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

//! The glyph cache, which owns every page.

use super::event::{ListenerId, Listeners, RenderGlyph};
use super::format::ColorFormat;
use super::glyph::{Font, Glyph};
use super::gpu_backend::GpuContext;
use super::image::GlyphImage;
use super::image_texture::ImageTexture;
use super::resources::Texture;
use super::{CacheConfig, GlyphTooLarge, Page};

use piet::kurbo::{Point, Rect};
use piet::Error as Pierror;

use std::fmt;

/// A growing set of texture pages that glyphs are packed into.
///
/// Pages are only ever appended. The page index that [`place_glyph`] records on a
/// [`Glyph`] is therefore valid until the cache is cleared or dropped.
///
/// [`place_glyph`]: GlyphCache::place_glyph
pub struct GlyphCache<C: GpuContext + ?Sized> {
    /// Settings for new pages.
    config: CacheConfig,

    /// The pages, in the order they were created.
    pages: Vec<Page<C>>,

    /// Listeners for the "render glyph" event.
    listeners: Listeners,

    /// Bumped every time the pages are cleared.
    generation: u64,
}

impl<C: GpuContext + ?Sized> fmt::Debug for GlyphCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphCache")
            .field("config", &self.config)
            .field("pages", &self.pages.len())
            .field("listeners", &self.listeners)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<C: GpuContext + ?Sized> GlyphCache<C> {
    /// Create a new, empty cache.
    pub fn new(config: CacheConfig) -> Result<Self, Pierror> {
        config.validate()?;

        Ok(Self {
            config,
            pages: Vec::new(),
            listeners: Listeners::default(),
            generation: 0,
        })
    }

    /// Create a new, empty cache whose pages fit in the backend's textures.
    pub fn for_context(
        context: &mut C,
        device: &C::Device,
        config: CacheConfig,
    ) -> Result<Self, Pierror> {
        let max_size = context.max_texture_size(device);
        Self::new(config.clamp_to(max_size))
    }

    /// The settings of this cache.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The color format that new pages will use.
    pub fn color_format(&self) -> ColorFormat {
        self.config.color_format
    }

    /// Change the color format used for pages created from now on.
    ///
    /// Existing pages keep their format.
    pub fn set_color_format(&mut self, format: ColorFormat) {
        self.config.color_format = format;
    }

    /// The number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether there are no pages yet.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate over the pages in index order.
    pub fn pages(&self) -> impl Iterator<Item = &ImageTexture<C>> + '_ {
        self.pages.iter().map(Page::image_texture)
    }

    /// Find room for `glyph` and draw it there with `font`.
    ///
    /// Existing pages are tried in order and the first one with room wins. If none has
    /// room, one new page is created for the glyph. Afterwards, `glyph.page_id()` names the
    /// page the glyph is on.
    ///
    /// # Errors
    ///
    /// Fails with a [`GlyphTooLarge`] backend error if the glyph wouldn't even fit on an
    /// empty page, in which case no page is added. Texture creation and font errors are
    /// passed through.
    ///
    /// # Panics
    ///
    /// Panics if `glyph` has already been placed.
    pub fn place_glyph<F: Font + ?Sized>(
        &mut self,
        context: &mut C,
        device: &C::Device,
        font: &mut F,
        glyph: &mut Glyph,
    ) -> Result<(), Pierror> {
        assert!(
            !glyph.is_placed(),
            "glyph U+{:04X} is already on page {:?}",
            glyph.code(),
            glyph.page_id()
        );

        for (index, page) in self.pages.iter_mut().enumerate() {
            if page.alloc(&self.config, font, glyph)? {
                glyph.set_page_id(index, self.generation);
                return Ok(());
            }
        }

        // Every page is full; start a new one.
        let mut page = Page::new(context, device, &self.config)?;

        if !page.alloc(&self.config, font, glyph)? {
            let error = GlyphTooLarge {
                code: glyph.code(),
                size: self.config.padded_size(glyph),
                page_size: (self.config.page_width, self.config.max_page_height),
            };

            tracing::warn!("{}", error);
            return Err(Pierror::BackendError(Box::new(error)));
        }

        let index = self.pages.len();
        self.pages.push(page);
        glyph.set_page_id(index, self.generation);

        tracing::debug!(
            "allocated glyph page {} ({:?}, {} wide)",
            index,
            self.config.color_format,
            self.config.page_width
        );

        Ok(())
    }

    /// Release every page.
    ///
    /// Glyphs placed before this point no longer refer to anything, and looking them up
    /// panics.
    pub fn clear_pages(&mut self) {
        if self.pages.is_empty() {
            return;
        }

        tracing::debug!("clearing {} glyph pages", self.pages.len());

        for page in self.pages.drain(..) {
            page.clear();
        }

        self.generation += 1;
    }

    fn page_index(&self, glyph: &Glyph) -> usize {
        let page_id = glyph
            .page_id()
            .unwrap_or_else(|| panic!("glyph U+{:04X} has not been placed", glyph.code()));

        assert!(
            page_id < self.pages.len(),
            "glyph U+{:04X} is on page {} but there are only {} pages",
            glyph.code(),
            page_id,
            self.pages.len()
        );

        assert_eq!(
            glyph.generation(),
            self.generation,
            "glyph U+{:04X} was placed before the cache was cleared",
            glyph.code()
        );

        page_id
    }

    /// The image and texture of the page `glyph` is on.
    ///
    /// # Panics
    ///
    /// Panics if `glyph` was not placed in this cache.
    pub fn glyph_image_texture(&self, glyph: &Glyph) -> &ImageTexture<C> {
        self.pages[self.page_index(glyph)].image_texture()
    }

    /// The image of the page `glyph` is on.
    ///
    /// # Panics
    ///
    /// Panics if `glyph` was not placed in this cache.
    pub fn glyph_image(&self, glyph: &Glyph) -> &GlyphImage {
        self.glyph_image_texture(glyph).image()
    }

    /// The texture of the page `glyph` is on.
    ///
    /// Call [`flush`](Self::flush) first so that the texture has the glyph in it.
    ///
    /// # Panics
    ///
    /// Panics if `glyph` was not placed in this cache.
    pub fn glyph_texture(&self, glyph: &Glyph) -> &Texture<C> {
        self.glyph_image_texture(glyph).texture()
    }

    /// The texture coordinates of `glyph` on its page, from zero to one.
    ///
    /// # Panics
    ///
    /// Panics if `glyph` was not placed in this cache.
    pub fn uv_rect(&self, glyph: &Glyph) -> Rect {
        let (width, height) = self.glyph_image(glyph).size();

        Rect::new(
            glyph.src_x() as f64 / width as f64,
            glyph.src_y() as f64 / height as f64,
            (glyph.src_x() + glyph.width()) as f64 / width as f64,
            (glyph.src_y() + glyph.height()) as f64 / height as f64,
        )
    }

    /// Write every page's pending changes into its texture.
    ///
    /// Returns the number of pages that were uploaded.
    pub fn flush(&mut self, context: &mut C, device: &C::Device, queue: &C::Queue) -> usize {
        self.pages
            .iter_mut()
            .map(|page| page.image_texture_mut().upload(context, device, queue))
            .filter(|&uploaded| uploaded)
            .count()
    }

    /// Register a listener for the "render glyph" event.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&RenderGlyph<'_>) -> Result<(), Pierror> + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Remove a listener. Returns `false` if it wasn't registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Tell the listeners that `glyph` is about to be drawn.
    ///
    /// The first error a listener returns is passed back as is; the remaining listeners
    /// are skipped.
    ///
    /// # Panics
    ///
    /// Panics if `glyph` was not placed in this cache.
    pub fn post_render(&mut self, glyph: &Glyph) -> Result<(), Pierror> {
        let page_id = self.page_index(glyph);
        if self.listeners.is_empty() {
            return Ok(());
        }

        let event = RenderGlyph {
            code: glyph.code(),
            image: self.pages[page_id].image_texture().image(),
            top_left: Point::new(glyph.src_x() as f64, glyph.src_y() as f64),
            bottom_right: Point::new(
                (glyph.src_x() + glyph.width()) as f64,
                (glyph.src_y() + glyph.height()) as f64,
            ),
        };

        self.listeners.notify(&event)
    }

    /// Stack every page into one image, top to bottom in index order.
    ///
    /// The image is as wide as the last page, as tall as all pages together and in the
    /// first page's format. Returns `None` if there are no pages.
    pub fn image(&self) -> Option<GlyphImage> {
        let first = self.pages.first()?.image_texture().image();

        let (width, height) = self.pages.iter().fold((0, 0), |(_, height), page| {
            let image = page.image_texture().image();
            (image.width(), height + image.height())
        });

        let mut composite = GlyphImage::new(width, height, first.format());

        let mut y = 0;
        for page in &self.pages {
            let image = page.image_texture().image();
            composite.copy_bits(image, 0, 0, 0, y, width, image.height());
            y += image.height();
        }

        Some(composite)
    }
}

impl<C: GpuContext + ?Sized> Drop for GlyphCache<C> {
    fn drop(&mut self) {
        self.clear_pages();
    }
}
