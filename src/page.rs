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

//! A single page of the glyph atlas.

use super::glyph::{Font, Glyph};
use super::gpu_backend::{GpuContext, RepeatStrategy};
use super::image::GlyphImage;
use super::image_texture::ImageTexture;
use super::resources::Texture;
use super::{CacheConfig, ResultExt};

use etagere::{size2, BucketedAtlasAllocator};

use piet::{Error as Pierror, InterpolationMode};

/// One texture worth of packed glyphs.
pub(crate) struct Page<C: GpuContext + ?Sized> {
    /// The image and texture holding the glyphs.
    image_texture: ImageTexture<C>,

    /// The allocator for space in the image.
    ///
    /// The bucketed allocator is used because it can grow in place.
    allocator: BucketedAtlasAllocator,
}

impl<C: GpuContext + ?Sized> Page<C> {
    /// Create a new, empty page at its initial size.
    pub(crate) fn new(
        context: &mut C,
        device: &C::Device,
        config: &CacheConfig,
    ) -> Result<Self, Pierror> {
        let texture = Texture::new(
            context,
            device,
            InterpolationMode::Bilinear,
            RepeatStrategy::Color(piet::Color::TRANSPARENT),
        )
        .piet_err()?;

        let (width, height) = (config.page_width, config.initial_page_height);

        Ok(Self {
            image_texture: ImageTexture::new(
                GlyphImage::new(width, height, config.color_format),
                texture,
            ),
            allocator: BucketedAtlasAllocator::new(size2(width as i32, height as i32)),
        })
    }

    /// The image and texture of this page.
    pub(crate) fn image_texture(&self) -> &ImageTexture<C> {
        &self.image_texture
    }

    pub(crate) fn image_texture_mut(&mut self) -> &mut ImageTexture<C> {
        &mut self.image_texture
    }

    /// Try to find room for `glyph` on this page and draw it there.
    ///
    /// Returns `Ok(false)` if the page is full, even after growing.
    pub(crate) fn alloc<F: Font + ?Sized>(
        &mut self,
        config: &CacheConfig,
        font: &mut F,
        glyph: &mut Glyph,
    ) -> Result<bool, Pierror> {
        // Page sizes are bounded by `CacheConfig::validate`, so anything that passes this
        // check also fits in an `i32`.
        let (width, height) = config.padded_size(glyph);
        if width > self.image_texture.image().width() || height > config.max_page_height {
            return Ok(false);
        }

        let allocation = loop {
            if let Some(allocation) = self.allocator.allocate(size2(width as i32, height as i32))
            {
                break allocation;
            }

            if !self.grow(config.max_page_height) {
                return Ok(false);
            }
        };

        let x = allocation.rectangle.min.x as u32 + config.padding;
        let y = allocation.rectangle.min.y as u32 + config.padding;

        if let Err(err) = font
            .render_glyph(glyph, self.image_texture.image_mut(), x, y)
            .piet_err()
        {
            self.allocator.deallocate(allocation.id);
            return Err(err);
        }

        glyph.set_src(x, y);
        self.image_texture.update_region(x, y, glyph.width(), glyph.height());

        tracing::trace!(
            "glyph U+{:04X} placed at ({}, {}), {}x{}",
            glyph.code(),
            x,
            y,
            glyph.width(),
            glyph.height()
        );

        Ok(true)
    }

    /// Double the height of the page, if it is allowed to get that big.
    fn grow(&mut self, max_height: u32) -> bool {
        let image = self.image_texture.image();
        let (width, height) = image.size();

        if height >= max_height {
            return false;
        }

        let new_height = height.saturating_mul(2).min(max_height);
        tracing::debug!("growing glyph page from {} to {} rows", height, new_height);

        self.allocator.grow(size2(width as i32, new_height as i32));
        self.image_texture.image_mut().resize_height(new_height);

        // The texture has to be recreated at the new size.
        self.image_texture.update_all();
        true
    }

    /// Release the image and texture owned by this page.
    pub(crate) fn clear(self) {
        let (width, height) = self.image_texture.image().size();
        tracing::trace!("releasing {}x{} glyph page", width, height);
    }
}
