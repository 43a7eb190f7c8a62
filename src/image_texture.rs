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

//! An image paired with the texture it is uploaded to.

use super::gpu_backend::GpuContext;
use super::image::GlyphImage;
use super::resources::Texture;

use std::fmt;

/// A page's image along with its GPU texture.
///
/// Writes go to the image first. The touched area is remembered and written into the
/// texture on the next upload.
pub struct ImageTexture<C: GpuContext + ?Sized> {
    /// The CPU-side pixels.
    image: GlyphImage,

    /// The texture that mirrors `image`.
    texture: Texture<C>,

    /// The part of `image` that the texture hasn't seen yet.
    dirty: Option<DirtyRegion>,
}

/// The area of an image that needs to be uploaded again.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirtyRegion {
    /// The texture needs to be rewritten entirely, size included.
    Full,

    /// Only this rectangle changed.
    Rect {
        /// The top left corner.
        min: (u32, u32),

        /// The bottom right corner, exclusive.
        max: (u32, u32),
    },
}

impl<C: GpuContext + ?Sized> fmt::Debug for ImageTexture<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageTexture")
            .field("image", &self.image)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl<C: GpuContext + ?Sized> ImageTexture<C> {
    /// Pair an image with a freshly created texture.
    ///
    /// The texture has never been written to, so everything starts out dirty.
    pub(crate) fn new(image: GlyphImage, texture: Texture<C>) -> Self {
        Self {
            image,
            texture,
            dirty: Some(DirtyRegion::Full),
        }
    }

    /// The CPU-side image.
    pub fn image(&self) -> &GlyphImage {
        &self.image
    }

    /// The GPU texture.
    ///
    /// This only reflects the image as of the last upload.
    pub fn texture(&self) -> &Texture<C> {
        &self.texture
    }

    /// The region that still has to be uploaded, if any.
    pub fn dirty_region(&self) -> Option<DirtyRegion> {
        self.dirty
    }

    pub(crate) fn image_mut(&mut self) -> &mut GlyphImage {
        &mut self.image
    }

    /// Mark a rectangle of the image as changed.
    pub(crate) fn update_region(&mut self, x: u32, y: u32, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let (min, max) = ((x, y), (x + width, y + height));

        self.dirty = Some(match self.dirty {
            Some(DirtyRegion::Full) => DirtyRegion::Full,
            Some(DirtyRegion::Rect {
                min: (x0, y0),
                max: (x1, y1),
            }) => DirtyRegion::Rect {
                min: (x0.min(min.0), y0.min(min.1)),
                max: (x1.max(max.0), y1.max(max.1)),
            },
            None => DirtyRegion::Rect { min, max },
        });
    }

    /// Mark the whole image as changed.
    pub(crate) fn update_all(&mut self) {
        self.dirty = Some(DirtyRegion::Full);
    }

    /// Write the dirty part of the image into the texture.
    ///
    /// Returns whether anything was written.
    pub(crate) fn upload(&mut self, context: &mut C, device: &C::Device, queue: &C::Queue) -> bool {
        let format = self.image.format().upload_format();

        match self.dirty.take() {
            None => false,

            Some(DirtyRegion::Full) => {
                let size = self.image.size();
                let pixels = self.image.region_pixels((0, 0), size);

                tracing::trace!("uploading whole {}x{} page", size.0, size.1);
                self.texture
                    .write_texture(context, device, queue, size, format, Some(pixels.as_bytes()));
                true
            }

            Some(DirtyRegion::Rect { min, max }) => {
                let size = (max.0 - min.0, max.1 - min.1);
                let pixels = self.image.region_pixels(min, size);

                tracing::trace!("uploading {}x{} region at {:?}", size.0, size.1, min);
                self.texture.write_subtexture(
                    context,
                    device,
                    queue,
                    min,
                    size,
                    format,
                    pixels.as_bytes(),
                );
                true
            }
        }
    }
}
