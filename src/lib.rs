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

//! A dynamic texture atlas for rasterized glyphs.
//!
//! Giving every glyph its own texture is wasteful and slow to bind. Instead, the
//! [`GlyphCache`] packs glyph bitmaps into a handful of shared texture *pages*. Pages are
//! created lazily as glyphs arrive and are never removed on their own, so the page index
//! recorded on a [`Glyph`] stays valid for as long as the cache lives.
//!
//! To use, implement the [`GpuContext`] trait for your backend and the [`Font`] trait for
//! whatever produces glyph bitmaps (or use the [`BitmapFont`] that comes with this crate).
//! Then call [`GlyphCache::place_glyph`] for every new glyph and [`GlyphCache::flush`] before
//! drawing with the page textures.
//!
//! Note that this crate generally uses thread-unsafe primitives. This is because UI management is
//! usually pinned to one thread anyways, and it's a bad idea to do drawing outside of that thread.
//!
//! ## Implementation
//!
//! Placement is first-fit over the existing pages, in the order they were created. Inside a
//! page, space is handed out by an [`etagere`] shelf allocator. A page that runs out of room
//! first doubles its height, up to [`CacheConfig::max_page_height`]. Only when every page is
//! full is a new one created.
//!
//! [`etagere`]: https://crates.io/crates/etagere

#![forbid(unsafe_code, rust_2018_idioms)]

pub use piet;
use piet::Error as Pierror;

use std::error::Error as StdError;
use std::fmt;

mod cache;
mod event;
mod format;
mod glyph;
mod gpu_backend;
mod image;
mod image_texture;
mod page;
mod resources;

#[cfg(test)]
mod test_util;

pub use self::cache::GlyphCache;
pub use self::event::{ListenerId, RenderGlyph};
pub use self::format::{ColorFormat, InvalidColorFormat};
pub use self::glyph::{BitmapFont, Font, Glyph, MissingGlyph};
pub use self::gpu_backend::{GpuContext, RepeatStrategy};
pub use self::image::GlyphImage;
pub use self::image_texture::{DirtyRegion, ImageTexture};
pub use self::resources::Texture;

pub(crate) use page::Page;

/// The largest width or height a page may have.
pub const MAX_PAGE_SIZE: u32 = 32768;

/// Settings for a [`GlyphCache`].
///
/// Only the color format can be changed once the cache exists. Every page of a cache has
/// the same width.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// The pixel format of newly created pages.
    pub color_format: ColorFormat,

    /// The width of every page.
    pub page_width: u32,

    /// The height a page starts out with.
    pub initial_page_height: u32,

    /// The height a page may grow to before it is considered full.
    pub max_page_height: u32,

    /// Empty pixels kept around each glyph, so that sampling doesn't bleed into neighbors.
    pub padding: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            color_format: ColorFormat::A8,
            page_width: 512,
            initial_page_height: 64,
            max_page_height: 512,
            padding: 1,
        }
    }
}

impl CacheConfig {
    /// Check that the page sizes make sense.
    ///
    /// Pages must be non-empty and no larger than [`MAX_PAGE_SIZE`] in either direction.
    pub fn validate(&self) -> Result<(), Pierror> {
        if self.page_width == 0
            || self.initial_page_height == 0
            || self.initial_page_height > self.max_page_height
            || self.page_width > MAX_PAGE_SIZE
            || self.max_page_height > MAX_PAGE_SIZE
        {
            return Err(Pierror::InvalidInput);
        }

        Ok(())
    }

    /// Shrink the page sizes so that they fit in a texture of at most `max` pixels.
    pub fn clamp_to(mut self, (max_width, max_height): (u32, u32)) -> Self {
        self.page_width = self.page_width.min(max_width);
        self.max_page_height = self.max_page_height.min(max_height);
        self.initial_page_height = self.initial_page_height.min(self.max_page_height);
        self
    }

    /// The space a glyph takes up on a page, padding included.
    pub(crate) fn padded_size(&self, glyph: &Glyph) -> (u32, u32) {
        let border = self.padding.saturating_mul(2);

        (
            glyph.width().saturating_add(border).max(1),
            glyph.height().saturating_add(border).max(1),
        )
    }
}

/// A glyph that doesn't fit on an empty page.
///
/// This is a configuration problem: either the pages are too small or the glyph is far
/// larger than it should be.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GlyphTooLarge {
    /// The character of the glyph.
    pub code: u32,

    /// The size of the glyph, padding included.
    pub size: (u32, u32),

    /// The largest a page can be.
    pub page_size: (u32, u32),
}

impl fmt::Display for GlyphTooLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "glyph U+{:04X} needs {}x{} pixels but pages are at most {}x{}",
            self.code, self.size.0, self.size.1, self.page_size.0, self.page_size.1
        )
    }
}

impl StdError for GlyphTooLarge {}

trait ResultExt<T, E: StdError + 'static> {
    fn piet_err(self) -> Result<T, Pierror>;
}

impl<T, E: StdError + 'static> ResultExt<T, E> for Result<T, E> {
    fn piet_err(self) -> Result<T, Pierror> {
        self.map_err(|e| Pierror::BackendError(Box::new(LibraryError(e))))
    }
}

struct LibraryError<E>(E);

impl<E: fmt::Debug> fmt::Debug for LibraryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<E: fmt::Display> fmt::Display for LibraryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<E: StdError> StdError for LibraryError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CacheConfig::default();
        assert_eq!(config.color_format, ColorFormat::A8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let zero_width = CacheConfig {
            page_width: 0,
            ..Default::default()
        };
        assert!(matches!(zero_width.validate(), Err(Pierror::InvalidInput)));

        let backwards = CacheConfig {
            initial_page_height: 1024,
            max_page_height: 256,
            ..Default::default()
        };
        assert!(backwards.validate().is_err());

        let huge = CacheConfig {
            page_width: MAX_PAGE_SIZE + 1,
            ..Default::default()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn padded_size_saturates() {
        let config = CacheConfig {
            padding: u32::MAX,
            ..Default::default()
        };
        assert_eq!(
            config.padded_size(&Glyph::new(1, 1, 1)),
            (u32::MAX, u32::MAX)
        );

        let config = CacheConfig::default();
        assert_eq!(
            config.padded_size(&Glyph::new(1, u32::MAX, 3)),
            (u32::MAX, 5)
        );
    }

    #[test]
    fn clamping_keeps_config_valid() {
        let config = CacheConfig::default().clamp_to((128, 32));
        assert_eq!(config.page_width, 128);
        assert_eq!(config.max_page_height, 32);
        assert_eq!(config.initial_page_height, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn padding_surrounds_glyph() {
        let config = CacheConfig::default();
        assert_eq!(config.padded_size(&Glyph::new(1, 10, 4)), (12, 6));

        let tight = CacheConfig {
            padding: 0,
            ..Default::default()
        };
        assert_eq!(tight.padded_size(&Glyph::new(32, 0, 0)), (1, 1));
    }
}
