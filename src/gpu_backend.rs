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

//! Defines the GPU backend that glyph pages are uploaded through.

use piet::InterpolationMode;

use std::error::Error;

/// The texture half of a GPU backend.
///
/// The glyph cache only ever creates textures and writes pixels into them, so this is all
/// that a backend has to provide.
pub trait GpuContext {
    /// A "device" that can be used to create textures.
    ///
    /// This corresponds to [`Device`] in [`wgpu`] and nothing in particular in [`glow`].
    ///
    /// [`Device`]: https://docs.rs/wgpu/latest/wgpu/struct.Device.html
    /// [`wgpu`]: https://crates.io/crates/wgpu
    /// [`glow`]: https://crates.io/crates/glow
    type Device;

    /// A "queue" that can be used to write to textures.
    ///
    /// This corresponds to [`Queue`] in [`wgpu`] and nothing in particular in [`glow`].
    ///
    /// [`Queue`]: https://docs.rs/wgpu/latest/wgpu/struct.Queue.html
    /// [`wgpu`]: https://crates.io/crates/wgpu
    /// [`glow`]: https://crates.io/crates/glow
    type Queue;

    /// The type associated with a GPU texture.
    ///
    /// Dropping a texture releases it.
    type Texture;

    /// The error type associated with this GPU context.
    type Error: Error + 'static;

    /// Create a new texture.
    fn create_texture(
        &mut self,
        device: &Self::Device,
        interpolation: InterpolationMode,
        repeat: RepeatStrategy,
    ) -> Result<Self::Texture, Self::Error>;

    /// Write an image to a texture, replacing its size and contents.
    fn write_texture(
        &mut self,
        device: &Self::Device,
        queue: &Self::Queue,
        texture: &Self::Texture,
        size: (u32, u32),
        format: piet::ImageFormat,
        data: Option<&[u8]>,
    );

    /// Write a sub-image to a texture.
    #[allow(clippy::too_many_arguments)]
    fn write_subtexture(
        &mut self,
        device: &Self::Device,
        queue: &Self::Queue,
        texture: &Self::Texture,
        offset: (u32, u32),
        size: (u32, u32),
        format: piet::ImageFormat,
        data: &[u8],
    );

    /// Get the maximum texture size.
    fn max_texture_size(&mut self, device: &Self::Device) -> (u32, u32);
}

impl<C: GpuContext + ?Sized> GpuContext for &mut C {
    type Device = C::Device;
    type Queue = C::Queue;
    type Texture = C::Texture;
    type Error = C::Error;

    fn create_texture(
        &mut self,
        device: &Self::Device,
        interpolation: InterpolationMode,
        repeat: RepeatStrategy,
    ) -> Result<Self::Texture, Self::Error> {
        (**self).create_texture(device, interpolation, repeat)
    }

    fn max_texture_size(&mut self, device: &Self::Device) -> (u32, u32) {
        (**self).max_texture_size(device)
    }

    fn write_subtexture(
        &mut self,
        device: &Self::Device,
        queue: &Self::Queue,
        texture: &Self::Texture,
        offset: (u32, u32),
        size: (u32, u32),
        format: piet::ImageFormat,
        data: &[u8],
    ) {
        (**self).write_subtexture(device, queue, texture, offset, size, format, data)
    }

    fn write_texture(
        &mut self,
        device: &Self::Device,
        queue: &Self::Queue,
        texture: &Self::Texture,
        size: (u32, u32),
        format: piet::ImageFormat,
        data: Option<&[u8]>,
    ) {
        (**self).write_texture(device, queue, texture, size, format, data)
    }
}

/// The strategy to use for repeating.
///
/// Glyph pages are always created with a transparent [`Color`](RepeatStrategy::Color)
/// border. The other variants exist so that one backend implementation can serve other
/// texture users too.
#[derive(Debug, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub enum RepeatStrategy {
    /// Repeat the image.
    Repeat,

    /// Clamp to the edge of the image.
    Clamp,

    /// Don't repeat and instead use this color.
    Color(piet::Color),
}
