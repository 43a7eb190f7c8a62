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

//! Defines useful resource wrappers.

use super::gpu_backend::{GpuContext, RepeatStrategy};

use std::fmt;

use piet::InterpolationMode;

/// A texture owned by a glyph page.
///
/// The backend resource is released when this is dropped.
pub struct Texture<C: GpuContext + ?Sized> {
    resource: C::Texture,
}

impl<C: GpuContext + ?Sized> fmt::Debug for Texture<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture").finish_non_exhaustive()
    }
}

impl<C: GpuContext + ?Sized> Texture<C> {
    pub(crate) fn new(
        context: &mut C,
        device: &C::Device,
        interpolation: InterpolationMode,
        repeat: RepeatStrategy,
    ) -> Result<Self, C::Error> {
        let resource = context.create_texture(device, interpolation, repeat)?;

        Ok(Self::from_raw(resource))
    }

    pub(crate) fn from_raw(resource: C::Texture) -> Self {
        Self { resource }
    }

    /// Get the backend texture, for binding.
    pub fn resource(&self) -> &C::Texture {
        &self.resource
    }

    pub(crate) fn write_texture(
        &self,
        context: &mut C,
        device: &C::Device,
        queue: &C::Queue,
        size: (u32, u32),
        format: piet::ImageFormat,
        data: Option<&[u8]>,
    ) {
        context.write_texture(device, queue, &self.resource, size, format, data);
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn write_subtexture(
        &self,
        context: &mut C,
        device: &C::Device,
        queue: &C::Queue,
        offset: (u32, u32),
        size: (u32, u32),
        format: piet::ImageFormat,
        data: &[u8],
    ) {
        context.write_subtexture(device, queue, &self.resource, offset, size, format, data);
    }
}
