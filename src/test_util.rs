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

//! A GPU context that does nothing, for unit tests.

pub(crate) struct NoGpu;

#[derive(Debug)]
pub(crate) struct NoError;

impl std::fmt::Display for NoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("no error")
    }
}

impl std::error::Error for NoError {}

impl crate::GpuContext for NoGpu {
    type Device = ();
    type Queue = ();
    type Texture = ();
    type Error = NoError;

    fn create_texture(
        &mut self,
        _: &(),
        _: piet::InterpolationMode,
        _: crate::RepeatStrategy,
    ) -> Result<(), NoError> {
        Ok(())
    }

    fn write_texture(
        &mut self,
        _: &(),
        _: &(),
        _: &(),
        _: (u32, u32),
        _: piet::ImageFormat,
        _: Option<&[u8]>,
    ) {
    }

    fn write_subtexture(
        &mut self,
        _: &(),
        _: &(),
        _: &(),
        _: (u32, u32),
        _: (u32, u32),
        _: piet::ImageFormat,
        _: &[u8],
    ) {
    }

    fn max_texture_size(&mut self, _: &()) -> (u32, u32) {
        (64, 64)
    }
}
