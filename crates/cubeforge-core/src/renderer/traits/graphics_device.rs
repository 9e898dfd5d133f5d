// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Debug;

use crate::math::{Extent3D, Origin3D};
use crate::renderer::error::ResourceError;
use crate::renderer::texture::{NativeTextureHandle, TextureDescriptor, TextureId};

/// Defines the texture-level services a graphics backend provides.
///
/// This is the subset of a device that cube builds need: allocating and
/// releasing textures, uploading and reading back texel regions, and
/// exposing native handles for accelerated copies. Every method takes
/// `&self`; implementations are expected to synchronize internally.
pub trait GraphicsDevice: Send + Sync + Debug {
    /// Creates a new texture.
    /// ## Arguments
    /// * `descriptor` - The texture configuration.
    /// ## Returns
    /// The ID of the created texture or an error if the creation fails.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError>;

    /// Destroys a texture.
    /// ## Arguments
    /// * `id` - The ID of the texture to be destroyed.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Writes texel data into a texture region.
    /// ## Arguments
    /// * `id` - The texture to write to.
    /// * `data` - Tightly packed texel bytes.
    /// * `bytes_per_row` - Row pitch of `data`, or `None` for tightly packed rows.
    /// * `origin` - Offset of the region. `z` selects the array layer.
    /// * `size` - Size of the region.
    fn write_texture(
        &self,
        id: TextureId,
        data: &[u8],
        bytes_per_row: Option<u32>,
        origin: Origin3D,
        size: Extent3D,
    ) -> Result<(), ResourceError>;

    /// Synchronously reads back a texture region into `out`.
    ///
    /// `out` must hold exactly the region's size in bytes, rows tightly packed.
    fn read_texture(
        &self,
        id: TextureId,
        origin: Origin3D,
        size: Extent3D,
        out: &mut [u8],
    ) -> Result<(), ResourceError>;

    /// Returns the backend-native handle of a texture.
    fn native_handle(&self, id: TextureId) -> Result<NativeTextureHandle, ResourceError>;
}
