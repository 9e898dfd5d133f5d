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

use std::fmt;
use std::sync::Arc;

use crate::cube::CubeFace;
use crate::math::{Extent3D, Origin3D};
use crate::renderer::{GraphicsDevice, ResourceError, TextureDescriptor, TextureFormat, TextureId};

/// A finished cube texture.
///
/// The value owns its device texture and destroys it when dropped, unless the
/// caller takes the raw ID with [`CubeTexture::into_raw`].
pub struct CubeTexture {
    id: TextureId,
    face_size: u32,
    format: TextureFormat,
    device: Option<Arc<dyn GraphicsDevice>>,
}

impl CubeTexture {
    /// Allocates a new, uninitialized cube texture on `device`.
    pub fn allocate(
        device: Arc<dyn GraphicsDevice>,
        label: &str,
        face_size: u32,
        format: TextureFormat,
    ) -> Result<Self, ResourceError> {
        let id = device.create_texture(&TextureDescriptor::cube(label, face_size, format))?;
        log::debug!("Allocated cube texture {id:?} ({face_size}x{face_size}, {format:?})");
        Ok(Self::from_raw(device, id, face_size, format))
    }

    /// Takes ownership of an existing cube texture.
    pub fn from_raw(
        device: Arc<dyn GraphicsDevice>,
        id: TextureId,
        face_size: u32,
        format: TextureFormat,
    ) -> Self {
        Self {
            id,
            face_size,
            format,
            device: Some(device),
        }
    }

    /// The device ID of the texture.
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Width and height of each face.
    pub fn face_size(&self) -> u32 {
        self.face_size
    }

    /// Texel format of the texture.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Size in bytes of one face.
    pub fn face_size_in_bytes(&self) -> usize {
        Extent3D::square(self.face_size).texel_count() * self.format.bytes_per_pixel() as usize
    }

    /// Reads back the texels of one face.
    pub fn read_face(&self, face: CubeFace) -> Result<Vec<u8>, ResourceError> {
        let mut texels = vec![0u8; self.face_size_in_bytes()];
        if let Some(device) = &self.device {
            device.read_texture(
                self.id,
                Origin3D::layer(face.index() as u32),
                Extent3D::square(self.face_size),
                &mut texels,
            )?;
        }
        Ok(texels)
    }

    /// Releases ownership and returns the raw texture ID.
    ///
    /// The caller becomes responsible for destroying the texture.
    pub fn into_raw(mut self) -> TextureId {
        self.device = None;
        self.id
    }
}

impl fmt::Debug for CubeTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CubeTexture")
            .field("id", &self.id)
            .field("face_size", &self.face_size)
            .field("format", &self.format)
            .finish()
    }
}

impl Drop for CubeTexture {
    fn drop(&mut self) {
        if let Some(device) = self.device.take() {
            if let Err(e) = device.destroy_texture(self.id) {
                log::error!("Failed to destroy cube texture {:?}: {e}", self.id);
            }
        }
    }
}
