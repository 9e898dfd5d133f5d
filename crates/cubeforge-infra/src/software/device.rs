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

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use cubeforge_core::math::{Extent3D, Origin3D};
use cubeforge_core::renderer::{
    GraphicsDevice, NativeTextureHandle, ResourceError, TextureDescriptor, TextureDimension,
    TextureFormat, TextureId,
};

#[derive(Debug)]
struct SoftwareTexture {
    label: Option<String>,
    size: Extent3D,
    dimension: TextureDimension,
    format: TextureFormat,
    data: Vec<u8>,
}

impl SoftwareTexture {
    fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel() as usize
    }

    fn row_len(&self) -> usize {
        self.size.width as usize * self.bytes_per_pixel()
    }

    fn layer_len(&self) -> usize {
        self.row_len() * self.size.height as usize
    }

    fn check_region(&self, origin: Origin3D, size: Extent3D) -> Result<(), ResourceError> {
        let fits = |o: u32, s: u32, max: u32| o.checked_add(s).is_some_and(|end| end <= max);
        if fits(origin.x, size.width, self.size.width)
            && fits(origin.y, size.height, self.size.height)
            && fits(origin.z, size.depth_or_array_layers, self.size.depth_or_array_layers)
        {
            Ok(())
        } else {
            Err(ResourceError::OutOfBounds)
        }
    }

    fn offset_of(&self, x: u32, y: u32, layer: u32) -> usize {
        layer as usize * self.layer_len() + y as usize * self.row_len() + x as usize * self.bytes_per_pixel()
    }
}

/// A [`GraphicsDevice`] keeping every texture in CPU memory.
///
/// It also counts allocations so leaks show up in tests.
#[derive(Debug, Default)]
pub struct SoftwareDevice {
    textures: Mutex<HashMap<TextureId, SoftwareTexture>>,
    next_texture_id: AtomicUsize,
    destroyed: AtomicUsize,
}

impl SoftwareDevice {
    /// Creates an empty device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures currently alive.
    pub fn live_texture_count(&self) -> usize {
        self.textures.lock().unwrap().len()
    }

    /// Number of textures ever created.
    pub fn created_texture_count(&self) -> usize {
        self.next_texture_id.load(Ordering::Relaxed)
    }

    /// Number of textures destroyed.
    pub fn destroyed_texture_count(&self) -> usize {
        self.destroyed.load(Ordering::Relaxed)
    }

    /// Whether `id` refers to a live texture.
    pub fn contains(&self, id: TextureId) -> bool {
        self.textures.lock().unwrap().contains_key(&id)
    }

    /// Size and format of a texture.
    pub fn texture_info(&self, id: TextureId) -> Result<(Extent3D, TextureFormat), ResourceError> {
        let textures = self.textures.lock().unwrap();
        let texture = textures.get(&id).ok_or(ResourceError::NotFound(id))?;
        Ok((texture.size, texture.format))
    }

    /// The debug label a texture was created with.
    pub fn texture_label(&self, id: TextureId) -> Option<String> {
        let textures = self.textures.lock().unwrap();
        textures.get(&id).and_then(|t| t.label.clone())
    }

    /// Copies layer 0 of `source` into layer `layer` of `destination`.
    ///
    /// Both textures must share a format and the copied region is `size` x `size`.
    pub fn copy_to_layer(
        &self,
        source: TextureId,
        destination: TextureId,
        layer: u32,
        size: u32,
    ) -> Result<(), ResourceError> {
        let mut textures = self.textures.lock().unwrap();
        let src = textures.get(&source).ok_or(ResourceError::NotFound(source))?;
        src.check_region(Origin3D::ZERO, Extent3D::square(size))?;
        let format = src.format;
        let rows: Vec<Vec<u8>> = (0..size)
            .map(|y| {
                let start = src.offset_of(0, y, 0);
                src.data[start..start + size as usize * src.bytes_per_pixel()].to_vec()
            })
            .collect();

        let dst = textures
            .get_mut(&destination)
            .ok_or(ResourceError::NotFound(destination))?;
        if dst.format != format {
            return Err(ResourceError::UnsupportedFormat(format));
        }
        dst.check_region(Origin3D::layer(layer), Extent3D::square(size))?;
        for (y, row) in rows.iter().enumerate() {
            let start = dst.offset_of(0, y as u32, layer);
            dst.data[start..start + row.len()].copy_from_slice(row);
        }
        Ok(())
    }
}

impl GraphicsDevice for SoftwareDevice {
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        let size = descriptor.size;
        if size.width == 0 || size.height == 0 || size.depth_or_array_layers == 0 {
            return Err(ResourceError::OutOfBounds);
        }
        if descriptor.dimension == TextureDimension::Cube
            && (size.depth_or_array_layers != 6 || size.width != size.height)
        {
            return Err(ResourceError::BackendError(format!(
                "Cube textures need six square layers, got {size:?}"
            )));
        }

        let id = TextureId(self.next_texture_id.fetch_add(1, Ordering::Relaxed));
        let len = size.texel_count() * descriptor.format.bytes_per_pixel() as usize;
        let texture = SoftwareTexture {
            label: descriptor.label.as_deref().map(str::to_owned),
            size,
            dimension: descriptor.dimension,
            format: descriptor.format,
            data: vec![0; len],
        };
        log::trace!(
            "SoftwareDevice: created {:?} texture {id:?} ({:?})",
            texture.dimension,
            texture.label
        );
        self.textures.lock().unwrap().insert(id, texture);
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        let mut textures = self.textures.lock().unwrap();
        if textures.remove(&id).is_some() {
            self.destroyed.fetch_add(1, Ordering::Relaxed);
            log::trace!("SoftwareDevice: destroyed texture {id:?}");
            Ok(())
        } else {
            Err(ResourceError::NotFound(id))
        }
    }

    fn write_texture(
        &self,
        id: TextureId,
        data: &[u8],
        bytes_per_row: Option<u32>,
        origin: Origin3D,
        size: Extent3D,
    ) -> Result<(), ResourceError> {
        let mut textures = self.textures.lock().unwrap();
        let texture = textures.get_mut(&id).ok_or(ResourceError::NotFound(id))?;
        texture.check_region(origin, size)?;

        let region_row = size.width as usize * texture.bytes_per_pixel();
        let pitch = bytes_per_row.map_or(region_row, |b| b as usize);
        if pitch < region_row {
            return Err(ResourceError::OutOfBounds);
        }
        let rows = size.height as usize * size.depth_or_array_layers as usize;
        let expected = if rows == 0 { 0 } else { pitch * (rows - 1) + region_row };
        if data.len() < expected {
            return Err(ResourceError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        for layer in 0..size.depth_or_array_layers {
            for y in 0..size.height {
                let src = (layer as usize * size.height as usize + y as usize) * pitch;
                let dst = texture.offset_of(origin.x, origin.y + y, origin.z + layer);
                texture.data[dst..dst + region_row].copy_from_slice(&data[src..src + region_row]);
            }
        }
        Ok(())
    }

    fn read_texture(
        &self,
        id: TextureId,
        origin: Origin3D,
        size: Extent3D,
        out: &mut [u8],
    ) -> Result<(), ResourceError> {
        let textures = self.textures.lock().unwrap();
        let texture = textures.get(&id).ok_or(ResourceError::NotFound(id))?;
        texture.check_region(origin, size)?;

        let region_row = size.width as usize * texture.bytes_per_pixel();
        let expected = region_row * size.height as usize * size.depth_or_array_layers as usize;
        if out.len() != expected {
            return Err(ResourceError::SizeMismatch {
                expected,
                actual: out.len(),
            });
        }

        if region_row == 0 {
            return Ok(());
        }
        for (i, dst_row) in out.chunks_exact_mut(region_row).enumerate() {
            let layer = (i / size.height as usize) as u32;
            let y = (i % size.height as usize) as u32;
            let src = texture.offset_of(origin.x, origin.y + y, origin.z + layer);
            dst_row.copy_from_slice(&texture.data[src..src + region_row]);
        }
        Ok(())
    }

    fn native_handle(&self, id: TextureId) -> Result<NativeTextureHandle, ResourceError> {
        if self.contains(id) {
            Ok(NativeTextureHandle(id.0 as u64))
        } else {
            Err(ResourceError::NotFound(id))
        }
    }
}
