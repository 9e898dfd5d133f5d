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

//! CPU-side storage for the texels of one captured face.

use cubeforge_core::renderer::{ResourceError, TextureFormat};
use serde::{Deserialize, Serialize};

/// Which axes are mirrored when texels are copied into a [`PixelCache`].
///
/// Host renderers do not all agree with the cube face convention on where the
/// first row or column of an image lies, so the copy can compensate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FlipPolicy {
    /// Mirror columns (left/right).
    pub flip_x: bool,
    /// Mirror rows (top/bottom).
    pub flip_y: bool,
}

impl FlipPolicy {
    /// Copy texels unchanged.
    pub const NONE: Self = Self {
        flip_x: false,
        flip_y: false,
    };
    /// Mirror columns only.
    pub const FLIP_X: Self = Self {
        flip_x: true,
        flip_y: false,
    };
    /// Mirror rows only.
    pub const FLIP_Y: Self = Self {
        flip_x: false,
        flip_y: true,
    };
    /// Mirror both axes.
    pub const BOTH: Self = Self {
        flip_x: true,
        flip_y: true,
    };
}

/// The texels of one face, tightly packed, row-major.
///
/// Texels are opaque byte groups of the format's size. Flipping moves whole
/// texels, so every format is handled the same way.
#[derive(Debug, Clone)]
pub struct PixelCache {
    width: u32,
    height: u32,
    format: TextureFormat,
    texels: Vec<u8>,
}

impl PixelCache {
    /// Allocates a zeroed cache for a `width` x `height` image.
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel() as usize;
        Self {
            width,
            height,
            format,
            texels: vec![0; len],
        }
    }

    /// Width of the cached image.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the cached image.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel format of the cached image.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Size in bytes of one row.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * self.format.bytes_per_pixel()
    }

    /// The cached texels.
    pub fn as_bytes(&self) -> &[u8] {
        &self.texels
    }

    /// The bytes of the texel at `(x, y)`.
    pub fn texel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.format.bytes_per_pixel() as usize;
        let start = (y as usize * self.width as usize + x as usize) * bpp;
        &self.texels[start..start + bpp]
    }

    /// Copies a full image from `source` into the cache, applying `flip`.
    ///
    /// `source` must be tightly packed and exactly the cache's size.
    pub fn copy_from(&mut self, source: &[u8], flip: FlipPolicy) -> Result<(), ResourceError> {
        if source.len() != self.texels.len() {
            return Err(ResourceError::SizeMismatch {
                expected: self.texels.len(),
                actual: source.len(),
            });
        }

        let bpp = self.format.bytes_per_pixel() as usize;
        let row_len = self.bytes_per_row() as usize;
        let height = self.height as usize;

        for (y, dst_row) in self.texels.chunks_exact_mut(row_len).enumerate() {
            let src_y = if flip.flip_y { height - 1 - y } else { y };
            let src_row = &source[src_y * row_len..(src_y + 1) * row_len];

            if flip.flip_x {
                for (dst, src) in dst_row
                    .chunks_exact_mut(bpp)
                    .zip(src_row.chunks_exact(bpp).rev())
                {
                    dst.copy_from_slice(src);
                }
            } else {
                dst_row.copy_from_slice(src_row);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A 3x2 image where each texel's first byte is its row-major index.
    fn numbered_image(format: TextureFormat) -> Vec<u8> {
        let bpp = format.bytes_per_pixel() as usize;
        let mut bytes = vec![0u8; 6 * bpp];
        for (i, texel) in bytes.chunks_exact_mut(bpp).enumerate() {
            texel[0] = i as u8;
            texel[bpp - 1] = 0xAA;
        }
        bytes
    }

    fn first_bytes(cache: &PixelCache) -> Vec<u8> {
        let bpp = cache.format().bytes_per_pixel() as usize;
        cache.as_bytes().chunks_exact(bpp).map(|t| t[0]).collect()
    }

    #[test]
    fn test_copy_without_flip() {
        let mut cache = PixelCache::new(3, 2, TextureFormat::Rgba8Unorm);
        cache
            .copy_from(&numbered_image(TextureFormat::Rgba8Unorm), FlipPolicy::NONE)
            .unwrap();
        assert_eq!(first_bytes(&cache), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_copy_with_flip_x() {
        let mut cache = PixelCache::new(3, 2, TextureFormat::Rgba8Unorm);
        cache
            .copy_from(&numbered_image(TextureFormat::Rgba8Unorm), FlipPolicy::FLIP_X)
            .unwrap();
        assert_eq!(first_bytes(&cache), vec![2, 1, 0, 5, 4, 3]);
    }

    #[test]
    fn test_copy_with_flip_y() {
        let mut cache = PixelCache::new(3, 2, TextureFormat::Rgba8Unorm);
        cache
            .copy_from(&numbered_image(TextureFormat::Rgba8Unorm), FlipPolicy::FLIP_Y)
            .unwrap();
        assert_eq!(first_bytes(&cache), vec![3, 4, 5, 0, 1, 2]);
    }

    #[test]
    fn test_flip_moves_whole_float_texels() {
        let format = TextureFormat::Rgba32Float;
        let mut cache = PixelCache::new(3, 2, format);
        cache
            .copy_from(&numbered_image(format), FlipPolicy::BOTH)
            .unwrap();
        assert_eq!(first_bytes(&cache), vec![5, 4, 3, 2, 1, 0]);
        assert_eq!(cache.texel(0, 0)[15], 0xAA);
        assert_eq!(cache.texel(2, 1)[0], 0);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let mut cache = PixelCache::new(3, 2, TextureFormat::Rgba8Unorm);
        let err = cache.copy_from(&[0u8; 8], FlipPolicy::NONE).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::SizeMismatch {
                expected: 24,
                actual: 8
            }
        ));
    }
}
