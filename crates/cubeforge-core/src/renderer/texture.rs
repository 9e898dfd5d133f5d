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

//! Backend-agnostic texture types.
//!
//! Textures are referenced through opaque [`TextureId`]s handed out by a
//! [`GraphicsDevice`](super::GraphicsDevice). Cube textures are modelled as
//! six-layer 2D arrays whose layer index matches [`CubeFace::index`](crate::CubeFace::index).

use std::borrow::Cow;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::math::Extent3D;
use crate::CUBE_FACE_COUNT;

/// An opaque handle to a texture owned by a graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// An opaque, backend-native handle to a texture.
///
/// This is what gets exchanged with a native blit bridge. Its meaning is
/// entirely up to the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeTextureHandle(pub u64);

/// The texel formats a cube capture can be produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureFormat {
    /// Four 8-bit normalized channels, RGBA order.
    #[default]
    Rgba8Unorm,
    /// Four 8-bit normalized channels, BGRA order.
    Bgra8Unorm,
    /// Four 16-bit float channels.
    Rgba16Float,
    /// Four 32-bit float channels.
    Rgba32Float,
}

impl TextureFormat {
    /// Returns the size in bytes of a single texel for this format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::Rgba8Unorm => 4,
            TextureFormat::Bgra8Unorm => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::Rgba32Float => 16,
        }
    }

    /// Returns `true` for floating-point (HDR) formats.
    pub fn is_float(&self) -> bool {
        matches!(self, TextureFormat::Rgba16Float | TextureFormat::Rgba32Float)
    }
}

/// The dimensionality of a texture allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureDimension {
    /// A plain 2D texture (one layer).
    #[default]
    D2,
    /// A cube texture: a 2D array of exactly six square layers.
    Cube,
}

/// Describes how a texture is going to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureUsage {
    bits: u32,
}

impl TextureUsage {
    /// No usage.
    pub const EMPTY: Self = Self { bits: 0 };
    /// The texture can be the source of a copy.
    pub const COPY_SRC: Self = Self { bits: 1 << 0 };
    /// The texture can be the destination of a copy.
    pub const COPY_DST: Self = Self { bits: 1 << 1 };
    /// The texture can be sampled in a shader.
    pub const TEXTURE_BINDING: Self = Self { bits: 1 << 2 };
    /// The texture can be rendered into.
    pub const RENDER_ATTACHMENT: Self = Self { bits: 1 << 3 };

    /// Returns the raw bit representation.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns `true` if all flags in `other` are set in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl BitOr for TextureUsage {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for TextureUsage {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

/// A descriptor used to create a [`TextureId`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The dimensions (width, height, layers) of the texture.
    pub size: Extent3D,
    /// The dimensionality of the texture.
    pub dimension: TextureDimension,
    /// The format of the texels in the texture.
    pub format: TextureFormat,
    /// How the texture will be used.
    pub usage: TextureUsage,
}

impl<'a> TextureDescriptor<'a> {
    /// A square, single-layer render target of `size` texels that can be read back
    /// or copied from.
    pub fn face_target(label: &'a str, size: u32, format: TextureFormat) -> Self {
        Self {
            label: Some(Cow::Borrowed(label)),
            size: Extent3D::square(size),
            dimension: TextureDimension::D2,
            format,
            usage: TextureUsage::RENDER_ATTACHMENT | TextureUsage::COPY_SRC,
        }
    }

    /// A cube texture with six square faces of `size` texels.
    pub fn cube(label: &'a str, size: u32, format: TextureFormat) -> Self {
        Self {
            label: Some(Cow::Borrowed(label)),
            size: Extent3D {
                width: size,
                height: size,
                depth_or_array_layers: CUBE_FACE_COUNT as u32,
            },
            dimension: TextureDimension::Cube,
            format,
            usage: TextureUsage::TEXTURE_BINDING
                | TextureUsage::COPY_DST
                | TextureUsage::RENDER_ATTACHMENT,
        }
    }

    /// Size in bytes of one layer of this texture.
    pub fn layer_size_in_bytes(&self) -> usize {
        self.size.width as usize * self.size.height as usize * self.format.bytes_per_pixel() as usize
    }
}

/// The dimensionality a texture view exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureViewDimension {
    /// A single 2D layer.
    D2,
    /// A range of 2D layers.
    D2Array,
    /// All six layers as a cube.
    Cube,
}

/// Describes a view into a texture, e.g. a single face slice of a cube texture.
#[derive(Debug, Clone)]
pub struct TextureViewDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The dimensionality of the view.
    pub dimension: TextureViewDimension,
    /// The first array layer accessible to the view.
    pub base_array_layer: u32,
    /// The number of array layers, or `None` for all remaining layers.
    pub array_layer_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(TextureFormat::Rgba8Unorm.bytes_per_pixel(), 4);
        assert_eq!(TextureFormat::Bgra8Unorm.bytes_per_pixel(), 4);
        assert_eq!(TextureFormat::Rgba16Float.bytes_per_pixel(), 8);
        assert_eq!(TextureFormat::Rgba32Float.bytes_per_pixel(), 16);
    }

    #[test]
    fn test_usage_flags() {
        let usage = TextureUsage::COPY_SRC | TextureUsage::RENDER_ATTACHMENT;
        assert!(usage.contains(TextureUsage::COPY_SRC));
        assert!(usage.contains(TextureUsage::RENDER_ATTACHMENT));
        assert!(!usage.contains(TextureUsage::COPY_DST));
        assert!(usage.contains(TextureUsage::EMPTY));
    }

    #[test]
    fn test_cube_descriptor() {
        let desc = TextureDescriptor::cube("sky", 64, TextureFormat::Rgba16Float);
        assert_eq!(desc.dimension, TextureDimension::Cube);
        assert_eq!(desc.size.depth_or_array_layers, 6);
        assert_eq!(desc.layer_size_in_bytes(), 64 * 64 * 8);
    }
}
