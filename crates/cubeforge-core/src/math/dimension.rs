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

//! Provides structs for representing extents (sizes) and origins (offsets) in 3D.
//!
//! These types describe texture regions. They use integer (`u32`) components, and
//! the third component doubles as the array layer for layered textures such as
//! cube textures.

/// A three-dimensional extent, representing width, height, and depth.
///
/// This is used for 2D textures (depth 1) and cube textures (6 array layers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent3D {
    /// The width component of the extent.
    pub width: u32,
    /// The height component of the extent.
    pub height: u32,
    /// The depth or number of array layers.
    pub depth_or_array_layers: u32,
}

impl Extent3D {
    /// A square, single-layer extent of `size` x `size`.
    pub const fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        }
    }

    /// Number of texels covered by the extent.
    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth_or_array_layers as usize
    }
}

/// A three-dimensional origin, representing an (x, y, z) offset.
///
/// For layered textures `z` selects the array layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Origin3D {
    /// The x-coordinate of the origin.
    pub x: u32,
    /// The y-coordinate of the origin.
    pub y: u32,
    /// The z-coordinate or array layer of the origin.
    pub z: u32,
}

impl Origin3D {
    /// The zero origin.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// The origin of the given array layer.
    pub const fn layer(z: u32) -> Self {
        Self { x: 0, y: 0, z }
    }
}
