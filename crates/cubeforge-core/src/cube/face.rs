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

use crate::math::{Quaternion, Vec3};

/// The number of faces of a cube texture.
pub const CUBE_FACE_COUNT: usize = 6;

/// One of the six faces of a cube texture.
///
/// The discriminant is the face index. It is also the array layer of the face
/// in a cube texture and the order in which faces are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CubeFace {
    /// Looking down +X.
    PositiveX = 0,
    /// Looking down -X.
    NegativeX = 1,
    /// Looking down +Y.
    PositiveY = 2,
    /// Looking down -Y.
    NegativeY = 3,
    /// Looking down +Z.
    PositiveZ = 4,
    /// Looking down -Z.
    NegativeZ = 5,
}

// Euler angles (pitch, yaw, roll) in degrees, indexed by face.
const FACE_EULER_DEGREES: [(f32, f32, f32); CUBE_FACE_COUNT] = [
    (0.0, 90.0, 0.0),
    (0.0, -90.0, 0.0),
    (-90.0, 0.0, 0.0),
    (90.0, 0.0, 0.0),
    (0.0, 0.0, 0.0),
    (0.0, 180.0, 0.0),
];

impl CubeFace {
    /// All faces, in capture order.
    pub const ALL: [CubeFace; CUBE_FACE_COUNT] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Returns the face for `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..6`.
    pub fn from_index(index: usize) -> Self {
        match Self::ALL.get(index) {
            Some(face) => *face,
            None => panic!("Invalid cube face index {index}, expected 0..{CUBE_FACE_COUNT}"),
        }
    }

    /// The face index, which is also its array layer.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The camera rotation that looks down this face's axis.
    pub fn rotation(self) -> Quaternion {
        let (x, y, z) = FACE_EULER_DEGREES[self.index()];
        Quaternion::from_euler_degrees(x, y, z)
    }

    /// The unit direction the camera looks at when capturing this face.
    pub fn look_direction(self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    /// The face whose axis is closest to `direction`.
    pub fn nearest(direction: Vec3) -> Self {
        let axis = direction.dominant_axis();
        let component = match axis {
            0 => direction.x,
            1 => direction.y,
            _ => direction.z,
        };
        let negative = usize::from(component < 0.0);
        Self::ALL[axis * 2 + negative]
    }

    /// A short label such as `"+X"`.
    pub const fn label(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "+X",
            CubeFace::NegativeX => "-X",
            CubeFace::PositiveY => "+Y",
            CubeFace::NegativeY => "-Y",
            CubeFace::PositiveZ => "+Z",
            CubeFace::NegativeZ => "-Z",
        }
    }
}

impl fmt::Display for CubeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
