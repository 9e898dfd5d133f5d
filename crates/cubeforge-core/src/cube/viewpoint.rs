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

use crate::cube::CubeFace;
use crate::math::{Quaternion, Vec3};

/// The vertical field of view, in degrees, of every cube face capture.
pub const CUBE_FACE_FOV_DEGREES: f32 = 90.0;

/// A camera placement handed to the host renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    /// World-space position of the camera.
    pub position: Vec3,
    /// Orientation of the camera. Identity looks down +Z.
    pub rotation: Quaternion,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Viewpoint {
    /// The viewpoint capturing `face` from `position`.
    pub fn for_face(position: Vec3, face: CubeFace) -> Self {
        Self {
            position,
            rotation: face.rotation(),
            fov_degrees: CUBE_FACE_FOV_DEGREES,
        }
    }

    /// The direction the camera looks at.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
            fov_degrees: CUBE_FACE_FOV_DEGREES,
        }
    }
}
