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

//! Cube faces, capture viewpoints, and the owned cube texture a build produces.

mod face;
mod texture;
mod viewpoint;

pub use self::face::{CubeFace, CUBE_FACE_COUNT};
pub use self::texture::CubeTexture;
pub use self::viewpoint::{Viewpoint, CUBE_FACE_FOV_DEGREES};
