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

use crate::cube::{CubeFace, Viewpoint};
use crate::renderer::error::ResourceError;
use crate::renderer::texture::{TextureId, TextureViewDescriptor};

/// Where a scene render should land.
#[derive(Debug, Clone, Copy)]
pub enum RenderTarget {
    /// The whole of a single-layer 2D texture.
    Texture(TextureId),
    /// One face slice of a cube texture.
    CubeFace {
        /// The cube texture.
        texture: TextureId,
        /// The face being rendered.
        face: CubeFace,
        /// The view selecting the face's layer. Shared for the whole process.
        view: &'static TextureViewDescriptor<'static>,
    },
}

impl RenderTarget {
    /// The texture written by this target.
    pub fn texture(&self) -> TextureId {
        match self {
            RenderTarget::Texture(id) => *id,
            RenderTarget::CubeFace { texture, .. } => *texture,
        }
    }
}

/// The host's scene rendering primitive.
///
/// Implementations render the host's scene, as seen from a [`Viewpoint`], into
/// a target synchronously. How the scene is drawn is entirely the host's
/// business.
pub trait SceneRenderer: Send + Debug {
    /// Renders the scene from `viewpoint` into `target`.
    fn render(&mut self, viewpoint: &Viewpoint, target: RenderTarget) -> Result<(), ResourceError>;

    /// Whether the renderer can draw straight into a [`RenderTarget::CubeFace`].
    fn supports_cube_face_targets(&self) -> bool {
        false
    }
}
