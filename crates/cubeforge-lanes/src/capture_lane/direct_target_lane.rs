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

//! Implements the direct-to-cube capture strategy.
//!
//! The cube texture is allocated on the first capture and every face is
//! rendered straight into its slice, so assembly has nothing left to do.
//! Requires a renderer that accepts [`RenderTarget::CubeFace`].

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use cubeforge_core::renderer::{
    GraphicsDevice, RenderTarget, SceneRenderer, TextureViewDescriptor, TextureViewDimension,
};
use cubeforge_core::{CubeFace, CubeTexture, Viewpoint, CUBE_FACE_COUNT};

use super::{cube_megatexels, CaptureLane, CaptureParams};

static FACE_VIEWS: OnceLock<[TextureViewDescriptor<'static>; CUBE_FACE_COUNT]> = OnceLock::new();

const FACE_VIEW_LABELS: [&str; CUBE_FACE_COUNT] = [
    "cube_face_view_+x",
    "cube_face_view_-x",
    "cube_face_view_+y",
    "cube_face_view_-y",
    "cube_face_view_+z",
    "cube_face_view_-z",
];

/// The process-wide view descriptor selecting `face` in a cube texture.
///
/// The table is built on first use and never changes afterwards.
pub fn face_view(face: CubeFace) -> &'static TextureViewDescriptor<'static> {
    let views = FACE_VIEWS.get_or_init(|| {
        CubeFace::ALL.map(|f| TextureViewDescriptor {
            label: Some(Cow::Borrowed(FACE_VIEW_LABELS[f.index()])),
            dimension: TextureViewDimension::D2,
            base_array_layer: f.index() as u32,
            array_layer_count: Some(1),
        })
    });
    &views[face.index()]
}

/// A lane that renders every face directly into the final cube texture.
#[derive(Debug)]
pub struct DirectTargetLane {
    device: Arc<dyn GraphicsDevice>,
    params: CaptureParams,
    cube: Option<CubeTexture>,
    captured: [bool; CUBE_FACE_COUNT],
}

impl DirectTargetLane {
    /// Creates a lane. The cube texture is allocated on the first capture.
    pub fn new(device: Arc<dyn GraphicsDevice>, params: CaptureParams) -> Self {
        Self {
            device,
            params,
            cube: None,
            captured: [false; CUBE_FACE_COUNT],
        }
    }

    /// The cube texture being filled, once allocated.
    pub fn target(&self) -> Option<&CubeTexture> {
        self.cube.as_ref()
    }
}

impl CaptureLane for DirectTargetLane {
    fn strategy_name(&self) -> &'static str {
        "DirectTarget"
    }

    fn estimate_cost(&self) -> f32 {
        cube_megatexels(&self.params)
    }

    fn capture_face(&mut self, renderer: &mut dyn SceneRenderer, face: CubeFace) {
        if !renderer.supports_cube_face_targets() {
            panic!("DirectTargetLane: renderer {renderer:?} cannot render into cube faces");
        }

        let (device, params) = (&self.device, &self.params);
        let cube = self.cube.get_or_insert_with(|| {
            CubeTexture::allocate(
                device.clone(),
                "direct_target_cube",
                params.face_size,
                params.format,
            )
            .unwrap_or_else(|e| panic!("DirectTargetLane: cube allocation failed: {e}"))
        });

        let target = RenderTarget::CubeFace {
            texture: cube.id(),
            face,
            view: face_view(face),
        };
        renderer
            .render(&Viewpoint::for_face(self.params.position, face), target)
            .unwrap_or_else(|e| panic!("DirectTargetLane: rendering face {face} failed: {e}"));
        self.captured[face.index()] = true;
    }

    fn assemble(&mut self) -> CubeTexture {
        if let Some(missing) = CubeFace::ALL.iter().find(|f| !self.captured[f.index()]) {
            panic!("DirectTargetLane: assemble called before face {missing} was captured");
        }
        self.captured = [false; CUBE_FACE_COUNT];
        match self.cube.take() {
            Some(cube) => cube,
            None => panic!("DirectTargetLane: assemble called twice"),
        }
    }

    fn release(&mut self) {
        // Dropping the cube destroys it.
        if let Some(cube) = self.cube.take() {
            log::debug!("DirectTargetLane: released unfinished cube {:?}", cube.id());
        }
        self.captured = [false; CUBE_FACE_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_views_select_one_layer() {
        for face in CubeFace::ALL {
            let view = face_view(face);
            assert_eq!(view.base_array_layer, face.index() as u32);
            assert_eq!(view.array_layer_count, Some(1));
        }
    }

    #[test]
    fn test_face_views_are_shared() {
        let a = face_view(CubeFace::NegativeY) as *const _;
        let b = face_view(CubeFace::NegativeY) as *const _;
        assert_eq!(a, b);
    }
}
