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

//! Implements the native-blit capture strategy.
//!
//! Each face is rendered into its own texture, which stays alive until
//! assembly. Assembly hands the six native handles to the [`BlitBridge`],
//! which copies them into a new cube texture without any CPU round trip.

use std::sync::Arc;

use cubeforge_core::renderer::{
    GraphicsDevice, NativeTextureHandle, RenderTarget, SceneRenderer, TextureDescriptor, TextureId,
};
use cubeforge_core::{CubeFace, CubeTexture, Viewpoint, CUBE_FACE_COUNT};

use super::{cube_megatexels, destroy_scratch, BlitBridge, CaptureLane, CaptureParams};

const FACE_LABELS: [&str; CUBE_FACE_COUNT] = [
    "native_copy_face_+x",
    "native_copy_face_-x",
    "native_copy_face_+y",
    "native_copy_face_-y",
    "native_copy_face_+z",
    "native_copy_face_-z",
];

/// A lane that keeps six face textures and assembles them with a native blit.
#[derive(Debug)]
pub struct NativeCopyLane {
    device: Arc<dyn GraphicsDevice>,
    bridge: Arc<BlitBridge>,
    params: CaptureParams,
    faces: [Option<TextureId>; CUBE_FACE_COUNT],
}

impl NativeCopyLane {
    /// Creates a lane. Nothing is allocated until the first capture.
    pub fn new(device: Arc<dyn GraphicsDevice>, bridge: Arc<BlitBridge>, params: CaptureParams) -> Self {
        Self {
            device,
            bridge,
            params,
            faces: [None; CUBE_FACE_COUNT],
        }
    }

    /// The texture holding `face`, if it has been captured.
    pub fn face_texture(&self, face: CubeFace) -> Option<TextureId> {
        self.faces[face.index()]
    }
}

impl CaptureLane for NativeCopyLane {
    fn strategy_name(&self) -> &'static str {
        "NativeCopy"
    }

    fn estimate_cost(&self) -> f32 {
        // Render plus one GPU-side copy per texel.
        2.0 * cube_megatexels(&self.params)
    }

    fn capture_face(&mut self, renderer: &mut dyn SceneRenderer, face: CubeFace) {
        if let Some(existing) = self.faces[face.index()] {
            panic!("NativeCopyLane: face {face} captured twice (already held by {existing:?})");
        }

        let descriptor = TextureDescriptor::face_target(
            FACE_LABELS[face.index()],
            self.params.face_size,
            self.params.format,
        );
        let id = self
            .device
            .create_texture(&descriptor)
            .unwrap_or_else(|e| panic!("NativeCopyLane: allocating face {face} failed: {e}"));
        // Owned from here on, so a failing render below still gets it released.
        self.faces[face.index()] = Some(id);

        renderer
            .render(
                &Viewpoint::for_face(self.params.position, face),
                RenderTarget::Texture(id),
            )
            .unwrap_or_else(|e| panic!("NativeCopyLane: rendering face {face} failed: {e}"));
    }

    fn assemble(&mut self) -> CubeTexture {
        let mut sources = [NativeTextureHandle(0); CUBE_FACE_COUNT];
        for face in CubeFace::ALL {
            let id = match self.faces[face.index()] {
                Some(id) => id,
                None => panic!("NativeCopyLane: assemble called before face {face} was captured"),
            };
            sources[face.index()] = self
                .device
                .native_handle(id)
                .unwrap_or_else(|e| panic!("NativeCopyLane: no native handle for face {face}: {e}"));
        }

        let size = self.params.face_size;
        let cube = CubeTexture::allocate(self.device.clone(), "native_copy_cube", size, self.params.format)
            .unwrap_or_else(|e| panic!("NativeCopyLane: cube allocation failed: {e}"));
        let destination = self
            .device
            .native_handle(cube.id())
            .unwrap_or_else(|e| panic!("NativeCopyLane: no native handle for cube: {e}"));

        self.bridge
            .blit(&sources, destination, size)
            .unwrap_or_else(|e| panic!("NativeCopyLane: native blit failed: {e}"));

        self.release();
        cube
    }

    fn release(&mut self) {
        for slot in self.faces.iter_mut() {
            if let Some(id) = slot.take() {
                destroy_scratch(self.device.as_ref(), id);
            }
        }
    }
}

impl Drop for NativeCopyLane {
    fn drop(&mut self) {
        self.release();
    }
}
