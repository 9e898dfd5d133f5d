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

//! Implements the portable, CPU read-back capture strategy.
//!
//! Every face is rendered into one reusable scratch texture, read back into a
//! [`PixelCache`] (flipped as configured), and the six caches are uploaded into
//! a freshly allocated cube texture on assembly. It is the slowest lane but
//! needs nothing from the host beyond plain texture reads and writes.

use std::sync::Arc;

use cubeforge_core::math::{Extent3D, Origin3D};
use cubeforge_core::renderer::{
    GraphicsDevice, RenderTarget, SceneRenderer, TextureDescriptor, TextureId,
};
use cubeforge_core::{CubeFace, CubeTexture, Viewpoint, CUBE_FACE_COUNT};

use super::{cube_megatexels, destroy_scratch, CaptureLane, CaptureParams, FlipPolicy, PixelCache};

/// A lane that copies every face through CPU memory.
#[derive(Debug)]
pub struct CpuCopyLane {
    device: Arc<dyn GraphicsDevice>,
    params: CaptureParams,
    flip: FlipPolicy,
    scratch: Option<TextureId>,
    readback: Vec<u8>,
    faces: [Option<PixelCache>; CUBE_FACE_COUNT],
}

impl CpuCopyLane {
    /// Creates a lane. Nothing is allocated until the first capture.
    pub fn new(device: Arc<dyn GraphicsDevice>, params: CaptureParams, flip: FlipPolicy) -> Self {
        Self {
            device,
            params,
            flip,
            scratch: None,
            readback: Vec::new(),
            faces: Default::default(),
        }
    }

    /// The flip applied while reading faces back.
    pub fn flip(&self) -> FlipPolicy {
        self.flip
    }

    /// The cached texels of `face`, if it has been captured.
    pub fn face_cache(&self, face: CubeFace) -> Option<&PixelCache> {
        self.faces[face.index()].as_ref()
    }

    fn scratch_texture(&mut self) -> TextureId {
        if let Some(id) = self.scratch {
            return id;
        }
        let descriptor =
            TextureDescriptor::face_target("cpu_copy_scratch", self.params.face_size, self.params.format);
        let id = self
            .device
            .create_texture(&descriptor)
            .unwrap_or_else(|e| panic!("Failed to allocate CPU copy scratch texture: {e}"));
        self.readback = vec![0; descriptor.layer_size_in_bytes()];
        log::debug!("CpuCopyLane: allocated scratch texture {id:?}");
        self.scratch = Some(id);
        id
    }
}

impl CaptureLane for CpuCopyLane {
    fn strategy_name(&self) -> &'static str {
        "CpuCopy"
    }

    fn estimate_cost(&self) -> f32 {
        // Render, read back, and upload every texel.
        3.0 * cube_megatexels(&self.params)
    }

    fn capture_face(&mut self, renderer: &mut dyn SceneRenderer, face: CubeFace) {
        let scratch = self.scratch_texture();
        let size = self.params.face_size;

        renderer
            .render(
                &Viewpoint::for_face(self.params.position, face),
                RenderTarget::Texture(scratch),
            )
            .unwrap_or_else(|e| panic!("CpuCopyLane: rendering face {face} failed: {e}"));

        self.device
            .read_texture(scratch, Origin3D::ZERO, Extent3D::square(size), &mut self.readback)
            .unwrap_or_else(|e| panic!("CpuCopyLane: reading back face {face} failed: {e}"));

        let mut cache = PixelCache::new(size, size, self.params.format);
        cache
            .copy_from(&self.readback, self.flip)
            .unwrap_or_else(|e| panic!("CpuCopyLane: caching face {face} failed: {e}"));
        self.faces[face.index()] = Some(cache);
    }

    fn assemble(&mut self) -> CubeTexture {
        if let Some(missing) = CubeFace::ALL.iter().find(|f| self.faces[f.index()].is_none()) {
            panic!("CpuCopyLane: assemble called before face {missing} was captured");
        }

        let size = self.params.face_size;
        let cube = CubeTexture::allocate(self.device.clone(), "cpu_copy_cube", size, self.params.format)
            .unwrap_or_else(|e| panic!("CpuCopyLane: cube allocation failed: {e}"));

        for face in CubeFace::ALL {
            if let Some(cache) = self.faces[face.index()].take() {
                self.device
                    .write_texture(
                        cube.id(),
                        cache.as_bytes(),
                        Some(cache.bytes_per_row()),
                        Origin3D::layer(face.index() as u32),
                        Extent3D::square(size),
                    )
                    .unwrap_or_else(|e| panic!("CpuCopyLane: uploading face {face} failed: {e}"));
            }
        }

        self.release();
        cube
    }

    fn release(&mut self) {
        if let Some(id) = self.scratch.take() {
            destroy_scratch(self.device.as_ref(), id);
            log::debug!("CpuCopyLane: released scratch texture {id:?}");
        }
        self.faces = Default::default();
        self.readback = Vec::new();
    }
}

impl Drop for CpuCopyLane {
    fn drop(&mut self) {
        self.release();
    }
}
