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

//! Capture lanes - strategies for producing a cube texture face by face.

use std::fmt::{self, Debug};
use std::sync::Arc;

use cubeforge_core::math::Vec3;
use cubeforge_core::renderer::{GraphicsDevice, SceneRenderer, TextureFormat};
use cubeforge_core::{CubeFace, CubeTexture};
use serde::{Deserialize, Serialize};

mod blit_bridge;
mod cpu_copy_lane;
mod direct_target_lane;
mod native_copy_lane;
mod pixel_cache;

pub use blit_bridge::*;
pub use cpu_copy_lane::*;
pub use direct_target_lane::*;
pub use native_copy_lane::*;
pub use pixel_cache::*;

/// Selects the capture lane a build uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaptureStrategy {
    /// Read every face back to CPU memory, upload all six at the end.
    CpuCopy,
    /// Keep six face textures and assemble them with one native blit.
    NativeCopy,
    /// Render every face straight into the final cube texture.
    #[default]
    DirectTarget,
}

impl CaptureStrategy {
    /// All strategies, slowest first.
    pub const ALL: [CaptureStrategy; 3] = [
        CaptureStrategy::CpuCopy,
        CaptureStrategy::NativeCopy,
        CaptureStrategy::DirectTarget,
    ];
}

/// What a lane captures: the face size, the capture position, and the format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureParams {
    /// Width and height of every face, in texels.
    pub face_size: u32,
    /// World-space position all six faces are captured from.
    pub position: Vec3,
    /// Texel format of the faces and of the assembled cube texture.
    pub format: TextureFormat,
}

/// A strategy that captures the six faces of a cube texture and assembles them.
///
/// The orchestrator calls [`capture_face`](Self::capture_face) once per face in
/// [`CubeFace::ALL`] order, then [`assemble`](Self::assemble) exactly once.
/// [`release`](Self::release) may be called at any point and is idempotent.
/// Lanes allocate nothing before their first capture, and release whatever
/// they still own when dropped.
///
/// Misuse (assembling early, a failing render or device call during capture)
/// is a sequencing bug and panics.
pub trait CaptureLane: Send + Debug {
    /// A human-readable identifier for this strategy.
    fn strategy_name(&self) -> &'static str;

    /// A relative cost of building a whole cube with this lane. Higher is slower.
    fn estimate_cost(&self) -> f32;

    /// Renders `face` with `renderer` and stores the result.
    fn capture_face(&mut self, renderer: &mut dyn SceneRenderer, face: CubeFace);

    /// Produces the finished cube texture from the six captured faces.
    fn assemble(&mut self) -> CubeTexture;

    /// Destroys every scratch resource still owned by the lane.
    fn release(&mut self);
}

/// Shared resources every lane is built from.
#[derive(Clone)]
pub struct LaneContext {
    /// The device textures are allocated on.
    pub device: Arc<dyn GraphicsDevice>,
    /// The native blit path, required by [`CaptureStrategy::NativeCopy`].
    pub bridge: Option<Arc<BlitBridge>>,
    /// Flip applied by [`CaptureStrategy::CpuCopy`] when reading faces back.
    pub cpu_flip: FlipPolicy,
}

impl Debug for LaneContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaneContext")
            .field("device", &self.device)
            .field("bridge", &self.bridge.is_some())
            .field("cpu_flip", &self.cpu_flip)
            .finish()
    }
}

/// Creates a fresh lane for one build.
///
/// # Panics
///
/// Panics if `strategy` is [`CaptureStrategy::NativeCopy`] and the context has
/// no blit bridge.
pub fn create_lane(
    strategy: CaptureStrategy,
    params: CaptureParams,
    context: &LaneContext,
) -> Box<dyn CaptureLane> {
    let device = context.device.clone();
    match strategy {
        CaptureStrategy::CpuCopy => Box::new(CpuCopyLane::new(device, params, context.cpu_flip)),
        CaptureStrategy::NativeCopy => {
            let bridge = match &context.bridge {
                Some(bridge) => bridge.clone(),
                None => panic!("NativeCopy capture requested without a native blit bridge"),
            };
            Box::new(NativeCopyLane::new(device, bridge, params))
        }
        CaptureStrategy::DirectTarget => Box::new(DirectTargetLane::new(device, params)),
    }
}

// Megatexels written for a whole cube, the unit lane costs are scaled by.
fn cube_megatexels(params: &CaptureParams) -> f32 {
    let face = params.face_size as f32 * params.face_size as f32;
    face * 6.0 / 1_000_000.0
}

// Destroys a lane-owned scratch texture. Failures are logged, never raised.
fn destroy_scratch(device: &dyn GraphicsDevice, id: cubeforge_core::renderer::TextureId) {
    if let Err(e) = device.destroy_texture(id) {
        log::error!("Failed to destroy scratch texture {id:?}: {e}");
    }
}
