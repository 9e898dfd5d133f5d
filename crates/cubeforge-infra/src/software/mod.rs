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

//! A CPU implementation of the host contracts.
//!
//! Textures are plain byte vectors. The scene renderer paints a deterministic
//! image per cube face so captures can be verified texel by texel.

mod bridge;
mod device;
mod renderer;

pub use bridge::SoftwareBlitBridge;
pub use device::SoftwareDevice;
pub use renderer::{face_image, RenderRecord, SoftwareSceneRenderer};
