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

use crate::renderer::error::ResourceError;
use crate::renderer::texture::NativeTextureHandle;
use crate::CUBE_FACE_COUNT;

/// A native accelerated path copying six face images into one cube texture.
pub trait NativeBlitBridge: Send + Sync + Debug {
    /// Whether [`register_plugin`](Self::register_plugin) must run before the first blit.
    fn requires_registration(&self) -> bool {
        false
    }

    /// Performs the host's one-time native registration.
    fn register_plugin(&self) -> Result<(), ResourceError> {
        Ok(())
    }

    /// Copies `sources[i]` into face `i` of `destination`.
    fn blit_cubemap(
        &self,
        sources: &[NativeTextureHandle; CUBE_FACE_COUNT],
        destination: NativeTextureHandle,
        face_size: u32,
    ) -> Result<(), ResourceError>;
}
