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

//! One-time-registration wrapper around a host's native blit path.

use std::fmt;
use std::sync::{Arc, Once};

use cubeforge_core::renderer::{NativeBlitBridge, NativeTextureHandle, ResourceError};
use cubeforge_core::CUBE_FACE_COUNT;

/// Owns a [`NativeBlitBridge`] and makes sure its registration runs at most once.
///
/// One `BlitBridge` is shared by every native-copy build of a process.
pub struct BlitBridge {
    native: Arc<dyn NativeBlitBridge>,
    registration: Once,
}

impl BlitBridge {
    /// Wraps `native`.
    pub fn new(native: Arc<dyn NativeBlitBridge>) -> Self {
        Self {
            native,
            registration: Once::new(),
        }
    }

    /// Registers the native plugin if the host needs it. No-op after the first call.
    ///
    /// # Panics
    ///
    /// Panics if the registration fails. The bridge is unusable afterwards and
    /// every later call panics too.
    pub fn ensure_registered(&self) {
        self.registration.call_once(|| {
            if !self.native.requires_registration() {
                return;
            }
            match self.native.register_plugin() {
                Ok(()) => log::info!("Native blit bridge registered"),
                Err(e) => panic!("Native blit bridge registration failed: {e}"),
            }
        });
    }

    /// Copies the six `sources` into the faces of `destination`.
    pub fn blit(
        &self,
        sources: &[NativeTextureHandle; CUBE_FACE_COUNT],
        destination: NativeTextureHandle,
        face_size: u32,
    ) -> Result<(), ResourceError> {
        self.ensure_registered();
        self.native.blit_cubemap(sources, destination, face_size)
    }
}

impl fmt::Debug for BlitBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlitBridge")
            .field("native", &self.native)
            .field("registered", &self.registration.is_completed())
            .finish()
    }
}
