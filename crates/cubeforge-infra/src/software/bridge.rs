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

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cubeforge_core::renderer::{NativeBlitBridge, NativeTextureHandle, ResourceError, TextureId};
use cubeforge_core::CUBE_FACE_COUNT;

use super::SoftwareDevice;

/// A [`NativeBlitBridge`] copying between textures of a [`SoftwareDevice`].
///
/// Native handles are the device's texture IDs. It can be told to demand a
/// registration before its first blit, and counts both kinds of calls.
#[derive(Debug)]
pub struct SoftwareBlitBridge {
    device: Arc<SoftwareDevice>,
    requires_registration: bool,
    registrations: AtomicUsize,
    blits: AtomicUsize,
}

impl SoftwareBlitBridge {
    /// Creates a bridge that needs no registration.
    pub fn new(device: Arc<SoftwareDevice>) -> Self {
        Self {
            device,
            requires_registration: false,
            registrations: AtomicUsize::new(0),
            blits: AtomicUsize::new(0),
        }
    }

    /// Creates a bridge that refuses to blit until registered.
    pub fn with_registration(device: Arc<SoftwareDevice>) -> Self {
        Self {
            requires_registration: true,
            ..Self::new(device)
        }
    }

    /// How many times registration ran.
    pub fn registration_count(&self) -> usize {
        self.registrations.load(Ordering::Relaxed)
    }

    /// How many cube blits were performed.
    pub fn blit_count(&self) -> usize {
        self.blits.load(Ordering::Relaxed)
    }
}

impl NativeBlitBridge for SoftwareBlitBridge {
    fn requires_registration(&self) -> bool {
        self.requires_registration
    }

    fn register_plugin(&self) -> Result<(), ResourceError> {
        self.registrations.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn blit_cubemap(
        &self,
        sources: &[NativeTextureHandle; CUBE_FACE_COUNT],
        destination: NativeTextureHandle,
        face_size: u32,
    ) -> Result<(), ResourceError> {
        if self.requires_registration && self.registration_count() == 0 {
            return Err(ResourceError::BackendError(
                "Blit bridge used before registration".to_owned(),
            ));
        }
        let destination = TextureId(destination.0 as usize);
        for (layer, source) in sources.iter().enumerate() {
            self.device
                .copy_to_layer(TextureId(source.0 as usize), destination, layer as u32, face_size)?;
        }
        self.blits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
