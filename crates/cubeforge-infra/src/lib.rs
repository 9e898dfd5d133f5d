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

//! # Cubeforge Infra
//!
//! Concrete implementations of the host contracts defined in `cubeforge-core`.
//!
//! - [`software`] is a CPU host: a texture store, a deterministic scene renderer,
//!   and a blit bridge. It runs anywhere and is what the tests and the sandbox use.
//! - [`frame`] provides a frame event source a host loop can pump.

#![warn(missing_docs)]

pub mod frame;
pub mod software;

pub use frame::FrameEventDispatcher;
pub use software::{
    RenderRecord, SoftwareBlitBridge, SoftwareDevice, SoftwareSceneRenderer,
};
