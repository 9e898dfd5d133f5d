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

//! # Cubeforge Core
//!
//! Foundational crate containing the math primitives, texture API types, and
//! the interface contracts a host must fulfil (device, scene renderer, native
//! blit bridge, frame event source) for incremental cube texture builds.

#![warn(missing_docs)]

pub mod cube;
pub mod frame;
pub mod math;
pub mod renderer;

pub use cube::{CubeFace, CubeTexture, Viewpoint, CUBE_FACE_COUNT, CUBE_FACE_FOV_DEGREES};
pub use frame::{FrameEvent, FrameEventSource, FrameListener, FramePhase, SubscriptionId};
