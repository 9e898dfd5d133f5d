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

//! # Cubeforge Lanes
//!
//! Capture lanes are the interchangeable strategies that turn six directional
//! renders into one cube texture. Each lane trades portability for speed:
//!
//! - [`CpuCopyLane`] reads every face back to CPU memory and uploads them at the end.
//! - [`NativeCopyLane`] keeps the six face textures alive and assembles them with
//!   one native blit.
//! - [`DirectTargetLane`] renders every face straight into the final cube texture.

#![warn(missing_docs)]

pub mod capture_lane;

pub use capture_lane::*;
