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

use thiserror::Error;

/// Why a build request was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Faces must be at least one texel wide.
    #[error("Cube face size must be positive")]
    ZeroFaceSize,
    /// The scheduler no longer accepts work.
    #[error("The build scheduler has been shut down")]
    ShutDown,
}

/// Why a frame hook could not be attached.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HookError {
    /// A scheduler subscribes to frame events once over its lifetime.
    #[error("The scheduler has already been attached to a frame event source")]
    AlreadyAttached,
}
