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

//! Error types for device and renderer operations.

use std::fmt;

use super::texture::{TextureFormat, TextureId};

/// An error related to the creation, use, or rendering of a texture.
#[derive(Debug)]
pub enum ResourceError {
    /// No texture exists for the given ID.
    NotFound(TextureId),
    /// A texture region lies outside of the texture bounds.
    OutOfBounds,
    /// The data passed to or from the texture has the wrong size.
    SizeMismatch {
        /// The number of bytes the operation needed.
        expected: usize,
        /// The number of bytes it was given.
        actual: usize,
    },
    /// The operation does not support the texture's format.
    UnsupportedFormat(TextureFormat),
    /// The host renderer failed to produce an image.
    RenderFailed(String),
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound(id) => write!(f, "Texture not found for ID: {id:?}"),
            ResourceError::OutOfBounds => write!(f, "Texture access out of bounds."),
            ResourceError::SizeMismatch { expected, actual } => {
                write!(f, "Texture data size mismatch: expected {expected} bytes, got {actual}")
            }
            ResourceError::UnsupportedFormat(format) => {
                write!(f, "Unsupported texture format: {format:?}")
            }
            ResourceError::RenderFailed(msg) => write!(f, "Scene render failed: {msg}"),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}
