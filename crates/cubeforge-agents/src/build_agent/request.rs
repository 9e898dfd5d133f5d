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

use std::fmt;

use cubeforge_core::math::Vec3;
use cubeforge_core::CubeTexture;
use cubeforge_lanes::CaptureStrategy;

/// Identifies a submitted build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

/// How a build ended.
#[derive(Debug)]
pub enum BuildOutcome {
    /// The cube was built. The receiver owns it.
    Completed(CubeTexture),
    /// The build was cancelled before it finished.
    Cancelled,
}

impl BuildOutcome {
    /// Whether this is the cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BuildOutcome::Cancelled)
    }

    /// The finished cube, if any.
    pub fn into_texture(self) -> Option<CubeTexture> {
        match self {
            BuildOutcome::Completed(texture) => Some(texture),
            BuildOutcome::Cancelled => None,
        }
    }
}

/// Progress passed to the per-event step callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    /// The job being advanced.
    pub job: JobId,
    /// The job's next step (`0..=7`).
    pub step: usize,
}

/// Receives the outcome of a build, exactly once.
pub type CompletionCallback = Box<dyn FnOnce(BuildOutcome) + Send>;

/// Called around each slice of work a job gets during a frame event.
pub type StepCallback = Box<dyn FnMut(&StepEvent) + Send>;

/// Everything needed to start a build. Immutable once submitted.
pub struct BuildRequest {
    pub(crate) face_size: u32,
    pub(crate) position: Vec3,
    pub(crate) strategy: Option<CaptureStrategy>,
    pub(crate) on_complete: CompletionCallback,
    pub(crate) on_begin_step: Option<StepCallback>,
    pub(crate) on_end_step: Option<StepCallback>,
}

impl BuildRequest {
    /// A request for a cube of `face_size` texels seen from `position`.
    ///
    /// The scheduler's default strategy is used unless
    /// [`with_strategy`](Self::with_strategy) picks one.
    pub fn new(
        face_size: u32,
        position: Vec3,
        on_complete: impl FnOnce(BuildOutcome) + Send + 'static,
    ) -> Self {
        Self {
            face_size,
            position,
            strategy: None,
            on_complete: Box::new(on_complete),
            on_begin_step: None,
            on_end_step: None,
        }
    }

    /// Picks the capture strategy.
    pub fn with_strategy(mut self, strategy: CaptureStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Called before the job does any work during a frame event.
    pub fn on_begin_step(mut self, callback: impl FnMut(&StepEvent) + Send + 'static) -> Self {
        self.on_begin_step = Some(Box::new(callback));
        self
    }

    /// Called after the job did its work during a frame event.
    pub fn on_end_step(mut self, callback: impl FnMut(&StepEvent) + Send + 'static) -> Self {
        self.on_end_step = Some(Box::new(callback));
        self
    }

    /// Requested face size.
    pub fn face_size(&self) -> u32 {
        self.face_size
    }

    /// Requested capture position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Requested strategy, if any.
    pub fn strategy(&self) -> Option<CaptureStrategy> {
        self.strategy
    }
}

impl fmt::Debug for BuildRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildRequest")
            .field("face_size", &self.face_size)
            .field("position", &self.position)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
