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

//! A build job: one state machine plus the callbacks of its request.

use std::fmt;

use cubeforge_core::renderer::SceneRenderer;
use cubeforge_lanes::CaptureStrategy;

use super::machine::{BuildMachine, BUILD_STEP_COUNT};
use super::request::{BuildOutcome, CompletionCallback, JobId, StepCallback, StepEvent};

/// One in-flight build.
///
/// The completion callback fires exactly once: with the cube when the job
/// finishes, or with [`BuildOutcome::Cancelled`] when it is cancelled or
/// dropped unfinished.
pub struct BuildJob {
    id: JobId,
    strategy: CaptureStrategy,
    machine: Option<BuildMachine>,
    on_complete: Option<CompletionCallback>,
    on_begin_step: Option<StepCallback>,
    on_end_step: Option<StepCallback>,
}

impl BuildJob {
    /// Couples `machine` to the callbacks of a request.
    pub fn new(
        id: JobId,
        strategy: CaptureStrategy,
        machine: BuildMachine,
        on_complete: CompletionCallback,
        on_begin_step: Option<StepCallback>,
        on_end_step: Option<StepCallback>,
    ) -> Self {
        Self {
            id,
            strategy,
            machine: Some(machine),
            on_complete: Some(on_complete),
            on_begin_step,
            on_end_step,
        }
    }

    /// The job's ID.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// The capture strategy the job uses.
    pub fn strategy(&self) -> CaptureStrategy {
        self.strategy
    }

    /// Steps done so far.
    pub fn progress(&self) -> usize {
        self.machine.as_ref().map_or(BUILD_STEP_COUNT, |m| m.step())
    }

    /// Whether the job finished or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.machine.is_none()
    }

    /// The relative cost of the job's lane.
    pub fn estimate_cost(&self) -> f32 {
        self.machine.as_ref().map_or(0.0, |m| m.lane().estimate_cost())
    }

    /// Advances the job while `budget` remains, one unit per step.
    ///
    /// Stops as soon as the cube is assembled, leaving the rest of the budget.
    /// Returns `true` if the job finished during this call, in which case the
    /// completion callback has run and the machine is disposed.
    ///
    /// # Panics
    ///
    /// Panics if the job already finished.
    pub fn advance(&mut self, budget: &mut u32, renderer: &mut dyn SceneRenderer) -> bool {
        let id = self.id;
        let machine = match self.machine.as_mut() {
            Some(machine) => machine,
            None => panic!("BuildJob {id} advanced after it finished"),
        };
        if *budget == 0 {
            return false;
        }

        if let Some(callback) = self.on_begin_step.as_mut() {
            callback(&StepEvent {
                job: id,
                step: machine.step(),
            });
        }

        while *budget > 0 {
            machine.advance_one_step(renderer);
            *budget -= 1;
            if machine.is_complete() {
                break;
            }
        }

        if let Some(callback) = self.on_end_step.as_mut() {
            callback(&StepEvent {
                job: id,
                step: machine.step(),
            });
        }

        if !machine.is_complete() {
            return false;
        }

        let outcome = match machine.take_result() {
            Some(texture) => BuildOutcome::Completed(texture),
            None => panic!("BuildJob {id} completed without a result"),
        };
        log::info!("BuildJob {id} completed");
        self.finish(outcome);
        true
    }

    /// Cancels the job, delivering [`BuildOutcome::Cancelled`].
    ///
    /// Returns `false` if it had already finished.
    pub fn cancel(&mut self) -> bool {
        if self.machine.is_none() {
            return false;
        }
        log::info!("BuildJob {} cancelled at step {}", self.id, self.progress());
        self.finish(BuildOutcome::Cancelled);
        true
    }

    fn finish(&mut self, outcome: BuildOutcome) {
        if let Some(callback) = self.on_complete.take() {
            callback(outcome);
        }
        if let Some(mut machine) = self.machine.take() {
            machine.dispose();
        }
    }
}

impl Drop for BuildJob {
    fn drop(&mut self) {
        if !self.is_finished() {
            log::warn!("BuildJob {} dropped unfinished, cancelling", self.id);
            self.cancel();
        }
    }
}

impl fmt::Debug for BuildJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildJob")
            .field("id", &self.id)
            .field("strategy", &self.strategy)
            .field("progress", &self.progress())
            .finish_non_exhaustive()
    }
}
