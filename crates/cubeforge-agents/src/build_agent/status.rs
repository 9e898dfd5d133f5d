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

use cubeforge_lanes::CaptureStrategy;

use super::request::JobId;

/// A snapshot of a [`BuildScheduler`](super::BuildScheduler).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchedulerStatus {
    /// The job currently being advanced.
    pub active_job: Option<JobId>,
    /// The active job's strategy.
    pub active_strategy: Option<CaptureStrategy>,
    /// Steps the active job has done (`0..=7`).
    pub active_progress: usize,
    /// Jobs waiting behind the active one.
    pub pending_jobs: usize,
    /// Distinct frames seen.
    pub frames_observed: u64,
    /// Frames that passed the interval throttle.
    pub qualifying_events: u64,
    /// Build steps run.
    pub steps_executed: u64,
    /// Jobs accepted.
    pub jobs_submitted: u64,
    /// Jobs that delivered a cube.
    pub jobs_completed: u64,
    /// Jobs that delivered the cancellation outcome.
    pub jobs_cancelled: u64,
    /// Whether the scheduler was shut down.
    pub is_shut_down: bool,
}

impl SchedulerStatus {
    /// Whether nothing is active or pending.
    pub fn is_idle(&self) -> bool {
        self.active_job.is_none() && self.pending_jobs == 0
    }
}

impl fmt::Display for SchedulerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.active_job {
            Some(id) => write!(f, "active={id} step={}/7", self.active_progress)?,
            None => write!(f, "active=none")?,
        }
        write!(
            f,
            " pending={} frames={} qualifying={} steps={} submitted={} completed={} cancelled={}",
            self.pending_jobs,
            self.frames_observed,
            self.qualifying_events,
            self.steps_executed,
            self.jobs_submitted,
            self.jobs_completed,
            self.jobs_cancelled
        )
    }
}
