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

//! The frame-driven build scheduler.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use cubeforge_core::renderer::{GraphicsDevice, NativeBlitBridge, SceneRenderer};
use cubeforge_core::FrameEvent;
use cubeforge_lanes::{create_lane, BlitBridge, CaptureParams, CaptureStrategy, LaneContext};

use super::config::{ConfigError, SchedulerConfig};
use super::error::SubmitError;
use super::job::BuildJob;
use super::machine::BuildMachine;
use super::request::{BuildRequest, JobId};
use super::status::SchedulerStatus;

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    frames_observed: u64,
    qualifying_events: u64,
    steps_executed: u64,
    jobs_submitted: u64,
    jobs_completed: u64,
    jobs_cancelled: u64,
}

/// Runs cube builds one at a time, a few steps per host frame.
///
/// Jobs run in submission order. The active job is advanced only from
/// [`on_frame_event`](Self::on_frame_event): repeated events of one logical
/// frame are ignored, then only every `frame_interval`-th frame qualifies, and
/// a qualifying frame spends at most `steps_per_event` steps, possibly across
/// several jobs.
///
/// The scheduler owns the scene renderer, so nothing else can move the
/// camera while a face is being captured. Jobs still pending when the
/// scheduler is dropped are cancelled.
pub struct BuildScheduler {
    config: SchedulerConfig,
    renderer: Box<dyn SceneRenderer>,
    lane_context: LaneContext,
    active: Option<BuildJob>,
    pending: VecDeque<BuildJob>,
    last_frame: Option<u64>,
    wait_count: u32,
    next_job_id: u64,
    shut_down: bool,
    counters: Counters,
}

impl BuildScheduler {
    /// Creates a scheduler rendering with `renderer` and allocating on `device`.
    pub fn new(
        config: SchedulerConfig,
        renderer: Box<dyn SceneRenderer>,
        device: Arc<dyn GraphicsDevice>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "BuildScheduler initialized (interval {}, {} step(s)/event, default {:?})",
            config.frame_interval,
            config.steps_per_event,
            config.default_strategy
        );
        let lane_context = LaneContext {
            device,
            bridge: None,
            cpu_flip: config.cpu_flip,
        };
        Ok(Self {
            config,
            renderer,
            lane_context,
            active: None,
            pending: VecDeque::new(),
            last_frame: None,
            wait_count: 0,
            next_job_id: 0,
            shut_down: false,
            counters: Counters::default(),
        })
    }

    /// Enables the native copy strategy through `bridge`.
    pub fn with_blit_bridge(mut self, bridge: Arc<dyn NativeBlitBridge>) -> Self {
        self.lane_context.bridge = Some(Arc::new(BlitBridge::new(bridge)));
        self
    }

    /// The scheduler's configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Queues a build. It becomes active right away if nothing else is.
    ///
    /// No resources are allocated until the job's first step.
    ///
    /// # Panics
    ///
    /// Panics if the request uses the native copy strategy and no blit bridge
    /// was configured, or the direct target strategy with a renderer that
    /// cannot render into cube faces.
    pub fn submit(&mut self, request: BuildRequest) -> Result<JobId, SubmitError> {
        if self.shut_down {
            return Err(SubmitError::ShutDown);
        }
        if request.face_size == 0 {
            return Err(SubmitError::ZeroFaceSize);
        }

        let strategy = request.strategy.unwrap_or(self.config.default_strategy);
        if strategy == CaptureStrategy::DirectTarget && !self.renderer.supports_cube_face_targets() {
            panic!("DirectTarget build requested but {:?} cannot render into cube faces", self.renderer);
        }

        let id = JobId(self.next_job_id);
        self.next_job_id += 1;
        let params = CaptureParams {
            face_size: request.face_size,
            position: request.position,
            format: self.config.face_format,
        };
        let lane = create_lane(strategy, params, &self.lane_context);
        let job = BuildJob::new(
            id,
            strategy,
            BuildMachine::new(lane),
            request.on_complete,
            request.on_begin_step,
            request.on_end_step,
        );
        self.counters.jobs_submitted += 1;

        if self.active.is_none() {
            log::info!("BuildScheduler: {id} submitted and activated ({strategy:?})");
            self.activate(job);
        } else {
            log::info!(
                "BuildScheduler: {id} submitted ({strategy:?}), {} ahead",
                self.pending.len() + 1
            );
            self.pending.push_back(job);
        }
        Ok(id)
    }

    /// Handles one host frame event.
    pub fn on_frame_event(&mut self, event: &FrameEvent) {
        if self.shut_down {
            return;
        }
        if self.last_frame == Some(event.frame_index) {
            log::trace!(
                "BuildScheduler: frame {} already handled, ignoring {:?}",
                event.frame_index,
                event.phase
            );
            return;
        }
        self.last_frame = Some(event.frame_index);
        self.counters.frames_observed += 1;

        self.wait_count += 1;
        if self.wait_count < self.config.frame_interval {
            log::trace!(
                "BuildScheduler: frame {} waiting ({}/{})",
                event.frame_index,
                self.wait_count,
                self.config.frame_interval
            );
            return;
        }
        self.wait_count = 0;
        self.counters.qualifying_events += 1;

        let mut budget = self.config.steps_per_event;
        while budget > 0 {
            let Some(job) = self.active.as_mut() else {
                break;
            };
            let before = budget;
            let finished = job.advance(&mut budget, self.renderer.as_mut());
            self.counters.steps_executed += u64::from(before - budget);

            if finished {
                self.counters.jobs_completed += 1;
                self.active = None;
                if let Some(next) = self.pending.pop_front() {
                    self.activate(next);
                }
            }
        }
    }

    /// Cancels one job, wherever it is.
    ///
    /// Cancelling the active job promotes the next pending one, which takes its
    /// first step on the next qualifying frame. Returns `false` if no
    /// unfinished job has this ID.
    pub fn cancel_job(&mut self, id: JobId) -> bool {
        if self.active.as_ref().is_some_and(|job| job.id() == id) {
            if let Some(mut job) = self.active.take() {
                job.cancel();
                self.counters.jobs_cancelled += 1;
            }
            if let Some(next) = self.pending.pop_front() {
                self.activate(next);
            }
            return true;
        }

        match self.pending.iter().position(|job| job.id() == id) {
            Some(index) => {
                if let Some(mut job) = self.pending.remove(index) {
                    job.cancel();
                    self.counters.jobs_cancelled += 1;
                }
                true
            }
            None => false,
        }
    }

    /// Cancels the active job and every pending job, in that order.
    ///
    /// Returns how many jobs were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        if let Some(mut job) = self.active.take() {
            job.cancel();
            cancelled += 1;
        }
        for mut job in self.pending.drain(..) {
            job.cancel();
            cancelled += 1;
        }
        self.counters.jobs_cancelled += cancelled as u64;
        if cancelled > 0 {
            log::info!("BuildScheduler: cancelled {cancelled} job(s)");
        }
        cancelled
    }

    /// Cancels everything and refuses further submissions.
    pub fn shutdown(&mut self) -> usize {
        if self.shut_down {
            return 0;
        }
        self.shut_down = true;
        let cancelled = self.cancel_all();
        log::info!("BuildScheduler shut down");
        cancelled
    }

    /// Whether [`shutdown`](Self::shutdown) was called.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// The active job's ID.
    pub fn active_job(&self) -> Option<JobId> {
        self.active.as_ref().map(BuildJob::id)
    }

    /// IDs of the pending jobs, in run order.
    pub fn pending_jobs(&self) -> Vec<JobId> {
        self.pending.iter().map(BuildJob::id).collect()
    }

    /// A snapshot of the scheduler's state and counters.
    pub fn report_status(&self) -> SchedulerStatus {
        let counters = self.counters;
        SchedulerStatus {
            active_job: self.active_job(),
            active_strategy: self.active.as_ref().map(BuildJob::strategy),
            active_progress: self.active.as_ref().map_or(0, BuildJob::progress),
            pending_jobs: self.pending.len(),
            frames_observed: counters.frames_observed,
            qualifying_events: counters.qualifying_events,
            steps_executed: counters.steps_executed,
            jobs_submitted: counters.jobs_submitted,
            jobs_completed: counters.jobs_completed,
            jobs_cancelled: counters.jobs_cancelled,
            is_shut_down: self.shut_down,
        }
    }

    fn activate(&mut self, job: BuildJob) {
        log::info!(
            "BuildScheduler: {} active ({:?}, estimated cost {:.4})",
            job.id(),
            job.strategy(),
            job.estimate_cost()
        );
        self.active = Some(job);
    }
}

impl Drop for BuildScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl fmt::Debug for BuildScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildScheduler")
            .field("config", &self.config)
            .field("renderer", &self.renderer)
            .field("active", &self.active)
            .field("pending", &self.pending)
            .field("last_frame", &self.last_frame)
            .field("wait_count", &self.wait_count)
            .finish_non_exhaustive()
    }
}
