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

//! A thread-safe, shareable scheduler with cancellation handles.

use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use cubeforge_core::{FrameEvent, FrameEventSource};

use super::error::{HookError, SubmitError};
use super::frame_hook::FrameHook;
use super::request::{BuildOutcome, BuildRequest, CompletionCallback, JobId};
use super::scheduler::BuildScheduler;
use super::status::SchedulerStatus;

type Outbox = Mutex<Vec<(CompletionCallback, BuildOutcome)>>;

enum HookState {
    Never,
    Attached(FrameHook),
    Closed,
}

pub(crate) struct Inner {
    scheduler: Mutex<BuildScheduler>,
    // Outcomes are parked here and delivered once the scheduler lock is
    // released, so completion callbacks may call back into the scheduler.
    outbox: Arc<Outbox>,
    hook: Mutex<HookState>,
}

impl Inner {
    fn deliver(&self) {
        loop {
            let parked = mem::take(&mut *self.outbox.lock().unwrap());
            if parked.is_empty() {
                break;
            }
            for (callback, outcome) in parked {
                callback(outcome);
            }
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let HookState::Attached(mut hook) =
            mem::replace(self.hook.get_mut().unwrap_or_else(PoisonError::into_inner), HookState::Closed)
        {
            hook.detach();
        }
        self.scheduler
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel_all();
        let parked = mem::take(&mut *self.outbox.lock().unwrap_or_else(PoisonError::into_inner));
        for (callback, outcome) in parked {
            callback(outcome);
        }
    }
}

/// A [`BuildScheduler`] behind a mutex, shared by the host loop, the frame
/// hook, and cancellation handles.
///
/// Completion callbacks run after the scheduler lock is released, so they may
/// submit or cancel builds. Step callbacks run while it is held and must not
/// call back into the scheduler.
#[derive(Clone)]
pub struct SharedScheduler {
    inner: Arc<Inner>,
}

impl SharedScheduler {
    /// Wraps `scheduler`.
    pub fn new(scheduler: BuildScheduler) -> Self {
        Self {
            inner: Arc::new(Inner {
                scheduler: Mutex::new(scheduler),
                outbox: Arc::new(Mutex::new(Vec::new())),
                hook: Mutex::new(HookState::Never),
            }),
        }
    }

    /// Locks the scheduler for direct access.
    pub fn lock(&self) -> MutexGuard<'_, BuildScheduler> {
        self.inner.scheduler.lock().unwrap()
    }

    /// Submits a build and returns a handle able to cancel it.
    pub fn submit(&self, mut request: BuildRequest) -> Result<CancellationHandle, SubmitError> {
        let outbox = self.inner.outbox.clone();
        let on_complete = mem::replace(&mut request.on_complete, Box::new(|_| {}));
        request.on_complete = Box::new(move |outcome| {
            outbox.lock().unwrap().push((on_complete, outcome));
        });

        let job = self.lock().submit(request)?;
        Ok(CancellationHandle {
            scheduler: Arc::downgrade(&self.inner),
            job,
        })
    }

    /// Forwards a host frame event to the scheduler.
    pub fn on_frame_event(&self, event: &FrameEvent) {
        self.lock().on_frame_event(event);
        self.inner.deliver();
    }

    /// Cancels every active and pending job.
    pub fn cancel_all(&self) -> usize {
        let cancelled = self.lock().cancel_all();
        self.inner.deliver();
        cancelled
    }

    /// A snapshot of the scheduler's state.
    pub fn report_status(&self) -> SchedulerStatus {
        self.lock().report_status()
    }

    /// Subscribes the scheduler to `source` at its configured hook phase.
    ///
    /// A scheduler attaches once over its lifetime.
    pub fn attach(&self, source: Arc<dyn FrameEventSource>) -> Result<(), HookError> {
        let mut state = self.inner.hook.lock().unwrap();
        if !matches!(*state, HookState::Never) {
            return Err(HookError::AlreadyAttached);
        }
        let phase = self.lock().config().hook_phase;
        *state = HookState::Attached(FrameHook::attach(source, phase, self));
        Ok(())
    }

    /// Whether a frame hook is currently attached.
    pub fn is_attached(&self) -> bool {
        matches!(*self.inner.hook.lock().unwrap(), HookState::Attached(_))
    }

    /// Detaches from the frame source, then cancels every job and refuses new ones.
    ///
    /// Returns how many jobs were cancelled.
    pub fn shutdown(&self) -> usize {
        let previous = mem::replace(&mut *self.inner.hook.lock().unwrap(), HookState::Closed);
        if let HookState::Attached(mut hook) = previous {
            hook.detach();
        }
        let cancelled = self.lock().shutdown();
        self.inner.deliver();
        cancelled
    }

    pub(crate) fn downgrade(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }
}

impl fmt::Debug for SharedScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedScheduler")
            .field("status", &self.report_status())
            .finish_non_exhaustive()
    }
}

/// Cancels one submitted build.
///
/// The handle does not keep the scheduler alive; once the scheduler is gone
/// cancelling is a no-op.
#[derive(Clone)]
pub struct CancellationHandle {
    scheduler: Weak<Inner>,
    job: JobId,
}

impl CancellationHandle {
    /// The build this handle refers to.
    pub fn job_id(&self) -> JobId {
        self.job
    }

    /// Cancels the build if it has not finished yet.
    ///
    /// Returns `true` if this call cancelled it.
    pub fn cancel(&self) -> bool {
        let Some(inner) = self.scheduler.upgrade() else {
            return false;
        };
        let cancelled = inner.scheduler.lock().unwrap().cancel_job(self.job);
        inner.deliver();
        cancelled
    }
}

impl fmt::Debug for CancellationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationHandle")
            .field("job", &self.job)
            .finish_non_exhaustive()
    }
}
