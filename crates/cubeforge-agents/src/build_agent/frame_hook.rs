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

//! Subscription of a scheduler to a host frame event source.

use std::fmt;
use std::sync::Arc;

use cubeforge_core::{FrameEventSource, FramePhase, SubscriptionId};

use super::shared::SharedScheduler;

/// A live subscription forwarding one frame phase to a scheduler.
///
/// The listener only holds a weak reference, so the hook never keeps the
/// scheduler alive. The subscription is removed on drop.
pub struct FrameHook {
    source: Arc<dyn FrameEventSource>,
    phase: FramePhase,
    subscription: Option<SubscriptionId>,
}

impl FrameHook {
    /// Subscribes `scheduler` to `phase` events of `source`.
    pub fn attach(
        source: Arc<dyn FrameEventSource>,
        phase: FramePhase,
        scheduler: &SharedScheduler,
    ) -> Self {
        let target = scheduler.downgrade();
        let subscription = source.subscribe(
            phase,
            Box::new(move |event| {
                if let Some(scheduler) = SharedScheduler::upgrade(&target) {
                    scheduler.on_frame_event(event);
                }
            }),
        );
        log::info!("FrameHook attached to {phase:?} ({subscription:?})");
        Self {
            source,
            phase,
            subscription: Some(subscription),
        }
    }

    /// The phase this hook listens to.
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Whether the subscription is still live.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Removes the subscription. No-op once detached.
    pub fn detach(&mut self) {
        if let Some(id) = self.subscription.take() {
            if !self.source.unsubscribe(id) {
                log::warn!("FrameHook: {id:?} was already gone from the event source");
            }
            log::info!("FrameHook detached from {:?}", self.phase);
        }
    }
}

impl Drop for FrameHook {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for FrameHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHook")
            .field("phase", &self.phase)
            .field("subscription", &self.subscription)
            .finish()
    }
}
