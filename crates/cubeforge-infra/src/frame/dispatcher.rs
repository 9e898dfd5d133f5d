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

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use cubeforge_core::{FrameEvent, FrameEventSource, FrameListener, FramePhase, SubscriptionId};

struct Subscription {
    id: SubscriptionId,
    phase: FramePhase,
    // Taken out while the listener runs so the lock is not held during the call.
    listener: Option<FrameListener>,
}

/// A [`FrameEventSource`] the host loop pumps explicitly.
///
/// Listeners may subscribe or unsubscribe, including themselves, from inside
/// a callback.
#[derive(Default)]
pub struct FrameEventDispatcher {
    subscriptions: Mutex<Vec<Subscription>>,
    next_subscription_id: AtomicU64,
    frame_index: AtomicU64,
}

impl FrameEventDispatcher {
    /// Creates a dispatcher with no listeners, before frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    /// The index of the last frame run with [`run_frame`](Self::run_frame).
    pub fn frame_index(&self) -> u64 {
        self.frame_index.load(Ordering::Relaxed)
    }

    /// Fires `phase` for `frame_index` to every listener of that phase.
    ///
    /// Returns how many listeners were called.
    pub fn dispatch(&self, phase: FramePhase, frame_index: u64) -> usize {
        let event = FrameEvent { phase, frame_index };

        let mut taken: Vec<(SubscriptionId, FrameListener)> = {
            let mut subscriptions = self.subscriptions.lock().unwrap();
            subscriptions
                .iter_mut()
                .filter(|s| s.phase == phase)
                .filter_map(|s| s.listener.take().map(|l| (s.id, l)))
                .collect()
        };

        for (_, listener) in taken.iter_mut() {
            listener(&event);
        }

        let called = taken.len();
        let mut subscriptions = self.subscriptions.lock().unwrap();
        for (id, listener) in taken {
            // Listeners unsubscribed during the call are dropped here.
            if let Some(subscription) = subscriptions.iter_mut().find(|s| s.id == id) {
                subscription.listener = Some(listener);
            }
        }
        called
    }

    /// Runs one host frame: begin frame, `cameras` begin/end camera pairs, end frame.
    ///
    /// Returns the new frame index.
    pub fn run_frame(&self, cameras: usize) -> u64 {
        let frame_index = self.frame_index.fetch_add(1, Ordering::Relaxed) + 1;
        self.dispatch(FramePhase::BeginFrame, frame_index);
        for _ in 0..cameras {
            self.dispatch(FramePhase::BeginCamera, frame_index);
            self.dispatch(FramePhase::EndCamera, frame_index);
        }
        self.dispatch(FramePhase::EndFrame, frame_index);
        frame_index
    }
}

impl FrameEventSource for FrameEventDispatcher {
    fn subscribe(&self, phase: FramePhase, listener: FrameListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.lock().unwrap().push(Subscription {
            id,
            phase,
            listener: Some(listener),
        });
        log::debug!("FrameEventDispatcher: {id:?} subscribed to {phase:?}");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        let removed = subscriptions.len() != before;
        if removed {
            log::debug!("FrameEventDispatcher: {id:?} unsubscribed");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_dispatch_only_reaches_matching_phase() {
        let dispatcher = FrameEventDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        dispatcher.subscribe(
            FramePhase::BeginCamera,
            Box::new(move |e| sink.lock().unwrap().push(*e)),
        );

        dispatcher.run_frame(2);
        dispatcher.run_frame(0);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|e| e.phase == FramePhase::BeginCamera && e.frame_index == 1));
    }

    #[test]
    fn test_unsubscribe() {
        let dispatcher = FrameEventDispatcher::new();
        let id = dispatcher.subscribe(FramePhase::BeginFrame, Box::new(|_| {}));
        assert_eq!(dispatcher.subscriber_count(), 1);
        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        assert_eq!(dispatcher.subscriber_count(), 0);
        assert_eq!(dispatcher.dispatch(FramePhase::BeginFrame, 1), 0);
    }

    #[test]
    fn test_listener_can_unsubscribe_itself() {
        let dispatcher = Arc::new(FrameEventDispatcher::new());
        let own_id = Arc::new(Mutex::new(None::<SubscriptionId>));
        let calls = Arc::new(AtomicU64::new(0));

        let (d, slot, counter) = (dispatcher.clone(), own_id.clone(), calls.clone());
        let id = dispatcher.subscribe(
            FramePhase::EndFrame,
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::Relaxed);
                if let Some(id) = *slot.lock().unwrap() {
                    d.unsubscribe(id);
                }
            }),
        );
        *own_id.lock().unwrap() = Some(id);

        dispatcher.run_frame(0);
        dispatcher.run_frame(0);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(dispatcher.subscriber_count(), 0);
    }
}
