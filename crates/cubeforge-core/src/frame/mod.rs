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

//! Host frame notifications.
//!
//! A host exposes a [`FrameEventSource`]. Listeners subscribe to one
//! [`FramePhase`] and receive a [`FrameEvent`] each time the host reaches it.
//! Some hosts fire a phase several times within one logical frame (once per
//! camera, for instance), which is why events carry the logical frame index.

use serde::{Deserialize, Serialize};

/// The point in a host frame at which an event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FramePhase {
    /// Before anything of the frame is rendered.
    #[default]
    BeginFrame,
    /// After the whole frame is rendered.
    EndFrame,
    /// Before a camera renders. May fire several times per frame.
    BeginCamera,
    /// After a camera renders. May fire several times per frame.
    EndCamera,
}

/// A single frame notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEvent {
    /// The phase that fired.
    pub phase: FramePhase,
    /// The host's logical frame counter.
    pub frame_index: u64,
}

/// Identifies a subscription on a [`FrameEventSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// A callback invoked for every event of the phase it subscribed to.
pub type FrameListener = Box<dyn FnMut(&FrameEvent) + Send>;

/// A host-side source of frame notifications.
pub trait FrameEventSource: Send + Sync {
    /// Registers `listener` for `phase`.
    fn subscribe(&self, phase: FramePhase, listener: FrameListener) -> SubscriptionId;

    /// Removes a subscription. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
