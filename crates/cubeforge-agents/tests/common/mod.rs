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

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use cubeforge_agents::{BuildOutcome, BuildRequest, BuildScheduler, SchedulerConfig};
use cubeforge_core::math::Vec3;
use cubeforge_core::{CubeTexture, FrameEvent, FramePhase};
use cubeforge_infra::{RenderRecord, SoftwareBlitBridge, SoftwareDevice, SoftwareSceneRenderer};

pub const FACE_SIZE: u32 = 4;

/// What a completion callback received, tagged with the request it belongs to.
#[derive(Debug)]
pub enum Delivered {
    Completed(&'static str, CubeTexture),
    Cancelled(&'static str),
}

impl Delivered {
    pub fn tag(&self) -> &'static str {
        match self {
            Delivered::Completed(tag, _) | Delivered::Cancelled(tag) => tag,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Delivered::Cancelled(_))
    }
}

pub type Outcomes = Arc<Mutex<Vec<Delivered>>>;

pub struct Harness {
    pub device: Arc<SoftwareDevice>,
    pub bridge: Arc<SoftwareBlitBridge>,
    pub records: Arc<Mutex<Vec<RenderRecord>>>,
    pub outcomes: Outcomes,
    pub frame: u64,
}

impl Harness {
    pub fn new() -> Self {
        let device = Arc::new(SoftwareDevice::new());
        Self {
            bridge: Arc::new(SoftwareBlitBridge::new(device.clone())),
            device,
            records: Arc::new(Mutex::new(Vec::new())),
            outcomes: Arc::new(Mutex::new(Vec::new())),
            frame: 0,
        }
    }

    pub fn scheduler(&mut self, config: SchedulerConfig) -> BuildScheduler {
        let renderer = SoftwareSceneRenderer::new(self.device.clone());
        self.records = renderer.records();
        BuildScheduler::new(config, Box::new(renderer), self.device.clone())
            .unwrap()
            .with_blit_bridge(self.bridge.clone())
    }

    /// A request whose outcome lands in `self.outcomes` under `tag`.
    pub fn request(&self, tag: &'static str) -> BuildRequest {
        self.request_at(tag, Vec3::ZERO)
    }

    pub fn request_at(&self, tag: &'static str, position: Vec3) -> BuildRequest {
        let sink = self.outcomes.clone();
        BuildRequest::new(FACE_SIZE, position, move |outcome| {
            let delivered = match outcome {
                BuildOutcome::Completed(cube) => Delivered::Completed(tag, cube),
                BuildOutcome::Cancelled => Delivered::Cancelled(tag),
            };
            sink.lock().unwrap().push(delivered);
        })
    }

    /// Fires the next logical frame once.
    pub fn next_frame(&mut self, scheduler: &mut BuildScheduler) {
        self.frame += 1;
        scheduler.on_frame_event(&FrameEvent {
            phase: FramePhase::BeginFrame,
            frame_index: self.frame,
        });
    }

    pub fn tags(&self) -> Vec<(&'static str, bool)> {
        self.outcomes
            .lock()
            .unwrap()
            .iter()
            .map(|d| (d.tag(), d.is_cancelled()))
            .collect()
    }
}

pub fn config(frame_interval: u32, steps_per_event: u32) -> SchedulerConfig {
    SchedulerConfig {
        frame_interval,
        steps_per_event,
        ..SchedulerConfig::default()
    }
}
