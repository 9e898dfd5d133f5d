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

// Cubeforge Sandbox
// Builds a few cube maps on the software host, driven by simulated frames.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use cubeforge_agents::{BuildOutcome, BuildRequest, BuildScheduler, SchedulerConfig, SharedScheduler};
use cubeforge_core::math::Vec3;
use cubeforge_core::CubeFace;
use cubeforge_infra::{FrameEventDispatcher, SoftwareBlitBridge, SoftwareDevice, SoftwareSceneRenderer};
use cubeforge_lanes::CaptureStrategy;

const FACE_SIZE: u32 = 64;
const CAMERAS_PER_FRAME: usize = 2;
const MAX_FRAMES: usize = 256;

fn load_config() -> Result<SchedulerConfig> {
    match std::env::args().nth(1) {
        Some(path) => SchedulerConfig::load(&path)
            .with_context(|| format!("failed to load scheduler configuration from {path}")),
        None => Ok(SchedulerConfig::default()),
    }
}

fn request(
    name: &'static str,
    position: Vec3,
    strategy: CaptureStrategy,
    finished: &Arc<Mutex<Vec<&'static str>>>,
) -> BuildRequest {
    let finished = finished.clone();
    BuildRequest::new(FACE_SIZE, position, move |outcome| {
        match outcome {
            BuildOutcome::Completed(cube) => match cube.read_face(CubeFace::PositiveY) {
                Ok(texels) => log::info!(
                    "{name}: cube ready ({}x{}, +Y starts with {:?})",
                    cube.face_size(),
                    cube.face_size(),
                    &texels[..4]
                ),
                Err(e) => log::error!("{name}: cube ready but unreadable: {e}"),
            },
            BuildOutcome::Cancelled => log::warn!("{name}: build cancelled"),
        }
        finished.lock().unwrap().push(name);
    })
    .with_strategy(strategy)
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let device = Arc::new(SoftwareDevice::new());
    let renderer = SoftwareSceneRenderer::new(device.clone());
    let bridge = Arc::new(SoftwareBlitBridge::with_registration(device.clone()));
    let scheduler = SharedScheduler::new(
        BuildScheduler::new(config, Box::new(renderer), device.clone())?.with_blit_bridge(bridge),
    );

    let dispatcher = Arc::new(FrameEventDispatcher::new());
    scheduler.attach(dispatcher.clone())?;

    let finished = Arc::new(Mutex::new(Vec::new()));
    let jobs = [
        ("lobby", Vec3::new(0.0, 1.5, 0.0), CaptureStrategy::DirectTarget),
        ("hallway", Vec3::new(12.0, 1.5, -4.0), CaptureStrategy::CpuCopy),
        ("balcony", Vec3::new(-6.0, 8.0, 3.0), CaptureStrategy::NativeCopy),
        ("cellar", Vec3::new(0.0, -3.0, 0.0), CaptureStrategy::CpuCopy),
    ];
    let mut handles = Vec::new();
    for (name, position, strategy) in jobs {
        handles.push(scheduler.submit(request(name, position, strategy, &finished))?);
    }

    // The cellar capture is no longer needed.
    if let Some(handle) = handles.last() {
        handle.cancel();
    }

    let mut frames = 0;
    while !scheduler.report_status().is_idle() && frames < MAX_FRAMES {
        dispatcher.run_frame(CAMERAS_PER_FRAME);
        frames += 1;
    }
    log::info!("Ran {frames} frame(s): {}", scheduler.report_status());
    log::info!("Finished in order: {:?}", finished.lock().unwrap());

    scheduler.shutdown();
    log::info!(
        "Shut down with {} live texture(s)",
        device.live_texture_count()
    );
    Ok(())
}
