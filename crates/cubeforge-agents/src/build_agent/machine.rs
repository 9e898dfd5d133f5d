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

//! The incremental build state machine.

use cubeforge_core::renderer::SceneRenderer;
use cubeforge_core::{CubeFace, CubeTexture, CUBE_FACE_COUNT};
use cubeforge_lanes::CaptureLane;

/// Steps of a whole build: one capture per face, then the assembly.
pub const BUILD_STEP_COUNT: usize = CUBE_FACE_COUNT + 1;

const ASSEMBLY_STEP: usize = CUBE_FACE_COUNT;

/// Drives one [`CaptureLane`] through the seven build steps.
///
/// Steps `0..6` capture the face of the same index, step `6` assembles.
/// Once complete, further advances are no-ops. The lane is released exactly
/// once: by [`dispose`](Self::dispose), or on drop if nobody disposed it.
#[derive(Debug)]
pub struct BuildMachine {
    lane: Box<dyn CaptureLane>,
    step: usize,
    complete: bool,
    disposed: bool,
    result: Option<CubeTexture>,
}

impl BuildMachine {
    /// Wraps a fresh lane. Nothing is allocated yet.
    pub fn new(lane: Box<dyn CaptureLane>) -> Self {
        Self {
            lane,
            step: 0,
            complete: false,
            disposed: false,
            result: None,
        }
    }

    /// The next step to run, or `BUILD_STEP_COUNT` once complete.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Whether the cube has been assembled.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether the lane has been released.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether an assembled cube is waiting to be taken.
    pub fn is_result_ready(&self) -> bool {
        self.result.is_some()
    }

    /// Takes the assembled cube.
    pub fn take_result(&mut self) -> Option<CubeTexture> {
        self.result.take()
    }

    /// The lane being driven.
    pub fn lane(&self) -> &dyn CaptureLane {
        self.lane.as_ref()
    }

    /// Runs the next step.
    ///
    /// # Panics
    ///
    /// Panics if the machine was disposed.
    pub fn advance_one_step(&mut self, renderer: &mut dyn SceneRenderer) {
        if self.disposed {
            panic!("BuildMachine advanced after dispose (step {})", self.step);
        }
        if self.complete {
            return;
        }

        if self.step < ASSEMBLY_STEP {
            let face = CubeFace::from_index(self.step);
            log::debug!("{}: capturing face {face}", self.lane.strategy_name());
            self.lane.capture_face(renderer, face);
        } else {
            log::debug!("{}: assembling cube", self.lane.strategy_name());
            self.result = Some(self.lane.assemble());
            self.complete = true;
        }
        self.step += 1;
    }

    /// Releases the lane's resources. Safe at any step.
    ///
    /// An assembled cube that was not taken is released too.
    ///
    /// # Panics
    ///
    /// Panics if called twice.
    pub fn dispose(&mut self) {
        if self.disposed {
            panic!("BuildMachine disposed twice");
        }
        self.disposed = true;
        self.result = None;
        self.lane.release();
    }
}

impl Drop for BuildMachine {
    fn drop(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.lane.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use cubeforge_core::renderer::{RenderTarget, ResourceError};
    use cubeforge_core::Viewpoint;

    #[derive(Debug, Default)]
    struct Calls {
        captured: Vec<CubeFace>,
        assembled: usize,
        released: usize,
    }

    #[derive(Debug)]
    struct RecordingLane(Arc<Mutex<Calls>>);

    impl CaptureLane for RecordingLane {
        fn strategy_name(&self) -> &'static str {
            "Recording"
        }

        fn estimate_cost(&self) -> f32 {
            0.0
        }

        fn capture_face(&mut self, _renderer: &mut dyn SceneRenderer, face: CubeFace) {
            self.0.lock().unwrap().captured.push(face);
        }

        fn assemble(&mut self) -> CubeTexture {
            self.0.lock().unwrap().assembled += 1;
            panic!("no device in this test");
        }

        fn release(&mut self) {
            self.0.lock().unwrap().released += 1;
        }
    }

    #[derive(Debug)]
    struct NullRenderer;

    impl SceneRenderer for NullRenderer {
        fn render(&mut self, _: &Viewpoint, _: RenderTarget) -> Result<(), ResourceError> {
            Ok(())
        }
    }

    fn machine() -> (BuildMachine, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        (BuildMachine::new(Box::new(RecordingLane(calls.clone()))), calls)
    }

    #[test]
    fn test_captures_faces_in_order() {
        let (mut machine, calls) = machine();
        for _ in 0..CUBE_FACE_COUNT {
            machine.advance_one_step(&mut NullRenderer);
        }
        assert_eq!(machine.step(), 6);
        assert!(!machine.is_complete());
        assert_eq!(calls.lock().unwrap().captured, CubeFace::ALL.to_vec());
    }

    #[test]
    fn test_dispose_mid_build_releases_once() {
        let (mut machine, calls) = machine();
        machine.advance_one_step(&mut NullRenderer);
        machine.advance_one_step(&mut NullRenderer);
        machine.dispose();
        assert!(machine.is_disposed());
        drop(machine);
        assert_eq!(calls.lock().unwrap().released, 1);
    }

    #[test]
    fn test_drop_without_dispose_releases() {
        let (machine, calls) = machine();
        drop(machine);
        assert_eq!(calls.lock().unwrap().released, 1);
    }

    #[test]
    #[should_panic(expected = "disposed twice")]
    fn test_double_dispose_panics() {
        let (mut machine, _calls) = machine();
        machine.dispose();
        machine.dispose();
    }

    #[test]
    #[should_panic(expected = "advanced after dispose")]
    fn test_advance_after_dispose_panics() {
        let (mut machine, _calls) = machine();
        machine.dispose();
        machine.advance_one_step(&mut NullRenderer);
    }
}
