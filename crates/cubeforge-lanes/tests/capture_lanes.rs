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

//! Round-trip tests: the face read back from an assembled cube equals the
//! image rendered for that face, for every lane.

use std::sync::Arc;

use cubeforge_core::math::Vec3;
use cubeforge_core::renderer::{GraphicsDevice, TextureFormat};
use cubeforge_core::{CubeFace, CubeTexture};
use cubeforge_infra::software::face_image;
use cubeforge_infra::{SoftwareBlitBridge, SoftwareDevice, SoftwareSceneRenderer};
use cubeforge_lanes::{
    create_lane, BlitBridge, CaptureLane, CaptureParams, CaptureStrategy, FlipPolicy, LaneContext,
    PixelCache,
};

const SIZE: u32 = 8;

struct Host {
    device: Arc<SoftwareDevice>,
    bridge: Arc<SoftwareBlitBridge>,
    renderer: SoftwareSceneRenderer,
    context: LaneContext,
}

fn host(cpu_flip: FlipPolicy) -> Host {
    let device = Arc::new(SoftwareDevice::new());
    let bridge = Arc::new(SoftwareBlitBridge::new(device.clone()));
    let renderer = SoftwareSceneRenderer::new(device.clone());
    let context = LaneContext {
        device: device.clone(),
        bridge: Some(Arc::new(BlitBridge::new(bridge.clone()))),
        cpu_flip,
    };
    Host {
        device,
        bridge,
        renderer,
        context,
    }
}

fn params(format: TextureFormat) -> CaptureParams {
    CaptureParams {
        face_size: SIZE,
        position: Vec3::new(0.0, 1.5, -3.0),
        format,
    }
}

fn capture_all(lane: &mut dyn CaptureLane, renderer: &mut SoftwareSceneRenderer) -> CubeTexture {
    for face in CubeFace::ALL {
        lane.capture_face(renderer, face);
    }
    lane.assemble()
}

fn expected_face(face: CubeFace, format: TextureFormat, flip: FlipPolicy) -> Vec<u8> {
    let mut cache = PixelCache::new(SIZE, SIZE, format);
    cache
        .copy_from(&face_image(face, SIZE, SIZE, format), flip)
        .unwrap();
    cache.as_bytes().to_vec()
}

#[test]
fn test_every_lane_round_trips_every_face() {
    for strategy in CaptureStrategy::ALL {
        let mut host = host(FlipPolicy::NONE);
        let mut lane = create_lane(strategy, params(TextureFormat::Rgba8Unorm), &host.context);
        let cube = capture_all(lane.as_mut(), &mut host.renderer);

        for face in CubeFace::ALL {
            assert_eq!(
                cube.read_face(face).unwrap(),
                face_image(face, SIZE, SIZE, TextureFormat::Rgba8Unorm),
                "{} produced the wrong content for face {face}",
                lane.strategy_name()
            );
        }
    }
}

#[test]
fn test_cpu_copy_applies_flip_policy() {
    for flip in [FlipPolicy::NONE, FlipPolicy::FLIP_X, FlipPolicy::FLIP_Y, FlipPolicy::BOTH] {
        let mut host = host(flip);
        let mut lane = create_lane(
            CaptureStrategy::CpuCopy,
            params(TextureFormat::Rgba8Unorm),
            &host.context,
        );
        let cube = capture_all(lane.as_mut(), &mut host.renderer);
        for face in CubeFace::ALL {
            assert_eq!(
                cube.read_face(face).unwrap(),
                expected_face(face, TextureFormat::Rgba8Unorm, flip)
            );
        }
    }
}

#[test]
fn test_cpu_copy_handles_float_formats() {
    for format in [TextureFormat::Rgba16Float, TextureFormat::Rgba32Float] {
        let mut host = host(FlipPolicy::FLIP_X);
        let mut lane = create_lane(CaptureStrategy::CpuCopy, params(format), &host.context);
        let cube = capture_all(lane.as_mut(), &mut host.renderer);
        assert_eq!(cube.format(), format);
        assert_eq!(
            cube.read_face(CubeFace::NegativeZ).unwrap(),
            expected_face(CubeFace::NegativeZ, format, FlipPolicy::FLIP_X)
        );
    }
}

#[test]
fn test_faces_are_rendered_in_table_order_with_fixed_fov() {
    for strategy in CaptureStrategy::ALL {
        let mut host = host(FlipPolicy::NONE);
        let records = host.renderer.records();
        let mut lane = create_lane(strategy, params(TextureFormat::Rgba8Unorm), &host.context);
        let _cube = capture_all(lane.as_mut(), &mut host.renderer);

        let records = records.lock().unwrap();
        let faces: Vec<CubeFace> = records.iter().map(|r| r.face).collect();
        assert_eq!(faces, CubeFace::ALL.to_vec());
        assert!(records.iter().all(|r| r.fov_degrees == 90.0));
        assert!(records.iter().all(|r| r.position == Vec3::new(0.0, 1.5, -3.0)));
    }
}

#[test]
fn test_direct_target_renders_into_cube_slices() {
    let mut host = host(FlipPolicy::NONE);
    let records = host.renderer.records();
    let mut lane = create_lane(
        CaptureStrategy::DirectTarget,
        params(TextureFormat::Rgba8Unorm),
        &host.context,
    );
    let cube = capture_all(lane.as_mut(), &mut host.renderer);

    let records = records.lock().unwrap();
    for record in records.iter() {
        assert_eq!(record.texture, cube.id());
        assert_eq!(record.target_face, Some(record.face));
    }
    // Only the cube itself was ever allocated.
    assert_eq!(host.device.created_texture_count(), 1);
}

#[test]
fn test_lanes_allocate_nothing_before_first_capture() {
    for strategy in CaptureStrategy::ALL {
        let host = host(FlipPolicy::NONE);
        let lane = create_lane(strategy, params(TextureFormat::Rgba8Unorm), &host.context);
        assert_eq!(host.device.created_texture_count(), 0);
        drop(lane);
    }
}

#[test]
fn test_release_mid_capture_frees_everything_and_is_idempotent() {
    for strategy in CaptureStrategy::ALL {
        let mut host = host(FlipPolicy::NONE);
        let mut lane = create_lane(strategy, params(TextureFormat::Rgba8Unorm), &host.context);
        lane.capture_face(&mut host.renderer, CubeFace::PositiveX);
        lane.capture_face(&mut host.renderer, CubeFace::NegativeX);
        assert!(host.device.live_texture_count() > 0);

        lane.release();
        assert_eq!(host.device.live_texture_count(), 0, "{strategy:?} leaked");
        lane.release();
        drop(lane);
        assert_eq!(
            host.device.destroyed_texture_count(),
            host.device.created_texture_count()
        );
    }
}

#[test]
fn test_dropping_an_unreleased_lane_releases_it() {
    for strategy in CaptureStrategy::ALL {
        let mut host = host(FlipPolicy::NONE);
        let mut lane = create_lane(strategy, params(TextureFormat::Rgba8Unorm), &host.context);
        lane.capture_face(&mut host.renderer, CubeFace::PositiveX);
        drop(lane);
        assert_eq!(host.device.live_texture_count(), 0, "{strategy:?} leaked");
    }
}

#[test]
fn test_assembled_cube_is_the_only_survivor() {
    for strategy in CaptureStrategy::ALL {
        let mut host = host(FlipPolicy::NONE);
        let mut lane = create_lane(strategy, params(TextureFormat::Rgba8Unorm), &host.context);
        let cube = capture_all(lane.as_mut(), &mut host.renderer);
        drop(lane);
        assert_eq!(host.device.live_texture_count(), 1);
        assert!(host.device.contains(cube.id()));

        drop(cube);
        assert_eq!(host.device.live_texture_count(), 0);
    }
}

#[test]
fn test_native_copy_blits_once_and_registers_once() {
    let device = Arc::new(SoftwareDevice::new());
    let native = Arc::new(SoftwareBlitBridge::with_registration(device.clone()));
    let bridge = Arc::new(BlitBridge::new(native.clone()));
    let context = LaneContext {
        device: device.clone(),
        bridge: Some(bridge),
        cpu_flip: FlipPolicy::NONE,
    };
    let mut renderer = SoftwareSceneRenderer::new(device.clone());

    for _ in 0..3 {
        let mut lane = create_lane(
            CaptureStrategy::NativeCopy,
            params(TextureFormat::Bgra8Unorm),
            &context,
        );
        let cube = capture_all(lane.as_mut(), &mut renderer);
        assert_eq!(
            cube.read_face(CubeFace::PositiveY).unwrap(),
            face_image(CubeFace::PositiveY, SIZE, SIZE, TextureFormat::Bgra8Unorm)
        );
    }
    assert_eq!(native.registration_count(), 1);
    assert_eq!(native.blit_count(), 3);
}

#[test]
fn test_into_raw_hands_over_the_texture() {
    let mut host = host(FlipPolicy::NONE);
    let mut lane = create_lane(
        CaptureStrategy::DirectTarget,
        params(TextureFormat::Rgba8Unorm),
        &host.context,
    );
    let id = capture_all(lane.as_mut(), &mut host.renderer).into_raw();
    assert!(host.device.contains(id));
    host.device.destroy_texture(id).unwrap();
    assert_eq!(host.bridge.blit_count(), 0);
}

#[test]
fn test_lane_costs_order_by_strategy() {
    let host = host(FlipPolicy::NONE);
    let costs: Vec<f32> = CaptureStrategy::ALL
        .iter()
        .map(|s| create_lane(*s, params(TextureFormat::Rgba8Unorm), &host.context).estimate_cost())
        .collect();
    assert!(costs[0] > costs[1]);
    assert!(costs[1] > costs[2]);
}

#[test]
#[should_panic(expected = "captured twice")]
fn test_native_copy_rejects_double_capture() {
    let mut host = host(FlipPolicy::NONE);
    let mut lane = create_lane(
        CaptureStrategy::NativeCopy,
        params(TextureFormat::Rgba8Unorm),
        &host.context,
    );
    lane.capture_face(&mut host.renderer, CubeFace::PositiveX);
    lane.capture_face(&mut host.renderer, CubeFace::PositiveX);
}

#[test]
#[should_panic(expected = "assemble called before face")]
fn test_assembling_early_panics() {
    let mut host = host(FlipPolicy::NONE);
    let mut lane = create_lane(
        CaptureStrategy::CpuCopy,
        params(TextureFormat::Rgba8Unorm),
        &host.context,
    );
    lane.capture_face(&mut host.renderer, CubeFace::PositiveX);
    let _ = lane.assemble();
}

#[test]
#[should_panic(expected = "cannot render into cube faces")]
fn test_direct_target_needs_cube_face_support() {
    let host = host(FlipPolicy::NONE);
    let mut renderer = SoftwareSceneRenderer::new(host.device.clone()).with_cube_face_targets(false);
    let mut lane = create_lane(
        CaptureStrategy::DirectTarget,
        params(TextureFormat::Rgba8Unorm),
        &host.context,
    );
    lane.capture_face(&mut renderer, CubeFace::PositiveX);
}

#[test]
#[should_panic(expected = "rendering face +Y failed")]
fn test_render_failure_panics() {
    let host = host(FlipPolicy::NONE);
    let mut renderer =
        SoftwareSceneRenderer::new(host.device.clone()).with_failure_on(CubeFace::PositiveY);
    let mut lane = create_lane(
        CaptureStrategy::CpuCopy,
        params(TextureFormat::Rgba8Unorm),
        &host.context,
    );
    let _ = capture_all(lane.as_mut(), &mut renderer);
}

#[test]
#[should_panic(expected = "without a native blit bridge")]
fn test_native_copy_needs_a_bridge() {
    let device = Arc::new(SoftwareDevice::new());
    let context = LaneContext {
        device,
        bridge: None,
        cpu_flip: FlipPolicy::NONE,
    };
    let _ = create_lane(
        CaptureStrategy::NativeCopy,
        params(TextureFormat::Rgba8Unorm),
        &context,
    );
}
