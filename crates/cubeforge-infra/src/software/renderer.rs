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

use std::sync::{Arc, Mutex};

use cubeforge_core::math::{Extent3D, Origin3D, Vec3};
use cubeforge_core::renderer::{
    GraphicsDevice, RenderTarget, ResourceError, SceneRenderer, TextureFormat, TextureId,
};
use cubeforge_core::{CubeFace, Viewpoint};

use super::SoftwareDevice;

/// One call the [`SoftwareSceneRenderer`] received.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRecord {
    /// The face the viewpoint was looking at.
    pub face: CubeFace,
    /// Where the viewpoint was.
    pub position: Vec3,
    /// The viewpoint's field of view.
    pub fov_degrees: f32,
    /// The texture written.
    pub texture: TextureId,
    /// The cube face slice written, for cube face targets.
    pub target_face: Option<CubeFace>,
}

/// A deterministic scene renderer over a [`SoftwareDevice`].
///
/// The "scene" is a gradient whose red channel encodes the face the camera is
/// looking at and whose green and blue channels encode the texel coordinates,
/// so every face of every capture has a known, distinct image ([`face_image`]).
#[derive(Debug)]
pub struct SoftwareSceneRenderer {
    device: Arc<SoftwareDevice>,
    cube_face_targets: bool,
    fail_on: Option<CubeFace>,
    records: Arc<Mutex<Vec<RenderRecord>>>,
}

impl SoftwareSceneRenderer {
    /// Creates a renderer able to draw into cube face slices.
    pub fn new(device: Arc<SoftwareDevice>) -> Self {
        Self {
            device,
            cube_face_targets: true,
            fail_on: None,
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets whether cube face targets are accepted.
    pub fn with_cube_face_targets(mut self, supported: bool) -> Self {
        self.cube_face_targets = supported;
        self
    }

    /// Makes every render of `face` fail.
    pub fn with_failure_on(mut self, face: CubeFace) -> Self {
        self.fail_on = Some(face);
        self
    }

    /// A shared handle to the log of render calls.
    pub fn records(&self) -> Arc<Mutex<Vec<RenderRecord>>> {
        self.records.clone()
    }
}

impl SceneRenderer for SoftwareSceneRenderer {
    fn render(&mut self, viewpoint: &Viewpoint, target: RenderTarget) -> Result<(), ResourceError> {
        let face = CubeFace::nearest(viewpoint.forward());
        if self.fail_on == Some(face) {
            return Err(ResourceError::RenderFailed(format!(
                "Scene render failed for face {face}"
            )));
        }

        let texture = target.texture();
        let (extent, format) = self.device.texture_info(texture)?;
        let (layer, target_face) = match target {
            RenderTarget::Texture(_) => (0, None),
            RenderTarget::CubeFace { face, view, .. } => {
                if !self.cube_face_targets {
                    return Err(ResourceError::RenderFailed(
                        "Cube face targets are disabled".to_owned(),
                    ));
                }
                (view.base_array_layer, Some(face))
            }
        };

        let size = Extent3D {
            width: extent.width,
            height: extent.height,
            depth_or_array_layers: 1,
        };
        let image = face_image(face, extent.width, extent.height, format);
        self.device
            .write_texture(texture, &image, None, Origin3D::layer(layer), size)?;

        self.records.lock().unwrap().push(RenderRecord {
            face,
            position: viewpoint.position,
            fov_degrees: viewpoint.fov_degrees,
            texture,
            target_face,
        });
        log::trace!("SoftwareSceneRenderer: rendered face {face} into {texture:?}");
        Ok(())
    }

    fn supports_cube_face_targets(&self) -> bool {
        self.cube_face_targets
    }
}

/// The image the software renderer produces when looking at `face`.
pub fn face_image(face: CubeFace, width: u32, height: u32, format: TextureFormat) -> Vec<u8> {
    let bpp = format.bytes_per_pixel() as usize;
    let mut image = Vec::with_capacity(width as usize * height as usize * bpp);
    let red = (face.index() + 1) as f32 / 8.0;
    for y in 0..height {
        for x in 0..width {
            let color = [red, x as f32 / width as f32, y as f32 / height as f32, 1.0];
            encode_texel(color, format, &mut image);
        }
    }
    image
}

fn encode_texel(color: [f32; 4], format: TextureFormat, out: &mut Vec<u8>) {
    let unorm = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    match format {
        TextureFormat::Rgba8Unorm => out.extend(color.map(unorm)),
        TextureFormat::Bgra8Unorm => {
            let [r, g, b, a] = color.map(unorm);
            out.extend([b, g, r, a]);
        }
        TextureFormat::Rgba16Float => {
            for channel in color {
                out.extend(f32_to_f16_bits(channel).to_le_bytes());
            }
        }
        TextureFormat::Rgba32Float => out.extend_from_slice(bytemuck::bytes_of(&color)),
    }
}

// Truncating conversion; subnormals flush to zero.
fn f32_to_f16_bits(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exponent = ((bits >> 23) & 0xff) as i32 - 127 + 15;
    let mantissa = bits & 0x007f_ffff;
    if exponent <= 0 {
        sign
    } else if exponent >= 0x1f {
        sign | 0x7c00
    } else {
        sign | ((exponent as u16) << 10) | (mantissa >> 13) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeforge_core::renderer::{TextureDescriptor, TextureViewDescriptor, TextureViewDimension};

    #[test]
    fn test_f16_encoding() {
        assert_eq!(f32_to_f16_bits(0.0), 0x0000);
        assert_eq!(f32_to_f16_bits(1.0), 0x3c00);
        assert_eq!(f32_to_f16_bits(0.5), 0x3800);
        assert_eq!(f32_to_f16_bits(-2.0), 0xc000);
    }

    #[test]
    fn test_face_images_differ_per_face() {
        let a = face_image(CubeFace::PositiveX, 4, 4, TextureFormat::Rgba8Unorm);
        let b = face_image(CubeFace::NegativeX, 4, 4, TextureFormat::Rgba8Unorm);
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_render_into_texture_records_face() {
        let device = Arc::new(SoftwareDevice::new());
        let mut renderer = SoftwareSceneRenderer::new(device.clone());
        let id = device
            .create_texture(&TextureDescriptor::face_target("t", 4, TextureFormat::Rgba8Unorm))
            .unwrap();

        let viewpoint = Viewpoint::for_face(Vec3::new(1.0, 2.0, 3.0), CubeFace::NegativeY);
        renderer.render(&viewpoint, RenderTarget::Texture(id)).unwrap();

        let mut out = vec![0u8; 64];
        device
            .read_texture(id, Origin3D::ZERO, Extent3D::square(4), &mut out)
            .unwrap();
        assert_eq!(out, face_image(CubeFace::NegativeY, 4, 4, TextureFormat::Rgba8Unorm));

        let records = renderer.records();
        let records = records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].face, CubeFace::NegativeY);
        assert_eq!(records[0].fov_degrees, 90.0);
        assert_eq!(records[0].target_face, None);
    }

    #[test]
    fn test_render_into_cube_face_slice() {
        let device = Arc::new(SoftwareDevice::new());
        let mut renderer = SoftwareSceneRenderer::new(device.clone());
        let cube = device
            .create_texture(&TextureDescriptor::cube("c", 2, TextureFormat::Rgba8Unorm))
            .unwrap();
        let view = TextureViewDescriptor {
            label: None,
            dimension: TextureViewDimension::D2,
            base_array_layer: 4,
            array_layer_count: Some(1),
        };
        let view: &'static TextureViewDescriptor<'static> = Box::leak(Box::new(view));
        let target = RenderTarget::CubeFace {
            texture: cube,
            face: CubeFace::PositiveZ,
            view,
        };
        renderer
            .render(&Viewpoint::for_face(Vec3::ZERO, CubeFace::PositiveZ), target)
            .unwrap();

        let mut out = vec![0u8; 16];
        device
            .read_texture(cube, Origin3D::layer(4), Extent3D::square(2), &mut out)
            .unwrap();
        assert_eq!(out, face_image(CubeFace::PositiveZ, 2, 2, TextureFormat::Rgba8Unorm));
        device
            .read_texture(cube, Origin3D::layer(0), Extent3D::square(2), &mut out)
            .unwrap();
        assert!(out.iter().all(|&b| b == 0));
        assert_eq!(
            renderer.records().lock().unwrap()[0].target_face,
            Some(CubeFace::PositiveZ)
        );
    }

    #[test]
    fn test_injected_failure() {
        let device = Arc::new(SoftwareDevice::new());
        let mut renderer =
            SoftwareSceneRenderer::new(device.clone()).with_failure_on(CubeFace::PositiveZ);
        let id = device
            .create_texture(&TextureDescriptor::face_target("t", 2, TextureFormat::Rgba8Unorm))
            .unwrap();
        let viewpoint = Viewpoint::for_face(Vec3::ZERO, CubeFace::PositiveZ);
        assert!(matches!(
            renderer.render(&viewpoint, RenderTarget::Texture(id)),
            Err(ResourceError::RenderFailed(_))
        ));
    }
}
