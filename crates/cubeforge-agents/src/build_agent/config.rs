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

//! Scheduler configuration, loadable from RON.

use std::ops::RangeInclusive;
use std::path::Path;

use cubeforge_core::renderer::TextureFormat;
use cubeforge_core::FramePhase;
use cubeforge_lanes::{CaptureStrategy, FlipPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a [`SchedulerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read scheduler configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration is not valid RON for this type.
    #[error("Invalid scheduler configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// A numeric setting is outside its allowed range.
    #[error("{field} = {value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        /// The offending field.
        field: &'static str,
        /// Its value.
        value: u32,
        /// Smallest allowed value.
        min: u32,
        /// Largest allowed value.
        max: u32,
    },
}

/// Settings of a [`BuildScheduler`](super::BuildScheduler).
///
/// Missing fields take their default when deserialized:
///
/// ```
/// use cubeforge_agents::SchedulerConfig;
///
/// let config = SchedulerConfig::from_ron_str("(steps_per_event: 3)").unwrap();
/// assert_eq!(config.steps_per_event, 3);
/// assert_eq!(config.frame_interval, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Qualifying events happen every `frame_interval` frames.
    pub frame_interval: u32,
    /// Build steps spent per qualifying event.
    pub steps_per_event: u32,
    /// Strategy of requests that do not pick one.
    pub default_strategy: CaptureStrategy,
    /// Texel format of the cubes built.
    pub face_format: TextureFormat,
    /// Flip applied by the CPU copy strategy.
    pub cpu_flip: FlipPolicy,
    /// The host frame phase the scheduler hooks into.
    pub hook_phase: FramePhase,
}

impl SchedulerConfig {
    /// Allowed values of [`frame_interval`](Self::frame_interval).
    pub const FRAME_INTERVAL_RANGE: RangeInclusive<u32> = 1..=10;
    /// Allowed values of [`steps_per_event`](Self::steps_per_event).
    pub const STEPS_PER_EVENT_RANGE: RangeInclusive<u32> = 1..=7;

    /// Parses and validates a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&source)?;
        log::info!("Loaded scheduler configuration from {}", path.display());
        Ok(config)
    }

    /// Checks every bounded setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("frame_interval", self.frame_interval, Self::FRAME_INTERVAL_RANGE)?;
        check_range("steps_per_event", self.steps_per_event, Self::STEPS_PER_EVENT_RANGE)?;
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_interval: 1,
            steps_per_event: 1,
            default_strategy: CaptureStrategy::DirectTarget,
            face_format: TextureFormat::Rgba8Unorm,
            cpu_flip: FlipPolicy::NONE,
            hook_phase: FramePhase::BeginFrame,
        }
    }
}

fn check_range(
    field: &'static str,
    value: u32,
    range: RangeInclusive<u32>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SchedulerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_strategy, CaptureStrategy::DirectTarget);
        assert_eq!(config.hook_phase, FramePhase::BeginFrame);
    }

    #[test]
    fn test_full_document() {
        let config = SchedulerConfig::from_ron_str(
            r#"(
                frame_interval: 4,
                steps_per_event: 2,
                default_strategy: CpuCopy,
                face_format: Rgba16Float,
                cpu_flip: (flip_x: true, flip_y: false),
                hook_phase: EndCamera,
            )"#,
        )
        .unwrap();
        assert_eq!(config.frame_interval, 4);
        assert_eq!(config.steps_per_event, 2);
        assert_eq!(config.default_strategy, CaptureStrategy::CpuCopy);
        assert_eq!(config.face_format, TextureFormat::Rgba16Float);
        assert_eq!(config.cpu_flip, FlipPolicy::FLIP_X);
        assert_eq!(config.hook_phase, FramePhase::EndCamera);
    }

    #[test]
    fn test_out_of_range_values() {
        let err = SchedulerConfig::from_ron_str("(frame_interval: 0)").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "frame_interval",
                value: 0,
                min: 1,
                max: 10
            }
        ));

        let err = SchedulerConfig::from_ron_str("(steps_per_event: 8)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "steps_per_event = 8 is outside the allowed range 1..=7"
        );
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            SchedulerConfig::from_ron_str("(frame_interval: \"fast\")"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scheduler.ron");
        std::fs::write(&path, "(frame_interval: 2, default_strategy: NativeCopy)").unwrap();

        let config = SchedulerConfig::load(&path).unwrap();
        assert_eq!(config.frame_interval, 2);
        assert_eq!(config.default_strategy, CaptureStrategy::NativeCopy);

        assert!(matches!(
            SchedulerConfig::load(dir.path().join("missing.ron")),
            Err(ConfigError::Io(_))
        ));
    }
}
