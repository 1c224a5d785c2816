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

//! Frame-driven material interpolation.
//!
//! The driver owns no clock: the host passes its frame timestamps into
//! [`MaterialInterpolation::advance`], and each call is one discrete,
//! synchronous mutation through the ordinary setters. The typical use is
//! an editor easing a highlighted material back to its original colors.

use std::time::Duration;

use eidolon_core::math::Rgba;

use crate::element::MaterialEditor;
use crate::error::SceneGraphError;
use crate::graft::Graft;

/// Span length used when the host does not pick one.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(1600);

/// What one [`advance`](MaterialInterpolation::advance) call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationStatus {
    /// Not started, cancelled, or already finished; nothing was written.
    Idle,
    /// A step was applied and more remain.
    Running,
    /// The final step was applied; the targets now hold exactly `to`.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Interpolating { started: Duration },
}

/// Eases one material's colors from one value to another over a fixed
/// span of host time.
///
/// Built with a material index and up to two spans (base color and
/// emissive factor), then driven by the host's frame loop:
///
/// ```
/// # use std::time::Duration;
/// # use eidolon_scenegraph::MaterialInterpolation;
/// # use eidolon_core::math::Rgba;
/// let mut fade = MaterialInterpolation::new(0)
///     .with_base_color(Rgba::rgb(1.0, 0.0, 0.0), Rgba::WHITE)
///     .with_duration(Duration::from_millis(400));
/// fade.start(Duration::ZERO);
/// // each frame: fade.advance(&mut graft, frame_time)?;
/// ```
#[derive(Debug, Clone)]
pub struct MaterialInterpolation {
    material: usize,
    base_color: Option<(Rgba, Rgba)>,
    emissive: Option<([f32; 3], [f32; 3])>,
    duration: Duration,
    phase: Phase,
}

impl MaterialInterpolation {
    /// A driver for the material at `material`, with no spans and the
    /// default duration.
    pub fn new(material: usize) -> Self {
        Self {
            material,
            base_color: None,
            emissive: None,
            duration: DEFAULT_DURATION,
            phase: Phase::Idle,
        }
    }

    /// Replaces the span length.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Interpolates the base color factor from `from` to `to`.
    pub fn with_base_color(mut self, from: Rgba, to: Rgba) -> Self {
        self.base_color = Some((from, to));
        self
    }

    /// Interpolates the emissive factor from `from` to `to`.
    pub fn with_emissive(mut self, from: [f32; 3], to: [f32; 3]) -> Self {
        self.emissive = Some((from, to));
        self
    }

    /// The material index this driver writes to.
    pub fn material(&self) -> usize {
        self.material
    }

    /// Arms the driver. The first `advance` measures elapsed time from
    /// `now`. Starting an already-running driver restarts it.
    pub fn start(&mut self, now: Duration) {
        self.phase = Phase::Interpolating { started: now };
    }

    /// Stops the driver without touching the material. Observed by the
    /// next `advance`, which reports `Idle`.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Whether a span is currently in flight.
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Interpolating { .. })
    }

    /// Applies the step for host time `now`.
    ///
    /// Progress is `elapsed / duration`, clamped; the final step writes
    /// the exact `to` values rather than a lerp result, so no float error
    /// accumulates into the landing. Errors surface from the underlying
    /// setters (a bad material index, for instance) and leave the driver
    /// armed.
    pub fn advance(
        &mut self,
        graft: &mut Graft,
        now: Duration,
    ) -> Result<InterpolationStatus, SceneGraphError> {
        let Phase::Interpolating { started } = self.phase else {
            return Ok(InterpolationStatus::Idle);
        };
        let elapsed = now.saturating_sub(started);
        let finished = elapsed >= self.duration;
        let t = if finished {
            1.0
        } else {
            elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };

        if let Some((from, to)) = self.base_color {
            let color = if finished { to } else { Rgba::lerp(from, to, t) };
            self.editor(graft)?.pbr().set_base_color_factor(color)?;
        }
        if let Some((from, to)) = self.emissive {
            let factor = if finished {
                to
            } else {
                Rgba::lerp(Rgba::from_rgb_array(from), Rgba::from_rgb_array(to), t).to_rgb_array()
            };
            self.editor(graft)?.set_emissive_factor(factor)?;
        }

        if finished {
            self.phase = Phase::Idle;
            Ok(InterpolationStatus::Finished)
        } else {
            Ok(InterpolationStatus::Running)
        }
    }

    fn editor<'g>(&self, graft: &'g mut Graft) -> Result<MaterialEditor<'g>, SceneGraphError> {
        graft
            .material_mut(self.material)
            .ok_or_else(|| SceneGraphError::lookup_miss("material", self.material))
    }
}
