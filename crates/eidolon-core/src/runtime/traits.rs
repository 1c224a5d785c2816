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

use crate::document::{MagFilter, MinFilter, WrapMode};
use crate::math::color::Rgba;
use crate::runtime::{AlphaState, MaterialHandle, TextureHandle, TextureSlot};
use std::fmt::Debug;

/// An engine material that mirrors one document material.
///
/// Setters are fire-and-forget: the document layer has already validated
/// and committed the value, so implementations only apply it. A document
/// material may be mirrored by several instances at once (one per loaded
/// copy of the model); each receives every mutation.
pub trait MaterialInstance: Debug {
    /// Applies a new base color factor, linear RGBA.
    fn set_base_color_factor(&mut self, factor: Rgba);

    /// Applies a new metalness multiplier.
    fn set_metallic_factor(&mut self, factor: f32);

    /// Applies a new roughness multiplier.
    fn set_roughness_factor(&mut self, factor: f32);

    /// Applies a new emissive color factor, linear RGB.
    fn set_emissive_factor(&mut self, factor: [f32; 3]);

    /// Applies a resolved alpha state (mode plus cutoff).
    fn set_alpha_state(&mut self, state: AlphaState);

    /// Enables or disables back-face rendering.
    fn set_double_sided(&mut self, double_sided: bool);

    /// Binds a texture to the given slot, or clears the slot with `None`.
    fn set_texture(&mut self, slot: TextureSlot, texture: Option<TextureHandle>);

    /// Whether the given slot currently has a texture bound.
    ///
    /// Loaders answer this from what they actually uploaded, which may be
    /// a subset of what the document declares (a failed or skipped image
    /// leaves the slot empty).
    fn has_texture(&self, slot: TextureSlot) -> bool;
}

/// An engine texture that mirrors one document texture and its sampler.
pub trait TextureInstance: Debug {
    /// Applies a new wrap mode along U.
    fn set_wrap_s(&mut self, mode: WrapMode);

    /// Applies a new wrap mode along V.
    fn set_wrap_t(&mut self, mode: WrapMode);

    /// Applies a new magnification filter. `None` returns the choice to
    /// the renderer.
    fn set_mag_filter(&mut self, filter: Option<MagFilter>);

    /// Applies a new minification filter. `None` returns the choice to
    /// the renderer.
    fn set_min_filter(&mut self, filter: Option<MinFilter>);
}

/// An engine primitive that mirrors one document mesh primitive.
pub trait PrimitiveInstance: Debug {
    /// Rebinds this primitive to a different registered material.
    fn set_material(&mut self, material: MaterialHandle);

    /// The registered material currently bound.
    fn material(&self) -> MaterialHandle;
}
