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

//! Engine-facing material state values.

/// Specifies how an engine material handles transparency, with the mask
/// cutoff folded in.
///
/// This is the resolved form of the document's `alphaMode`/`alphaCutoff`
/// pair. The rendering system uses it to pick pipelines and pass ordering:
///
/// - `Opaque`: fastest, no transparency calculations
/// - `Mask`: fast, no sorting required, uses alpha testing
/// - `Blend`: slowest, requires depth sorting for correct rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlphaState {
    /// The material is fully opaque with no transparency.
    Opaque,
    /// Fragments with alpha below the carried cutoff are discarded.
    ///
    /// The f32 value is the alpha cutoff threshold (typically 0.5).
    Mask(f32),
    /// The material uses full alpha blending.
    Blend,
}

impl Default for AlphaState {
    fn default() -> Self {
        Self::Opaque
    }
}

/// The material slots a texture can be bound to.
///
/// Slot order matters to traversal: textures are visited in the order this
/// enum declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// The base color (albedo) map.
    BaseColor,
    /// The combined metallic-roughness map.
    MetallicRoughness,
    /// The tangent-space normal map.
    Normal,
    /// The ambient occlusion map.
    Occlusion,
    /// The emissive map.
    Emissive,
}

impl TextureSlot {
    /// Every slot, in traversal order.
    pub const ALL: [TextureSlot; 5] = [
        TextureSlot::BaseColor,
        TextureSlot::MetallicRoughness,
        TextureSlot::Normal,
        TextureSlot::Occlusion,
        TextureSlot::Emissive,
    ];
}
