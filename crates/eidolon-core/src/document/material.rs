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

//! Material definitions: PBR metallic-roughness parameters, texture
//! references, and alpha handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a material's alpha channel is interpreted, as written in the
/// document (`alphaMode`).
///
/// The runtime counterpart folds the cutoff into the mode; this type keeps
/// the document's flat representation where `alphaCutoff` is a sibling
/// property only meaningful under [`AlphaMode::Mask`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlphaMode {
    /// Alpha is ignored; the material is fully opaque.
    #[default]
    #[serde(rename = "OPAQUE")]
    Opaque,
    /// Alpha is compared against `alphaCutoff`; fragments below are discarded.
    #[serde(rename = "MASK")]
    Mask,
    /// Alpha blends the material with the background.
    #[serde(rename = "BLEND")]
    Blend,
}

impl AlphaMode {
    /// The document string for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlphaMode::Opaque => "OPAQUE",
            AlphaMode::Mask => "MASK",
            AlphaMode::Blend => "BLEND",
        }
    }
}

impl fmt::Display for AlphaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error produced when a string does not name a known alpha mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlphaModeError {
    /// The string that failed to parse.
    pub value: String,
}

impl fmt::Display for UnknownAlphaModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown alpha mode '{}' (expected 'OPAQUE', 'MASK' or 'BLEND')",
            self.value
        )
    }
}

impl std::error::Error for UnknownAlphaModeError {}

impl FromStr for AlphaMode {
    type Err = UnknownAlphaModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPAQUE" => Ok(AlphaMode::Opaque),
            "MASK" => Ok(AlphaMode::Mask),
            "BLEND" => Ok(AlphaMode::Blend),
            other => Err(UnknownAlphaModeError {
                value: other.to_string(),
            }),
        }
    }
}

/// A material in the document.
///
/// Every property is optional in the schema; absent properties mean their
/// schema defaults. `alphaCutoff` keeps its document presence so a
/// round-trip does not invent or drop the property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Metallic-roughness parameter block. Absent means all defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    /// Tangent-space normal map reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<NormalTextureInfo>,
    /// Ambient occlusion map reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occlusion_texture: Option<OcclusionTextureInfo>,
    /// Emissive map reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<TextureInfo>,
    /// Emissive color factor, linear RGB.
    #[serde(
        default,
        skip_serializing_if = "is_default_emissive_factor"
    )]
    pub emissive_factor: [f32; 3],
    /// Alpha interpretation mode.
    #[serde(default, skip_serializing_if = "is_default_alpha_mode")]
    pub alpha_mode: AlphaMode,
    /// Alpha cutoff for [`AlphaMode::Mask`]. The schema default is `0.5`,
    /// applied only when the property is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_cutoff: Option<f32>,
    /// Whether back faces are rendered.
    #[serde(default, skip_serializing_if = "is_false")]
    pub double_sided: bool,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl Material {
    /// Returns the cutoff that applies under mask mode: the stored value,
    /// or the schema default `0.5` when the property is absent.
    pub fn effective_alpha_cutoff(&self) -> f32 {
        self.alpha_cutoff.unwrap_or(0.5)
    }
}

/// The metallic-roughness parameter block of a material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    /// Base color factor, linear RGBA.
    #[serde(default = "default_base_color", skip_serializing_if = "is_default_base_color")]
    pub base_color_factor: [f32; 4],
    /// Base color texture reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_color_texture: Option<TextureInfo>,
    /// Metalness multiplier in `[0.0, 1.0]`.
    #[serde(default = "default_unit", skip_serializing_if = "is_unit")]
    pub metallic_factor: f32,
    /// Roughness multiplier in `[0.0, 1.0]`.
    #[serde(default = "default_unit", skip_serializing_if = "is_unit")]
    pub roughness_factor: f32,
    /// Combined metallic (B) and roughness (G) texture reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metallic_roughness_texture: Option<TextureInfo>,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl Default for PbrMetallicRoughness {
    fn default() -> Self {
        Self {
            base_color_factor: default_base_color(),
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
            extensions: None,
            extras: None,
        }
    }
}

/// A reference from a material slot to a texture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureInfo {
    /// Index of the referenced texture.
    pub index: usize,
    /// The `TEXCOORD_<n>` attribute set used for sampling.
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub tex_coord: u32,
    /// Extension blocks (texture transforms and the like), carried raw.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl TextureInfo {
    /// Creates a reference to texture `index` using texture coordinate set 0.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            tex_coord: 0,
            extensions: None,
            extras: None,
        }
    }
}

/// A normal map reference. Extends [`TextureInfo`] with a scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalTextureInfo {
    /// Index of the referenced texture.
    pub index: usize,
    /// The `TEXCOORD_<n>` attribute set used for sampling.
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub tex_coord: u32,
    /// Multiplier applied to the sampled normal's X and Y.
    #[serde(default = "default_unit", skip_serializing_if = "is_unit")]
    pub scale: f32,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl NormalTextureInfo {
    /// Creates a reference to texture `index` with default scale.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            tex_coord: 0,
            scale: 1.0,
            extensions: None,
            extras: None,
        }
    }
}

/// An occlusion map reference. Extends [`TextureInfo`] with a strength.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcclusionTextureInfo {
    /// Index of the referenced texture.
    pub index: usize,
    /// The `TEXCOORD_<n>` attribute set used for sampling.
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub tex_coord: u32,
    /// Occlusion strength in `[0.0, 1.0]`.
    #[serde(default = "default_unit", skip_serializing_if = "is_unit")]
    pub strength: f32,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl OcclusionTextureInfo {
    /// Creates a reference to texture `index` with default strength.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            tex_coord: 0,
            strength: 1.0,
            extensions: None,
            extras: None,
        }
    }
}

fn default_base_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn is_default_base_color(v: &[f32; 4]) -> bool {
    *v == [1.0, 1.0, 1.0, 1.0]
}

fn is_default_emissive_factor(v: &[f32; 3]) -> bool {
    *v == [0.0, 0.0, 0.0]
}

fn is_default_alpha_mode(v: &AlphaMode) -> bool {
    *v == AlphaMode::Opaque
}

fn default_unit() -> f32 {
    1.0
}

fn is_unit(v: &f32) -> bool {
    *v == 1.0
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_mode_strings() {
        assert_eq!("OPAQUE".parse::<AlphaMode>().unwrap(), AlphaMode::Opaque);
        assert_eq!("MASK".parse::<AlphaMode>().unwrap(), AlphaMode::Mask);
        assert_eq!("BLEND".parse::<AlphaMode>().unwrap(), AlphaMode::Blend);
        assert_eq!(AlphaMode::Blend.to_string(), "BLEND");

        // Case matters in glTF; lowercase is rejected.
        let err = "blend".parse::<AlphaMode>().unwrap_err();
        assert_eq!(err.value, "blend");
        assert!(format!("{err}").contains("Unknown alpha mode 'blend'"));
    }

    #[test]
    fn test_empty_material_means_defaults() {
        let mat: Material = serde_json::from_str("{}").unwrap();
        assert!(mat.pbr_metallic_roughness.is_none());
        assert_eq!(mat.alpha_mode, AlphaMode::Opaque);
        assert_eq!(mat.alpha_cutoff, None);
        assert_eq!(mat.effective_alpha_cutoff(), 0.5);
        assert_eq!(mat.emissive_factor, [0.0, 0.0, 0.0]);
        assert!(!mat.double_sided);
    }

    #[test]
    fn test_material_serializes_only_non_defaults() {
        let mat = Material {
            name: Some("paint".to_string()),
            double_sided: true,
            ..Default::default()
        };
        let value = serde_json::to_value(&mat).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "name": "paint", "doubleSided": true })
        );
    }

    #[test]
    fn test_alpha_cutoff_presence_survives_round_trip() {
        // 0.5 is the schema default, but the property was written
        // explicitly, so it must stay.
        let input = r#"{ "alphaMode": "MASK", "alphaCutoff": 0.5 }"#;
        let mat: Material = serde_json::from_str(input).unwrap();
        assert_eq!(mat.alpha_cutoff, Some(0.5));

        let value = serde_json::to_value(&mat).unwrap();
        assert_eq!(value["alphaMode"], "MASK");
        assert_eq!(value["alphaCutoff"], 0.5);
    }

    #[test]
    fn test_pbr_defaults() {
        let pbr = PbrMetallicRoughness::default();
        assert_eq!(pbr.base_color_factor, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(pbr.metallic_factor, 1.0);
        assert_eq!(pbr.roughness_factor, 1.0);

        // A fully-default block serializes to an empty object.
        assert_eq!(serde_json::to_value(&pbr).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_texture_info_tex_coord() {
        let ti: TextureInfo = serde_json::from_str(r#"{ "index": 2 }"#).unwrap();
        assert_eq!(ti.index, 2);
        assert_eq!(ti.tex_coord, 0);

        let ti: TextureInfo =
            serde_json::from_str(r#"{ "index": 2, "texCoord": 1 }"#).unwrap();
        assert_eq!(ti.tex_coord, 1);
        let value = serde_json::to_value(&ti).unwrap();
        assert_eq!(value["texCoord"], 1);
    }

    #[test]
    fn test_normal_and_occlusion_extras_fields() {
        let n: NormalTextureInfo =
            serde_json::from_str(r#"{ "index": 0, "scale": 0.8 }"#).unwrap();
        assert_eq!(n.scale, 0.8);

        let o: OcclusionTextureInfo =
            serde_json::from_str(r#"{ "index": 1, "strength": 0.25 }"#).unwrap();
        assert_eq!(o.strength, 0.25);

        // Defaults are omitted again on write.
        let n = NormalTextureInfo::new(3);
        assert_eq!(
            serde_json::to_value(&n).unwrap(),
            serde_json::json!({ "index": 3 })
        );
    }
}
