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

//! Typed model of a glTF 2.0 JSON document.
//!
//! The structs here mirror the glTF schema closely enough to round-trip a
//! document without data loss: untouched sections (animations, skins,
//! cameras) and unrecognized `extensions`/`extras` payloads ride along as
//! raw JSON values. Cross-references between elements are plain indices,
//! exactly as they appear on the wire.
//!
//! Serialization follows the canonical form most exporters produce:
//! properties that hold their schema default are omitted, while optional
//! properties that were present in the input keep their presence.

pub mod buffer;
pub mod extensions;
pub mod material;
pub mod texture;

pub use buffer::{Accessor, Buffer, BufferView};
pub use extensions::{
    DocumentExtensions, PrimitiveExtensions, VariantDef, VariantMapping, VariantsPrimitiveBlock,
    VariantsRootBlock,
};
pub use material::{
    AlphaMode, Material, NormalTextureInfo, OcclusionTextureInfo, PbrMetallicRoughness,
    TextureInfo, UnknownAlphaModeError,
};
pub use texture::{Image, MagFilter, MinFilter, Sampler, Texture, UnknownCodeError, WrapMode};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The name of the material variants extension, as it appears in
/// `extensionsUsed` and in `extensions` maps.
pub const KHR_MATERIALS_VARIANTS: &str = "KHR_materials_variants";

/// A complete glTF 2.0 document.
///
/// This is the serialization source of truth for a scene-graph session:
/// every mutation lands here first and is then propagated to the runtime
/// objects correlated with the affected element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Metadata about the asset (required by the glTF schema).
    pub asset: Asset,
    /// Index of the default scene.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<usize>,
    /// The scenes in this document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<Scene>,
    /// The node hierarchy, flattened into one index space.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
    /// The meshes referenced by nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<Mesh>,
    /// The materials referenced by mesh primitives.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
    /// The textures referenced by materials.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub textures: Vec<Texture>,
    /// The images referenced by textures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    /// The samplers referenced by textures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samplers: Vec<Sampler>,
    /// The accessors referenced by primitives.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<Accessor>,
    /// The buffer views referenced by accessors and images.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<BufferView>,
    /// The binary buffers backing the geometry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<Buffer>,
    /// Animations, carried as raw JSON. The facade never edits them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<serde_json::Value>,
    /// Skins, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skins: Vec<serde_json::Value>,
    /// Cameras, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cameras: Vec<serde_json::Value>,
    /// Names of extensions used anywhere in this document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions_used: Vec<String>,
    /// Names of extensions required to load this document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions_required: Vec<String>,
    /// Root-level extension blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<DocumentExtensions>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl Document {
    /// Parses a document from a glTF JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serializes this document to a compact glTF JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serializes this document to a pretty-printed glTF JSON string.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Returns the variant names declared by the root
    /// `KHR_materials_variants` block, or `None` if the document does not
    /// carry the extension. An empty slice means the block exists but
    /// declares no variants.
    pub fn variant_names(&self) -> Option<Vec<&str>> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.khr_materials_variants.as_ref())
            .map(|block| block.variants.iter().map(|v| v.name.as_str()).collect())
    }

    /// Resolves a variant name to its index in the root variant list.
    pub fn variant_index(&self, name: &str) -> Option<usize> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.khr_materials_variants.as_ref())
            .and_then(|block| block.variants.iter().position(|v| v.name == name))
    }
}

/// Asset metadata. `version` is the only property the schema requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// The glTF version this document targets.
    pub version: String,
    /// The tool that produced this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    /// Copyright notice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// The minimum glTF version needed to load this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            version: "2.0".to_string(),
            generator: None,
            copyright: None,
            min_version: None,
            extras: None,
        }
    }
}

/// A scene: a set of root node indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Indices of this scene's root nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<usize>,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

/// A node in the scene hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Indices of this node's children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
    /// Index of the mesh attached to this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<usize>,
    /// Index of the skin attached to this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<usize>,
    /// Index of the camera attached to this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<usize>,
    /// Local translation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<[f32; 3]>,
    /// Local rotation as a unit quaternion `[x, y, z, w]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 4]>,
    /// Local scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 3]>,
    /// Local transform as a column-major 4x4 matrix. Mutually exclusive
    /// with the TRS properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f32; 16]>,
    /// Morph target weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f32>>,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

/// A mesh: a list of primitives drawn together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mesh {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The primitives making up this mesh.
    pub primitives: Vec<Primitive>,
    /// Default morph target weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f32>>,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

/// A drawable unit: one set of vertex attributes and an optional material.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    /// Vertex attribute accessors, keyed by semantic (`POSITION`, ...).
    /// A `BTreeMap` keeps serialization order deterministic.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, usize>,
    /// Index accessor for indexed geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<usize>,
    /// Index of the material applied by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<usize>,
    /// Topology mode code (4 = triangles when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
    /// Morph target attribute accessors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<BTreeMap<String, usize>>>,
    /// Extension blocks. The variants mapping is typed; anything else is
    /// carried raw.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<PrimitiveExtensions>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl Primitive {
    /// Returns the variant mappings declared on this primitive, or `None`
    /// if it does not carry the variants extension.
    pub fn variant_mappings(&self) -> Option<&[VariantMapping]> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.khr_materials_variants.as_ref())
            .map(|block| block.mappings.as_slice())
    }
}
