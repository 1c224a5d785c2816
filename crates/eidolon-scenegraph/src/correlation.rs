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

//! The table correlating document elements with engine instances.
//!
//! Keys are explicit document indices. A document element the engine never
//! instantiated (a material declared but unused, a texture whose image
//! failed to decode) simply has no entry: lookups return an empty slice
//! and mutations against it are inert. The map is built once by the loader
//! for one graft; a reload builds a fresh map for a fresh graft.

use eidolon_core::runtime::{MaterialHandle, PrimitiveHandle, TextureHandle};
use std::collections::HashMap;

/// Addresses one correlatable document element by its indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// `materials[i]`.
    Material(usize),
    /// `textures[i]`.
    Texture(usize),
    /// `meshes[mesh].primitives[primitive]`.
    Primitive {
        /// Index of the mesh.
        mesh: usize,
        /// Index of the primitive within the mesh.
        primitive: usize,
    },
}

/// One engine instance, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceHandle {
    /// A registered material instance.
    Material(MaterialHandle),
    /// A registered texture instance.
    Texture(TextureHandle),
    /// A registered primitive instance.
    Primitive(PrimitiveHandle),
}

impl InstanceHandle {
    fn matches(&self, key: &NodeKey) -> bool {
        matches!(
            (key, self),
            (NodeKey::Material(_), InstanceHandle::Material(_))
                | (NodeKey::Texture(_), InstanceHandle::Texture(_))
                | (NodeKey::Primitive { .. }, InstanceHandle::Primitive(_))
        )
    }
}

/// Maps document elements to the engine instances mirroring them.
///
/// One element may map to several instances (the same asset loaded twice
/// shares one document), and an element may map to none.
#[derive(Debug, Default)]
pub struct CorrelationMap {
    entries: HashMap<NodeKey, Vec<InstanceHandle>>,
}

impl CorrelationMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `instance` mirrors the element at `key`.
    ///
    /// The instance kind must match the key kind; the loader owns both
    /// sides, so a mismatch is a bug there.
    pub fn record(&mut self, key: NodeKey, instance: InstanceHandle) {
        debug_assert!(
            instance.matches(&key),
            "instance kind does not match key {key:?}"
        );
        self.entries.entry(key).or_default().push(instance);
    }

    /// Every instance recorded for `key`. Empty when the element was never
    /// instantiated, which is legal.
    pub fn correlated(&self, key: &NodeKey) -> &[InstanceHandle] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The material instances recorded for `materials[index]`.
    pub fn material_instances(&self, index: usize) -> Vec<MaterialHandle> {
        self.correlated(&NodeKey::Material(index))
            .iter()
            .filter_map(|h| match h {
                InstanceHandle::Material(m) => Some(*m),
                _ => None,
            })
            .collect()
    }

    /// The texture instances recorded for `textures[index]`.
    pub fn texture_instances(&self, index: usize) -> Vec<TextureHandle> {
        self.correlated(&NodeKey::Texture(index))
            .iter()
            .filter_map(|h| match h {
                InstanceHandle::Texture(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// The primitive instances recorded for the given mesh primitive.
    pub fn primitive_instances(&self, mesh: usize, primitive: usize) -> Vec<PrimitiveHandle> {
        self.correlated(&NodeKey::Primitive { mesh, primitive })
            .iter()
            .filter_map(|h| match h {
                InstanceHandle::Primitive(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Number of keys with at least one recorded instance.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
