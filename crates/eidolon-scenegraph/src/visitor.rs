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

//! Read-only traversal of a document in tree order.
//!
//! The walk takes `&Document`, so callbacks cannot mutate it; a visitor is
//! reusable across walks. Order is fixed: scenes in declaration order,
//! each scene's root nodes, then per node its mesh (primitives, material,
//! textures) before its children, children depth-first in declaration
//! order. Textures under a material follow the slot order of
//! [`TextureSlot::ALL`].

use eidolon_core::document::{Document, Material, Mesh, Node, Primitive, Scene, Texture};
use eidolon_core::runtime::TextureSlot;
use std::collections::HashSet;

/// Receives elements as [`walk`] encounters them.
///
/// Every method defaults to doing nothing; override the ones you care
/// about. Indices are document indices, usable as correlation keys.
pub trait DocumentVisitor {
    /// Called for each scene before its nodes.
    fn enter_scene(&mut self, _index: usize, _scene: &Scene) {}
    /// Called for each node before its mesh and children.
    fn enter_node(&mut self, _index: usize, _node: &Node) {}
    /// Called for a node's mesh before its primitives.
    fn visit_mesh(&mut self, _index: usize, _mesh: &Mesh) {}
    /// Called for each primitive before its material.
    fn visit_primitive(&mut self, _mesh: usize, _primitive: usize, _data: &Primitive) {}
    /// Called for a primitive's material before that material's textures.
    fn visit_material(&mut self, _index: usize, _material: &Material) {}
    /// Called for each texture a visited material references.
    fn visit_texture(&mut self, _slot: TextureSlot, _index: usize, _texture: &Texture) {}
}

/// Options controlling a [`walk`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VisitOptions {
    /// When set, each distinct material index is visited only on its first
    /// occurrence (and its textures with it). Useful when the visit does
    /// per-material work rather than per-reference work.
    pub sparse: bool,
}

/// Walks `document` in tree order, feeding `visitor`.
///
/// Unresolvable indices are skipped rather than reported; a visited-node
/// set keeps the walk finite even if the node graph is malformed and
/// carries a cycle.
pub fn walk<V: DocumentVisitor + ?Sized>(
    document: &Document,
    options: VisitOptions,
    visitor: &mut V,
) {
    let mut state = WalkState {
        document,
        sparse: options.sparse,
        visited_nodes: HashSet::new(),
        visited_materials: HashSet::new(),
    };

    for (index, scene) in document.scenes.iter().enumerate() {
        visitor.enter_scene(index, scene);
        for &root in &scene.nodes {
            state.walk_node(root, visitor);
        }
    }
}

struct WalkState<'a> {
    document: &'a Document,
    sparse: bool,
    visited_nodes: HashSet<usize>,
    visited_materials: HashSet<usize>,
}

impl WalkState<'_> {
    fn walk_node<V: DocumentVisitor + ?Sized>(&mut self, index: usize, visitor: &mut V) {
        if !self.visited_nodes.insert(index) {
            return;
        }
        let Some(node) = self.document.nodes.get(index) else {
            return;
        };
        visitor.enter_node(index, node);
        if let Some(mesh) = node.mesh {
            self.walk_mesh(mesh, visitor);
        }
        for &child in &node.children {
            self.walk_node(child, visitor);
        }
    }

    fn walk_mesh<V: DocumentVisitor + ?Sized>(&mut self, index: usize, visitor: &mut V) {
        let Some(mesh) = self.document.meshes.get(index) else {
            return;
        };
        visitor.visit_mesh(index, mesh);
        for (pi, primitive) in mesh.primitives.iter().enumerate() {
            visitor.visit_primitive(index, pi, primitive);
            if let Some(mi) = primitive.material {
                self.walk_material(mi, visitor);
            }
        }
    }

    fn walk_material<V: DocumentVisitor + ?Sized>(&mut self, index: usize, visitor: &mut V) {
        if self.sparse && !self.visited_materials.insert(index) {
            return;
        }
        let Some(material) = self.document.materials.get(index) else {
            return;
        };
        visitor.visit_material(index, material);

        let pbr = material.pbr_metallic_roughness.as_ref();
        let slot_index = |slot: TextureSlot| -> Option<usize> {
            match slot {
                TextureSlot::BaseColor => {
                    pbr.and_then(|p| p.base_color_texture.as_ref()).map(|t| t.index)
                }
                TextureSlot::MetallicRoughness => pbr
                    .and_then(|p| p.metallic_roughness_texture.as_ref())
                    .map(|t| t.index),
                TextureSlot::Normal => material.normal_texture.as_ref().map(|t| t.index),
                TextureSlot::Occlusion => material.occlusion_texture.as_ref().map(|t| t.index),
                TextureSlot::Emissive => material.emissive_texture.as_ref().map(|t| t.index),
            }
        };

        for slot in TextureSlot::ALL {
            if let Some(ti) = slot_index(slot) {
                if let Some(texture) = self.document.textures.get(ti) {
                    visitor.visit_texture(slot, ti, texture);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two roots, shared materials, meshes referenced in an order designed
    /// so the material visit sequence is unambiguous.
    const ORDER_FIXTURE: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0, 3] }],
        "nodes": [
            { "mesh": 0, "children": [1] },
            { "mesh": 1, "children": [2] },
            { "mesh": 2 },
            { "mesh": 3 }
        ],
        "meshes": [
            { "primitives": [
                { "attributes": { "POSITION": 0 }, "material": 0 },
                { "attributes": { "POSITION": 0 }, "material": 1 }
            ] },
            { "primitives": [
                { "attributes": { "POSITION": 0 }, "material": 2 }
            ] },
            { "primitives": [
                { "attributes": { "POSITION": 0 }, "material": 2 },
                { "attributes": { "POSITION": 0 }, "material": 1 }
            ] },
            { "primitives": [
                { "attributes": { "POSITION": 0 }, "material": 0 },
                { "attributes": { "POSITION": 0 }, "material": 2 }
            ] }
        ],
        "materials": [
            { "name": "Material0" },
            { "name": "Material1" },
            { "name": "Material2" }
        ]
    }"#;

    #[derive(Default)]
    struct MaterialCollector {
        names: Vec<String>,
    }

    impl DocumentVisitor for MaterialCollector {
        fn visit_material(&mut self, _index: usize, material: &Material) {
            self.names.push(material.name.clone().unwrap_or_default());
        }
    }

    #[test]
    fn test_visits_materials_in_tree_order() {
        let document = Document::from_json(ORDER_FIXTURE).unwrap();
        let mut collector = MaterialCollector::default();
        walk(&document, VisitOptions::default(), &mut collector);

        assert_eq!(
            collector.names,
            vec![
                "Material0",
                "Material1",
                "Material2",
                "Material2",
                "Material1",
                "Material0",
                "Material2",
            ]
        );
    }

    #[test]
    fn test_sparse_visits_each_material_once() {
        let document = Document::from_json(ORDER_FIXTURE).unwrap();
        let mut collector = MaterialCollector::default();
        walk(&document, VisitOptions { sparse: true }, &mut collector);

        assert_eq!(
            collector.names,
            vec!["Material0", "Material1", "Material2"]
        );
    }

    #[derive(Default)]
    struct TextureCollector {
        visits: Vec<(TextureSlot, usize)>,
    }

    impl DocumentVisitor for TextureCollector {
        fn visit_texture(&mut self, slot: TextureSlot, index: usize, _texture: &Texture) {
            self.visits.push((slot, index));
        }
    }

    #[test]
    fn test_textures_follow_slot_order() {
        // Texture indices are deliberately scrambled relative to slot order.
        let document = Document::from_json(
            r#"{
                "asset": { "version": "2.0" },
                "scenes": [{ "nodes": [0] }],
                "nodes": [{ "mesh": 0 }],
                "meshes": [{ "primitives": [
                    { "attributes": { "POSITION": 0 }, "material": 0 }
                ] }],
                "materials": [{
                    "pbrMetallicRoughness": {
                        "baseColorTexture": { "index": 2 },
                        "metallicRoughnessTexture": { "index": 0 }
                    },
                    "normalTexture": { "index": 4 },
                    "occlusionTexture": { "index": 1 },
                    "emissiveTexture": { "index": 3 }
                }],
                "textures": [{}, {}, {}, {}, {}]
            }"#,
        )
        .unwrap();

        let mut collector = TextureCollector::default();
        walk(&document, VisitOptions::default(), &mut collector);

        assert_eq!(
            collector.visits,
            vec![
                (TextureSlot::BaseColor, 2),
                (TextureSlot::MetallicRoughness, 0),
                (TextureSlot::Normal, 4),
                (TextureSlot::Occlusion, 1),
                (TextureSlot::Emissive, 3),
            ]
        );
    }

    #[derive(Default)]
    struct NodeCounter {
        entered: Vec<usize>,
    }

    impl DocumentVisitor for NodeCounter {
        fn enter_node(&mut self, index: usize, _node: &Node) {
            self.entered.push(index);
        }
    }

    #[test]
    fn test_walk_terminates_on_a_node_cycle() {
        let document = Document::from_json(
            r#"{
                "asset": { "version": "2.0" },
                "scenes": [{ "nodes": [0] }],
                "nodes": [
                    { "children": [1] },
                    { "children": [0] }
                ]
            }"#,
        )
        .unwrap();

        let mut counter = NodeCounter::default();
        walk(&document, VisitOptions::default(), &mut counter);
        assert_eq!(counter.entered, vec![0, 1]);
    }

    #[test]
    fn test_out_of_range_references_are_skipped() {
        let document = Document::from_json(
            r#"{
                "asset": { "version": "2.0" },
                "scenes": [{ "nodes": [0, 9] }],
                "nodes": [{ "mesh": 7 }]
            }"#,
        )
        .unwrap();

        let mut counter = NodeCounter::default();
        walk(&document, VisitOptions::default(), &mut counter);
        assert_eq!(counter.entered, vec![0]);
    }
}
