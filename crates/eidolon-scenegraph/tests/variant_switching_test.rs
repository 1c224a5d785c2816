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

//! Integration tests for `KHR_materials_variants` switching.
//!
//! The fixture is an outfit with a Summer and a Winter look: jacket and
//! boots primitives carry variant mappings, the straps participate in no
//! variant at all. Tests drive both the per-primitive editor and the
//! model-wide switch and watch the engine-side bindings through shared
//! cells.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::Result;
use serde_json::Value;

use eidolon_core::document::Document;
use eidolon_core::math::Rgba;
use eidolon_core::runtime::{
    AlphaState, InstanceStore, MaterialHandle, MaterialInstance, PrimitiveInstance, TextureHandle,
    TextureSlot,
};
use eidolon_scenegraph::{CorrelationMap, Graft, InstanceHandle, NodeKey, SceneGraphError};

const OUTFIT_DOCUMENT: &str = r#"{
    "asset": { "version": "2.0" },
    "scene": 0,
    "scenes": [{ "nodes": [0] }],
    "nodes": [{ "mesh": 0 }],
    "meshes": [{ "primitives": [
        {
            "attributes": { "POSITION": 0 },
            "material": 0,
            "extensions": { "KHR_materials_variants": { "mappings": [
                { "material": 0, "variants": [0] },
                { "material": 1, "variants": [1] }
            ] } }
        },
        {
            "attributes": { "POSITION": 0 },
            "material": 2,
            "extensions": { "KHR_materials_variants": { "mappings": [
                { "material": 2, "variants": [0] },
                { "material": 3, "variants": [1] }
            ] } }
        },
        { "attributes": { "POSITION": 0 }, "material": 4 },
        {
            "attributes": { "POSITION": 0 },
            "material": 4,
            "extensions": { "KHR_materials_variants": { "mappings": [] } }
        }
    ] }],
    "materials": [
        { "name": "SummerJacket" },
        { "name": "WinterJacket" },
        { "name": "SummerBoots" },
        { "name": "WinterBoots" },
        { "name": "Straps" }
    ],
    "extensions": { "KHR_materials_variants": { "variants": [
        { "name": "Summer" },
        { "name": "Winter" }
    ] } },
    "extensionsUsed": ["KHR_materials_variants"]
}"#;

// ─────────────────────────────────────────────────────────────────────────────
// Test rig
// ─────────────────────────────────────────────────────────────────────────────

/// Variant switching only ever touches primitives; materials can be inert.
#[derive(Debug)]
struct InertMaterial;

impl MaterialInstance for InertMaterial {
    fn set_base_color_factor(&mut self, _factor: Rgba) {}
    fn set_metallic_factor(&mut self, _factor: f32) {}
    fn set_roughness_factor(&mut self, _factor: f32) {}
    fn set_emissive_factor(&mut self, _factor: [f32; 3]) {}
    fn set_alpha_state(&mut self, _state: AlphaState) {}
    fn set_double_sided(&mut self, _double_sided: bool) {}
    fn set_texture(&mut self, _slot: TextureSlot, _texture: Option<TextureHandle>) {}
    fn has_texture(&self, _slot: TextureSlot) -> bool {
        false
    }
}

#[derive(Debug)]
struct ObservedPrimitive {
    bound: Rc<Cell<MaterialHandle>>,
}

impl PrimitiveInstance for ObservedPrimitive {
    fn set_material(&mut self, material: MaterialHandle) {
        self.bound.set(material);
    }

    fn material(&self) -> MaterialHandle {
        self.bound.get()
    }
}

struct Outfit {
    graft: Graft,
    /// Engine handle per document material; `None` where the loader
    /// skipped the material.
    handles: Vec<Option<MaterialHandle>>,
    /// Observed material binding of each primitive's engine instance.
    bound: Vec<Rc<Cell<MaterialHandle>>>,
}

/// Loads the outfit with one engine instance per element, except for the
/// materials listed in `skipped`, which get none.
fn load_outfit(skipped: &[usize]) -> Outfit {
    let document = Document::from_json(OUTFIT_DOCUMENT).expect("fixture parses");
    let mut store = InstanceStore::new();
    let mut correlation = CorrelationMap::new();

    let mut handles = Vec::new();
    for index in 0..document.materials.len() {
        if skipped.contains(&index) {
            handles.push(None);
            continue;
        }
        let handle = store.add_material(Box::new(InertMaterial));
        correlation.record(NodeKey::Material(index), InstanceHandle::Material(handle));
        handles.push(Some(handle));
    }

    let mut bound = Vec::new();
    for (prim_index, primitive) in document.meshes[0].primitives.iter().enumerate() {
        let initial = primitive
            .material
            .and_then(|m| handles[m])
            .unwrap_or(MaterialHandle(usize::MAX));
        let cell = Rc::new(Cell::new(initial));
        let handle = store.add_primitive(Box::new(ObservedPrimitive {
            bound: Rc::clone(&cell),
        }));
        correlation.record(
            NodeKey::Primitive {
                mesh: 0,
                primitive: prim_index,
            },
            InstanceHandle::Primitive(handle),
        );
        bound.push(cell);
    }

    Outfit {
        graft: Graft::new("outfit.gltf", document, correlation, store),
        handles,
        bound,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-primitive switching
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_enable_variant_switches_engine_but_not_document() -> Result<()> {
    let Outfit {
        mut graft,
        handles,
        bound,
    } = load_outfit(&[]);

    let winter = graft.primitive_mut(0).unwrap().enable_variant("Winter");
    assert_eq!(winter, handles[1]);
    assert_eq!(bound[0].get(), handles[1].unwrap());
    let view = graft.primitive(0).unwrap();
    assert_eq!(view.active_material_index(), Some(1));
    assert_eq!(view.default_material_index(), Some(0), "authored reference stays");
    assert_eq!(graft.revision(), 1);

    // Re-enabling the active variant lands on the same handle.
    let again = graft.primitive_mut(0).unwrap().enable_variant("Winter");
    assert_eq!(again, winter);
    assert_eq!(bound[0].get(), handles[1].unwrap());

    // Switching back by name restores the starting binding.
    let summer = graft.primitive_mut(0).unwrap().enable_variant("Summer");
    assert_eq!(summer, handles[0]);
    assert_eq!(bound[0].get(), handles[0].unwrap());
    assert_eq!(graft.primitive(0).unwrap().active_material_index(), Some(0));

    // The exported document still references the authored material.
    let json: Value = serde_json::from_str(&graft.export_json()?)?;
    assert_eq!(json["meshes"][0]["primitives"][0]["material"], 0);
    Ok(())
}

#[test]
fn test_unknown_variant_is_inert() {
    let Outfit {
        mut graft,
        handles,
        bound,
    } = load_outfit(&[]);

    assert_eq!(graft.primitive_mut(0).unwrap().enable_variant("Autumn"), None);
    assert_eq!(bound[0].get(), handles[0].unwrap());

    // A primitive with no variant block at all answers the same way.
    assert_eq!(graft.primitive_mut(2).unwrap().enable_variant("Winter"), None);
    assert_eq!(graft.revision(), 0);
}

#[test]
fn test_variant_without_an_engine_material_is_skipped() {
    // The loader never produced WinterBoots (say its image failed).
    let Outfit {
        mut graft,
        handles,
        bound,
    } = load_outfit(&[3]);

    let view = graft.primitive(1).unwrap();
    let info = view.variant_info().expect("mapped primitive has a table");
    assert_eq!(info["Winter"].material_index(), 3);
    assert!(!info["Winter"].is_instantiated());

    assert_eq!(graft.primitive_mut(1).unwrap().enable_variant("Winter"), None);
    assert_eq!(bound[1].get(), handles[2].unwrap(), "summer boots stay bound");
    assert_eq!(graft.primitive(1).unwrap().active_material_index(), Some(2));
    assert_eq!(graft.revision(), 0);
}

#[test]
fn test_variant_tables_distinguish_absent_from_empty() {
    let outfit = load_outfit(&[]);
    assert_eq!(outfit.graft.available_variants(), ["Summer", "Winter"]);

    // The straps carry no extension block: no table.
    let bare = outfit.graft.primitive(2).unwrap();
    assert!(bare.variant_info().is_none());
    assert!(bare.variant_names().is_empty());

    // Their twin carries a block that maps nothing: an empty table.
    let empty = outfit.graft.primitive(3).unwrap();
    assert!(empty.variant_info().is_some_and(BTreeMap::is_empty));

    assert_eq!(
        outfit.graft.primitive(0).unwrap().variant_names(),
        ["Summer", "Winter"]
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Model-wide switching
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_set_active_variant_drives_every_mapped_primitive() -> Result<()> {
    let Outfit {
        mut graft,
        handles,
        bound,
    } = load_outfit(&[3]);

    graft.set_active_variant(Some("Winter"))?;
    assert_eq!(graft.active_variant(), Some("Winter"));

    // The jacket switched; the boots mapping points at the skipped
    // material and keeps its current binding; unmapped straps never move.
    assert_eq!(bound[0].get(), handles[1].unwrap());
    assert_eq!(bound[1].get(), handles[2].unwrap());
    assert_eq!(bound[2].get(), handles[4].unwrap());
    assert_eq!(bound[3].get(), handles[4].unwrap());
    assert_eq!(graft.revision(), 1);

    // Restoring the authored defaults brings the jacket back.
    graft.set_active_variant(None)?;
    assert_eq!(graft.active_variant(), None);
    assert_eq!(bound[0].get(), handles[0].unwrap());
    assert_eq!(graft.primitive(0).unwrap().active_material_index(), Some(0));
    assert_eq!(graft.revision(), 2);
    Ok(())
}

#[test]
fn test_set_active_variant_rejects_unknown_names() -> Result<()> {
    let mut outfit = load_outfit(&[]);
    outfit.graft.set_active_variant(Some("Winter"))?;

    let err = outfit
        .graft
        .set_active_variant(Some("Monsoon"))
        .unwrap_err();
    assert_eq!(err, SceneGraphError::lookup_miss("variant", "Monsoon"));

    // The failed switch changed nothing.
    assert_eq!(outfit.graft.active_variant(), Some("Winter"));
    assert_eq!(outfit.graft.revision(), 1);
    Ok(())
}

#[test]
fn test_materials_for_variant_keeps_unmapped_materials() {
    let outfit = load_outfit(&[]);

    assert_eq!(outfit.graft.materials_for_variant(None), [0, 1, 2, 3, 4]);
    // Mapped materials are filtered by variant; the straps always show.
    assert_eq!(outfit.graft.materials_for_variant(Some("Winter")), [1, 3, 4]);
    assert_eq!(outfit.graft.materials_for_variant(Some("Summer")), [0, 2, 4]);
}
