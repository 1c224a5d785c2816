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

//! Shared graft fixtures: recording instance stubs and a loader-shaped
//! session builder.
//!
//! Fixture convention: a document texture named `"ghost"` is declared but
//! never uploaded. It gets no engine instance, and stub materials answer
//! `has_texture = false` for slots referencing it, the way a loader
//! reports a failed image.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use eidolon_core::document::{Document, MagFilter, Material, MinFilter, WrapMode};
use eidolon_core::math::Rgba;
use eidolon_core::runtime::{
    AlphaState, InstanceStore, MaterialHandle, MaterialInstance, PrimitiveInstance, TextureHandle,
    TextureInstance, TextureSlot,
};

use crate::correlation::{CorrelationMap, InstanceHandle, NodeKey};

use super::Graft;

pub(crate) const SESSION_DOCUMENT: &str = r#"{
    "asset": { "version": "2.0" },
    "scenes": [ { "nodes": [0] } ],
    "nodes": [ { "mesh": 0 } ],
    "meshes": [ { "primitives": [
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
            "material": 1,
            "extensions": { "KHR_materials_variants": { "mappings": [] } }
        },
        { "attributes": { "POSITION": 0 }, "material": 2 }
    ] } ],
    "materials": [
        { "name": "Hull" },
        {
            "name": "Decal",
            "pbrMetallicRoughness": {
                "baseColorTexture": { "index": 0, "texCoord": 1 }
            }
        },
        { "name": "Trim", "emissiveFactor": [0.1, 0.1, 0.1] }
    ],
    "textures": [
        { "sampler": 0, "source": 0 },
        { "sampler": 0, "source": 1 },
        { "name": "ghost", "source": 1 }
    ],
    "images": [ { "uri": "hull.png" }, { "uri": "decal.png" } ],
    "samplers": [ { "magFilter": 9729 } ],
    "extensions": { "KHR_materials_variants": { "variants": [
        { "name": "Pristine" }, { "name": "Worn" }
    ] } },
    "extensionsUsed": ["KHR_materials_variants"]
}"#;

/// Everything a stub material was asked to apply.
#[derive(Debug, Default, Clone)]
pub(crate) struct MaterialLog {
    pub base_color: Option<Rgba>,
    pub metallic: Option<f32>,
    pub roughness: Option<f32>,
    pub emissive: Option<[f32; 3]>,
    pub alpha: Option<AlphaState>,
    pub double_sided: Option<bool>,
    pub textures: Vec<(TextureSlot, Option<TextureHandle>)>,
}

#[derive(Debug)]
struct StubMaterial {
    log: Rc<RefCell<MaterialLog>>,
    textured: Vec<TextureSlot>,
}

impl MaterialInstance for StubMaterial {
    fn set_base_color_factor(&mut self, factor: Rgba) {
        self.log.borrow_mut().base_color = Some(factor);
    }

    fn set_metallic_factor(&mut self, factor: f32) {
        self.log.borrow_mut().metallic = Some(factor);
    }

    fn set_roughness_factor(&mut self, factor: f32) {
        self.log.borrow_mut().roughness = Some(factor);
    }

    fn set_emissive_factor(&mut self, factor: [f32; 3]) {
        self.log.borrow_mut().emissive = Some(factor);
    }

    fn set_alpha_state(&mut self, state: AlphaState) {
        self.log.borrow_mut().alpha = Some(state);
    }

    fn set_double_sided(&mut self, double_sided: bool) {
        self.log.borrow_mut().double_sided = Some(double_sided);
    }

    fn set_texture(&mut self, slot: TextureSlot, texture: Option<TextureHandle>) {
        self.log.borrow_mut().textures.push((slot, texture));
    }

    fn has_texture(&self, slot: TextureSlot) -> bool {
        self.textured.contains(&slot)
    }
}

/// Everything a stub texture was asked to apply.
#[derive(Debug, Default, Clone)]
pub(crate) struct TextureLog {
    pub wrap_s: Option<WrapMode>,
    pub wrap_t: Option<WrapMode>,
    pub mag_filter: Option<Option<MagFilter>>,
    pub min_filter: Option<Option<MinFilter>>,
}

#[derive(Debug)]
struct StubTexture {
    log: Rc<RefCell<TextureLog>>,
}

impl TextureInstance for StubTexture {
    fn set_wrap_s(&mut self, mode: WrapMode) {
        self.log.borrow_mut().wrap_s = Some(mode);
    }

    fn set_wrap_t(&mut self, mode: WrapMode) {
        self.log.borrow_mut().wrap_t = Some(mode);
    }

    fn set_mag_filter(&mut self, filter: Option<MagFilter>) {
        self.log.borrow_mut().mag_filter = Some(filter);
    }

    fn set_min_filter(&mut self, filter: Option<MinFilter>) {
        self.log.borrow_mut().min_filter = Some(filter);
    }
}

#[derive(Debug)]
struct StubPrimitive {
    material: Rc<Cell<MaterialHandle>>,
}

impl PrimitiveInstance for StubPrimitive {
    fn set_material(&mut self, material: MaterialHandle) {
        self.material.set(material);
    }

    fn material(&self) -> MaterialHandle {
        self.material.get()
    }
}

/// Shared views into every stub the fixture registered, by document index.
pub(crate) struct SessionLogs {
    materials: Vec<Rc<RefCell<MaterialLog>>>,
    textures: Vec<Rc<RefCell<TextureLog>>>,
    primitives: Vec<Rc<Cell<MaterialHandle>>>,
}

impl SessionLogs {
    pub(crate) fn material(&self, index: usize) -> MaterialLog {
        self.materials[index].borrow().clone()
    }

    pub(crate) fn texture(&self, index: usize) -> TextureLog {
        self.textures[index].borrow().clone()
    }

    /// The material currently bound on the stub primitive at flat `index`.
    pub(crate) fn primitive(&self, index: usize) -> &Cell<MaterialHandle> {
        &self.primitives[index]
    }
}

/// Plays the loader: parses the document, registers one stub instance per
/// material, per non-ghost texture and per primitive, records the
/// correlations and builds the graft.
pub(crate) fn session_fixture(json: &str) -> (Graft, SessionLogs) {
    let document = Document::from_json(json).expect("fixture document parses");
    let mut store = InstanceStore::new();
    let mut correlation = CorrelationMap::new();
    let mut logs = SessionLogs {
        materials: Vec::new(),
        textures: Vec::new(),
        primitives: Vec::new(),
    };

    let mut material_handles = Vec::new();
    for (index, material) in document.materials.iter().enumerate() {
        let log = Rc::new(RefCell::new(MaterialLog::default()));
        let handle = store.add_material(Box::new(StubMaterial {
            log: Rc::clone(&log),
            textured: textured_slots(&document, material),
        }));
        correlation.record(NodeKey::Material(index), InstanceHandle::Material(handle));
        logs.materials.push(log);
        material_handles.push(handle);
    }

    for index in 0..document.textures.len() {
        let log = Rc::new(RefCell::new(TextureLog::default()));
        logs.textures.push(Rc::clone(&log));
        if is_ghost(&document, index) {
            continue;
        }
        let handle = store.add_texture(Box::new(StubTexture { log }));
        correlation.record(NodeKey::Texture(index), InstanceHandle::Texture(handle));
    }

    for (mesh_index, mesh) in document.meshes.iter().enumerate() {
        for (prim_index, primitive) in mesh.primitives.iter().enumerate() {
            let initial = primitive
                .material
                .and_then(|m| material_handles.get(m).copied())
                .unwrap_or(MaterialHandle(usize::MAX));
            let bound = Rc::new(Cell::new(initial));
            let handle = store.add_primitive(Box::new(StubPrimitive {
                material: Rc::clone(&bound),
            }));
            correlation.record(
                NodeKey::Primitive {
                    mesh: mesh_index,
                    primitive: prim_index,
                },
                InstanceHandle::Primitive(handle),
            );
            logs.primitives.push(bound);
        }
    }

    (Graft::new("session", document, correlation, store), logs)
}

/// Which slots a loader would have uploaded for this material: everything
/// the document declares, minus slots pointing at ghost textures.
fn textured_slots(document: &Document, material: &Material) -> Vec<TextureSlot> {
    let pbr = material.pbr_metallic_roughness.as_ref();
    let declared = [
        (
            TextureSlot::BaseColor,
            pbr.and_then(|p| p.base_color_texture.as_ref()).map(|t| t.index),
        ),
        (
            TextureSlot::MetallicRoughness,
            pbr.and_then(|p| p.metallic_roughness_texture.as_ref())
                .map(|t| t.index),
        ),
        (
            TextureSlot::Normal,
            material.normal_texture.as_ref().map(|t| t.index),
        ),
        (
            TextureSlot::Occlusion,
            material.occlusion_texture.as_ref().map(|t| t.index),
        ),
        (
            TextureSlot::Emissive,
            material.emissive_texture.as_ref().map(|t| t.index),
        ),
    ];
    declared
        .into_iter()
        .filter_map(|(slot, index)| {
            index.filter(|&i| !is_ghost(document, i)).map(|_| slot)
        })
        .collect()
}

fn is_ghost(document: &Document, texture: usize) -> bool {
    document
        .textures
        .get(texture)
        .and_then(|t| t.name.as_deref())
        == Some("ghost")
}
