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

//! The graft: one loaded document stitched onto its engine instances.
//!
//! A [`Graft`] exclusively owns the parsed document, the instance store,
//! the correlation map and every facade element built from them. All
//! mutation flows through it in a fixed order: validate, write the
//! document, replay onto correlated instances, bump the revision. The
//! document therefore always serializes to the edited state, and engine
//! instances never disagree with it.
//!
//! Dropping a graft is the unload path. Element ids minted for it become
//! permanently stale; a successor graft recognizes them by comparing
//! against its own id floor.

mod mutate;
#[cfg(test)]
pub(crate) mod testutil;
mod variants;

use std::collections::HashMap;

use eidolon_core::document::{Document, Material, PbrMetallicRoughness};
use eidolon_core::runtime::{InstanceStore, MaterialHandle, TextureHandle, TextureSlot};

use crate::correlation::CorrelationMap;
use crate::element::{
    ElementPath, ElementRef, ImageState, ImageView, MaterialEditor, MaterialState, MaterialView,
    PbrState, PrimitiveEditor, PrimitiveState, PrimitiveView, SamplerEditor, SamplerState,
    SamplerView, TextureInfoState, TextureState, TextureView,
};
use crate::error::SceneGraphError;
use crate::id::{next_element_id, peek_next_id, ElementId};

/// One loaded model: document, engine instances and the facade tree
/// correlating them.
#[derive(Debug)]
pub struct Graft {
    label: String,
    pub(crate) document: Document,
    pub(crate) instances: InstanceStore,
    correlation: CorrelationMap,
    pub(crate) materials: Vec<MaterialState>,
    pub(crate) textures: Vec<TextureState>,
    images: Vec<ImageState>,
    pub(crate) samplers: Vec<SamplerState>,
    pub(crate) primitives: Vec<PrimitiveState>,
    registry: HashMap<ElementId, ElementPath>,
    /// First id minted for this graft. Ids below it belong to predecessor
    /// grafts and are reported as stale.
    id_floor: ElementId,
    /// One past the last id minted for this graft.
    id_ceiling: ElementId,
    pub(crate) active_variant: Option<String>,
    pub(crate) revision: u64,
}

impl Graft {
    /// Builds the facade tree over a loader-produced document, correlation
    /// map and instance store.
    ///
    /// Materials missing their `pbrMetallicRoughness` block get it
    /// materialized with schema defaults so edits always have a document
    /// node to land in. Element ids are minted here and registered;
    /// nothing is added or removed afterwards.
    pub fn new(
        label: impl Into<String>,
        mut document: Document,
        correlation: CorrelationMap,
        instances: InstanceStore,
    ) -> Self {
        let label = label.into();
        let id_floor = peek_next_id();
        let mut registry = HashMap::new();

        for material in &mut document.materials {
            if material.pbr_metallic_roughness.is_none() {
                material.pbr_metallic_roughness = Some(PbrMetallicRoughness::default());
            }
        }

        let materials = build_materials(&document, &correlation, &instances, &mut registry);
        let textures = build_textures(&document, &correlation, &mut registry);
        let images = build_images(&document, &mut registry);
        let samplers = build_samplers(&document, &correlation, &mut registry);
        let primitives = build_primitives(&document, &correlation, &mut registry);

        let id_ceiling = peek_next_id();
        log::info!(
            "Graft '{label}' built: {} materials, {} textures, {} primitives, ids {id_floor}..{id_ceiling}",
            materials.len(),
            textures.len(),
            primitives.len()
        );

        Self {
            label,
            document,
            instances,
            correlation,
            materials,
            textures,
            images,
            samplers,
            primitives,
            registry,
            id_floor,
            id_ceiling,
            active_variant: None,
            revision: 0,
        }
    }

    /// The loader-assigned label, typically the asset path.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The document with all edits folded in.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The correlation map the facade tree was built from.
    pub fn correlation(&self) -> &CorrelationMap {
        &self.correlation
    }

    /// Counts successful mutations. Hosts compare snapshots of this to
    /// decide when to refresh derived UI state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether an id was minted for this graft.
    pub fn owns_id(&self, id: ElementId) -> bool {
        id >= self.id_floor && id < self.id_ceiling
    }

    /// Looks up an element by its process-unique id.
    ///
    /// Ids minted by a predecessor graft resolve to `None` and log a
    /// warning; they indicate the caller kept an id across a reload.
    pub fn element_by_internal_id(&self, id: ElementId) -> Option<ElementRef<'_>> {
        match self.registry.get(&id) {
            Some(path) => self.resolve_path(*path),
            None => {
                if id < self.id_floor {
                    log::warn!(
                        "Element {id} predates graft '{}' and is stale; lookup ignored",
                        self.label
                    );
                }
                None
            }
        }
    }

    /// Like [`element_by_internal_id`](Self::element_by_internal_id) but
    /// for mutation entry points, where a miss is an error: stale ids
    /// fail as [`SceneGraphError::StaleElement`], everything else as a
    /// lookup miss.
    pub fn require_element(&self, id: ElementId) -> Result<ElementRef<'_>, SceneGraphError> {
        match self.registry.get(&id) {
            Some(path) => self
                .resolve_path(*path)
                .ok_or_else(|| SceneGraphError::lookup_miss("element", id)),
            None if id < self.id_floor => Err(SceneGraphError::StaleElement { id }),
            None => Err(SceneGraphError::lookup_miss("element", id)),
        }
    }

    /// Iterates the material facades in document order.
    pub fn materials(&self) -> impl ExactSizeIterator<Item = MaterialView<'_>> {
        (0..self.materials.len()).map(|i| MaterialView::new(self, i))
    }

    /// Read access to the material at `index`.
    pub fn material(&self, index: usize) -> Option<MaterialView<'_>> {
        (index < self.materials.len()).then(|| MaterialView::new(self, index))
    }

    /// Write access to the material at `index`.
    pub fn material_mut(&mut self, index: usize) -> Option<MaterialEditor<'_>> {
        (index < self.materials.len()).then(move || MaterialEditor::new(self, index))
    }

    /// Number of document materials.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Iterates the texture facades in document order.
    pub fn textures(&self) -> impl ExactSizeIterator<Item = TextureView<'_>> {
        (0..self.textures.len()).map(|i| TextureView::new(self, i))
    }

    /// Read access to the texture at `index`.
    pub fn texture(&self, index: usize) -> Option<TextureView<'_>> {
        (index < self.textures.len()).then(|| TextureView::new(self, index))
    }

    /// Number of document textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Iterates the image facades in document order.
    pub fn images(&self) -> impl ExactSizeIterator<Item = ImageView<'_>> {
        (0..self.images.len()).map(|i| ImageView::new(self, i))
    }

    /// Read access to the image at `index`.
    pub fn image(&self, index: usize) -> Option<ImageView<'_>> {
        (index < self.images.len()).then(|| ImageView::new(self, index))
    }

    /// Iterates the sampler facades in document order.
    pub fn samplers(&self) -> impl ExactSizeIterator<Item = SamplerView<'_>> {
        (0..self.samplers.len()).map(|i| SamplerView::new(self, i))
    }

    /// Read access to the sampler at `index`.
    pub fn sampler(&self, index: usize) -> Option<SamplerView<'_>> {
        (index < self.samplers.len()).then(|| SamplerView::new(self, index))
    }

    /// Write access to the sampler at `index`.
    pub fn sampler_mut(&mut self, index: usize) -> Option<SamplerEditor<'_>> {
        (index < self.samplers.len()).then(move || SamplerEditor::new(self, index))
    }

    /// Iterates the primitive facades in mesh-major document order.
    pub fn primitives(&self) -> impl ExactSizeIterator<Item = PrimitiveView<'_>> {
        (0..self.primitives.len()).map(|i| PrimitiveView::new(self, i))
    }

    /// Read access to the primitive at flat `index` (mesh-major order).
    pub fn primitive(&self, index: usize) -> Option<PrimitiveView<'_>> {
        (index < self.primitives.len()).then(|| PrimitiveView::new(self, index))
    }

    /// Write access to the primitive at flat `index`.
    pub fn primitive_mut(&mut self, index: usize) -> Option<PrimitiveEditor<'_>> {
        (index < self.primitives.len()).then(move || PrimitiveEditor::new(self, index))
    }

    /// Number of mesh primitives across all meshes.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Serializes the document, edits folded in, as compact JSON.
    pub fn export_json(&self) -> serde_json::Result<String> {
        self.document.to_json()
    }

    /// Serializes the document, edits folded in, as pretty-printed JSON.
    pub fn export_json_pretty(&self) -> serde_json::Result<String> {
        self.document.to_json_pretty()
    }

    fn resolve_path(&self, path: ElementPath) -> Option<ElementRef<'_>> {
        match path {
            ElementPath::Material(i) => self.materials.get(i).map(ElementRef::Material),
            ElementPath::Pbr(i) => self.materials.get(i).map(|m| ElementRef::Pbr(&m.pbr)),
            ElementPath::TextureInfo { material, slot } => self
                .materials
                .get(material)
                .and_then(|m| m.slot_state(slot))
                .map(ElementRef::TextureInfo),
            ElementPath::Texture(i) => self.textures.get(i).map(ElementRef::Texture),
            ElementPath::Image(i) => self.images.get(i).map(ElementRef::Image),
            ElementPath::Sampler(i) => self.samplers.get(i).map(ElementRef::Sampler),
            ElementPath::Primitive(i) => self.primitives.get(i).map(ElementRef::Primitive),
        }
    }

    pub(crate) fn material_state(&self, index: usize) -> &MaterialState {
        &self.materials[index]
    }

    pub(crate) fn texture_state(&self, index: usize) -> &TextureState {
        &self.textures[index]
    }

    pub(crate) fn image_state(&self, index: usize) -> &ImageState {
        &self.images[index]
    }

    pub(crate) fn sampler_state(&self, index: usize) -> &SamplerState {
        &self.samplers[index]
    }

    pub(crate) fn primitive_state(&self, index: usize) -> &PrimitiveState {
        &self.primitives[index]
    }

    pub(crate) fn document_material(&self, index: usize) -> &Material {
        &self.document.materials[index]
    }

    /// The texture index and UV set a slot currently references, straight
    /// from the document.
    pub(crate) fn slot_reference(&self, material: usize, slot: TextureSlot) -> Option<(usize, u32)> {
        let material = self.document.materials.get(material)?;
        match slot {
            TextureSlot::BaseColor => material
                .pbr_metallic_roughness
                .as_ref()?
                .base_color_texture
                .as_ref()
                .map(|t| (t.index, t.tex_coord)),
            TextureSlot::MetallicRoughness => material
                .pbr_metallic_roughness
                .as_ref()?
                .metallic_roughness_texture
                .as_ref()
                .map(|t| (t.index, t.tex_coord)),
            TextureSlot::Normal => material.normal_texture.as_ref().map(|t| (t.index, t.tex_coord)),
            TextureSlot::Occlusion => material
                .occlusion_texture
                .as_ref()
                .map(|t| (t.index, t.tex_coord)),
            TextureSlot::Emissive => material
                .emissive_texture
                .as_ref()
                .map(|t| (t.index, t.tex_coord)),
        }
    }
}

fn build_materials(
    document: &Document,
    correlation: &CorrelationMap,
    instances: &InstanceStore,
    registry: &mut HashMap<ElementId, ElementPath>,
) -> Vec<MaterialState> {
    document
        .materials
        .iter()
        .enumerate()
        .map(|(index, material)| {
            let correlated = correlation.material_instances(index);

            let id = next_element_id();
            registry.insert(id, ElementPath::Material(index));
            let pbr_id = next_element_id();
            registry.insert(pbr_id, ElementPath::Pbr(index));

            // The two PBR slots always get a facade; the remaining slots
            // only when the document declares them and at least one
            // uploaded instance actually carries the texture.
            let base_color_info =
                slot_facade(index, TextureSlot::BaseColor, correlated.clone(), registry);
            let metallic_roughness_info = slot_facade(
                index,
                TextureSlot::MetallicRoughness,
                correlated.clone(),
                registry,
            );
            let normal_info = lazy_slot_facade(
                material.normal_texture.is_some(),
                index,
                TextureSlot::Normal,
                &correlated,
                instances,
                registry,
            );
            let occlusion_info = lazy_slot_facade(
                material.occlusion_texture.is_some(),
                index,
                TextureSlot::Occlusion,
                &correlated,
                instances,
                registry,
            );
            let emissive_info = lazy_slot_facade(
                material.emissive_texture.is_some(),
                index,
                TextureSlot::Emissive,
                &correlated,
                instances,
                registry,
            );

            MaterialState {
                id,
                index,
                correlated,
                pbr: PbrState { id: pbr_id },
                base_color_info,
                metallic_roughness_info,
                normal_info,
                occlusion_info,
                emissive_info,
            }
        })
        .collect()
}

fn slot_facade(
    material: usize,
    slot: TextureSlot,
    correlated: Vec<MaterialHandle>,
    registry: &mut HashMap<ElementId, ElementPath>,
) -> TextureInfoState {
    let id = next_element_id();
    registry.insert(id, ElementPath::TextureInfo { material, slot });
    TextureInfoState {
        id,
        slot,
        correlated,
    }
}

fn lazy_slot_facade(
    declared: bool,
    material: usize,
    slot: TextureSlot,
    correlated: &[MaterialHandle],
    instances: &InstanceStore,
    registry: &mut HashMap<ElementId, ElementPath>,
) -> Option<TextureInfoState> {
    if !declared {
        return None;
    }
    let exposed: Vec<MaterialHandle> = correlated
        .iter()
        .copied()
        .filter(|&h| instances.material(h).is_some_and(|m| m.has_texture(slot)))
        .collect();
    if exposed.is_empty() {
        return None;
    }
    Some(slot_facade(material, slot, exposed, registry))
}

fn build_textures(
    document: &Document,
    correlation: &CorrelationMap,
    registry: &mut HashMap<ElementId, ElementPath>,
) -> Vec<TextureState> {
    (0..document.textures.len())
        .map(|index| {
            let id = next_element_id();
            registry.insert(id, ElementPath::Texture(index));
            TextureState {
                id,
                index,
                correlated: correlation.texture_instances(index),
            }
        })
        .collect()
}

fn build_images(
    document: &Document,
    registry: &mut HashMap<ElementId, ElementPath>,
) -> Vec<ImageState> {
    (0..document.images.len())
        .map(|index| {
            let id = next_element_id();
            registry.insert(id, ElementPath::Image(index));
            ImageState { id, index }
        })
        .collect()
}

fn build_samplers(
    document: &Document,
    correlation: &CorrelationMap,
    registry: &mut HashMap<ElementId, ElementPath>,
) -> Vec<SamplerState> {
    (0..document.samplers.len())
        .map(|index| {
            let id = next_element_id();
            registry.insert(id, ElementPath::Sampler(index));
            // A sampler reaches the engine through the textures that
            // reference it.
            let mut correlated: Vec<TextureHandle> = Vec::new();
            for (t, texture) in document.textures.iter().enumerate() {
                if texture.sampler == Some(index) {
                    correlated.extend(correlation.texture_instances(t));
                }
            }
            SamplerState {
                id,
                index,
                correlated,
            }
        })
        .collect()
}

fn build_primitives(
    document: &Document,
    correlation: &CorrelationMap,
    registry: &mut HashMap<ElementId, ElementPath>,
) -> Vec<PrimitiveState> {
    let mut states = Vec::new();
    for (mesh_index, mesh) in document.meshes.iter().enumerate() {
        for (prim_index, primitive) in mesh.primitives.iter().enumerate() {
            let id = next_element_id();
            registry.insert(id, ElementPath::Primitive(states.len()));
            states.push(PrimitiveState {
                id,
                mesh: mesh_index,
                primitive: prim_index,
                correlated: correlation.primitive_instances(mesh_index, prim_index),
                default_material: primitive.material,
                active_material: primitive.material,
                variants: variants::build_variant_table(document, primitive, correlation),
            });
        }
    }
    states
}
