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

// Eidolon Sandbox
// Main binary for testing and demos: loads a helmet model into a pretend
// engine, edits it the way an inspector panel would, and exports the result.

use std::time::Duration;

use anyhow::Result;

use eidolon_core::document::{
    AlphaMode, Document, MagFilter, Material, MinFilter, Node, Primitive, Scene, Texture, WrapMode,
};
use eidolon_core::math::Rgba;
use eidolon_core::runtime::{
    AlphaState, InstanceStore, MaterialHandle, MaterialInstance, PrimitiveInstance, TextureHandle,
    TextureInstance, TextureSlot,
};
use eidolon_scenegraph::{
    walk, CorrelationMap, DocumentVisitor, Graft, InstanceHandle, InterpolationStatus,
    MaterialInterpolation, NodeKey, VisitOptions,
};

const HELMET_GLTF: &str = r#"{
    "asset": { "version": "2.0", "generator": "eidolon-sandbox" },
    "scene": 0,
    "scenes": [{ "nodes": [0, 1] }],
    "nodes": [
        { "name": "shell", "mesh": 0 },
        { "name": "visor", "mesh": 1 }
    ],
    "meshes": [
        { "primitives": [{
            "attributes": { "POSITION": 0 },
            "material": 0,
            "extensions": { "KHR_materials_variants": { "mappings": [
                { "material": 0, "variants": [0] },
                { "material": 2, "variants": [1] }
            ] } }
        }] },
        { "primitives": [{ "attributes": { "POSITION": 1 }, "material": 1 }] }
    ],
    "materials": [
        {
            "name": "ShellPaint",
            "pbrMetallicRoughness": {
                "baseColorFactor": [0.75, 0.1, 0.1, 1.0],
                "baseColorTexture": { "index": 0 },
                "metallicFactor": 0.8,
                "roughnessFactor": 0.4
            }
        },
        {
            "name": "VisorGlass",
            "alphaMode": "BLEND",
            "pbrMetallicRoughness": { "baseColorFactor": [0.2, 0.25, 0.3, 0.45] }
        },
        {
            "name": "ShellPaintWorn",
            "pbrMetallicRoughness": {
                "baseColorFactor": [0.45, 0.4, 0.38, 1.0],
                "baseColorTexture": { "index": 0 },
                "roughnessFactor": 0.9
            }
        }
    ],
    "textures": [{ "sampler": 0, "source": 0 }],
    "images": [{ "uri": "shell_albedo.png" }],
    "samplers": [{ "magFilter": 9729, "minFilter": 9987 }],
    "extensions": { "KHR_materials_variants": { "variants": [
        { "name": "Factory" },
        { "name": "Battleworn" }
    ] } },
    "extensionsUsed": ["KHR_materials_variants"]
}"#;

// The pretend engine: instances that log whatever the replay applies.

#[derive(Debug)]
struct LoggedMaterial {
    label: String,
    textures: Vec<TextureSlot>,
}

impl MaterialInstance for LoggedMaterial {
    fn set_base_color_factor(&mut self, factor: Rgba) {
        log::info!(" -> [{}] base color {}", self.label, factor.to_hex_rgb());
    }

    fn set_metallic_factor(&mut self, factor: f32) {
        log::info!(" -> [{}] metallic {factor}", self.label);
    }

    fn set_roughness_factor(&mut self, factor: f32) {
        log::info!(" -> [{}] roughness {factor}", self.label);
    }

    fn set_emissive_factor(&mut self, factor: [f32; 3]) {
        log::info!(" -> [{}] emissive {factor:?}", self.label);
    }

    fn set_alpha_state(&mut self, state: AlphaState) {
        log::info!(" -> [{}] alpha {state:?}", self.label);
    }

    fn set_double_sided(&mut self, double_sided: bool) {
        log::info!(" -> [{}] double sided {double_sided}", self.label);
    }

    fn set_texture(&mut self, slot: TextureSlot, texture: Option<TextureHandle>) {
        log::info!(" -> [{}] {slot:?} texture {texture:?}", self.label);
    }

    fn has_texture(&self, slot: TextureSlot) -> bool {
        self.textures.contains(&slot)
    }
}

#[derive(Debug)]
struct LoggedTexture {
    label: String,
}

impl TextureInstance for LoggedTexture {
    fn set_wrap_s(&mut self, mode: WrapMode) {
        log::info!(" -> [{}] wrap S {mode:?}", self.label);
    }

    fn set_wrap_t(&mut self, mode: WrapMode) {
        log::info!(" -> [{}] wrap T {mode:?}", self.label);
    }

    fn set_mag_filter(&mut self, filter: Option<MagFilter>) {
        log::info!(" -> [{}] mag filter {filter:?}", self.label);
    }

    fn set_min_filter(&mut self, filter: Option<MinFilter>) {
        log::info!(" -> [{}] min filter {filter:?}", self.label);
    }
}

#[derive(Debug)]
struct LoggedPrimitive {
    label: String,
    material: MaterialHandle,
}

impl PrimitiveInstance for LoggedPrimitive {
    fn set_material(&mut self, material: MaterialHandle) {
        log::info!(" -> [{}] rebound to {material:?}", self.label);
        self.material = material;
    }

    fn material(&self) -> MaterialHandle {
        self.material
    }
}

/// Texture slots this loader would have uploaded for a material.
fn uploaded_slots(material: &Material) -> Vec<TextureSlot> {
    let pbr = material.pbr_metallic_roughness.as_ref();
    let mut slots = Vec::new();
    if pbr.is_some_and(|p| p.base_color_texture.is_some()) {
        slots.push(TextureSlot::BaseColor);
    }
    if pbr.is_some_and(|p| p.metallic_roughness_texture.is_some()) {
        slots.push(TextureSlot::MetallicRoughness);
    }
    if material.normal_texture.is_some() {
        slots.push(TextureSlot::Normal);
    }
    if material.occlusion_texture.is_some() {
        slots.push(TextureSlot::Occlusion);
    }
    if material.emissive_texture.is_some() {
        slots.push(TextureSlot::Emissive);
    }
    slots
}

/// Plays the engine's asset loader: one instance per document element,
/// each recorded in the correlation map under its document index.
fn load_into_engine(document: &Document) -> (CorrelationMap, InstanceStore) {
    let mut store = InstanceStore::new();
    let mut correlation = CorrelationMap::new();

    for (index, material) in document.materials.iter().enumerate() {
        let label = material
            .name
            .clone()
            .unwrap_or_else(|| format!("material {index}"));
        let handle = store.add_material(Box::new(LoggedMaterial {
            label,
            textures: uploaded_slots(material),
        }));
        correlation.record(NodeKey::Material(index), InstanceHandle::Material(handle));
    }

    for index in 0..document.textures.len() {
        let handle = store.add_texture(Box::new(LoggedTexture {
            label: format!("texture {index}"),
        }));
        correlation.record(NodeKey::Texture(index), InstanceHandle::Texture(handle));
    }

    for (mesh_index, mesh) in document.meshes.iter().enumerate() {
        for (prim_index, primitive) in mesh.primitives.iter().enumerate() {
            let initial = primitive
                .material
                .map(|m| correlation.material_instances(m))
                .and_then(|instances| instances.first().copied())
                .unwrap_or(MaterialHandle(usize::MAX));
            let handle = store.add_primitive(Box::new(LoggedPrimitive {
                label: format!("mesh {mesh_index} primitive {prim_index}"),
                material: initial,
            }));
            correlation.record(
                NodeKey::Primitive {
                    mesh: mesh_index,
                    primitive: prim_index,
                },
                InstanceHandle::Primitive(handle),
            );
        }
    }

    (correlation, store)
}

/// Prints the scene tree the way a hierarchy panel would show it.
struct OutlinePrinter;

impl DocumentVisitor for OutlinePrinter {
    fn enter_scene(&mut self, index: usize, _scene: &Scene) {
        log::info!("scene {index}");
    }

    fn enter_node(&mut self, index: usize, node: &Node) {
        log::info!("  node {index} '{}'", node.name.as_deref().unwrap_or("?"));
    }

    fn visit_primitive(&mut self, mesh: usize, primitive: usize, _data: &Primitive) {
        log::info!("    mesh {mesh} primitive {primitive}");
    }

    fn visit_material(&mut self, index: usize, material: &Material) {
        log::info!(
            "      material {index} '{}'",
            material.name.as_deref().unwrap_or("?")
        );
    }

    fn visit_texture(&mut self, slot: TextureSlot, index: usize, _texture: &Texture) {
        log::info!("        {slot:?} -> texture {index}");
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    // --- Step 1: Parse the document and load it into the engine ---
    let document = Document::from_json(HELMET_GLTF)?;
    let (correlation, instances) = load_into_engine(&document);
    let mut graft = Graft::new("helmet.gltf", document, correlation, instances);
    log::info!(
        "Loaded '{}': {} materials, {} textures, {} primitives",
        graft.label(),
        graft.material_count(),
        graft.texture_count(),
        graft.primitive_count()
    );

    // --- Step 2: Print the scene outline ---
    walk(graft.document(), VisitOptions::default(), &mut OutlinePrinter);

    // --- Step 3: Edit materials the way an inspector panel would ---
    let mut shell = graft.material_mut(0).expect("shell material");
    shell.set_base_color_hex("#2E86C1")?;
    shell.pbr().set_roughness_factor(0.55)?;
    drop(shell);

    let mut visor = graft.material_mut(1).expect("visor material");
    visor.set_alpha_cutoff(0.25)?;
    visor.set_alpha_mode(AlphaMode::Mask)?;
    drop(visor);

    // --- Step 4: Retune the shared sampler ---
    let mut sampler = graft.sampler_mut(0).expect("shell sampler");
    sampler.set_wrap_s(WrapMode::ClampToEdge);
    sampler.set_min_filter(Some(MinFilter::LinearMipmapLinear));
    drop(sampler);

    // --- Step 5: Switch the model to its battleworn look ---
    graft.set_active_variant(Some("Battleworn"))?;
    log::info!(
        "Active variant: {:?}, selectable materials: {:?}",
        graft.active_variant(),
        graft.materials_for_variant(graft.active_variant())
    );

    // --- Step 6: Fade the visor tint over a few frames ---
    let from = graft.material(1).expect("visor material").pbr().base_color_factor();
    let to = Rgba::new(0.05, 0.3, 0.12, 0.45);
    let mut fade = MaterialInterpolation::new(1)
        .with_base_color(from, to)
        .with_duration(Duration::from_millis(300));

    let mut clock = Duration::ZERO;
    fade.start(clock);
    while fade.is_running() {
        clock += Duration::from_millis(100);
        if fade.advance(&mut graft, clock)? == InterpolationStatus::Finished {
            log::info!(" -> fade finished at {clock:?}");
        }
    }

    // --- Step 7: Export the edited document ---
    let exported = graft.export_json_pretty()?;
    log::info!(
        "Exported {} bytes at revision {}",
        exported.len(),
        graft.revision()
    );
    println!("{exported}");

    Ok(())
}
