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

//! Material facades.

use eidolon_core::document::{AlphaMode, Material, UnknownAlphaModeError};
use eidolon_core::math::Rgba;
use eidolon_core::runtime::{MaterialHandle, TextureSlot};

use crate::error::SceneGraphError;
use crate::graft::Graft;
use crate::id::ElementId;

use super::pbr::{PbrEditor, PbrState, PbrView};
use super::texture_info::{TextureInfoEditor, TextureInfoState, TextureInfoView};

/// Graft-owned state for one document material.
#[derive(Debug)]
pub struct MaterialState {
    pub(crate) id: ElementId,
    pub(crate) index: usize,
    /// Every engine material correlated with this document material. One
    /// document material may drive several instances when meshes were
    /// duplicated at load time.
    pub(crate) correlated: Vec<MaterialHandle>,
    pub(crate) pbr: PbrState,
    pub(crate) base_color_info: TextureInfoState,
    pub(crate) metallic_roughness_info: TextureInfoState,
    pub(crate) normal_info: Option<TextureInfoState>,
    pub(crate) occlusion_info: Option<TextureInfoState>,
    pub(crate) emissive_info: Option<TextureInfoState>,
}

impl MaterialState {
    /// The process-unique id of this material.
    pub fn internal_id(&self) -> ElementId {
        self.id
    }

    /// The material's index in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of engine material instances this facade drives.
    pub fn instance_count(&self) -> usize {
        self.correlated.len()
    }

    pub(crate) fn slot_state(&self, slot: TextureSlot) -> Option<&TextureInfoState> {
        match slot {
            TextureSlot::BaseColor => Some(&self.base_color_info),
            TextureSlot::MetallicRoughness => Some(&self.metallic_roughness_info),
            TextureSlot::Normal => self.normal_info.as_ref(),
            TextureSlot::Occlusion => self.occlusion_info.as_ref(),
            TextureSlot::Emissive => self.emissive_info.as_ref(),
        }
    }
}

/// Read access to one material.
#[derive(Debug, Clone, Copy)]
pub struct MaterialView<'a> {
    graft: &'a Graft,
    index: usize,
}

impl<'a> MaterialView<'a> {
    pub(crate) fn new(graft: &'a Graft, index: usize) -> Self {
        Self { graft, index }
    }

    /// The process-unique id of this material.
    pub fn internal_id(&self) -> ElementId {
        self.state().id
    }

    /// The material's index in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The material's document name, if it has one.
    pub fn name(&self) -> Option<&'a str> {
        self.document_material().name.as_deref()
    }

    /// The metallic-roughness parameter block.
    pub fn pbr(&self) -> PbrView<'a> {
        PbrView::new(self.graft, self.index)
    }

    /// The normal texture slot, when the facade carries one.
    pub fn normal_texture(&self) -> Option<TextureInfoView<'a>> {
        self.slot_view(TextureSlot::Normal)
    }

    /// The occlusion texture slot, when the facade carries one.
    pub fn occlusion_texture(&self) -> Option<TextureInfoView<'a>> {
        self.slot_view(TextureSlot::Occlusion)
    }

    /// The emissive texture slot, when the facade carries one.
    pub fn emissive_texture(&self) -> Option<TextureInfoView<'a>> {
        self.slot_view(TextureSlot::Emissive)
    }

    /// The linear RGB emissive factor. Defaults to black.
    pub fn emissive_factor(&self) -> [f32; 3] {
        self.document_material().emissive_factor
    }

    /// The emissive factor as a `#RRGGBB` string for color pickers.
    pub fn emissive_hex(&self) -> String {
        Rgba::from_rgb_array(self.emissive_factor()).to_hex_rgb()
    }

    /// The base color factor as a `#RRGGBB` string for color pickers.
    /// Alpha is read separately through the PBR block.
    pub fn base_color_hex(&self) -> String {
        self.pbr().base_color_factor().to_hex_rgb()
    }

    /// The alpha rendering mode.
    pub fn alpha_mode(&self) -> AlphaMode {
        self.document_material().alpha_mode
    }

    /// The stored alpha cutoff. `None` when the document omits the field;
    /// rendering then falls back to the glTF default of `0.5`.
    pub fn alpha_cutoff(&self) -> Option<f32> {
        self.document_material().alpha_cutoff
    }

    /// Whether back faces are rendered.
    pub fn double_sided(&self) -> bool {
        self.document_material().double_sided
    }

    /// Number of engine material instances this facade drives.
    pub fn instance_count(&self) -> usize {
        self.state().correlated.len()
    }

    fn slot_view(&self, slot: TextureSlot) -> Option<TextureInfoView<'a>> {
        self.state()
            .slot_state(slot)
            .map(|state| TextureInfoView::new(self.graft, state, self.index))
    }

    fn state(&self) -> &'a MaterialState {
        self.graft.material_state(self.index)
    }

    fn document_material(&self) -> &'a Material {
        self.graft.document_material(self.index)
    }
}

/// Write access to one material.
///
/// Every setter follows the same discipline: validate, write the document,
/// then replay the change onto every correlated engine instance. A setter
/// that returns an error has written nothing.
#[derive(Debug)]
pub struct MaterialEditor<'a> {
    graft: &'a mut Graft,
    index: usize,
}

impl<'a> MaterialEditor<'a> {
    pub(crate) fn new(graft: &'a mut Graft, index: usize) -> Self {
        Self { graft, index }
    }

    /// A read view of the same material.
    pub fn view(&self) -> MaterialView<'_> {
        MaterialView::new(self.graft, self.index)
    }

    /// The process-unique id of this material.
    pub fn internal_id(&self) -> ElementId {
        self.view().internal_id()
    }

    /// The material's index in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Write access to the metallic-roughness parameter block.
    pub fn pbr(&mut self) -> PbrEditor<'_> {
        PbrEditor::new(self.graft, self.index)
    }

    /// Write access to the normal texture slot, when the facade carries one.
    pub fn normal_texture(&mut self) -> Option<TextureInfoEditor<'_>> {
        self.slot_editor(TextureSlot::Normal)
    }

    /// Write access to the occlusion texture slot, when the facade carries
    /// one.
    pub fn occlusion_texture(&mut self) -> Option<TextureInfoEditor<'_>> {
        self.slot_editor(TextureSlot::Occlusion)
    }

    /// Write access to the emissive texture slot, when the facade carries
    /// one.
    pub fn emissive_texture(&mut self) -> Option<TextureInfoEditor<'_>> {
        self.slot_editor(TextureSlot::Emissive)
    }

    /// Sets the linear RGB emissive factor. Components must be finite and
    /// are clamped to `[0, 1]`.
    pub fn set_emissive_factor(&mut self, factor: [f32; 3]) -> Result<(), SceneGraphError> {
        self.graft.set_emissive_factor(self.index, factor)
    }

    /// Sets the emissive factor from a `#RRGGBB` hex string. An alpha pair
    /// is accepted and ignored.
    pub fn set_emissive_hex(&mut self, hex: &str) -> Result<(), SceneGraphError> {
        let color = Rgba::from_hex(hex).map_err(|e| {
            SceneGraphError::invalid_value("emissiveFactor", hex, e.to_string())
        })?;
        self.graft.set_emissive_factor(self.index, color.to_rgb_array())
    }

    /// Sets the base color factor from a hex string. `#RRGGBB` keeps the
    /// current alpha; `#RRGGBBAA` replaces it.
    pub fn set_base_color_hex(&mut self, hex: &str) -> Result<(), SceneGraphError> {
        self.graft.set_base_color_hex(self.index, hex)
    }

    /// Sets the alpha rendering mode and replays the matching alpha state
    /// onto the correlated engine materials.
    pub fn set_alpha_mode(&mut self, mode: AlphaMode) -> Result<(), SceneGraphError> {
        self.graft.set_alpha_mode(self.index, mode)
    }

    /// Parses an alpha mode name (`OPAQUE`, `MASK`, `BLEND`) and applies
    /// it. Unrecognized names return [`SceneGraphError::InvalidValue`].
    pub fn set_alpha_mode_str(&mut self, mode: &str) -> Result<(), SceneGraphError> {
        let mode: AlphaMode = mode.parse().map_err(|e: UnknownAlphaModeError| {
            SceneGraphError::invalid_value("alphaMode", mode, e.to_string())
        })?;
        self.graft.set_alpha_mode(self.index, mode)
    }

    /// Sets the alpha cutoff. The value must be finite and is clamped to
    /// `[0, 1]`; engine materials only see it while the mode is `MASK`.
    pub fn set_alpha_cutoff(&mut self, cutoff: f32) -> Result<(), SceneGraphError> {
        self.graft.set_alpha_cutoff(self.index, cutoff)
    }

    /// Toggles double-sided rendering.
    pub fn set_double_sided(&mut self, double_sided: bool) -> Result<(), SceneGraphError> {
        self.graft.set_double_sided(self.index, double_sided)
    }

    fn slot_editor(&mut self, slot: TextureSlot) -> Option<TextureInfoEditor<'_>> {
        if self.graft.material_state(self.index).slot_state(slot).is_some() {
            Some(TextureInfoEditor::new(self.graft, self.index, slot))
        } else {
            None
        }
    }
}
