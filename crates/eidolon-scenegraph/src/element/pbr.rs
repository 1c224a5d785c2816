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

//! The metallic-roughness parameter block of a material.
//!
//! Every material gets one of these facades even when the source document
//! omitted the `pbrMetallicRoughness` object; the graft materializes the
//! block with glTF defaults at construction so edits always have a place
//! to land.

use eidolon_core::document::PbrMetallicRoughness;
use eidolon_core::math::Rgba;
use eidolon_core::runtime::TextureSlot;

use crate::error::SceneGraphError;
use crate::graft::Graft;
use crate::id::ElementId;

use super::texture_info::{TextureInfoEditor, TextureInfoView};

/// Graft-owned state for one material's PBR block.
#[derive(Debug)]
pub struct PbrState {
    pub(crate) id: ElementId,
}

impl PbrState {
    /// The process-unique id of this parameter block.
    pub fn internal_id(&self) -> ElementId {
        self.id
    }
}

/// Read access to a material's metallic-roughness parameters.
#[derive(Debug, Clone, Copy)]
pub struct PbrView<'a> {
    graft: &'a Graft,
    material: usize,
}

impl<'a> PbrView<'a> {
    pub(crate) fn new(graft: &'a Graft, material: usize) -> Self {
        Self { graft, material }
    }

    /// The process-unique id of this parameter block.
    pub fn internal_id(&self) -> ElementId {
        self.graft.material_state(self.material).pbr.id
    }

    /// The RGBA base color factor. Defaults to opaque white.
    pub fn base_color_factor(&self) -> Rgba {
        self.pbr_block()
            .map(|pbr| Rgba::from_array(pbr.base_color_factor))
            .unwrap_or_default()
    }

    /// The metalness factor in `[0, 1]`.
    pub fn metallic_factor(&self) -> f32 {
        self.pbr_block().map(|pbr| pbr.metallic_factor).unwrap_or(1.0)
    }

    /// The roughness factor in `[0, 1]`.
    pub fn roughness_factor(&self) -> f32 {
        self.pbr_block().map(|pbr| pbr.roughness_factor).unwrap_or(1.0)
    }

    /// The base color texture slot. Always present on the facade, even
    /// while no texture is bound.
    pub fn base_color_texture(&self) -> TextureInfoView<'a> {
        let state = &self.graft.material_state(self.material).base_color_info;
        TextureInfoView::new(self.graft, state, self.material)
    }

    /// The combined metallic-roughness texture slot.
    pub fn metallic_roughness_texture(&self) -> TextureInfoView<'a> {
        let state = &self
            .graft
            .material_state(self.material)
            .metallic_roughness_info;
        TextureInfoView::new(self.graft, state, self.material)
    }

    fn pbr_block(&self) -> Option<&'a PbrMetallicRoughness> {
        self.graft
            .document()
            .materials
            .get(self.material)
            .and_then(|m| m.pbr_metallic_roughness.as_ref())
    }
}

/// Write access to a material's metallic-roughness parameters.
#[derive(Debug)]
pub struct PbrEditor<'a> {
    graft: &'a mut Graft,
    material: usize,
}

impl<'a> PbrEditor<'a> {
    pub(crate) fn new(graft: &'a mut Graft, material: usize) -> Self {
        Self { graft, material }
    }

    /// A read view of the same parameter block.
    pub fn view(&self) -> PbrView<'_> {
        PbrView::new(self.graft, self.material)
    }

    /// Sets the RGBA base color factor. Accepts [`Rgba`] or `[f32; 4]`.
    ///
    /// Components must be finite; they are clamped to `[0, 1]` before the
    /// document and the correlated engine materials are updated. Non-finite
    /// input leaves both untouched and returns
    /// [`SceneGraphError::InvalidValue`].
    pub fn set_base_color_factor(
        &mut self,
        color: impl Into<Rgba>,
    ) -> Result<(), SceneGraphError> {
        self.graft.set_base_color_factor(self.material, color.into())
    }

    /// Sets the metalness factor. Finite input clamped to `[0, 1]`.
    pub fn set_metallic_factor(&mut self, value: f32) -> Result<(), SceneGraphError> {
        self.graft.set_metallic_factor(self.material, value)
    }

    /// Sets the roughness factor. Finite input clamped to `[0, 1]`.
    pub fn set_roughness_factor(&mut self, value: f32) -> Result<(), SceneGraphError> {
        self.graft.set_roughness_factor(self.material, value)
    }

    /// Write access to the base color texture slot.
    pub fn base_color_texture(&mut self) -> TextureInfoEditor<'_> {
        TextureInfoEditor::new(self.graft, self.material, TextureSlot::BaseColor)
    }

    /// Write access to the combined metallic-roughness texture slot.
    pub fn metallic_roughness_texture(&mut self) -> TextureInfoEditor<'_> {
        TextureInfoEditor::new(self.graft, self.material, TextureSlot::MetallicRoughness)
    }
}
