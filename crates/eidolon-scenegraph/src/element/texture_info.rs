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

//! Texture-slot facades.
//!
//! A [`TextureInfoState`] stands for one texture slot of one material, not
//! for a texture: retargeting it rewrites which texture the slot points
//! at. Base-color and metallic-roughness slots exist for every material;
//! the normal, occlusion and emissive slots exist only when the document
//! declares them and at least one correlated engine material actually
//! carries a texture there.

use eidolon_core::runtime::{MaterialHandle, TextureSlot};

use crate::error::SceneGraphError;
use crate::graft::Graft;
use crate::id::ElementId;

use super::texture::TextureView;

/// Graft-owned state for one texture slot of one material.
#[derive(Debug)]
pub struct TextureInfoState {
    pub(crate) id: ElementId,
    pub(crate) slot: TextureSlot,
    /// Material instances this slot propagates to. For the lazily created
    /// slots this is the subset of the material's instances that expose
    /// the slot, not the full set.
    pub(crate) correlated: Vec<MaterialHandle>,
}

impl TextureInfoState {
    /// The process-unique id of this slot facade.
    pub fn internal_id(&self) -> ElementId {
        self.id
    }

    /// The slot this facade covers.
    pub fn slot(&self) -> TextureSlot {
        self.slot
    }

    /// Number of engine material instances this slot propagates to.
    pub fn instance_count(&self) -> usize {
        self.correlated.len()
    }
}

/// Read access to one texture slot.
#[derive(Debug, Clone, Copy)]
pub struct TextureInfoView<'a> {
    graft: &'a Graft,
    state: &'a TextureInfoState,
    material: usize,
}

impl<'a> TextureInfoView<'a> {
    pub(crate) fn new(graft: &'a Graft, state: &'a TextureInfoState, material: usize) -> Self {
        Self {
            graft,
            state,
            material,
        }
    }

    /// The process-unique id of this slot facade.
    pub fn internal_id(&self) -> ElementId {
        self.state.id
    }

    /// The slot this facade covers.
    pub fn slot(&self) -> TextureSlot {
        self.state.slot
    }

    /// The document index of the referenced texture, or `None` when the
    /// slot is currently unbound.
    pub fn texture_index(&self) -> Option<usize> {
        self.graft
            .slot_reference(self.material, self.state.slot)
            .map(|(index, _)| index)
    }

    /// The UV set the slot samples from, when a texture is bound.
    pub fn tex_coord(&self) -> Option<u32> {
        self.graft
            .slot_reference(self.material, self.state.slot)
            .map(|(_, tex_coord)| tex_coord)
    }

    /// Resolves the bound texture to its facade, if any.
    pub fn texture(&self) -> Option<TextureView<'a>> {
        self.texture_index().and_then(|i| self.graft.texture(i))
    }

    /// Number of engine material instances this slot propagates to.
    pub fn instance_count(&self) -> usize {
        self.state.correlated.len()
    }
}

/// Write access to one texture slot.
#[derive(Debug)]
pub struct TextureInfoEditor<'a> {
    graft: &'a mut Graft,
    material: usize,
    slot: TextureSlot,
}

impl<'a> TextureInfoEditor<'a> {
    pub(crate) fn new(graft: &'a mut Graft, material: usize, slot: TextureSlot) -> Self {
        Self {
            graft,
            material,
            slot,
        }
    }

    /// The slot this editor writes.
    pub fn slot(&self) -> TextureSlot {
        self.slot
    }

    /// The document index of the referenced texture, or `None` when the
    /// slot is currently unbound.
    pub fn texture_index(&self) -> Option<usize> {
        self.graft
            .slot_reference(self.material, self.slot)
            .map(|(index, _)| index)
    }

    /// Points the slot at another document texture, or detaches it.
    ///
    /// `Some(index)` requires the index to name a document texture that
    /// has at least one correlated engine instance; otherwise nothing is
    /// written and a [`SceneGraphError::LookupMiss`] is returned. `None`
    /// always succeeds and clears the slot on document and instances both.
    pub fn set_texture(&mut self, texture_index: Option<usize>) -> Result<(), SceneGraphError> {
        self.graft
            .set_slot_texture(self.material, self.slot, texture_index)
    }
}
