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

//! Mutation internals shared by the editor structs.
//!
//! Every entry point here keeps the no-partial-mutation rule: validation
//! happens before the first write, the document is written before any
//! instance, and instance application cannot fail. An `Err` therefore
//! always means the graft is exactly as it was.

use eidolon_core::document::{
    AlphaMode, MagFilter, Material, MinFilter, NormalTextureInfo, OcclusionTextureInfo,
    PbrMetallicRoughness, Sampler, TextureInfo, WrapMode,
};
use eidolon_core::math::{saturate, Rgba};
use eidolon_core::runtime::{AlphaState, MaterialInstance, TextureInstance, TextureSlot};

use crate::error::SceneGraphError;

use super::Graft;

impl Graft {
    pub(crate) fn set_base_color_factor(
        &mut self,
        index: usize,
        color: Rgba,
    ) -> Result<(), SceneGraphError> {
        if !color.is_finite() {
            return Err(SceneGraphError::invalid_value(
                "baseColorFactor",
                format!("{color:?}"),
                "components must be finite",
            ));
        }
        let color = color.clamped();
        self.pbr_block_mut(index)?.base_color_factor = color.to_array();
        self.propagate_material(index, |m| m.set_base_color_factor(color));
        self.revision += 1;
        Ok(())
    }

    /// Hex entry point for color pickers. A six-digit string edits RGB
    /// only and keeps the stored alpha; an eight-digit string replaces it.
    pub(crate) fn set_base_color_hex(
        &mut self,
        index: usize,
        hex: &str,
    ) -> Result<(), SceneGraphError> {
        let mut color = Rgba::from_hex(hex).map_err(|e| {
            SceneGraphError::invalid_value("baseColorFactor", hex, e.to_string())
        })?;
        if hex.strip_prefix('#').unwrap_or(hex).len() == 6 {
            color.a = self
                .document
                .materials
                .get(index)
                .and_then(|m| m.pbr_metallic_roughness.as_ref())
                .map(|p| p.base_color_factor[3])
                .unwrap_or(1.0);
        }
        self.set_base_color_factor(index, color)
    }

    pub(crate) fn set_metallic_factor(
        &mut self,
        index: usize,
        value: f32,
    ) -> Result<(), SceneGraphError> {
        let value = validate_factor("metallicFactor", value)?;
        self.pbr_block_mut(index)?.metallic_factor = value;
        self.propagate_material(index, |m| m.set_metallic_factor(value));
        self.revision += 1;
        Ok(())
    }

    pub(crate) fn set_roughness_factor(
        &mut self,
        index: usize,
        value: f32,
    ) -> Result<(), SceneGraphError> {
        let value = validate_factor("roughnessFactor", value)?;
        self.pbr_block_mut(index)?.roughness_factor = value;
        self.propagate_material(index, |m| m.set_roughness_factor(value));
        self.revision += 1;
        Ok(())
    }

    pub(crate) fn set_emissive_factor(
        &mut self,
        index: usize,
        factor: [f32; 3],
    ) -> Result<(), SceneGraphError> {
        if factor.iter().any(|c| !c.is_finite()) {
            return Err(SceneGraphError::invalid_value(
                "emissiveFactor",
                format!("{factor:?}"),
                "components must be finite",
            ));
        }
        let factor = factor.map(saturate);
        self.document_material_mut(index)?.emissive_factor = factor;
        self.propagate_material(index, |m| m.set_emissive_factor(factor));
        self.revision += 1;
        Ok(())
    }

    pub(crate) fn set_alpha_mode(
        &mut self,
        index: usize,
        mode: AlphaMode,
    ) -> Result<(), SceneGraphError> {
        let material = self.document_material_mut(index)?;
        material.alpha_mode = mode;
        let state = alpha_state_of(material);
        self.propagate_material(index, |m| m.set_alpha_state(state));
        self.revision += 1;
        Ok(())
    }

    /// The cutoff is stored verbatim for round-trip fidelity; engine
    /// materials only see it while the mode is `MASK`.
    pub(crate) fn set_alpha_cutoff(
        &mut self,
        index: usize,
        cutoff: f32,
    ) -> Result<(), SceneGraphError> {
        let cutoff = validate_factor("alphaCutoff", cutoff)?;
        let material = self.document_material_mut(index)?;
        material.alpha_cutoff = Some(cutoff);
        let masked = material.alpha_mode == AlphaMode::Mask;
        if masked {
            self.propagate_material(index, |m| m.set_alpha_state(AlphaState::Mask(cutoff)));
        }
        self.revision += 1;
        Ok(())
    }

    pub(crate) fn set_double_sided(
        &mut self,
        index: usize,
        double_sided: bool,
    ) -> Result<(), SceneGraphError> {
        self.document_material_mut(index)?.double_sided = double_sided;
        self.propagate_material(index, |m| m.set_double_sided(double_sided));
        self.revision += 1;
        Ok(())
    }

    /// Retargets one texture slot. `Some` must name a document texture
    /// with at least one engine instance; the document keeps an existing
    /// `tex_coord` when only the index moves.
    pub(crate) fn set_slot_texture(
        &mut self,
        material: usize,
        slot: TextureSlot,
        texture_index: Option<usize>,
    ) -> Result<(), SceneGraphError> {
        let attach = match texture_index {
            Some(index) => {
                let state = self
                    .textures
                    .get(index)
                    .ok_or_else(|| SceneGraphError::lookup_miss("texture", index))?;
                match state.correlated.first() {
                    Some(&handle) => Some((index, handle)),
                    None => {
                        return Err(SceneGraphError::lookup_miss("texture instance", index));
                    }
                }
            }
            None => None,
        };

        let doc_material = self
            .document
            .materials
            .get_mut(material)
            .ok_or_else(|| SceneGraphError::lookup_miss("material", material))?;
        write_slot_reference(doc_material, slot, attach.map(|(index, _)| index));

        let handle = attach.map(|(_, handle)| handle);
        self.propagate_slot(material, slot, |m| m.set_texture(slot, handle));
        self.revision += 1;
        Ok(())
    }

    pub(crate) fn set_sampler_wrap_s(&mut self, index: usize, mode: WrapMode) {
        self.mutate_sampler(index, |s| s.wrap_s = mode.code(), |t| t.set_wrap_s(mode));
    }

    pub(crate) fn set_sampler_wrap_t(&mut self, index: usize, mode: WrapMode) {
        self.mutate_sampler(index, |s| s.wrap_t = mode.code(), |t| t.set_wrap_t(mode));
    }

    pub(crate) fn set_sampler_mag_filter(&mut self, index: usize, filter: Option<MagFilter>) {
        self.mutate_sampler(
            index,
            |s| s.mag_filter = filter.map(MagFilter::code),
            |t| t.set_mag_filter(filter),
        );
    }

    pub(crate) fn set_sampler_min_filter(&mut self, index: usize, filter: Option<MinFilter>) {
        self.mutate_sampler(
            index,
            |s| s.min_filter = filter.map(MinFilter::code),
            |t| t.set_min_filter(filter),
        );
    }

    /// Applies a closure to every engine material correlated with the
    /// document material at `index`.
    fn propagate_material(&mut self, index: usize, apply: impl Fn(&mut dyn MaterialInstance)) {
        let Self {
            materials,
            instances,
            ..
        } = self;
        if let Some(state) = materials.get(index) {
            for &handle in &state.correlated {
                if let Some(instance) = instances.material_mut(handle) {
                    apply(instance);
                }
            }
        }
    }

    /// Applies a closure to the subset of engine materials a texture slot
    /// propagates to.
    fn propagate_slot(
        &mut self,
        index: usize,
        slot: TextureSlot,
        apply: impl Fn(&mut dyn MaterialInstance),
    ) {
        let Self {
            materials,
            instances,
            ..
        } = self;
        if let Some(state) = materials.get(index).and_then(|m| m.slot_state(slot)) {
            for &handle in &state.correlated {
                if let Some(instance) = instances.material_mut(handle) {
                    apply(instance);
                }
            }
        }
    }

    fn mutate_sampler(
        &mut self,
        index: usize,
        write: impl FnOnce(&mut Sampler),
        apply: impl Fn(&mut dyn TextureInstance),
    ) {
        match self.document.samplers.get_mut(index) {
            Some(sampler) => write(sampler),
            None => return,
        }
        let Self {
            samplers,
            instances,
            ..
        } = self;
        if let Some(state) = samplers.get(index) {
            for &handle in &state.correlated {
                if let Some(texture) = instances.texture_mut(handle) {
                    apply(texture);
                }
            }
        }
        self.revision += 1;
    }

    fn pbr_block_mut(&mut self, index: usize) -> Result<&mut PbrMetallicRoughness, SceneGraphError> {
        let material = self.document_material_mut(index)?;
        Ok(material
            .pbr_metallic_roughness
            .get_or_insert_with(PbrMetallicRoughness::default))
    }

    fn document_material_mut(&mut self, index: usize) -> Result<&mut Material, SceneGraphError> {
        self.document
            .materials
            .get_mut(index)
            .ok_or_else(|| SceneGraphError::lookup_miss("material", index))
    }
}

fn validate_factor(property: &'static str, value: f32) -> Result<f32, SceneGraphError> {
    if !value.is_finite() {
        return Err(SceneGraphError::invalid_value(
            property,
            value,
            "must be finite",
        ));
    }
    Ok(saturate(value))
}

fn alpha_state_of(material: &Material) -> AlphaState {
    match material.alpha_mode {
        AlphaMode::Opaque => AlphaState::Opaque,
        AlphaMode::Blend => AlphaState::Blend,
        AlphaMode::Mask => AlphaState::Mask(material.effective_alpha_cutoff()),
    }
}

fn write_slot_reference(material: &mut Material, slot: TextureSlot, index: Option<usize>) {
    match slot {
        TextureSlot::BaseColor => {
            let pbr = material
                .pbr_metallic_roughness
                .get_or_insert_with(PbrMetallicRoughness::default);
            update_info(&mut pbr.base_color_texture, index);
        }
        TextureSlot::MetallicRoughness => {
            let pbr = material
                .pbr_metallic_roughness
                .get_or_insert_with(PbrMetallicRoughness::default);
            update_info(&mut pbr.metallic_roughness_texture, index);
        }
        TextureSlot::Normal => match index {
            Some(i) => match &mut material.normal_texture {
                Some(info) => info.index = i,
                None => material.normal_texture = Some(NormalTextureInfo::new(i)),
            },
            None => material.normal_texture = None,
        },
        TextureSlot::Occlusion => match index {
            Some(i) => match &mut material.occlusion_texture {
                Some(info) => info.index = i,
                None => material.occlusion_texture = Some(OcclusionTextureInfo::new(i)),
            },
            None => material.occlusion_texture = None,
        },
        TextureSlot::Emissive => update_info(&mut material.emissive_texture, index),
    }
}

fn update_info(slot: &mut Option<TextureInfo>, index: Option<usize>) {
    match index {
        Some(i) => match slot {
            Some(info) => info.index = i,
            None => *slot = Some(TextureInfo::new(i)),
        },
        None => *slot = None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{session_fixture, SESSION_DOCUMENT};
    use super::*;
    use crate::error::SceneGraphError;
    use approx::assert_relative_eq;

    #[test]
    fn test_base_color_write_reaches_document_and_instances() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);
        let color = Rgba::new(0.2, 0.4, 0.6, 1.0);

        graft
            .material_mut(0)
            .unwrap()
            .pbr()
            .set_base_color_factor(color)
            .unwrap();

        let stored = graft.document().materials[0]
            .pbr_metallic_roughness
            .as_ref()
            .unwrap()
            .base_color_factor;
        assert_eq!(stored, [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(logs.material(0).base_color, Some(color));
        assert_eq!(graft.revision(), 1);
    }

    #[test]
    fn test_out_of_range_factors_clamp() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);

        graft
            .material_mut(0)
            .unwrap()
            .pbr()
            .set_base_color_factor(Rgba::new(1.5, -0.25, 0.5, 2.0))
            .unwrap();
        let stored = graft.document().materials[0]
            .pbr_metallic_roughness
            .as_ref()
            .unwrap()
            .base_color_factor;
        assert_eq!(stored, [1.0, 0.0, 0.5, 1.0]);

        graft
            .material_mut(0)
            .unwrap()
            .pbr()
            .set_metallic_factor(7.0)
            .unwrap();
        assert_relative_eq!(logs.material(0).metallic.unwrap(), 1.0);
    }

    #[test]
    fn test_non_finite_input_rejected_without_mutation() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);
        let before = graft.document().materials[0]
            .pbr_metallic_roughness
            .as_ref()
            .unwrap()
            .base_color_factor;

        let err = graft
            .material_mut(0)
            .unwrap()
            .pbr()
            .set_base_color_factor(Rgba::new(f32::NAN, 0.0, 0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, SceneGraphError::InvalidValue { .. }));

        let after = graft.document().materials[0]
            .pbr_metallic_roughness
            .as_ref()
            .unwrap()
            .base_color_factor;
        assert_eq!(before, after);
        assert_eq!(logs.material(0).base_color, None);
        assert_eq!(graft.revision(), 0);
    }

    #[test]
    fn test_six_digit_hex_preserves_alpha() {
        let (mut graft, _logs) = session_fixture(SESSION_DOCUMENT);
        graft
            .material_mut(0)
            .unwrap()
            .pbr()
            .set_base_color_factor(Rgba::new(1.0, 1.0, 1.0, 0.25))
            .unwrap();

        graft
            .material_mut(0)
            .unwrap()
            .set_base_color_hex("#ff0000")
            .unwrap();
        let stored = graft.document().materials[0]
            .pbr_metallic_roughness
            .as_ref()
            .unwrap()
            .base_color_factor;
        assert_relative_eq!(stored[0], 1.0);
        assert_relative_eq!(stored[1], 0.0);
        assert_relative_eq!(stored[3], 0.25);

        graft
            .material_mut(0)
            .unwrap()
            .set_base_color_hex("#00ff00ff")
            .unwrap();
        let stored = graft.document().materials[0]
            .pbr_metallic_roughness
            .as_ref()
            .unwrap()
            .base_color_factor;
        assert_relative_eq!(stored[3], 1.0);

        let err = graft
            .material_mut(0)
            .unwrap()
            .set_base_color_hex("#12345")
            .unwrap_err();
        assert!(matches!(err, SceneGraphError::InvalidValue { .. }));
    }

    #[test]
    fn test_alpha_cutoff_only_reaches_instances_in_mask_mode() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);

        // Material 0 starts opaque: the cutoff lands in the document only.
        graft.material_mut(0).unwrap().set_alpha_cutoff(0.25).unwrap();
        assert_eq!(graft.document().materials[0].alpha_cutoff, Some(0.25));
        assert_eq!(logs.material(0).alpha, None);

        // Switching to MASK resolves the stored cutoff.
        graft
            .material_mut(0)
            .unwrap()
            .set_alpha_mode(AlphaMode::Mask)
            .unwrap();
        assert_eq!(logs.material(0).alpha, Some(AlphaState::Mask(0.25)));

        // Further cutoff edits now propagate.
        graft.material_mut(0).unwrap().set_alpha_cutoff(0.75).unwrap();
        assert_eq!(logs.material(0).alpha, Some(AlphaState::Mask(0.75)));
    }

    #[test]
    fn test_alpha_mode_string_entry_rejects_unknown_names() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);

        graft
            .material_mut(0)
            .unwrap()
            .set_alpha_mode_str("BLEND")
            .unwrap();
        assert_eq!(graft.document().materials[0].alpha_mode, AlphaMode::Blend);
        assert_eq!(logs.material(0).alpha, Some(AlphaState::Blend));

        let err = graft
            .material_mut(0)
            .unwrap()
            .set_alpha_mode_str("blend")
            .unwrap_err();
        assert!(matches!(err, SceneGraphError::InvalidValue { .. }));
        assert_eq!(graft.document().materials[0].alpha_mode, AlphaMode::Blend);
    }

    #[test]
    fn test_retarget_texture_slot_preserves_tex_coord() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);

        // Material 1's base color slot starts on texture 0 with texCoord 1.
        graft
            .material_mut(1)
            .unwrap()
            .pbr()
            .base_color_texture()
            .set_texture(Some(1))
            .unwrap();

        let info = graft.document().materials[1]
            .pbr_metallic_roughness
            .as_ref()
            .unwrap()
            .base_color_texture
            .as_ref()
            .unwrap();
        assert_eq!(info.index, 1);
        assert_eq!(info.tex_coord, 1);
        let (slot, handle) = *logs.material(1).textures.last().unwrap();
        assert_eq!(slot, TextureSlot::BaseColor);
        assert!(handle.is_some());
    }

    #[test]
    fn test_detach_texture_slot() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);

        graft
            .material_mut(1)
            .unwrap()
            .pbr()
            .base_color_texture()
            .set_texture(None)
            .unwrap();

        assert!(graft.document().materials[1]
            .pbr_metallic_roughness
            .as_ref()
            .unwrap()
            .base_color_texture
            .is_none());
        let (_, handle) = *logs.material(1).textures.last().unwrap();
        assert!(handle.is_none());
    }

    #[test]
    fn test_texture_reference_must_resolve() {
        let (mut graft, _logs) = session_fixture(SESSION_DOCUMENT);
        let before = graft.revision();

        let err = graft
            .material_mut(1)
            .unwrap()
            .pbr()
            .base_color_texture()
            .set_texture(Some(99))
            .unwrap_err();
        assert!(matches!(err, SceneGraphError::LookupMiss { .. }));
        assert_eq!(graft.revision(), before);

        // Texture 2 exists in the document but was never uploaded.
        let err = graft
            .material_mut(1)
            .unwrap()
            .pbr()
            .base_color_texture()
            .set_texture(Some(2))
            .unwrap_err();
        assert!(matches!(err, SceneGraphError::LookupMiss { .. }));
        let info = graft.document().materials[1]
            .pbr_metallic_roughness
            .as_ref()
            .unwrap()
            .base_color_texture
            .as_ref()
            .unwrap();
        assert_eq!(info.index, 0);
    }

    #[test]
    fn test_sampler_edits_propagate_to_texture_instances() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);

        graft
            .sampler_mut(0)
            .unwrap()
            .set_wrap_s(WrapMode::ClampToEdge);
        graft
            .sampler_mut(0)
            .unwrap()
            .set_min_filter(Some(MinFilter::LinearMipmapLinear));

        assert_eq!(graft.document().samplers[0].wrap_s, 33071);
        assert_eq!(graft.document().samplers[0].min_filter, Some(9987));
        assert_eq!(logs.texture(0).wrap_s, Some(WrapMode::ClampToEdge));
        assert_eq!(
            logs.texture(0).min_filter,
            Some(Some(MinFilter::LinearMipmapLinear))
        );
        assert_eq!(graft.revision(), 2);
    }
}
