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

//! `KHR_materials_variants` support.
//!
//! Variant tables are resolved once at graft construction: every mapping
//! is bound to the first engine instance of its material, so switching at
//! runtime is a table lookup plus `set_material` calls. Switches never
//! rewrite the document's material references; exports keep the authored
//! defaults.

use std::collections::BTreeMap;

use eidolon_core::document::{Document, Primitive};
use eidolon_core::runtime::MaterialHandle;

use crate::correlation::CorrelationMap;
use crate::element::VariantEntry;
use crate::error::SceneGraphError;

use super::Graft;

impl Graft {
    /// Variant names declared by the document's root extension block, in
    /// document order. Empty when the model has no variants.
    pub fn available_variants(&self) -> Vec<&str> {
        self.document.variant_names().unwrap_or_default()
    }

    /// The variant last applied through
    /// [`set_active_variant`](Self::set_active_variant), if any.
    pub fn active_variant(&self) -> Option<&str> {
        self.active_variant.as_deref()
    }

    /// Applies a named variant across the whole model, or restores the
    /// authored default materials with `None`.
    ///
    /// `Some(name)` requires the name to exist in the root variant list;
    /// primitives that do not participate in it keep their current
    /// material. Unknown names fail with
    /// [`SceneGraphError::LookupMiss`] before anything is touched.
    pub fn set_active_variant(&mut self, name: Option<&str>) -> Result<(), SceneGraphError> {
        match name {
            Some(name) => {
                if self.document.variant_index(name).is_none() {
                    return Err(SceneGraphError::lookup_miss("variant", name));
                }
                for index in 0..self.primitives.len() {
                    self.enable_primitive_variant_inner(index, name);
                }
                self.active_variant = Some(name.to_string());
            }
            None => {
                for index in 0..self.primitives.len() {
                    self.restore_default_material(index);
                }
                self.active_variant = None;
            }
        }
        self.revision += 1;
        Ok(())
    }

    /// The editor's selectable-material filter: which materials make sense
    /// to show while the given variant is active.
    ///
    /// `None` lists every material. For a named variant the list keeps the
    /// materials no variant mapping claims (they render regardless of the
    /// active variant) plus the materials mapped under that name.
    pub fn materials_for_variant(&self, name: Option<&str>) -> Vec<usize> {
        let Some(name) = name else {
            return (0..self.materials.len()).collect();
        };
        (0..self.materials.len())
            .filter(|&index| {
                !self.material_is_mapped(index) || self.material_has_variant(index, name)
            })
            .collect()
    }

    /// Switches one primitive to a named variant. See
    /// [`PrimitiveEditor::enable_variant`](crate::element::PrimitiveEditor::enable_variant)
    /// for the contract.
    pub(crate) fn enable_primitive_variant(
        &mut self,
        index: usize,
        name: &str,
    ) -> Option<MaterialHandle> {
        let applied = self.enable_primitive_variant_inner(index, name);
        if applied.is_some() {
            self.revision += 1;
        }
        applied
    }

    fn enable_primitive_variant_inner(
        &mut self,
        index: usize,
        name: &str,
    ) -> Option<MaterialHandle> {
        let state = self.primitives.get(index)?;
        let entry = state.variants.as_ref()?.get(name)?;
        let Some(handle) = entry.instance else {
            log::warn!(
                "Variant '{name}' maps primitive {index} to material {} which has no engine instance; switch skipped",
                entry.material_index
            );
            return None;
        };
        let material_index = entry.material_index;

        let Self {
            primitives,
            instances,
            ..
        } = self;
        let state = &primitives[index];
        for &p in &state.correlated {
            if let Some(primitive) = instances.primitive_mut(p) {
                primitive.set_material(handle);
            }
        }
        self.primitives[index].active_material = Some(material_index);
        Some(handle)
    }

    fn restore_default_material(&mut self, index: usize) {
        let state = &self.primitives[index];
        if state.active_material == state.default_material {
            return;
        }
        let handle = state
            .default_material
            .and_then(|m| self.materials.get(m))
            .and_then(|m| m.correlated.first().copied());
        let default_material = state.default_material;

        if let Some(handle) = handle {
            let Self {
                primitives,
                instances,
                ..
            } = self;
            for &p in &primitives[index].correlated {
                if let Some(primitive) = instances.primitive_mut(p) {
                    primitive.set_material(handle);
                }
            }
        }
        self.primitives[index].active_material = default_material;
    }

    fn material_is_mapped(&self, material: usize) -> bool {
        self.primitives.iter().any(|p| {
            p.variants
                .as_ref()
                .is_some_and(|v| v.values().any(|e| e.material_index == material))
        })
    }

    fn material_has_variant(&self, material: usize, name: &str) -> bool {
        self.primitives.iter().any(|p| {
            p.variants
                .as_ref()
                .and_then(|v| v.get(name))
                .is_some_and(|e| e.material_index == material)
        })
    }
}

/// Resolves a primitive's extension block into its runtime variant table.
/// `None` when the primitive carries no block at all.
pub(super) fn build_variant_table(
    document: &Document,
    primitive: &Primitive,
    correlation: &CorrelationMap,
) -> Option<BTreeMap<String, VariantEntry>> {
    let mappings = primitive.variant_mappings()?;
    let names = document.variant_names().unwrap_or_default();
    let mut table = BTreeMap::new();
    for mapping in mappings {
        let instance = correlation
            .material_instances(mapping.material)
            .first()
            .copied();
        for &variant_index in &mapping.variants {
            match names.get(variant_index) {
                Some(&name) => {
                    table.insert(
                        name.to_string(),
                        VariantEntry {
                            material_index: mapping.material,
                            instance,
                        },
                    );
                }
                None => log::warn!(
                    "Variant mapping names undefined variant index {variant_index}; skipped"
                ),
            }
        }
    }
    Some(table)
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{session_fixture, SESSION_DOCUMENT};
    use crate::error::SceneGraphError;

    #[test]
    fn test_variant_round_trip_matches_direct_switch() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);

        let to_b = graft
            .primitive_mut(0)
            .unwrap()
            .enable_variant("Worn")
            .unwrap();
        assert_eq!(logs.primitive(0).get(), to_b);
        assert_eq!(
            graft.primitive(0).unwrap().active_material_index(),
            Some(1)
        );

        let back = graft
            .primitive_mut(0)
            .unwrap()
            .enable_variant("Pristine")
            .unwrap();
        assert_eq!(logs.primitive(0).get(), back);
        assert_eq!(
            graft.primitive(0).unwrap().active_material_index(),
            Some(0)
        );

        // The document still references the authored material.
        assert_eq!(
            graft.document().meshes[0].primitives[0].material,
            Some(0)
        );
    }

    #[test]
    fn test_unknown_variant_is_inert() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);
        let before = logs.primitive(0).get();
        let revision = graft.revision();

        assert!(graft
            .primitive_mut(0)
            .unwrap()
            .enable_variant("Imaginary")
            .is_none());
        assert_eq!(logs.primitive(0).get(), before);
        assert_eq!(graft.revision(), revision);
    }

    #[test]
    fn test_variant_info_distinguishes_absent_from_empty() {
        let (graft, _logs) = session_fixture(SESSION_DOCUMENT);

        // Primitive 0 maps both variants, primitive 1 carries an empty
        // block, primitive 2 has no block at all.
        assert_eq!(graft.primitive(0).unwrap().variant_info().unwrap().len(), 2);
        assert_eq!(graft.primitive(1).unwrap().variant_info().unwrap().len(), 0);
        assert!(graft.primitive(2).unwrap().variant_info().is_none());

        assert_eq!(
            graft.primitive(0).unwrap().variant_names(),
            vec!["Pristine", "Worn"]
        );
    }

    #[test]
    fn test_set_active_variant_applies_and_restores() {
        let (mut graft, logs) = session_fixture(SESSION_DOCUMENT);
        let default = logs.primitive(0).get();

        graft.set_active_variant(Some("Worn")).unwrap();
        assert_eq!(graft.active_variant(), Some("Worn"));
        let worn = logs.primitive(0).get();
        assert_ne!(worn, default);

        graft.set_active_variant(None).unwrap();
        assert_eq!(graft.active_variant(), None);
        assert_eq!(logs.primitive(0).get(), default);
        assert_eq!(
            graft.primitive(0).unwrap().active_material_index(),
            graft.primitive(0).unwrap().default_material_index()
        );
    }

    #[test]
    fn test_set_active_variant_rejects_unknown_names() {
        let (mut graft, _logs) = session_fixture(SESSION_DOCUMENT);
        let err = graft.set_active_variant(Some("Imaginary")).unwrap_err();
        assert!(matches!(err, SceneGraphError::LookupMiss { .. }));
        assert_eq!(graft.active_variant(), None);
    }

    #[test]
    fn test_materials_for_variant_filter() {
        let (graft, _logs) = session_fixture(SESSION_DOCUMENT);

        // No active variant: everything is selectable.
        assert_eq!(graft.materials_for_variant(None), vec![0, 1, 2]);

        // "Worn" keeps unmapped material 2 and the mapped material 1;
        // material 0 is only reachable through "Pristine".
        assert_eq!(graft.materials_for_variant(Some("Worn")), vec![1, 2]);
        assert_eq!(graft.materials_for_variant(Some("Pristine")), vec![0, 2]);
    }
}
