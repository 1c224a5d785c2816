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

//! Mesh-primitive facades and their variant tables.
//!
//! Variant switching is a runtime-only concern: enabling a variant swaps
//! materials on the correlated engine primitives and tracks the active
//! choice, but the document keeps its default material reference so an
//! export reproduces the asset as authored.

use std::collections::BTreeMap;

use eidolon_core::runtime::{MaterialHandle, PrimitiveHandle};

use crate::graft::Graft;
use crate::id::ElementId;

/// One named variant of a primitive: the document material it maps to and
/// the engine material resolved for it at graft construction.
#[derive(Debug, Clone)]
pub struct VariantEntry {
    pub(crate) material_index: usize,
    /// First correlated instance of the mapped material. `None` when the
    /// material was never instantiated; switching to it is then inert.
    pub(crate) instance: Option<MaterialHandle>,
}

impl VariantEntry {
    /// The document material this variant maps to.
    pub fn material_index(&self) -> usize {
        self.material_index
    }

    /// Whether the mapped material has an engine instance to switch to.
    pub fn is_instantiated(&self) -> bool {
        self.instance.is_some()
    }
}

/// Graft-owned state for one mesh primitive.
#[derive(Debug)]
pub struct PrimitiveState {
    pub(crate) id: ElementId,
    pub(crate) mesh: usize,
    pub(crate) primitive: usize,
    /// Engine primitives rendered from this document primitive.
    pub(crate) correlated: Vec<PrimitiveHandle>,
    /// The document's material reference, untouched by variant switches.
    pub(crate) default_material: Option<usize>,
    /// The material currently applied to the engine primitives.
    pub(crate) active_material: Option<usize>,
    /// Variant name to entry. `None` when the primitive carries no
    /// variants extension block at all (distinct from an empty table).
    pub(crate) variants: Option<BTreeMap<String, VariantEntry>>,
}

impl PrimitiveState {
    /// The process-unique id of this primitive.
    pub fn internal_id(&self) -> ElementId {
        self.id
    }

    /// The owning mesh's index in the document.
    pub fn mesh_index(&self) -> usize {
        self.mesh
    }

    /// The primitive's index within its mesh.
    pub fn primitive_index(&self) -> usize {
        self.primitive
    }

    /// Number of engine primitive instances behind this facade.
    pub fn instance_count(&self) -> usize {
        self.correlated.len()
    }
}

/// Read access to one mesh primitive.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveView<'a> {
    graft: &'a Graft,
    /// Index into the graft's flattened, mesh-major primitive list.
    index: usize,
}

impl<'a> PrimitiveView<'a> {
    pub(crate) fn new(graft: &'a Graft, index: usize) -> Self {
        Self { graft, index }
    }

    /// The process-unique id of this primitive.
    pub fn internal_id(&self) -> ElementId {
        self.state().id
    }

    /// The owning mesh's index in the document.
    pub fn mesh_index(&self) -> usize {
        self.state().mesh
    }

    /// The primitive's index within its mesh.
    pub fn primitive_index(&self) -> usize {
        self.state().primitive
    }

    /// The document's material reference. Variant switches do not move it.
    pub fn default_material_index(&self) -> Option<usize> {
        self.state().default_material
    }

    /// The material currently applied to the correlated engine primitives.
    pub fn active_material_index(&self) -> Option<usize> {
        self.state().active_material
    }

    /// The variant table, or `None` when the primitive carries no variants
    /// extension block (an empty table means the block exists but maps
    /// nothing).
    pub fn variant_info(&self) -> Option<&'a BTreeMap<String, VariantEntry>> {
        self.state().variants.as_ref()
    }

    /// Names of the variants this primitive participates in.
    pub fn variant_names(&self) -> Vec<&'a str> {
        self.state()
            .variants
            .as_ref()
            .map(|v| v.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of engine primitive instances behind this facade.
    pub fn instance_count(&self) -> usize {
        self.state().correlated.len()
    }

    fn state(&self) -> &'a PrimitiveState {
        self.graft.primitive_state(self.index)
    }
}

/// Write access to one mesh primitive.
#[derive(Debug)]
pub struct PrimitiveEditor<'a> {
    graft: &'a mut Graft,
    index: usize,
}

impl<'a> PrimitiveEditor<'a> {
    pub(crate) fn new(graft: &'a mut Graft, index: usize) -> Self {
        Self { graft, index }
    }

    /// A read view of the same primitive.
    pub fn view(&self) -> PrimitiveView<'_> {
        PrimitiveView::new(self.graft, self.index)
    }

    /// The process-unique id of this primitive.
    pub fn internal_id(&self) -> ElementId {
        self.view().internal_id()
    }

    /// Switches the correlated engine primitives to the named variant's
    /// material and returns the handle that was applied.
    ///
    /// Returns `None` without mutating anything when the primitive has no
    /// variant of that name (or no variant table), or when the variant
    /// maps to a material that was never instantiated; the latter case is
    /// logged as a warning. Re-enabling the active variant applies the
    /// same handle again.
    pub fn enable_variant(&mut self, name: &str) -> Option<MaterialHandle> {
        self.graft.enable_primitive_variant(self.index, name)
    }
}
