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

//! Facade elements: the identified, stateful projections of document
//! elements.
//!
//! Each element kind splits into three pieces. The *state* struct is owned
//! by the graft and is the element's identity: it carries the
//! [`ElementId`](crate::id::ElementId), the document coordinates and the
//! correlated engine handles, and it lives exactly as long as the graft.
//! *Views* are cheap read handles (a graft reference plus coordinates);
//! *editors* are the write handles, borrowing the graft mutably so a
//! mutation can update document and engine instances together.

mod material;
mod pbr;
mod primitive;
mod texture;
mod texture_info;

pub use material::{MaterialEditor, MaterialState, MaterialView};
pub use pbr::{PbrEditor, PbrState, PbrView};
pub use primitive::{PrimitiveEditor, PrimitiveState, PrimitiveView, VariantEntry};
pub use texture::{
    ImageState, ImageView, SamplerEditor, SamplerState, SamplerView, TextureState, TextureView,
};
pub use texture_info::{TextureInfoEditor, TextureInfoState, TextureInfoView};

use crate::id::ElementId;
use eidolon_core::runtime::TextureSlot;

/// Where an element lives inside its graft. Registry values; stable for
/// the graft's lifetime because the facade never adds or removes elements
/// after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementPath {
    /// `materials[i]`.
    Material(usize),
    /// The PBR block of `materials[i]`.
    Pbr(usize),
    /// One texture slot of `materials[material]`.
    TextureInfo {
        /// Index of the owning material.
        material: usize,
        /// The slot this facade covers.
        slot: TextureSlot,
    },
    /// `textures[i]`.
    Texture(usize),
    /// `images[i]`.
    Image(usize),
    /// `samplers[i]`.
    Sampler(usize),
    /// The i-th primitive in mesh-major document order.
    Primitive(usize),
}

/// A reference to one stored element, returned by id lookups.
///
/// The wrapped references point at the graft-owned state structs, so two
/// lookups of the same id yield pointers to the same memory; hosts may
/// key caches on that.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    /// A material element.
    Material(&'a MaterialState),
    /// A PBR parameter-block element.
    Pbr(&'a PbrState),
    /// A texture-slot element.
    TextureInfo(&'a TextureInfoState),
    /// A texture element.
    Texture(&'a TextureState),
    /// An image element.
    Image(&'a ImageState),
    /// A sampler element.
    Sampler(&'a SamplerState),
    /// A mesh-primitive element.
    Primitive(&'a PrimitiveState),
}

impl ElementRef<'_> {
    /// The process-unique id of the referenced element.
    pub fn internal_id(&self) -> ElementId {
        match self {
            ElementRef::Material(e) => e.internal_id(),
            ElementRef::Pbr(e) => e.internal_id(),
            ElementRef::TextureInfo(e) => e.internal_id(),
            ElementRef::Texture(e) => e.internal_id(),
            ElementRef::Image(e) => e.internal_id(),
            ElementRef::Sampler(e) => e.internal_id(),
            ElementRef::Primitive(e) => e.internal_id(),
        }
    }
}
