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

//! Texture, image and sampler facades.
//!
//! Images are read-only through the facade; their bytes belong to the
//! loader. Samplers are writable: wrap and filter edits land in the
//! document as raw GL codes and reach every engine texture whose document
//! texture references the sampler.

use eidolon_core::document::{MagFilter, MinFilter, Sampler, WrapMode};
use eidolon_core::runtime::TextureHandle;

use crate::error::SceneGraphError;
use crate::graft::Graft;
use crate::id::ElementId;

/// Graft-owned state for one document texture.
#[derive(Debug)]
pub struct TextureState {
    pub(crate) id: ElementId,
    pub(crate) index: usize,
    /// Engine textures uploaded for this document texture.
    pub(crate) correlated: Vec<TextureHandle>,
}

impl TextureState {
    /// The process-unique id of this texture.
    pub fn internal_id(&self) -> ElementId {
        self.id
    }

    /// The texture's index in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of engine texture instances behind this facade.
    pub fn instance_count(&self) -> usize {
        self.correlated.len()
    }
}

/// Graft-owned state for one document image.
#[derive(Debug)]
pub struct ImageState {
    pub(crate) id: ElementId,
    pub(crate) index: usize,
}

impl ImageState {
    /// The process-unique id of this image.
    pub fn internal_id(&self) -> ElementId {
        self.id
    }

    /// The image's index in the document.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Graft-owned state for one document sampler.
#[derive(Debug)]
pub struct SamplerState {
    pub(crate) id: ElementId,
    pub(crate) index: usize,
    /// Engine textures whose document texture references this sampler.
    pub(crate) correlated: Vec<TextureHandle>,
}

impl SamplerState {
    /// The process-unique id of this sampler.
    pub fn internal_id(&self) -> ElementId {
        self.id
    }

    /// The sampler's index in the document.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Read access to one texture.
#[derive(Debug, Clone, Copy)]
pub struct TextureView<'a> {
    graft: &'a Graft,
    index: usize,
}

impl<'a> TextureView<'a> {
    pub(crate) fn new(graft: &'a Graft, index: usize) -> Self {
        Self { graft, index }
    }

    /// The process-unique id of this texture.
    pub fn internal_id(&self) -> ElementId {
        self.graft.texture_state(self.index).id
    }

    /// The texture's index in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The texture's document name, if it has one.
    pub fn name(&self) -> Option<&'a str> {
        self.graft.document().textures[self.index].name.as_deref()
    }

    /// Index of the source image, if one is referenced.
    pub fn source(&self) -> Option<usize> {
        self.graft.document().textures[self.index].source
    }

    /// Index of the sampler, if one is referenced.
    pub fn sampler(&self) -> Option<usize> {
        self.graft.document().textures[self.index].sampler
    }

    /// Resolves the source image to its facade, if any.
    pub fn image(&self) -> Option<ImageView<'a>> {
        self.source().and_then(|i| self.graft.image(i))
    }

    /// Number of engine texture instances behind this facade.
    pub fn instance_count(&self) -> usize {
        self.graft.texture_state(self.index).correlated.len()
    }
}

/// Read access to one image.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    graft: &'a Graft,
    index: usize,
}

impl<'a> ImageView<'a> {
    pub(crate) fn new(graft: &'a Graft, index: usize) -> Self {
        Self { graft, index }
    }

    /// The process-unique id of this image.
    pub fn internal_id(&self) -> ElementId {
        self.graft.image_state(self.index).id
    }

    /// The image's index in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The image's document name, if it has one.
    pub fn name(&self) -> Option<&'a str> {
        self.graft.document().images[self.index].name.as_deref()
    }

    /// The image URI, when the image is not embedded in a buffer.
    pub fn uri(&self) -> Option<&'a str> {
        self.graft.document().images[self.index].uri.as_deref()
    }

    /// The declared MIME type, if any.
    pub fn mime_type(&self) -> Option<&'a str> {
        self.graft.document().images[self.index].mime_type.as_deref()
    }
}

/// Read access to one sampler.
///
/// The typed getters reject GL codes this crate does not know with
/// [`SceneGraphError::InvalidValue`]; the raw codes still round-trip
/// through the document untouched.
#[derive(Debug, Clone, Copy)]
pub struct SamplerView<'a> {
    graft: &'a Graft,
    index: usize,
}

impl<'a> SamplerView<'a> {
    pub(crate) fn new(graft: &'a Graft, index: usize) -> Self {
        Self { graft, index }
    }

    /// The process-unique id of this sampler.
    pub fn internal_id(&self) -> ElementId {
        self.graft.sampler_state(self.index).id
    }

    /// The sampler's index in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The sampler's document name, if it has one.
    pub fn name(&self) -> Option<&'a str> {
        self.graft.document().samplers[self.index].name.as_deref()
    }

    /// The typed wrap mode along U.
    pub fn wrap_s(&self) -> Result<WrapMode, SceneGraphError> {
        self.document_sampler()
            .wrap_s_mode()
            .map_err(|e| SceneGraphError::invalid_value("wrapS", e.code, e.to_string()))
    }

    /// The typed wrap mode along V.
    pub fn wrap_t(&self) -> Result<WrapMode, SceneGraphError> {
        self.document_sampler()
            .wrap_t_mode()
            .map_err(|e| SceneGraphError::invalid_value("wrapT", e.code, e.to_string()))
    }

    /// The typed magnification filter, if one is stored.
    pub fn mag_filter(&self) -> Result<Option<MagFilter>, SceneGraphError> {
        self.document_sampler()
            .mag_filter_mode()
            .map_err(|e| SceneGraphError::invalid_value("magFilter", e.code, e.to_string()))
    }

    /// The typed minification filter, if one is stored.
    pub fn min_filter(&self) -> Result<Option<MinFilter>, SceneGraphError> {
        self.document_sampler()
            .min_filter_mode()
            .map_err(|e| SceneGraphError::invalid_value("minFilter", e.code, e.to_string()))
    }

    fn document_sampler(&self) -> &'a Sampler {
        &self.graft.document().samplers[self.index]
    }
}

/// Write access to one sampler.
///
/// Setters take the typed modes, so there is nothing left to validate:
/// the matching GL code lands in the document and the typed value reaches
/// every correlated engine texture.
#[derive(Debug)]
pub struct SamplerEditor<'a> {
    graft: &'a mut Graft,
    index: usize,
}

impl<'a> SamplerEditor<'a> {
    pub(crate) fn new(graft: &'a mut Graft, index: usize) -> Self {
        Self { graft, index }
    }

    /// A read view of the same sampler.
    pub fn view(&self) -> SamplerView<'_> {
        SamplerView::new(self.graft, self.index)
    }

    /// Sets the wrap mode along U.
    pub fn set_wrap_s(&mut self, mode: WrapMode) {
        self.graft.set_sampler_wrap_s(self.index, mode);
    }

    /// Sets the wrap mode along V.
    pub fn set_wrap_t(&mut self, mode: WrapMode) {
        self.graft.set_sampler_wrap_t(self.index, mode);
    }

    /// Sets or clears the magnification filter.
    pub fn set_mag_filter(&mut self, filter: Option<MagFilter>) {
        self.graft.set_sampler_mag_filter(self.index, filter);
    }

    /// Sets or clears the minification filter.
    pub fn set_min_filter(&mut self, filter: Option<MinFilter>) {
        self.graft.set_sampler_min_filter(self.index, filter);
    }
}
