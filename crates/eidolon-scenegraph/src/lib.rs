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

//! # Eidolon Scenegraph
//!
//! A read/write facade over a loaded glTF asset. The loader hands a
//! [`Graft`] the parsed document, a correlation map and the engine
//! instances it created; the facade then exposes materials, textures and
//! primitives as editable elements. Every edit is written to the document
//! first (it stays the serialization source of truth) and then pushed to
//! every correlated engine instance, so rendering and a later
//! [`Graft::export_json`] always agree.

pub mod correlation;
pub mod element;
pub mod error;
pub mod graft;
pub mod id;
pub mod interpolate;
pub mod visitor;

pub use correlation::{CorrelationMap, InstanceHandle, NodeKey};
pub use element::{ElementPath, ElementRef};
pub use error::SceneGraphError;
pub use graft::Graft;
pub use id::{next_element_id, ElementId};
pub use interpolate::{InterpolationStatus, MaterialInterpolation};
pub use visitor::{walk, DocumentVisitor, VisitOptions};
