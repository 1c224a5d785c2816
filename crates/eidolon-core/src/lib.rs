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

//! # Eidolon Core
//!
//! Foundational crate for the Eidolon scene-graph facade: the glTF 2.0
//! document model (the serialization source of truth), color math, and the
//! contracts through which the rendering engine's live objects are reached.
//!
//! The rendering engine and the asset loader are external collaborators.
//! This crate defines what they hand over (a parsed [`document::Document`])
//! and what they plug in (implementations of the [`runtime`] instance
//! traits, registered in a [`runtime::InstanceStore`]).

#![warn(missing_docs)]

pub mod document;
pub mod math;
pub mod runtime;

pub use math::color::Rgba;
