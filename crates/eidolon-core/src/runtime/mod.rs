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

//! Contracts between the document layer and a rendering engine.
//!
//! A host engine implements these traits for its own material, texture and
//! primitive objects, registers them in an [`InstanceStore`], and receives
//! every document mutation through them. The traits deliberately carry no
//! `Send`/`Sync` bounds: a scene-graph session is single-threaded and edits
//! happen between frames, so implementors are free to hold `Rc` internals.

mod handle;
mod state;
mod store;
mod traits;

pub use handle::{MaterialHandle, PrimitiveHandle, TextureHandle};
pub use state::{AlphaState, TextureSlot};
pub use store::InstanceStore;
pub use traits::{MaterialInstance, PrimitiveInstance, TextureInstance};
