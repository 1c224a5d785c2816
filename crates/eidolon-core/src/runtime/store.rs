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

//! Registry of engine-side instances, addressed by opaque handles.

use crate::runtime::{
    MaterialHandle, MaterialInstance, PrimitiveHandle, PrimitiveInstance, TextureHandle,
    TextureInstance,
};

/// Owns the engine objects a scene-graph session drives.
///
/// Handles are indices into the registration order and stay valid for the
/// store's lifetime; nothing is ever removed. Lookups with a foreign or
/// out-of-range handle return `None` rather than panicking.
#[derive(Debug, Default)]
pub struct InstanceStore {
    materials: Vec<Box<dyn MaterialInstance>>,
    textures: Vec<Box<dyn TextureInstance>>,
    primitives: Vec<Box<dyn PrimitiveInstance>>,
}

impl InstanceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a material instance and returns its handle.
    pub fn add_material(&mut self, instance: Box<dyn MaterialInstance>) -> MaterialHandle {
        self.materials.push(instance);
        let handle = MaterialHandle(self.materials.len() - 1);
        log::trace!("Registered material instance {handle:?}");
        handle
    }

    /// Registers a texture instance and returns its handle.
    pub fn add_texture(&mut self, instance: Box<dyn TextureInstance>) -> TextureHandle {
        self.textures.push(instance);
        let handle = TextureHandle(self.textures.len() - 1);
        log::trace!("Registered texture instance {handle:?}");
        handle
    }

    /// Registers a primitive instance and returns its handle.
    pub fn add_primitive(&mut self, instance: Box<dyn PrimitiveInstance>) -> PrimitiveHandle {
        self.primitives.push(instance);
        let handle = PrimitiveHandle(self.primitives.len() - 1);
        log::trace!("Registered primitive instance {handle:?}");
        handle
    }

    /// Returns the material behind `handle`, if it was issued by this store.
    pub fn material(&self, handle: MaterialHandle) -> Option<&dyn MaterialInstance> {
        self.materials.get(handle.0).map(|b| b.as_ref())
    }

    /// Mutable access to the material behind `handle`.
    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut dyn MaterialInstance> {
        self.materials
            .get_mut(handle.0)
            .map(|b| b.as_mut() as &mut dyn MaterialInstance)
    }

    /// Returns the texture behind `handle`, if it was issued by this store.
    pub fn texture(&self, handle: TextureHandle) -> Option<&dyn TextureInstance> {
        self.textures.get(handle.0).map(|b| b.as_ref())
    }

    /// Mutable access to the texture behind `handle`.
    pub fn texture_mut(&mut self, handle: TextureHandle) -> Option<&mut dyn TextureInstance> {
        self.textures
            .get_mut(handle.0)
            .map(|b| b.as_mut() as &mut dyn TextureInstance)
    }

    /// Returns the primitive behind `handle`, if it was issued by this store.
    pub fn primitive(&self, handle: PrimitiveHandle) -> Option<&dyn PrimitiveInstance> {
        self.primitives.get(handle.0).map(|b| b.as_ref())
    }

    /// Mutable access to the primitive behind `handle`.
    pub fn primitive_mut(&mut self, handle: PrimitiveHandle) -> Option<&mut dyn PrimitiveInstance> {
        self.primitives
            .get_mut(handle.0)
            .map(|b| b.as_mut() as &mut dyn PrimitiveInstance)
    }

    /// Number of registered materials.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of registered textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of registered primitives.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::color::Rgba;
    use crate::runtime::{AlphaState, TextureSlot};

    #[derive(Debug, Default)]
    struct RecordingMaterial {
        base_color: Option<Rgba>,
        double_sided: bool,
    }

    impl MaterialInstance for RecordingMaterial {
        fn set_base_color_factor(&mut self, factor: Rgba) {
            self.base_color = Some(factor);
        }
        fn set_metallic_factor(&mut self, _factor: f32) {}
        fn set_roughness_factor(&mut self, _factor: f32) {}
        fn set_emissive_factor(&mut self, _factor: [f32; 3]) {}
        fn set_alpha_state(&mut self, _state: AlphaState) {}
        fn set_double_sided(&mut self, double_sided: bool) {
            self.double_sided = double_sided;
        }
        fn set_texture(&mut self, _slot: TextureSlot, _texture: Option<TextureHandle>) {}
        fn has_texture(&self, _slot: TextureSlot) -> bool {
            false
        }
    }

    #[test]
    fn test_handles_index_registration_order() {
        let mut store = InstanceStore::new();
        let a = store.add_material(Box::new(RecordingMaterial::default()));
        let b = store.add_material(Box::new(RecordingMaterial::default()));
        assert_eq!(a, MaterialHandle(0));
        assert_eq!(b, MaterialHandle(1));
        assert_eq!(store.material_count(), 2);
    }

    #[test]
    fn test_mutation_reaches_the_right_instance() {
        let mut store = InstanceStore::new();
        let a = store.add_material(Box::new(RecordingMaterial::default()));
        let b = store.add_material(Box::new(RecordingMaterial::default()));

        store
            .material_mut(b)
            .unwrap()
            .set_base_color_factor(Rgba::rgb(1.0, 0.0, 0.0));

        let debug_a = format!("{:?}", store.material(a).unwrap());
        let debug_b = format!("{:?}", store.material(b).unwrap());
        assert!(debug_a.contains("None"), "{debug_a}");
        assert!(debug_b.contains("Rgba"), "{debug_b}");
    }

    #[test]
    fn test_out_of_range_handle_is_none() {
        let mut store = InstanceStore::new();
        store.add_material(Box::new(RecordingMaterial::default()));
        assert!(store.material(MaterialHandle(5)).is_none());
        assert!(store.material_mut(MaterialHandle(5)).is_none());
        assert!(store.texture(TextureHandle(0)).is_none());
        assert!(store.primitive(PrimitiveHandle(0)).is_none());
    }
}
