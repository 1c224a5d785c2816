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

//! Typed extension blocks.
//!
//! Only `KHR_materials_variants` is modeled; every other extension at the
//! same level is flattened into a raw map so it survives a round trip
//! untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root-level `extensions` object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentExtensions {
    /// The material variants declaration, if present.
    #[serde(
        rename = "KHR_materials_variants",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub khr_materials_variants: Option<VariantsRootBlock>,
    /// All other root extensions, carried as raw JSON.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// The root block of `KHR_materials_variants`: the list of variant names
/// that primitive mappings index into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantsRootBlock {
    /// The declared variants, in index order.
    pub variants: Vec<VariantDef>,
}

/// One variant declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDef {
    /// The variant's name, unique within the document.
    pub name: String,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl VariantDef {
    /// Creates a variant declaration with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extras: None,
        }
    }
}

/// Primitive-level `extensions` object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimitiveExtensions {
    /// The variant-to-material mapping for this primitive, if present.
    #[serde(
        rename = "KHR_materials_variants",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub khr_materials_variants: Option<VariantsPrimitiveBlock>,
    /// All other primitive extensions, carried as raw JSON.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// The primitive block of `KHR_materials_variants`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantsPrimitiveBlock {
    /// The material mappings, each covering one or more variants.
    pub mappings: Vec<VariantMapping>,
}

/// One mapping entry: the material a primitive uses under the listed
/// variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantMapping {
    /// Index of the material to apply.
    pub material: usize,
    /// Indices into the root variant list this mapping covers.
    pub variants: Vec<usize>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_variants_block() {
        let input = r#"{
            "KHR_materials_variants": {
                "variants": [{ "name": "Street" }, { "name": "Beach" }]
            },
            "VENDOR_custom": { "flag": true }
        }"#;
        let ext: DocumentExtensions = serde_json::from_str(input).unwrap();
        let block = ext.khr_materials_variants.as_ref().unwrap();
        assert_eq!(block.variants.len(), 2);
        assert_eq!(block.variants[1].name, "Beach");

        // The unmodeled extension rides along.
        assert_eq!(ext.other["VENDOR_custom"]["flag"], true);

        let out = serde_json::to_value(&ext).unwrap();
        assert_eq!(
            out["KHR_materials_variants"]["variants"][0]["name"],
            "Street"
        );
        assert_eq!(out["VENDOR_custom"]["flag"], true);
    }

    #[test]
    fn test_primitive_mapping() {
        let input = r#"{
            "KHR_materials_variants": {
                "mappings": [
                    { "material": 2, "variants": [0, 1] },
                    { "material": 5, "variants": [2] }
                ]
            }
        }"#;
        let ext: PrimitiveExtensions = serde_json::from_str(input).unwrap();
        let mappings = &ext.khr_materials_variants.as_ref().unwrap().mappings;
        assert_eq!(mappings[0].material, 2);
        assert_eq!(mappings[0].variants, vec![0, 1]);
        assert_eq!(mappings[1].material, 5);
    }

    #[test]
    fn test_empty_extensions_serialize_to_empty_object() {
        let ext = DocumentExtensions::default();
        assert_eq!(serde_json::to_value(&ext).unwrap(), serde_json::json!({}));
    }
}
