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

//! Geometry storage: buffers, views into them, and typed accessors.
//!
//! The facade never rewrites geometry, so these types only need to carry
//! the schema faithfully through a parse/serialize round trip.

use serde::{Deserialize, Serialize};

/// A typed view over a buffer view's bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    /// Index of the buffer view holding the data. Absent means all zeros.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<usize>,
    /// Byte offset into the buffer view.
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub byte_offset: u64,
    /// Component type code (5126 = f32, 5123 = u16, ...).
    pub component_type: u32,
    /// Whether integer components map to `[0.0, 1.0]` / `[-1.0, 1.0]`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub normalized: bool,
    /// Number of elements.
    pub count: usize,
    /// Element shape (`SCALAR`, `VEC3`, `MAT4`, ...).
    #[serde(rename = "type")]
    pub element_type: String,
    /// Per-component maximum values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f64>>,
    /// Per-component minimum values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Vec<f64>>,
    /// Sparse storage block, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse: Option<serde_json::Value>,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

/// A contiguous byte range within a buffer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    /// Index of the underlying buffer.
    pub buffer: usize,
    /// Byte offset into the buffer.
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub byte_offset: u64,
    /// Length of the view in bytes.
    pub byte_length: u64,
    /// Stride between elements, for interleaved vertex data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_stride: Option<u64>,
    /// Intended GL binding target (34962 = vertices, 34963 = indices).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

/// A binary buffer, external or embedded as a `data:` URI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    /// Buffer location. Absent for the GLB-embedded buffer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Length of the buffer in bytes.
    pub byte_length: u64,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}
