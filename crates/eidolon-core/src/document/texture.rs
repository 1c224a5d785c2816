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

//! Texture, image and sampler definitions.
//!
//! Sampler parameters are numeric GL codes on the wire and stay raw `u32`
//! in the document so any input round-trips byte-for-byte, even with codes
//! this crate does not know. The typed enums ([`WrapMode`], [`MagFilter`],
//! [`MinFilter`]) convert through `TryFrom<u32>` and reject unknown codes;
//! that rejection surfaces when a typed getter is called, never at parse
//! time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An error produced when a numeric code does not map to a known
/// sampler parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownCodeError {
    /// Which parameter the code was read for.
    pub what: &'static str,
    /// The unrecognized code.
    pub code: u32,
}

impl fmt::Display for UnknownCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {} code {}", self.what, self.code)
    }
}

impl std::error::Error for UnknownCodeError {}

/// Texture coordinate wrapping behavior outside `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Coordinates clamp to the edge texel (code 33071).
    ClampToEdge = 33071,
    /// Coordinates mirror on each repeat (code 33648).
    MirroredRepeat = 33648,
    /// Coordinates tile (code 10497). The schema default.
    #[default]
    Repeat = 10497,
}

impl WrapMode {
    /// The numeric GL code written to the document.
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for WrapMode {
    type Error = UnknownCodeError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            33071 => Ok(WrapMode::ClampToEdge),
            33648 => Ok(WrapMode::MirroredRepeat),
            10497 => Ok(WrapMode::Repeat),
            _ => Err(UnknownCodeError {
                what: "wrap mode",
                code,
            }),
        }
    }
}

/// Magnification filter applied when a texel covers multiple pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagFilter {
    /// Nearest-texel sampling (code 9728).
    Nearest = 9728,
    /// Bilinear sampling (code 9729).
    Linear = 9729,
}

impl MagFilter {
    /// The numeric GL code written to the document.
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for MagFilter {
    type Error = UnknownCodeError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            9728 => Ok(MagFilter::Nearest),
            9729 => Ok(MagFilter::Linear),
            _ => Err(UnknownCodeError {
                what: "mag filter",
                code,
            }),
        }
    }
}

/// Minification filter applied when a pixel covers multiple texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinFilter {
    /// Nearest-texel sampling (code 9728).
    Nearest = 9728,
    /// Bilinear sampling (code 9729).
    Linear = 9729,
    /// Nearest texel from the nearest mipmap (code 9984).
    NearestMipmapNearest = 9984,
    /// Bilinear sampling from the nearest mipmap (code 9985).
    LinearMipmapNearest = 9985,
    /// Nearest texel blended between mipmaps (code 9986).
    NearestMipmapLinear = 9986,
    /// Trilinear sampling (code 9987).
    LinearMipmapLinear = 9987,
}

impl MinFilter {
    /// The numeric GL code written to the document.
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for MinFilter {
    type Error = UnknownCodeError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            9728 => Ok(MinFilter::Nearest),
            9729 => Ok(MinFilter::Linear),
            9984 => Ok(MinFilter::NearestMipmapNearest),
            9985 => Ok(MinFilter::LinearMipmapNearest),
            9986 => Ok(MinFilter::NearestMipmapLinear),
            9987 => Ok(MinFilter::LinearMipmapLinear),
            _ => Err(UnknownCodeError {
                what: "min filter",
                code,
            }),
        }
    }
}

/// A texture: a sampler paired with an image source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Texture {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Index of the sampler. Absent means repeat wrapping with
    /// auto-selected filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampler: Option<usize>,
    /// Index of the source image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

/// An image, referenced either by URI or through a buffer view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Image location: a relative path or a `data:` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// MIME type, required when the image lives in a buffer view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Index of the buffer view containing the encoded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<usize>,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

/// Sampling parameters shared by textures.
///
/// Codes are stored raw. The `*_mode` accessors give the typed reading and
/// report codes this crate does not recognize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sampler {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Magnification filter code. Absent lets the renderer choose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag_filter: Option<u32>,
    /// Minification filter code. Absent lets the renderer choose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_filter: Option<u32>,
    /// Wrapping code along U.
    #[serde(default = "default_wrap", skip_serializing_if = "is_default_wrap")]
    pub wrap_s: u32,
    /// Wrapping code along V.
    #[serde(default = "default_wrap", skip_serializing_if = "is_default_wrap")]
    pub wrap_t: u32,
    /// Extension blocks, carried as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    /// Application-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            name: None,
            mag_filter: None,
            min_filter: None,
            wrap_s: default_wrap(),
            wrap_t: default_wrap(),
            extensions: None,
            extras: None,
        }
    }
}

impl Sampler {
    /// The typed wrap mode along U.
    pub fn wrap_s_mode(&self) -> Result<WrapMode, UnknownCodeError> {
        WrapMode::try_from(self.wrap_s)
    }

    /// The typed wrap mode along V.
    pub fn wrap_t_mode(&self) -> Result<WrapMode, UnknownCodeError> {
        WrapMode::try_from(self.wrap_t)
    }

    /// The typed magnification filter, if one is stored.
    pub fn mag_filter_mode(&self) -> Result<Option<MagFilter>, UnknownCodeError> {
        self.mag_filter.map(MagFilter::try_from).transpose()
    }

    /// The typed minification filter, if one is stored.
    pub fn min_filter_mode(&self) -> Result<Option<MinFilter>, UnknownCodeError> {
        self.min_filter.map(MinFilter::try_from).transpose()
    }
}

fn default_wrap() -> u32 {
    WrapMode::Repeat.code()
}

fn is_default_wrap(v: &u32) -> bool {
    *v == WrapMode::Repeat.code()
}
