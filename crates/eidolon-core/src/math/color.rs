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

//! Defines the `Rgba` color type and associated operations.

use std::fmt;

/// Represents a glTF color factor: four `f32` components in linear space.
///
/// glTF factors (`baseColorFactor`, `emissiveFactor`) are stored linear in
/// the document, so no gamma conversion happens here: hex conversion is a
/// plain 8-bit scaling, which is exactly what an editor color picker feeds
/// back into the document.
///
/// `#[repr(C)]` ensures a consistent memory layout, which matters when
/// passing color data across the engine boundary.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Rgba {
    /// The red component.
    pub r: f32,
    /// The green component.
    pub g: f32,
    /// The blue component.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

/// An error produced when parsing a hex color string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string was not of the form `#RRGGBB` or `#RRGGBBAA`.
    InvalidLength {
        /// Number of hex digits found after the optional `#`.
        len: usize,
    },
    /// A character outside `[0-9a-fA-F]` was encountered.
    InvalidDigit {
        /// The offending two-digit group.
        group: String,
    },
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::InvalidLength { len } => {
                write!(
                    f,
                    "Hex color must have 6 or 8 digits, found {len} (expected '#RRGGBB' or '#RRGGBBAA')"
                )
            }
            ColorParseError::InvalidDigit { group } => {
                write!(f, "Invalid hex digit group '{group}' in color string")
            }
        }
    }
}

impl std::error::Error for ColorParseError {}

impl Rgba {
    /// Opaque white (`[1.0, 1.0, 1.0, 1.0]`), the glTF base-color default.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black (`[0.0, 0.0, 0.0, 1.0]`).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Creates a new `Rgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `Rgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates an `Rgba` from a `[r, g, b, a]` factor array.
    #[inline]
    pub const fn from_array(v: [f32; 4]) -> Self {
        Self {
            r: v[0],
            g: v[1],
            b: v[2],
            a: v[3],
        }
    }

    /// Converts this color to a `[r, g, b, a]` factor array.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Creates an opaque `Rgba` from a `[r, g, b]` factor array.
    #[inline]
    pub const fn from_rgb_array(v: [f32; 3]) -> Self {
        Self::rgb(v[0], v[1], v[2])
    }

    /// Converts this color to a `[r, g, b]` factor array, dropping alpha.
    #[inline]
    pub const fn to_rgb_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Parses an `Rgba` from a hex string (`#RRGGBB` or `#RRGGBBAA`).
    ///
    /// The leading `#` is optional. Components are scaled from 8-bit to
    /// `[0.0, 1.0]` with no gamma conversion. A six-digit string yields an
    /// opaque color.
    ///
    /// # Examples
    ///
    /// ```
    /// use eidolon_core::math::color::Rgba;
    /// let color = Rgba::from_hex("#6495ED").unwrap();
    /// assert_eq!(color.a, 1.0);
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorParseError::InvalidLength { len: digits.len() });
        }

        let channel = |group: &str| -> Result<f32, ColorParseError> {
            u8::from_str_radix(group, 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorParseError::InvalidDigit {
                    group: group.to_string(),
                })
        };

        let r = channel(&digits[0..2])?;
        let g = channel(&digits[2..4])?;
        let b = channel(&digits[4..6])?;
        let a = if digits.len() == 8 {
            channel(&digits[6..8])?
        } else {
            1.0
        };
        Ok(Self { r, g, b, a })
    }

    /// Formats this color as `#RRGGBB`, dropping alpha.
    ///
    /// Components are clamped to `[0.0, 1.0]` and scaled to 8-bit. This is
    /// the form color pickers display.
    pub fn to_hex_rgb(self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}",
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8
        )
    }

    /// Formats this color as `#RRGGBBAA`.
    pub fn to_hex(self) -> String {
        format!(
            "{}{:02X}",
            self.to_hex_rgb(),
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
        )
    }

    /// Returns `true` if every component is a finite number.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Returns a copy with every component clamped to `[0.0, 1.0]`,
    /// the domain of glTF factors.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Returns a new color with the same RGB components but a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linearly interpolates between two colors.
    /// The factor `t` is clamped to `[0.0, 1.0]`.
    #[inline]
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: start.r + (end.r - start.r) * t,
            g: start.g + (end.g - start.g) * t,
            b: start.b + (end.b - start.b) * t,
            a: start.a + (end.a - start.a) * t,
        }
    }
}

impl Default for Rgba {
    /// Returns opaque white, the glTF base-color factor default.
    #[inline]
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Rgba {
    #[inline]
    fn from(v: [f32; 4]) -> Self {
        Self::from_array(v)
    }
}

impl From<Rgba> for [f32; 4] {
    #[inline]
    fn from(c: Rgba) -> Self {
        c.to_array()
    }
}
