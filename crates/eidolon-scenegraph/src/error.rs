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

//! Defines the error type for facade operations.

use crate::id::ElementId;
use std::fmt;

/// An error produced by a facade mutation or editor-session lookup.
///
/// Plain query APIs signal misses as `None` or an empty slice; this type
/// only appears on `Result`-typed entry points. Every variant is reported
/// before anything is written, so a returned error means document and
/// runtime instances are both untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneGraphError {
    /// A name or index that a mutation needs did not resolve.
    LookupMiss {
        /// What was being resolved (e.g. `"material"`, `"variant"`).
        what: &'static str,
        /// The key that failed to resolve.
        key: String,
    },
    /// A caller-supplied value was rejected by validation.
    InvalidValue {
        /// The property the value was destined for.
        property: &'static str,
        /// The rejected value, rendered for diagnostics.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// An element id minted by a predecessor graft was used after reload.
    StaleElement {
        /// The stale id.
        id: ElementId,
    },
}

impl SceneGraphError {
    /// Shorthand for [`SceneGraphError::LookupMiss`].
    pub fn lookup_miss(what: &'static str, key: impl fmt::Display) -> Self {
        SceneGraphError::LookupMiss {
            what,
            key: key.to_string(),
        }
    }

    /// Shorthand for [`SceneGraphError::InvalidValue`].
    pub fn invalid_value(
        property: &'static str,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        SceneGraphError::InvalidValue {
            property,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SceneGraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneGraphError::LookupMiss { what, key } => {
                write!(f, "No {what} found for key '{key}'")
            }
            SceneGraphError::InvalidValue {
                property,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{value}' for {property}: {reason}")
            }
            SceneGraphError::StaleElement { id } => {
                write!(
                    f,
                    "Element {id} belongs to a discarded graft and is no longer addressable"
                )
            }
        }
    }
}

impl std::error::Error for SceneGraphError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_display() {
        let err = SceneGraphError::lookup_miss("variant", "Chrome");
        assert_eq!(format!("{err}"), "No variant found for key 'Chrome'");
    }

    #[test]
    fn invalid_value_display() {
        let err = SceneGraphError::invalid_value(
            "baseColorFactor",
            "[NaN, 0.0, 0.0, 1.0]",
            "components must be finite",
        );
        assert_eq!(
            format!("{err}"),
            "Invalid value '[NaN, 0.0, 0.0, 1.0]' for baseColorFactor: components must be finite"
        );
    }

    #[test]
    fn stale_element_display() {
        let err = SceneGraphError::StaleElement { id: ElementId(7) };
        assert_eq!(
            format!("{err}"),
            "Element #7 belongs to a discarded graft and is no longer addressable"
        );
    }
}
