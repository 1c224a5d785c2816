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

//! Process-unique element identifiers.
//!
//! Hosts hold on to element ids across frames (an editor panel keys its
//! widgets by them), so an id must never repeat within the process, not
//! even across grafts. A single monotonic counter gives that guarantee
//! and doubles as a staleness check: a graft knows the id range it minted,
//! so anything below its floor must come from a predecessor.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ids start at 1 so that 0 never denotes a live element.
const ID_BASELINE: u64 = 1;

static NEXT_ID: AtomicU64 = AtomicU64::new(ID_BASELINE);

/// A process-unique identifier for one facade element.
///
/// Ids are minted once at element construction and never reused. They stay
/// meaningful only as long as the graft that minted them is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mints the next element id.
///
/// Relaxed ordering suffices: the counter carries no other state, and
/// uniqueness only needs atomicity of the increment.
pub fn next_element_id() -> ElementId {
    ElementId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Returns the id the next call to [`next_element_id`] will mint, without
/// consuming it. Grafts record this as their id floor.
pub(crate) fn peek_next_id() -> ElementId {
    ElementId(NEXT_ID.load(Ordering::Relaxed))
}

/// Resets the counter to its baseline.
///
/// Exists solely so host test suites can isolate id expectations from one
/// another. Calling this while any graft is alive breaks the uniqueness
/// guarantee.
#[doc(hidden)]
pub fn reset_element_ids() {
    NEXT_ID.store(ID_BASELINE, Ordering::Relaxed);
}
