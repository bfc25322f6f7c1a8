//! Opaque identifiers for registered objects and their fire effects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of an object registered with the simulation.
///
/// Handles are unique per simulation and never reused, so a stale handle
/// held by a host after removal simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityHandle(u32);

impl EntityHandle {
    /// Wrap a raw handle value (e.g. one received over FFI)
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        EntityHandle(raw)
    }

    /// Raw handle value
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a single fire effect instance.
///
/// A new id is minted every time an entity starts burning, which lets
/// suppression contacts that arrive after the effect was destroyed be
/// recognised and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(u32);

impl EffectId {
    /// Wrap a raw effect id
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        EffectId(raw)
    }

    /// Raw id value
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fx{}", self.0)
    }
}
