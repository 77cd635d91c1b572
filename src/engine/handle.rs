//! Entity handle codec.
//!
//! An entity is an opaque, versioned identifier packed into a single
//! integer word:
//!
//! ```text
//! | index | version |
//! ```
//!
//! - **Index** — slot within the entity table, stored in the high bits.
//! - **Version** — generation counter, stored in the low bits; incremented
//!   on removal to invalidate stale handles.
//!
//! Unlike a compile-time bit split, the split here is a runtime value: a
//! [`HandleLayout`] carries the two widths and performs all encoding and
//! decoding. Encoding never fails — out-of-range inputs are silently masked
//! to their field width. Layout construction is the only fallible step.

use crate::engine::error::ConfigError;
use crate::engine::types::{Bits, EntityID, HandleKind};


/// Opaque, versioned identifier for an ECS entity.
///
/// ## Invariants
/// - Two entities with the same index but different versions are distinct.
/// - An entity is alive iff the entity table holds this exact encoded word
///   at the slot the handle's index names.
///
/// ## Notes
/// `Entity` values are cheap to copy and compare; equality compares the
/// full encoded word. Decoding requires the [`HandleLayout`] that produced
/// the handle.

#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Entity(pub EntityID);

#[inline]
const fn mask(bits: Bits) -> EntityID {
    if bits == 0 { 0 } else if bits >= 64 { EntityID::MAX } else { ((1 as EntityID) << bits) - 1 }
}

/// Runtime bit split of an entity handle.
///
/// ## Purpose
/// Packs `(index, version)` into one word and extracts them back. The split
/// is chosen per entity table: small worlds use narrow layouts whose encoded
/// words fit 32-bit cells, large worlds use up to the full 64 bits.
///
/// ## Presets
/// - [`HandleLayout::SMALL`] — 12 index / 4 version bits (16-bit word).
/// - [`HandleLayout::MEDIUM`] — 20 index / 12 version bits (32-bit word).
/// - [`HandleLayout::LARGE`] — 32 index / 32 version bits (64-bit word).
///
/// ## Invariants
/// - Both widths are positive and their sum is at most 64.
/// - `invalid_index()` is never issued as a live slot index.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandleLayout {
    index_bits: Bits,
    version_bits: Bits,
}

impl HandleLayout {
    /// 12 index bits, 4 version bits.
    pub const SMALL: HandleLayout = HandleLayout { index_bits: 12, version_bits: 4 };

    /// 20 index bits, 12 version bits.
    pub const MEDIUM: HandleLayout = HandleLayout { index_bits: 20, version_bits: 12 };

    /// 32 index bits, 32 version bits.
    pub const LARGE: HandleLayout = HandleLayout { index_bits: 32, version_bits: 32 };

    /// Builds a custom layout.
    ///
    /// ## Errors
    /// Fails with `ConfigError::HandleBits` if either width is zero or the
    /// total exceeds 64 bits.
    pub fn new(index_bits: Bits, version_bits: Bits) -> Result<Self, ConfigError> {
        if index_bits == 0 || version_bits == 0 || index_bits as u16 + version_bits as u16 > 64 {
            return Err(ConfigError::HandleBits { index_bits, version_bits });
        }
        Ok(Self { index_bits, version_bits })
    }

    /// Returns the index field width.
    #[inline] pub fn index_bits(&self) -> Bits { self.index_bits }

    /// Returns the version field width.
    #[inline] pub fn version_bits(&self) -> Bits { self.version_bits }

    /// Returns the total encoded width.
    #[inline] pub fn total_bits(&self) -> Bits { self.index_bits + self.version_bits }

    /// Returns the word width class of this layout.
    #[inline]
    pub fn kind(&self) -> HandleKind {
        if self.total_bits() <= 32 { HandleKind::Small } else { HandleKind::Big }
    }

    /// Mask selecting the index field after shifting.
    #[inline] pub fn index_mask(&self) -> EntityID { mask(self.index_bits) }

    /// Mask selecting the version field.
    #[inline] pub fn version_mask(&self) -> EntityID { mask(self.version_bits) }

    /// Reserved index value; never a valid slot, terminates the free list.
    #[inline] pub fn invalid_index(&self) -> u64 { self.index_mask() }

    /// Largest representable version.
    #[inline] pub fn max_version(&self) -> u64 { self.version_mask() }

    /// Packs `(index, version)` into a handle.
    ///
    /// Each field is masked to its width; out-of-range inputs lose their
    /// high bits silently. Never fails, never allocates.
    #[inline]
    pub fn make(&self, index: u64, version: u64) -> Entity {
        Entity(((index & self.index_mask()) << self.version_bits) | (version & self.version_mask()))
    }

    /// Extracts the slot index of a handle.
    #[inline]
    pub fn index_of(&self, entity: Entity) -> u64 {
        (entity.0 >> self.version_bits) & self.index_mask()
    }

    /// Extracts the version of a handle.
    #[inline]
    pub fn version_of(&self, entity: Entity) -> u64 {
        entity.0 & self.version_mask()
    }
}
