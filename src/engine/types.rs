//! Core Types, Identifiers, and Configuration
//!
//! This module defines the **fundamental types, sentinels, and configuration
//! structures** shared across the ECS core. These definitions form the
//! *semantic backbone* of the system and are used by the handle codec, the
//! entity store, the sparse sets, the component stores, and the registry.
//!
//! ## Design Philosophy
//!
//! The core is designed around:
//!
//! - **Packed entity identifiers** — an index and a generation share one word,
//! - **Dense storage** — packed arrays indexed through paged sparse tables,
//! - **Stable numeric sentinels** — explicit tombstones instead of wrappers,
//! - **Plain, copyable configuration** — no builders, no hidden state.
//!
//! ## Entity Representation
//!
//! Entities are encoded as a packed integer with the following layout:
//!
//! ```text
//! | index | version |
//! ```
//!
//! - **Index** identifies the slot within the entity table.
//! - **Version** enables stale-entity detection after removal.
//!
//! The bit split is configured at runtime through
//! [`HandleLayout`](crate::engine::handle::HandleLayout); encoded values always
//! travel as [`EntityID`] words regardless of the configured width.
//!
//! ## Component Kinds
//!
//! Component stores come in two kinds: [`StoreKind::Standard`] stores carry a
//! packed payload array in lockstep with their index, while
//! [`StoreKind::Empty`] (tag) stores carry identity only and reject payload
//! access at the boundary.
//!
//! ## Configuration
//!
//! [`EntityConfig`], [`StoreConfig`], and [`SparseConfig`] are small `Copy`
//! structs with `Default` impls matching the documented defaults. Validation
//! is explicit: misconfiguration surfaces as
//! [`ConfigError`](crate::engine::error::ConfigError), never as a panic.

use crate::engine::error::ConfigError;
use crate::engine::handle::HandleLayout;


/// Bit-width type used for handle layout calculations.
pub type Bits = u8;

/// Encoded entity identifier word.
///
/// Always 64 bits wide in memory; layouts whose total width is 32 bits or
/// less are stored in 32-bit cells inside typed dense buffers.
pub type EntityID = u64;

/// Sentinel stored in a sparse cell to mark explicit absence.
pub const TOMBSTONE: usize = usize::MAX;

/// Default entity-table capacity.
pub const DEFAULT_CAPACITY: usize = 1000;
/// Default initial dense capacity of a sparse set.
pub const DEFAULT_POOL_SIZE: usize = 100;
/// Default sparse-page size, in cells.
pub const DEFAULT_PAGE_SIZE: usize = 1024;
/// Smallest accepted sparse-page size.
pub const MIN_PAGE_SIZE: usize = 128;

/// Word width class of a handle layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleKind {
    /// Total width of 32 bits or less; encodable in a 32-bit cell.
    Small,
    /// Total width above 32 bits; requires a 64-bit cell.
    Big,
}

/// Kind of a component store, fixed at first registration.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Payload-bearing store: a packed payload array mirrors the index.
    Standard = 0b01,
    /// Tag store: membership only, no payload storage.
    Empty = 0b10,
}

/// Configuration of the generational entity table.
///
/// ## Fields
/// - `layout`: handle codec used to encode slots and versions.
/// - `capacity`: initial slot capacity; must be positive.
/// - `resizable`: whether the table doubles when full.
/// - `typed`: fixed-width cell buffer vs. growable sequence.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityConfig {
    /// Handle codec for this table.
    pub layout: HandleLayout,

    /// Initial slot capacity.
    pub capacity: usize,

    /// Whether the table may grow past `capacity`.
    pub resizable: bool,

    /// Fixed-width cell buffer (`true`) or growable sequence (`false`).
    pub typed: bool,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            layout: HandleLayout::MEDIUM,
            capacity: DEFAULT_CAPACITY,
            resizable: true,
            typed: true,
        }
    }
}

impl EntityConfig {
    /// Checks the configuration for structural validity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Capacity { capacity: self.capacity });
        }
        Ok(())
    }
}

/// Configuration of a component store.
///
/// `replace` and `resize` are behavioral defaults forwarded into `add`;
/// the remaining fields size the underlying sparse set.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Fixed-width dense cells (`true`) or growable sequence (`false`).
    pub typed: bool,

    /// Initial dense capacity of the store's index.
    pub pool_size: usize,

    /// Sparse-page size; power of two, at least [`MIN_PAGE_SIZE`].
    pub page_size: usize,

    /// Whether re-adding a present component overwrites its payload.
    pub replace: bool,

    /// Whether the store grows automatically when full.
    pub resize: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            typed: true,
            pool_size: DEFAULT_POOL_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            replace: true,
            resize: true,
        }
    }
}

/// Configuration of a sparse set.
///
/// Usually derived from a [`StoreConfig`] plus the registry's handle layout;
/// standalone sparse sets take it directly.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SparseConfig {
    /// Handle codec used to decode entity indices.
    pub layout: HandleLayout,

    /// Sparse-page size; power of two, at least [`MIN_PAGE_SIZE`].
    pub page_size: usize,

    /// Initial dense capacity; also the regrow floor when starting from zero.
    pub pool_size: usize,

    /// Fixed-width dense cells (`true`) or growable sequence (`false`).
    pub typed: bool,
}

impl Default for SparseConfig {
    fn default() -> Self {
        Self {
            layout: HandleLayout::MEDIUM,
            page_size: DEFAULT_PAGE_SIZE,
            pool_size: DEFAULT_POOL_SIZE,
            typed: true,
        }
    }
}

impl SparseConfig {
    /// Checks the configuration for structural validity.
    ///
    /// The page size must be a power of two no smaller than
    /// [`MIN_PAGE_SIZE`]; the offset arithmetic relies on it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.page_size.is_power_of_two() || self.page_size < MIN_PAGE_SIZE {
            return Err(ConfigError::PageSize { page_size: self.page_size });
        }
        Ok(())
    }
}
