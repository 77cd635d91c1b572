//! # Entity Management
//!
//! This module defines the entity lifecycle and the generational slot table
//! used by the ECS.
//!
//! ## Purpose
//! Entities are lightweight, opaque identifiers that reference rows in
//! component storage. This module is responsible for:
//!
//! - Generating stable entity identifiers
//! - Tracking entity liveness via versioning
//! - Recycling destroyed slots without auxiliary memory
//!
//! ## Entity Model
//! An [`Entity`] is a compact, versioned handle composed of a **slot index**
//! and a **version**, packed by the table's [`HandleLayout`]. Removing an
//! entity bumps the slot's version, so every previously issued handle to
//! that slot stops validating.
//!
//! ## Free-slot list
//! The free list is embedded in the slot table itself. A freed cell stores a
//! record whose *index field* names the next free slot (or the layout's
//! invalid index for end-of-list) and whose *version field* holds the
//! version the next handle issued from that slot will carry. Allocation pops
//! the head; removal pushes the freed slot. No auxiliary memory.
//!
//! ## Invariants
//! - A live slot `i` holds a handle whose decoded index equals `i`.
//! - An entity is alive iff its index is below the append cursor and the
//!   table holds its exact encoded word.
//! - The free chain is acyclic and terminates at the invalid index.
//! - Versions never decrease; recycling increments by one. A slot whose
//!   version has reached the layout maximum is retired rather than
//!   recycled, so a fresh handle can never alias a stale one.
//!
//! ## Concurrency
//! Single mutator, no internal synchronization.

use tracing::trace;

use crate::engine::error::{CapacityError, ConfigError, EntityError, StaleEntityError};
use crate::engine::handle::{Entity, HandleLayout};
use crate::engine::storage::DenseBuffer;
use crate::engine::types::EntityConfig;


/// Generational entity slot table.
///
/// ## Design
/// - Slots are allocated from the intrusive free list, then by appending.
/// - The table doubles when full, if configured resizable.
/// - Storage is dense and index-addressable via a [`DenseBuffer`], so the
///   table itself is a flat array of encoded words.
///
/// ## Invariants
/// - `append_index` never exceeds the layout's invalid index.
/// - `free_slot` is either the invalid index or a freed slot below
///   `append_index`.

pub struct EntityStore {
    layout: HandleLayout,
    slots: DenseBuffer,
    append_index: u64,
    free_slot: u64,
    live: usize,
    resizable: bool,
}

impl EntityStore {

    /// Creates an empty table from a validated configuration.
    ///
    /// The initial capacity is clamped to the layout's representable slot
    /// range.
    ///
    /// ## Errors
    /// Propagates `ConfigError::Capacity` for a zero capacity.
    pub fn new(config: EntityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = config.layout;
        let capacity = config.capacity.min(layout.invalid_index() as usize);
        Ok(Self {
            layout,
            slots: DenseBuffer::new(config.typed, layout.kind(), capacity),
            append_index: 0,
            free_slot: layout.invalid_index(),
            live: 0,
            resizable: config.resizable,
        })
    }

    /// Returns the number of live entities.
    #[inline] pub fn len(&self) -> usize { self.live }

    /// Returns `true` if no entity is live.
    #[inline] pub fn is_empty(&self) -> bool { self.live == 0 }

    /// Returns the current slot capacity.
    #[inline] pub fn capacity(&self) -> usize { self.slots.capacity() }

    /// Returns the handle layout this table encodes with.
    #[inline] pub fn layout(&self) -> HandleLayout { self.layout }

    /// Allocates a new entity.
    ///
    /// ## Behavior
    /// - Pops the free list first: the freed record supplies both the next
    ///   list head and the version to issue.
    /// - Otherwise appends at the cursor, doubling the table when full.
    ///
    /// ## Errors
    /// - `EntityError::OutOfHandles` once the cursor reaches the layout's
    ///   invalid index — every representable slot has been handed out.
    /// - `EntityError::Capacity` when the table is full and not resizable.
    ///
    /// ## Invariants
    /// The returned entity is alive upon success.
    pub fn create(&mut self) -> Result<Entity, EntityError> {
        if self.free_slot != self.layout.invalid_index() {
            let slot = self.free_slot;
            let freed = Entity(self.slots.read(slot as usize));
            let next = self.layout.index_of(freed);
            let version = self.layout.version_of(freed);

            let handle = self.layout.make(slot, version);
            self.slots.write(slot as usize, handle.0);
            self.free_slot = next;
            self.live += 1;
            return Ok(handle);
        }

        if self.append_index >= self.layout.invalid_index() {
            return Err(EntityError::OutOfHandles { capacity: self.layout.invalid_index() });
        }

        let capacity = self.slots.capacity() as u64;
        if self.append_index == capacity {
            if !self.resizable {
                return Err(EntityError::Capacity(CapacityError {
                    needed: self.append_index + 1,
                    capacity,
                }));
            }
            let target = ((capacity as usize) * 2).min(self.layout.invalid_index() as usize);
            trace!(old_capacity = capacity, new_capacity = target as u64, "growing entity table");
            self.slots.grow(target);
        }

        let handle = self.layout.make(self.append_index, 0);
        self.slots.write(self.append_index as usize, handle.0);
        self.append_index += 1;
        self.live += 1;
        Ok(handle)
    }

    /// Returns `true` if the entity is alive and not stale.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = self.layout.index_of(entity);
        slot < self.append_index && self.slots.read(slot as usize) == entity.0
    }

    /// Destroys an entity and invalidates its handle.
    ///
    /// ## Behavior
    /// - Writes the freed record (next free slot, bumped version) into the
    ///   cell and links it at the head of the free list.
    /// - A slot whose version has reached the layout maximum is retired:
    ///   marked dead but never linked, so it is not reused.
    ///
    /// ## Errors
    /// `EntityError::Stale` if the entity is not alive.
    ///
    /// ## Invariants
    /// All previously issued handles for this slot become invalid.
    pub fn remove(&mut self, entity: Entity) -> Result<(), EntityError> {
        if !self.is_alive(entity) {
            return Err(EntityError::Stale(StaleEntityError));
        }

        let slot = self.layout.index_of(entity);
        let version = self.layout.version_of(entity);

        if version == self.layout.max_version() {
            // Retired: dead, off the free list.
            let record = self.layout.make(self.layout.invalid_index(), version);
            self.slots.write(slot as usize, record.0);
        } else {
            let record = self.layout.make(self.free_slot, version + 1);
            self.slots.write(slot as usize, record.0);
            self.free_slot = slot;
        }
        self.live -= 1;
        Ok(())
    }

    /// Returns an iterator over live entities in slot order.
    pub fn iter(&self) -> EntityIter<'_> {
        EntityIter { store: self, slot: 0 }
    }
}

/// Position-plus-container iterator over live entities.
///
/// Skips cells whose stored word does not decode back to the cell's own
/// slot — freed and retired records never do. Aliases the store; mutation
/// invalidates in-flight iteration semantics.
pub struct EntityIter<'a> {
    store: &'a EntityStore,
    slot: u64,
}

impl<'a> EntityIter<'a> {
    /// Rewinds the iterator to slot zero.
    pub fn reset(&mut self) {
        self.slot = 0;
    }
}

impl<'a> Iterator for EntityIter<'a> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        while self.slot < self.store.append_index {
            let slot = self.slot;
            self.slot += 1;

            let stored = Entity(self.store.slots.read(slot as usize));
            if self.store.layout.index_of(stored) == slot {
                return Some(stored);
            }
        }
        None
    }
}
