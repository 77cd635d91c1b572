//! # Sparse Set
//!
//! This module defines the paged sparse→dense index used by every component
//! store.
//!
//! ## Purpose
//! A sparse set maps an entity's slot index to a position inside a packed
//! dense array of entity ids, giving O(1) membership, insertion, and
//! deletion while keeping iteration cache-local. This module is responsible
//! for:
//!
//! - Paged, lazily allocated sparse lookup cells
//! - The packed dense array of present entities
//! - Swap-with-last removal and explicit position swaps
//! - Sorting the dense prefix with sparse-cell rebuild
//!
//! ## Structure
//! Two correlated structures:
//!
//! - **Sparse**: a sequence of pages; each page is `page_size` cells holding
//!   a dense index or [`TOMBSTONE`]. A page is only allocated once an entity
//!   whose slot index lands in it is inserted, bounding memory by pages
//!   touched rather than by the largest index seen.
//! - **Dense**: a packed [`DenseBuffer`] of encoded entity ids of length
//!   `len`.
//!
//! ## Invariants
//! - For every `i < len`: the sparse cell of `dense[i]`'s slot index is `i`.
//! - A sparse cell counts as set only when it is not [`TOMBSTONE`] **and**
//!   strictly below `len`; stale cells left behind by [`SparseSet::reset`]
//!   therefore read as absent.
//! - `remove` swaps the last dense entry into the vacated position and
//!   repoints its sparse cell before tombstoning the removed entity's cell.
//!
//! ## Concurrency
//! Single mutator, no internal synchronization. Iterators alias the set and
//! are invalidated by any mutation.

use std::cmp::Ordering;

use crate::engine::handle::{Entity, HandleLayout};
use crate::engine::storage::DenseBuffer;
use crate::engine::types::{SparseConfig, TOMBSTONE};
use crate::engine::error::ConfigError;


/// Paged sparse→dense entity index.
///
/// ## Design
/// - The sparse side is paged: `page = slot / page_size`,
///   `offset = slot & (page_size - 1)`; `page_size` is validated to be a
///   power of two so the offset reduces to a mask.
/// - The dense side is a [`DenseBuffer`]: a fixed-width word buffer or a
///   growable sequence, per configuration.
/// - Removal is swap-with-last; positional order is only guaranteed up to
///   the swaps induced by `remove`, `swap`, and `sort_by`.
///
/// ## Status reporting
/// Benign failures (absent entity, exhausted capacity with growth declined,
/// sorting one element) report through `bool` / `Option` returns; only
/// construction validates and errors.

pub struct SparseSet {
    layout: HandleLayout,
    page_size: usize,
    pool_size: usize,
    pages: Vec<Option<Box<[usize]>>>,
    dense: DenseBuffer,
    len: usize,
}

impl SparseSet {

    /// Creates an empty set from a validated configuration.
    ///
    /// ## Errors
    /// Propagates `ConfigError::PageSize` for a page size that is not a
    /// power of two of at least the documented minimum.
    pub fn new(config: SparseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            layout: config.layout,
            page_size: config.page_size,
            pool_size: config.pool_size,
            pages: Vec::new(),
            dense: DenseBuffer::new(config.typed, config.layout.kind(), config.pool_size),
            len: 0,
        })
    }

    /// Returns the number of entities currently present.
    #[inline] pub fn len(&self) -> usize { self.len }

    /// Returns `true` if no entity is present.
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Returns the dense capacity.
    #[inline] pub fn capacity(&self) -> usize { self.dense.capacity() }

    /// Returns the number of sparse pages currently allocated.
    pub fn page_count(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    /// Returns the handle layout this set decodes with.
    #[inline] pub fn layout(&self) -> HandleLayout { self.layout }

    #[inline]
    fn slot_of(&self, entity: Entity) -> usize {
        self.layout.index_of(entity) as usize
    }

    /// Raw sparse cell for `entity`, if its page exists.
    #[inline]
    fn cell(&self, entity: Entity) -> Option<usize> {
        let slot = self.slot_of(entity);
        let page = self.pages.get(slot / self.page_size)?.as_ref()?;
        Some(page[slot & (self.page_size - 1)])
    }

    /// Writes `value` into the sparse cell for `slot`, allocating the page
    /// on first touch.
    fn set_cell(&mut self, slot: usize, value: usize) {
        let page_index = slot / self.page_size;
        let offset = slot & (self.page_size - 1);
        if page_index >= self.pages.len() {
            self.pages.resize_with(page_index + 1, || None);
        }
        let page_size = self.page_size;
        let page = self.pages[page_index]
            .get_or_insert_with(|| vec![TOMBSTONE; page_size].into_boxed_slice());
        page[offset] = value;
    }

    /// Returns `true` if `entity` is present.
    ///
    /// A cell past the current length reads as absent; `reset` relies on
    /// this.
    pub fn contains(&self, entity: Entity) -> bool {
        matches!(self.cell(entity), Some(cell) if cell != TOMBSTONE && cell < self.len)
    }

    /// Returns the dense position of `entity`, if present.
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        self.cell(entity).filter(|&cell| cell != TOMBSTONE && cell < self.len)
    }

    /// Returns the entity at dense position `index`, if in range.
    pub fn get(&self, index: usize) -> Option<Entity> {
        if index < self.len { Some(Entity(self.dense.read(index))) } else { None }
    }

    /// Inserts `entity`, returning its dense position.
    ///
    /// ## Behavior
    /// - Idempotent: a present entity's current position is returned and
    ///   nothing changes.
    /// - At capacity with `auto_resize` false, returns `None`.
    /// - Growth doubles the dense capacity, with the configured pool size
    ///   as the floor when starting from zero.
    /// - The sparse page is allocated lazily on first touch.
    pub fn add(&mut self, entity: Entity, auto_resize: bool) -> Option<usize> {
        if let Some(index) = self.index_of(entity) {
            return Some(index);
        }

        if self.len == self.dense.capacity() {
            if !auto_resize {
                return None;
            }
            let target = (self.dense.capacity() * 2).max(self.pool_size).max(1);
            self.dense.grow(target);
        }

        let slot = self.slot_of(entity);
        self.set_cell(slot, self.len);
        self.dense.write(self.len, entity.0);
        self.len += 1;
        Some(self.len - 1)
    }

    /// Removes `entity` by swap-with-last.
    ///
    /// ## Behavior
    /// The last dense entry moves into the vacated position and its sparse
    /// cell is repointed; every other entity keeps its position. The removed
    /// entity's cell is tombstoned.
    ///
    /// Returns `false` if `entity` is not present.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let Some(index) = self.index_of(entity) else {
            return false;
        };

        let last = self.len - 1;
        if index != last {
            let moved = self.dense.read(last);
            self.dense.write(index, moved);
            let moved_slot = self.layout.index_of(Entity(moved)) as usize;
            self.set_cell(moved_slot, index);
        }

        let slot = self.slot_of(entity);
        self.set_cell(slot, TOMBSTONE);
        self.len = last;
        true
    }

    /// Exchanges the dense positions of two present, distinct entities.
    ///
    /// All other entries keep their positions. Returns `false` if either
    /// entity is absent or the two are equal.
    pub fn swap(&mut self, a: Entity, b: Entity) -> bool {
        if a == b {
            return false;
        }
        let (Some(i), Some(j)) = (self.index_of(a), self.index_of(b)) else {
            return false;
        };
        self.swap_dense(i, j);
        true
    }

    /// Exchanges two dense positions and repoints both sparse cells.
    pub(crate) fn swap_dense(&mut self, i: usize, j: usize) {
        debug_assert!(i < self.len && j < self.len);
        let (a, b) = (self.dense.read(i), self.dense.read(j));
        self.dense.write(i, b);
        self.dense.write(j, a);
        let slot_a = self.layout.index_of(Entity(a)) as usize;
        let slot_b = self.layout.index_of(Entity(b)) as usize;
        self.set_cell(slot_a, j);
        self.set_cell(slot_b, i);
    }

    /// Sorts the dense prefix by `cmp` and rebuilds the sparse cells.
    ///
    /// ## Behavior
    /// `cmp` must be a total order; stability is not guaranteed. After the
    /// sort, the sparse side is rebuilt by walking the dense array and
    /// writing each position back.
    ///
    /// Returns `false` when fewer than two entities are present.
    pub fn sort_by<F>(&mut self, mut cmp: F) -> bool
    where
        F: FnMut(Entity, Entity) -> Ordering,
    {
        if self.len <= 1 {
            return false;
        }

        let mut order: Vec<u64> = (0..self.len).map(|i| self.dense.read(i)).collect();
        order.sort_unstable_by(|&a, &b| cmp(Entity(a), Entity(b)));

        for (index, &word) in order.iter().enumerate() {
            self.dense.write(index, word);
            let slot = self.layout.index_of(Entity(word)) as usize;
            self.set_cell(slot, index);
        }
        true
    }

    /// Grows the dense capacity to `new_cap`.
    ///
    /// Returns `false` unless `new_cap` is strictly greater than the
    /// current capacity. Newly uncovered cells hold the dense default.
    pub fn resize(&mut self, new_cap: usize) -> bool {
        if new_cap <= self.dense.capacity() {
            return false;
        }
        self.dense.grow(new_cap);
        true
    }

    /// Drops every sparse page and empties the set.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.len = 0;
    }

    /// Empties the set but keeps pages allocated for reuse.
    ///
    /// Stale cells remain in place; the `< len` membership check makes them
    /// read as absent.
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Returns the present entities in dense order.
    pub fn data(&self) -> Vec<Entity> {
        (0..self.len).map(|i| Entity(self.dense.read(i))).collect()
    }

    /// Returns an iterator over the present entities in dense order.
    pub fn iter(&self) -> SparseIter<'_> {
        SparseIter { set: self, position: 0 }
    }
}

/// Position-plus-container iterator over a sparse set's dense array.
///
/// Aliases the set; any mutation of the set invalidates in-flight
/// iteration semantics.
pub struct SparseIter<'a> {
    set: &'a SparseSet,
    position: usize,
}

impl<'a> SparseIter<'a> {
    /// Rewinds the iterator to the first dense position.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl<'a> Iterator for SparseIter<'a> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let entity = self.set.get(self.position)?;
        self.position += 1;
        Some(entity)
    }
}
