//! # Component Store
//!
//! A [`Store<T>`] pairs a [`SparseSet`] index with a packed payload array:
//! `payload[i]` belongs to the entity at dense position `i`. Tag stores
//! ([`StoreKind::Empty`]) carry the index only and reject every payload
//! operation at the boundary — one type with a kind branch, not two types.
//!
//! ## Invariants
//! - For standard stores, `payload.len()` always equals the index length,
//!   and every index mutation that moves positions (swap-remove, swap,
//!   payload sort) is mirrored in the payload array in the same step.
//! - Payload capacity never falls behind the index's dense capacity after
//!   a `reserve`.
//!
//! The [`ErasedStore`] trait is the registry's type-erased view: enough
//! surface to purge entities, inspect membership, and route dynamically
//! typed insertions, with `as_any` downcasting recovering the concrete
//! store.

use std::any::{type_name, Any, TypeId};
use std::cmp::Ordering;

use crate::engine::error::{ConfigError, KindMismatchError, StoreError, TypeMismatchError};
use crate::engine::handle::Entity;
use crate::engine::sparse::{SparseIter, SparseSet};
use crate::engine::types::{SparseConfig, StoreKind};


/// Type-erased view of a component store, as held by the registry.
pub trait ErasedStore: Any {
    /// Returns the store's kind.
    fn kind(&self) -> StoreKind;

    /// Returns the number of entities in the store.
    fn len(&self) -> usize;

    /// Returns `true` if the entity holds a component in this store.
    fn contains(&self, entity: Entity) -> bool;

    /// Removes the entity's component if present; `false` when absent.
    fn purge(&mut self, entity: Entity) -> bool;

    /// Returns the present entities in dense order.
    fn entities(&self) -> Vec<Entity>;

    /// Returns the element type name, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Upcasts to [`Any`] for downcasting to the concrete store.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast to [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Inserts a dynamically typed value.
    ///
    /// ## Errors
    /// `StoreError::TypeMismatch` when the boxed value is not the store's
    /// element type.
    fn add_dyn(
        &mut self,
        entity: Entity,
        value: Box<dyn Any>,
        replace: bool,
        auto_resize: bool,
    ) -> Result<Option<usize>, StoreError>;
}

/// Component store for element type `T`.
pub struct Store<T> {
    kind: StoreKind,
    index: SparseSet,
    payload: Vec<T>,
}

impl<T: 'static> Store<T> {

    /// Creates an empty store of the given kind.
    ///
    /// ## Errors
    /// Propagates configuration validation from the underlying sparse set.
    pub fn new(kind: StoreKind, config: SparseConfig) -> Result<Self, ConfigError> {
        let index = SparseSet::new(config)?;
        let payload = match kind {
            StoreKind::Standard => Vec::with_capacity(config.pool_size),
            StoreKind::Empty => Vec::new(),
        };
        Ok(Self { kind, index, payload })
    }

    /// Returns the store's kind.
    #[inline] pub fn kind(&self) -> StoreKind { self.kind }

    /// Returns the number of entities in the store.
    #[inline] pub fn len(&self) -> usize { self.index.len() }

    /// Returns `true` if the store is empty.
    #[inline] pub fn is_empty(&self) -> bool { self.index.is_empty() }

    /// Returns the dense capacity of the index.
    #[inline] pub fn capacity(&self) -> usize { self.index.capacity() }

    /// Returns `true` if the entity holds a component in this store.
    #[inline] pub fn contains(&self, entity: Entity) -> bool { self.index.contains(entity) }

    /// Returns the dense position of the entity's component, if present.
    #[inline] pub fn index_of(&self, entity: Entity) -> Option<usize> { self.index.index_of(entity) }

    /// Returns the present entities in dense order.
    pub fn data(&self) -> Vec<Entity> { self.index.data() }

    /// Returns an iterator over the present entities in dense order.
    pub fn entities(&self) -> SparseIter<'_> { self.index.iter() }

    fn require(&self, expected: StoreKind) -> Result<(), StoreError> {
        if self.kind != expected {
            return Err(StoreError::Kind(KindMismatchError { expected, actual: self.kind }));
        }
        Ok(())
    }

    /// Grows index and payload capacity in lockstep.
    ///
    /// Returns `false` unless `new_cap` is strictly greater than the
    /// current dense capacity.
    pub fn reserve(&mut self, new_cap: usize) -> bool {
        if !self.index.resize(new_cap) {
            return false;
        }
        if self.kind == StoreKind::Standard && new_cap > self.payload.capacity() {
            self.payload.reserve_exact(new_cap - self.payload.len());
        }
        true
    }

    /// Attaches `value` to `entity`, returning its dense position.
    ///
    /// ## Behavior
    /// - Membership is idempotent: if the entity is already present, its
    ///   position is returned; the payload is overwritten only when
    ///   `replace` is set.
    /// - At capacity with `auto_resize` false, returns `None`; if the index
    ///   accepted the insertion but the payload cannot grow, the index
    ///   insertion is rolled back first.
    /// - Tag stores record membership and drop the value.
    pub fn add(&mut self, entity: Entity, value: T, replace: bool, auto_resize: bool) -> Option<usize> {
        let existing = self.index.index_of(entity);
        let position = self.index.add(entity, auto_resize)?;

        if self.kind == StoreKind::Empty {
            return Some(position);
        }

        match existing {
            Some(index) => {
                if replace {
                    self.payload[index] = value;
                }
            }
            None => {
                if position >= self.payload.capacity() {
                    if !auto_resize {
                        self.index.remove(entity);
                        return None;
                    }
                    let target = (self.payload.capacity() * 2).max(position + 1);
                    self.payload.reserve_exact(target - self.payload.len());
                }
                debug_assert_eq!(position, self.payload.len());
                self.payload.push(value);
            }
        }
        Some(position)
    }

    /// Detaches the entity's component.
    ///
    /// The payload swap-remove mirrors the index swap-remove, so the last
    /// payload moves into the vacated position. Returns `false` when the
    /// entity is absent.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let Some(index) = self.index.index_of(entity) else {
            return false;
        };
        if self.kind == StoreKind::Standard {
            self.payload.swap_remove(index);
        }
        self.index.remove(entity)
    }

    /// Empties the store, dropping payloads and sparse pages.
    pub fn clear(&mut self) {
        self.payload.clear();
        self.index.clear();
    }

    /// Returns the packed payload slice over the live length.
    ///
    /// ## Errors
    /// `StoreError::Kind` for tag stores.
    pub fn payloads(&self) -> Result<&[T], StoreError> {
        self.require(StoreKind::Standard)?;
        Ok(&self.payload)
    }

    /// Returns a reference to the entity's payload.
    ///
    /// The reference aliases the store and is only valid until the next
    /// mutation of this store.
    ///
    /// ## Errors
    /// `StoreError::Missing` when absent; `StoreError::Kind` for tag stores.
    pub fn get(&self, entity: Entity) -> Result<&T, StoreError> {
        self.require(StoreKind::Standard)?;
        let index = self.index.index_of(entity).ok_or(StoreError::Missing)?;
        Ok(&self.payload[index])
    }

    /// Mutable variant of [`Store::get`].
    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T, StoreError> {
        self.require(StoreKind::Standard)?;
        let index = self.index.index_of(entity).ok_or(StoreError::Missing)?;
        Ok(&mut self.payload[index])
    }

    /// Returns the entity's payload, or `None` when absent.
    ///
    /// ## Errors
    /// `StoreError::Kind` for tag stores; absence is not an error here.
    pub fn try_get(&self, entity: Entity) -> Result<Option<&T>, StoreError> {
        self.require(StoreKind::Standard)?;
        Ok(self.index.index_of(entity).map(|index| &self.payload[index]))
    }

    /// Mutable variant of [`Store::try_get`].
    pub fn try_get_mut(&mut self, entity: Entity) -> Result<Option<&mut T>, StoreError> {
        self.require(StoreKind::Standard)?;
        Ok(self.index.index_of(entity).map(|index| &mut self.payload[index]))
    }

    /// Returns an owned copy of the entity's payload.
    ///
    /// The copy shares no mutable sub-structure with the store.
    pub fn get_cloned(&self, entity: Entity) -> Result<T, StoreError>
    where
        T: Clone,
    {
        self.get(entity).cloned()
    }

    /// Returns an owned copy of the entity's payload, or `None` when absent.
    pub fn try_get_cloned(&self, entity: Entity) -> Result<Option<T>, StoreError>
    where
        T: Clone,
    {
        Ok(self.try_get(entity)?.cloned())
    }

    /// Exchanges the payloads of two present, distinct entities.
    ///
    /// ## Behavior
    /// With `instances_only` false the index positions swap as well, so
    /// each entity keeps its own payload at a new position. With
    /// `instances_only` true only the payloads move: the (entity, payload)
    /// pairing intentionally changes.
    ///
    /// Returns `Ok(false)` when either entity is absent or `a == b`.
    ///
    /// ## Errors
    /// `StoreError::Kind` for tag stores.
    pub fn swap(&mut self, a: Entity, b: Entity, instances_only: bool) -> Result<bool, StoreError> {
        self.require(StoreKind::Standard)?;
        if a == b {
            return Ok(false);
        }
        let (Some(i), Some(j)) = (self.index.index_of(a), self.index.index_of(b)) else {
            return Ok(false);
        };
        self.payload.swap(i, j);
        if !instances_only {
            self.index.swap_dense(i, j);
        }
        Ok(true)
    }

    /// Sorts a tag store by entity, delegating to the sparse set.
    ///
    /// Returns `Ok(false)` when fewer than two entities are present.
    ///
    /// ## Errors
    /// `StoreError::Kind` for standard stores.
    pub fn sort_tags<F>(&mut self, cmp: F) -> Result<bool, StoreError>
    where
        F: FnMut(Entity, Entity) -> Ordering,
    {
        self.require(StoreKind::Empty)?;
        Ok(self.index.sort_by(cmp))
    }

    /// Sorts a standard store by payload.
    ///
    /// ## Behavior
    /// Stable insertion sort; every payload swap is paired with the
    /// corresponding dense-position swap in the index, so the (entity,
    /// payload) pairing and the sparse invariants hold throughout.
    ///
    /// Returns `Ok(false)` when fewer than two entities are present.
    ///
    /// ## Errors
    /// `StoreError::Kind` for tag stores.
    pub fn sort_by_payload<F>(&mut self, mut cmp: F) -> Result<bool, StoreError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.require(StoreKind::Standard)?;
        let length = self.len();
        if length <= 1 {
            return Ok(false);
        }

        for i in 1..length {
            let mut j = i;
            while j > 0 && cmp(&self.payload[j], &self.payload[j - 1]) == Ordering::Less {
                self.payload.swap(j, j - 1);
                self.index.swap_dense(j, j - 1);
                j -= 1;
            }
        }
        Ok(true)
    }
}

impl<T: 'static> ErasedStore for Store<T> {
    fn kind(&self) -> StoreKind { self.kind }

    fn len(&self) -> usize { Store::len(self) }

    fn contains(&self, entity: Entity) -> bool { Store::contains(self, entity) }

    fn purge(&mut self, entity: Entity) -> bool { Store::remove(self, entity) }

    fn entities(&self) -> Vec<Entity> { Store::data(self) }

    fn type_name(&self) -> &'static str { type_name::<T>() }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }

    fn add_dyn(
        &mut self,
        entity: Entity,
        value: Box<dyn Any>,
        replace: bool,
        auto_resize: bool,
    ) -> Result<Option<usize>, StoreError> {
        match value.downcast::<T>() {
            Ok(value) => Ok(self.add(entity, *value, replace, auto_resize)),
            Err(value) => Err(StoreError::TypeMismatch(TypeMismatchError {
                expected: TypeId::of::<T>(),
                actual: value.as_ref().type_id(),
            })),
        }
    }
}
