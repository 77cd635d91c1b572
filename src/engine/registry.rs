//! # Registry
//!
//! This module provides the registry that composes the entity table with one
//! component store per registered payload type and exposes the unified
//! entity/component API.
//!
//! ## Purpose
//! The registry decouples component type information (`TypeId`, name) from
//! runtime storage: stores are held type-erased behind [`ErasedStore`] and
//! recovered by downcast, so a single map routes every typed operation.
//!
//! ## Design
//! - Stores are keyed by `TypeId` — stable, collision-free identity.
//! - A store is created on first `prepare` for its type; the kind given at
//!   first registration is fixed, later kinds are ignored.
//! - `destroy` purges the entity from every store (in no particular order)
//!   before freeing its slot, and is the API's single silent no-op on a
//!   dead handle.
//!
//! ## Invariants
//! - Every map entry holds a store created for exactly that `TypeId`.
//! - No store holds an entity the table considers dead, except transiently
//!   inside `destroy`.

use std::any::{type_name, Any, TypeId};
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::engine::entity::{EntityIter, EntityStore};
use crate::engine::error::{ConfigError, ECSError, ECSResult};
use crate::engine::handle::Entity;
use crate::engine::store::{ErasedStore, Store};
use crate::engine::types::{EntityConfig, SparseConfig, StoreConfig, StoreKind};


/// Factory producing an empty type-erased store for a component type.
type StoreFactory = fn(StoreKind, SparseConfig) -> Result<Box<dyn ErasedStore>, ConfigError>;

fn erased_store<T: 'static>(
    kind: StoreKind,
    config: SparseConfig,
) -> Result<Box<dyn ErasedStore>, ConfigError> {
    Ok(Box::new(Store::<T>::new(kind, config)?))
}

struct BundleEntry {
    type_id: TypeId,
    type_name: &'static str,
    kind: StoreKind,
    value: Box<dyn Any>,
    factory: StoreFactory,
}

/// Heterogeneous list of component values for a single entity.
///
/// Each `insert` records the component type, the kind its store should be
/// registered under, the boxed value, and a factory able to build the store
/// if it does not exist yet. Consumed by [`Registry::add_bundle`].
#[derive(Default)]
pub struct Bundle {
    entries: Vec<BundleEntry>,
}

impl Bundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bundle holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a component value.
    pub fn insert<T: 'static>(&mut self, kind: StoreKind, value: T) {
        self.entries.push(BundleEntry {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            kind,
            value: Box::new(value),
            factory: erased_store::<T>,
        });
    }
}

/// Owner of the entity table and all component stores.
pub struct Registry {
    entities: EntityStore,
    stores: HashMap<TypeId, Box<dyn ErasedStore>>,
    store_defaults: StoreConfig,
    entity_defaults: EntityConfig,
}

impl Registry {

    /// Creates a registry with default entity and store configuration.
    pub fn new() -> ECSResult<Self> {
        Self::with_config(EntityConfig::default(), StoreConfig::default())
    }

    /// Creates a registry with explicit defaults for both sub-configs.
    ///
    /// The entity configuration's handle layout is also the layout every
    /// component store decodes with.
    pub fn with_config(entity: EntityConfig, store: StoreConfig) -> ECSResult<Self> {
        Ok(Self {
            entities: EntityStore::new(entity)?,
            stores: HashMap::new(),
            store_defaults: store,
            entity_defaults: entity,
        })
    }

    fn sparse_config(&self, config: StoreConfig) -> SparseConfig {
        SparseConfig {
            layout: self.entity_defaults.layout,
            page_size: config.page_size,
            pool_size: config.pool_size,
            typed: config.typed,
        }
    }

    /// Returns the stored component-store defaults.
    pub fn store_defaults(&self) -> StoreConfig {
        self.store_defaults
    }

    /// Returns the store for `T`, creating it with default configuration.
    ///
    /// Idempotent; see [`Registry::prepare_with`].
    pub fn prepare<T: 'static>(&mut self, kind: StoreKind) -> ECSResult<&mut Store<T>> {
        let defaults = self.store_defaults;
        self.prepare_with::<T>(kind, defaults)
    }

    /// Returns the store for `T`, creating it under `kind` and `config` on
    /// first registration.
    ///
    /// ## Behavior
    /// The kind and configuration are fixed when the store is first
    /// created; later calls return the existing store and ignore both
    /// arguments.
    ///
    /// ## Errors
    /// Propagates configuration validation when the store is created.
    pub fn prepare_with<T: 'static>(
        &mut self,
        kind: StoreKind,
        config: StoreConfig,
    ) -> ECSResult<&mut Store<T>> {
        let sparse = self.sparse_config(config);
        let slot = match self.stores.entry(TypeId::of::<T>()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let store = Store::<T>::new(kind, sparse)?;
                debug!(component = type_name::<T>(), kind = ?kind, "registered component store");
                entry.insert(Box::new(store))
            }
        };
        Ok(slot
            .as_any_mut()
            .downcast_mut::<Store<T>>()
            .expect("component store type diverged from its TypeId key"))
    }

    /// Returns the store for `T`, if registered.
    pub fn store<T: 'static>(&self) -> Option<&Store<T>> {
        self.stores
            .get(&TypeId::of::<T>())
            .and_then(|store| store.as_any().downcast_ref::<Store<T>>())
    }

    /// Returns the store for `T` mutably, if registered.
    pub fn store_mut<T: 'static>(&mut self) -> Option<&mut Store<T>> {
        self.stores
            .get_mut(&TypeId::of::<T>())
            .and_then(|store| store.as_any_mut().downcast_mut::<Store<T>>())
    }

    /// Allocates a new entity.
    pub fn create(&mut self) -> ECSResult<Entity> {
        let entity = self.entities.create()?;
        trace!(entity = entity.0, "created entity");
        Ok(entity)
    }

    /// Returns `true` if the handle refers to a live entity.
    pub fn valid(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Destroys an entity, purging it from every store first.
    ///
    /// ## Behavior
    /// Stores are visited in no particular order; each purge is
    /// independent. A dead handle is a silent no-op returning `false` —
    /// deliberately the only operation that treats invalid input this way.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.valid(entity) {
            return false;
        }
        for store in self.stores.values_mut() {
            store.purge(entity);
        }
        // The slot was checked live above.
        let _ = self.entities.remove(entity);
        trace!(entity = entity.0, "destroyed entity");
        true
    }

    /// Attaches `value` to `entity` with default store configuration.
    pub fn add<T: 'static>(
        &mut self,
        entity: Entity,
        kind: StoreKind,
        value: T,
    ) -> ECSResult<Option<usize>> {
        let defaults = self.store_defaults;
        self.add_with(entity, kind, value, defaults)
    }

    /// Attaches `value` to `entity`, registering the store on first use.
    ///
    /// ## Behavior
    /// Routes through [`Registry::prepare_with`]; the config's `replace`
    /// and `resize` flags govern the insertion. `Ok(None)` reports a full
    /// store with growth declined — a benign outcome, not an error.
    ///
    /// ## Errors
    /// `ECSError::StaleEntity` for a dead handle; configuration errors on
    /// first registration.
    pub fn add_with<T: 'static>(
        &mut self,
        entity: Entity,
        kind: StoreKind,
        value: T,
        config: StoreConfig,
    ) -> ECSResult<Option<usize>> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        let store = self.prepare_with::<T>(kind, config)?;
        Ok(store.add(entity, value, config.replace, config.resize))
    }

    /// Attaches every component in `bundle` to `entity`.
    ///
    /// ## Behavior
    /// Entries apply in order under the default store configuration.
    /// Progress is **not** all-or-nothing: entries applied before a failure
    /// remain attached. A full store stops the walk and reports the count
    /// applied so far; a malformed (type-mismatched) entry is an error.
    pub fn add_bundle(&mut self, entity: Entity, bundle: Bundle) -> ECSResult<usize> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        let defaults = self.store_defaults;
        let sparse = self.sparse_config(defaults);

        let mut added = 0;
        for BundleEntry { type_id, type_name, kind, value, factory } in bundle.entries {
            let store = match self.stores.entry(type_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let store = factory(kind, sparse)?;
                    debug!(component = type_name, kind = ?kind, "registered component store");
                    entry.insert(store)
                }
            };
            match store.add_dyn(entity, value, defaults.replace, defaults.resize)? {
                Some(_) => added += 1,
                None => return Ok(added),
            }
        }
        Ok(added)
    }

    /// Overwrites the payload of a component the entity already holds.
    ///
    /// ## Errors
    /// `StaleEntity`, `NotRegistered`, or `Missing` when the entity does
    /// not hold the component.
    pub fn replace<T: 'static>(&mut self, entity: Entity, value: T) -> ECSResult<()> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        let store = self
            .store_mut::<T>()
            .ok_or(ECSError::NotRegistered { name: type_name::<T>() })?;
        *store.get_mut(entity)? = value;
        Ok(())
    }

    /// Overwrites the payload and returns the previous one.
    ///
    /// The previous payload is moved out, not copied.
    pub fn fetch_replace<T: 'static>(&mut self, entity: Entity, value: T) -> ECSResult<T> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        let store = self
            .store_mut::<T>()
            .ok_or(ECSError::NotRegistered { name: type_name::<T>() })?;
        Ok(std::mem::replace(store.get_mut(entity)?, value))
    }

    /// Detaches the entity's `T` component.
    ///
    /// Absence is benign: `Ok(false)`.
    ///
    /// ## Errors
    /// `StaleEntity` for a dead handle, `NotRegistered` for an unknown
    /// component type.
    pub fn remove<T: 'static>(&mut self, entity: Entity) -> ECSResult<bool> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        let store = self
            .store_mut::<T>()
            .ok_or(ECSError::NotRegistered { name: type_name::<T>() })?;
        Ok(store.remove(entity))
    }

    /// Detaches the entity's `T` component if the store exists and the
    /// component is present; never errs on absence or missing stores.
    pub fn remove_if_exists<T: 'static>(&mut self, entity: Entity) -> ECSResult<bool> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        Ok(self.store_mut::<T>().map_or(false, |store| store.remove(entity)))
    }

    /// Purges the entity from every registered store.
    pub fn remove_all(&mut self, entity: Entity) -> ECSResult<()> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        for store in self.stores.values_mut() {
            store.purge(entity);
        }
        Ok(())
    }

    /// Returns `true` if the entity holds a `T` component.
    ///
    /// An unregistered component type reads as `false`.
    ///
    /// ## Errors
    /// `StaleEntity` for a dead handle.
    pub fn has<T: 'static>(&self, entity: Entity) -> ECSResult<bool> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        Ok(self.store::<T>().map_or(false, |store| store.contains(entity)))
    }

    /// Returns a reference to the entity's `T` payload.
    pub fn get<T: 'static>(&self, entity: Entity) -> ECSResult<&T> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        let store = self
            .store::<T>()
            .ok_or(ECSError::NotRegistered { name: type_name::<T>() })?;
        Ok(store.get(entity)?)
    }

    /// Returns a mutable reference to the entity's `T` payload.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> ECSResult<&mut T> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        let store = self
            .store_mut::<T>()
            .ok_or(ECSError::NotRegistered { name: type_name::<T>() })?;
        Ok(store.get_mut(entity)?)
    }

    /// Returns the entity's `T` payload, or `None` when absent.
    pub fn try_get<T: 'static>(&self, entity: Entity) -> ECSResult<Option<&T>> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        match self.store::<T>() {
            Some(store) => Ok(store.try_get(entity)?),
            None => Ok(None),
        }
    }

    /// Mutable variant of [`Registry::try_get`].
    pub fn try_get_mut<T: 'static>(&mut self, entity: Entity) -> ECSResult<Option<&mut T>> {
        if !self.valid(entity) {
            return Err(ECSError::StaleEntity);
        }
        match self.store_mut::<T>() {
            Some(store) => Ok(store.try_get_mut(entity)?),
            None => Ok(None),
        }
    }

    /// Returns an owned copy of the entity's `T` payload.
    pub fn get_cloned<T: 'static + Clone>(&self, entity: Entity) -> ECSResult<T> {
        Ok(self.get::<T>(entity)?.clone())
    }

    /// Returns an owned copy of the entity's `T` payload, or `None`.
    pub fn try_get_cloned<T: 'static + Clone>(&self, entity: Entity) -> ECSResult<Option<T>> {
        Ok(self.try_get::<T>(entity)?.cloned())
    }

    /// Sorts the `T` store by payload.
    ///
    /// `Ok(false)` when fewer than two components are present.
    pub fn sort<T: 'static, F>(&mut self, cmp: F) -> ECSResult<bool>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let store = self
            .store_mut::<T>()
            .ok_or(ECSError::NotRegistered { name: type_name::<T>() })?;
        Ok(store.sort_by_payload(cmp)?)
    }

    /// Sorts the tag store for `T` by entity.
    pub fn sort_tags<T: 'static, F>(&mut self, cmp: F) -> ECSResult<bool>
    where
        F: FnMut(Entity, Entity) -> Ordering,
    {
        let store = self
            .store_mut::<T>()
            .ok_or(ECSError::NotRegistered { name: type_name::<T>() })?;
        Ok(store.sort_tags(cmp)?)
    }

    /// Returns the number of entities in the `T` store, if registered.
    pub fn len_of<T: 'static>(&self) -> Option<usize> {
        self.store::<T>().map(|store| store.len())
    }

    /// Returns the `T` store's entities in dense order, if registered.
    pub fn data_of<T: 'static>(&self) -> Option<Vec<Entity>> {
        self.store::<T>().map(|store| store.data())
    }

    /// Returns the number of live entities.
    pub fn alive(&self) -> usize {
        self.entities.len()
    }

    /// Returns an iterator over live entities in slot order.
    pub fn entities(&self) -> EntityIter<'_> {
        self.entities.iter()
    }
}
