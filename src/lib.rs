//! # sparse_ecs
//!
//! Sparse-set Entity-Component-System core: the data-oriented storage engine
//! that tracks live entities, associates them with arbitrary component
//! payloads, and exposes packed iteration over those associations.
//!
//! ## Design Goals
//! - Generational entity handles with an intrusive free-slot list
//! - Paged sparse→dense indices for O(1) membership and removal
//! - Packed payload arrays kept in lockstep for cache-local iteration
//! - Safe, explicit single-threaded mutation
//!
//! Higher-level concerns — multi-component queries, schedulers,
//! serialization — live outside this crate and compose over its API.

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![allow(clippy::module_inception)]

pub mod engine;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

// Core ECS types

pub use engine::registry::{
    Registry,
    Bundle,
};

pub use engine::entity::{
    EntityStore,
    EntityIter,
};

pub use engine::handle::{
    Entity,
    HandleLayout,
};

pub use engine::sparse::{
    SparseSet,
    SparseIter,
};

pub use engine::store::{
    Store,
    ErasedStore,
};

pub use engine::error::{
    ECSResult,
    ECSError,
    ConfigError,
    EntityError,
    StoreError,
    CapacityError,
    StaleEntityError,
    KindMismatchError,
    TypeMismatchError,
};

pub use engine::types::{
    EntityID,
    HandleKind,
    StoreKind,
    EntityConfig,
    StoreConfig,
    SparseConfig,
};

// ─────────────────────────────────────────────────────────────────────────────
// Prelude (Optional but recommended)
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used ECS types.
///
/// Import with:
/// ```rust
/// use sparse_ecs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Registry,
        Bundle,
        Entity,
        HandleLayout,
        Store,
        StoreKind,
        EntityConfig,
        StoreConfig,
        ECSResult,
        ECSError,
    };
}
