//! Error types for entity allocation and component storage.
//!
//! This module declares focused, composable error types used across the
//! entity table, the sparse sets, the component stores, and the registry.
//! Each error carries enough context to make failures actionable while
//! remaining small and cheap to pass around or convert into higher-level
//! variants like [`ECSError`].
//!
//! ## Goals
//! * **Specificity:** Each error type models a single failure mode (e.g.
//!   exhausted slot capacity, stale entity handles, payload access on a tag
//!   store).
//! * **Ergonomics:** All errors implement [`std::error::Error`] and
//!   [`fmt::Display`], and provide `From<T>` conversions into aggregate
//!   errors so `?` composes across layers.
//! * **Actionability:** Structured fields (requested vs. available capacity,
//!   expected vs. actual kinds and types) make logs useful without
//!   reproducing the issue.
//!
//! ## Two failure channels
//! Benign, expected mutation outcomes (a full store with growth disabled, a
//! removal of an absent component, a sort of a single element) are reported
//! through `bool` / `Option` returns and never appear here. The types in this
//! module cover the second channel only: precondition violations and type
//! misuse. Neither channel is ever converted into the other.
//!
//! ## Typical flow
//! Low-level operations return small, dedicated error types (e.g.
//! [`EntityError`], [`StoreError`]). The registry uses `?` to bubble failures
//! into [`ECSError`], which callers can match on for control flow or log with
//! user-readable messages.

use std::fmt;
use std::any::TypeId;

use crate::engine::types::{Bits, StoreKind};


/// Returned when the system cannot satisfy a request to create or place
/// additional entities because the target container has insufficient
/// capacity and growth is disabled.
///
/// ### Fields
/// * `needed` — Total number of slots the operation attempted to occupy.
/// * `capacity` — The current upper bound that prevented the operation.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {

    /// Total slots the operation attempted to occupy.
    pub needed: u64,

    /// Current capacity limiting the operation.
    pub capacity: u64,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity reached ({} needed; capacity {})",
            self.needed, self.capacity
        )
    }
}

impl std::error::Error for CapacityError {}

/// Returned when an entity handle is no longer valid—typically because it
/// was destroyed or its version no longer matches live storage.
///
/// Use this to prevent use-after-free style logic errors at the API boundary.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleEntityError;

impl fmt::Display for StaleEntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("stale or dead entity reference")
    }
}

impl std::error::Error for StaleEntityError {}

/// Returned when a type-erased component write carries a value whose dynamic
/// type does not match the store's element type.
///
/// This is a logic/configuration error surfaced by storage when component
/// types diverge (e.g. writing `Velocity` into a `Position` store).
///
/// ### Fields
/// * `expected` — The [`TypeId`] the destination store declares.
/// * `actual` — The [`TypeId`] of the value provided by the caller.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatchError {

    /// Destination store's declared element type.
    pub expected: TypeId,

    /// Provided value's dynamic type.
    pub actual: TypeId,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type mismatch: expected {:?}, actual {:?}", self.expected, self.actual)
    }
}

impl std::error::Error for TypeMismatchError {}

/// Returned when a payload operation targets a store of the wrong kind —
/// payload access on a tag store, or a tag sort on a payload store.
///
/// ### Fields
/// * `expected` — The kind the operation requires.
/// * `actual` — The kind the store was registered with.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindMismatchError {

    /// Kind required by the operation.
    pub expected: StoreKind,

    /// Kind the store was registered with.
    pub actual: StoreKind,
}

impl fmt::Display for KindMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "store kind mismatch: operation requires {:?}, store is {:?}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for KindMismatchError {}

/// Structural misconfiguration detected when building a core component.
///
/// ## Context
/// Configuration is validated eagerly — at table, set, or store
/// construction — so every later operation can rely on the documented
/// shape (positive capacities, power-of-two pages, usable bit widths).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {

    /// Handle bit widths were unusable: a zero width, or a total over 64.
    HandleBits {
        /// Requested index width.
        index_bits: Bits,

        /// Requested version width.
        version_bits: Bits,
    },

    /// Sparse-page size was not a power of two, or below the minimum.
    PageSize {
        /// Offending page size.
        page_size: usize,
    },

    /// A container capacity was not positive.
    Capacity {
        /// Offending capacity.
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HandleBits { index_bits, version_bits } => write!(
                f,
                "invalid handle layout: {} index bits, {} version bits",
                index_bits, version_bits
            ),
            ConfigError::PageSize { page_size } => write!(
                f,
                "invalid sparse page size {} (power of two of at least 128 required)",
                page_size
            ),
            ConfigError::Capacity { capacity } => {
                write!(f, "invalid capacity {} (must be positive)", capacity)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised by the generational entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityError {

    /// Slot allocation failed due to insufficient capacity.
    Capacity(CapacityError),

    /// Every representable slot index has been handed out.
    OutOfHandles {
        /// Number of representable slots under the configured layout.
        capacity: u64,
    },

    /// An entity handle was stale or referred to a destroyed entity.
    Stale(StaleEntityError),
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::Capacity(e) => write!(f, "{e}"),
            EntityError::OutOfHandles { capacity } => {
                write!(f, "entity index space exhausted ({} slots)", capacity)
            }
            EntityError::Stale(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EntityError {}

impl From<CapacityError> for EntityError {
    fn from(e: CapacityError) -> Self { EntityError::Capacity(e) }
}
impl From<StaleEntityError> for EntityError {
    fn from(e: StaleEntityError) -> Self { EntityError::Stale(e) }
}

/// Errors raised by a component store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {

    /// The operation does not apply to the store's kind.
    Kind(KindMismatchError),

    /// A type-erased value did not match the store's element type.
    TypeMismatch(TypeMismatchError),

    /// The entity holds no component in this store.
    Missing,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Kind(e) => write!(f, "{e}"),
            StoreError::TypeMismatch(e) => write!(f, "{e}"),
            StoreError::Missing => f.write_str("component not present for entity"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<KindMismatchError> for StoreError {
    fn from(e: KindMismatchError) -> Self { StoreError::Kind(e) }
}
impl From<TypeMismatchError> for StoreError {
    fn from(e: TypeMismatchError) -> Self { StoreError::TypeMismatch(e) }
}

/// Aggregate error for registry-level operations.
///
/// This wraps the precise, low-level failures raised by the entity table and
/// the component stores, and adds the registry's own precondition
/// violations. `From<T>` conversions allow `?` from lower layers while
/// preserving the structured cause.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ECSError {

    /// A sub-component was misconfigured.
    Config(ConfigError),

    /// The entity table rejected the operation.
    Entity(EntityError),

    /// A component store rejected the operation.
    Store(StoreError),

    /// The supplied entity handle was not live.
    StaleEntity,

    /// No store has been registered for the requested component type.
    NotRegistered {
        /// Component type name, for diagnostics.
        name: &'static str,
    },
}

impl fmt::Display for ECSError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ECSError::Config(e) => write!(f, "{e}"),
            ECSError::Entity(e) => write!(f, "{e}"),
            ECSError::Store(e) => write!(f, "{e}"),
            ECSError::StaleEntity => f.write_str("stale or dead entity reference"),
            ECSError::NotRegistered { name } => {
                write!(f, "no component store registered for {}", name)
            }
        }
    }
}

impl std::error::Error for ECSError {}

impl From<ConfigError> for ECSError {
    fn from(e: ConfigError) -> Self { ECSError::Config(e) }
}
impl From<EntityError> for ECSError {
    fn from(e: EntityError) -> Self { ECSError::Entity(e) }
}
impl From<StoreError> for ECSError {
    fn from(e: StoreError) -> Self { ECSError::Store(e) }
}

/// Result alias used across the registry surface.
pub type ECSResult<T> = Result<T, ECSError>;
