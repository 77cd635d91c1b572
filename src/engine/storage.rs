use crate::engine::types::{EntityID, HandleKind};


/// Invariant:
/// - `cap` is the logical capacity; fixed variants materialize it eagerly,
///   the growable variant fills in lazily behind it.
/// - Owners only read cells they have previously written.
/// - Cells of the 32-bit variant only ever hold words from a layout whose
///   total width is at most 32 bits.
enum DenseCells {
    Fixed32(Box<[u32]>),
    Fixed64(Box<[u64]>),
    Growable(Vec<EntityID>),
}

/// Packed cell array behind the entity table and every sparse set.
///
/// Two flavors behind one operation set: a fixed-width word buffer sized to
/// the handle layout (`typed`), or a growable sequence. Not a trait
/// hierarchy — callers never care which variant they hold.
pub struct DenseBuffer {
    cells: DenseCells,
    cap: usize,
}

impl DenseBuffer {
    /// Builds a buffer with `capacity` logical cells.
    pub fn new(typed: bool, kind: HandleKind, capacity: usize) -> Self {
        let cells = match (typed, kind) {
            (true, HandleKind::Small) => DenseCells::Fixed32(vec![0u32; capacity].into_boxed_slice()),
            (true, HandleKind::Big) => DenseCells::Fixed64(vec![0u64; capacity].into_boxed_slice()),
            (false, _) => DenseCells::Growable(Vec::new()),
        };
        Self { cells, cap: capacity }
    }

    /// Returns the logical capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Grows the logical capacity to `new_cap` cells.
    ///
    /// Fixed variants reallocate and copy; newly uncovered cells are
    /// zero-filled. The growable variant only reserves.
    pub fn grow(&mut self, new_cap: usize) {
        debug_assert!(new_cap >= self.cap);
        match &mut self.cells {
            DenseCells::Fixed32(cells) => {
                let mut next = vec![0u32; new_cap].into_boxed_slice();
                next[..cells.len()].copy_from_slice(cells);
                *cells = next;
            }
            DenseCells::Fixed64(cells) => {
                let mut next = vec![0u64; new_cap].into_boxed_slice();
                next[..cells.len()].copy_from_slice(cells);
                *cells = next;
            }
            DenseCells::Growable(cells) => {
                cells.reserve(new_cap.saturating_sub(cells.len()));
            }
        }
        self.cap = new_cap;
    }

    /// Reads the word at `index`.
    #[inline]
    pub fn read(&self, index: usize) -> EntityID {
        debug_assert!(index < self.cap);
        match &self.cells {
            DenseCells::Fixed32(cells) => cells[index] as EntityID,
            DenseCells::Fixed64(cells) => cells[index],
            DenseCells::Growable(cells) => cells[index],
        }
    }

    /// Writes `value` at `index`.
    #[inline]
    pub fn write(&mut self, index: usize, value: EntityID) {
        debug_assert!(index < self.cap);
        match &mut self.cells {
            DenseCells::Fixed32(cells) => {
                debug_assert!(value <= u32::MAX as EntityID);
                cells[index] = value as u32;
            }
            DenseCells::Fixed64(cells) => cells[index] = value,
            DenseCells::Growable(cells) => {
                if index >= cells.len() {
                    cells.resize(index + 1, 0);
                }
                cells[index] = value;
            }
        }
    }
}
