//! # Tag Handles — Stable Names for Tag-Index Entries
//!
//! Many objects may share a tag, so an entry in the tag index cannot be
//! found again by its tag alone: removing "the entry for `door`" would pick
//! an arbitrary one of possibly several. Each entry is instead given a
//! [`TagHandle`] when it is inserted, and the owning object keeps that handle
//! to remove exactly its own entry later.
//!
//! ## Generations
//!
//! Handles are slot indices that get recycled. A plain index would go stale
//! the moment its slot is reused:
//!
//! ```text
//! 1. Insert "door" for object A   → slot 3
//! 2. A detaches                   → slot 3 free
//! 3. Insert "door" for object B   → slot 3 again
//! 4. A removes slot 3 a second time, evicting B!
//! ```
//!
//! Pairing each index with a generation counter that is bumped on free makes
//! step 4 detectable: A still holds `3v0`, the slot is now at `3v1`.

use std::fmt;

/// Names one entry of a container's tag index for as long as that entry
/// exists. Once the entry is removed the handle never matches again.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl TagHandle {
    /// Slot the entry occupies. Slots are shared over time by many entries.
    pub fn index(self) -> u32 {
        self.index
    }

    /// How many entries occupied the slot before this one.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for TagHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagHandle({}v{})", self.index, self.generation)
    }
}

/// Slot bookkeeping behind [`TagHandle`]s.
///
/// `current[i]` is the generation a handle for slot `i` must carry to be
/// honoured. Vacating a slot advances it, and `vacant` remembers the slot
/// so the next insert can take it over.
pub(crate) struct HandleAllocator {
    current: Vec<u32>,
    vacant: Vec<u32>,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
            vacant: Vec::new(),
        }
    }

    pub fn allocate(&mut self) -> TagHandle {
        match self.vacant.pop() {
            Some(index) => TagHandle {
                index,
                generation: self.current[index as usize],
            },
            None => {
                let index = self.current.len() as u32;
                self.current.push(0);
                TagHandle {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Vacate the slot `handle` names. A handle whose entry is already gone
    /// is refused with `false` and changes nothing.
    pub fn free(&mut self, handle: TagHandle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        let generation = &mut self.current[handle.index as usize];
        *generation = generation.wrapping_add(1);
        self.vacant.push(handle.index);
        true
    }

    pub fn is_live(&self, handle: TagHandle) -> bool {
        self.current.get(handle.index as usize) == Some(&handle.generation)
    }

    /// Entries currently holding a slot.
    pub fn live_count(&self) -> usize {
        self.current.len() - self.vacant.len()
    }

    #[cfg(test)]
    pub fn slot_count(&self) -> usize {
        self.current.len()
    }

    /// Vacate every slot at once, as when the whole index is emptied.
    pub fn free_all(&mut self) {
        self.vacant.clear();
        for (index, generation) in self.current.iter_mut().enumerate() {
            *generation = generation.wrapping_add(1);
            self.vacant.push(index as u32);
        }
    }
}
