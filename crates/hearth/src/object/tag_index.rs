//! # Tag Index
//!
//! Multimap from tag to objects, with per-entry removal by [`TagHandle`].

use std::collections::HashMap;
use std::rc::Weak;

use indexmap::IndexSet;

use super::handle::{HandleAllocator, TagHandle};

struct TagEntry<T> {
    tag: String,
    object: Weak<T>,
}

pub(crate) struct TagIndex<T> {
    allocator: HandleAllocator,
    /// Entry storage, indexed by `TagHandle::index`.
    slots: Vec<Option<TagEntry<T>>>,
    /// Tag → handles of the entries under that tag, in insertion order.
    by_tag: HashMap<String, IndexSet<TagHandle>>,
}

impl<T> TagIndex<T> {
    pub fn new() -> Self {
        Self {
            allocator: HandleAllocator::new(),
            slots: Vec::new(),
            by_tag: HashMap::new(),
        }
    }

    /// Add an entry. Duplicate tags are fine, each insert gets its own handle.
    pub fn insert(&mut self, tag: &str, object: Weak<T>) -> TagHandle {
        let handle = self.allocator.allocate();
        let index = handle.index as usize;
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(TagEntry {
            tag: tag.to_owned(),
            object,
        });
        self.by_tag
            .entry(tag.to_owned())
            .or_default()
            .insert(handle);
        handle
    }

    /// Remove the entry `handle` names, and only that one.
    ///
    /// Returns `false` for stale handles.
    pub fn remove(&mut self, handle: TagHandle) -> bool {
        if !self.allocator.free(handle) {
            return false;
        }
        let Some(entry) = self.slots[handle.index as usize].take() else {
            return false;
        };
        if let Some(set) = self.by_tag.get_mut(&entry.tag) {
            set.shift_remove(&handle);
            if set.is_empty() {
                self.by_tag.remove(&entry.tag);
            }
        }
        true
    }

    /// All entries under `tag`, oldest first.
    pub fn get(&self, tag: &str) -> impl Iterator<Item = &Weak<T>> {
        self.by_tag
            .get(tag)
            .into_iter()
            .flat_map(|set| set.iter())
            .filter_map(|handle| self.slots[handle.index as usize].as_ref())
            .map(|entry| &entry.object)
    }

    /// Entries under `tag` whose object can still be handed out.
    pub fn count(&self, tag: &str) -> usize {
        self.get(tag).filter(|object| object.strong_count() > 0).count()
    }

    /// Tag of the entry `handle` names, if it is live.
    pub fn tag_of(&self, handle: TagHandle) -> Option<&str> {
        if !self.allocator.is_live(handle) {
            return None;
        }
        self.slots
            .get(handle.index as usize)?
            .as_ref()
            .map(|entry| entry.tag.as_str())
    }

    /// Tags with at least one entry whose object can still be handed out.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.by_tag
            .keys()
            .map(String::as_str)
            .filter(|tag| self.count(tag) > 0)
    }

    pub fn len(&self) -> usize {
        self.allocator.live_count()
    }

    pub fn clear(&mut self) {
        self.allocator.free_all();
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.by_tag.clear();
    }
}
