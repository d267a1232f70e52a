//! # ObjectContainer — ID and Tag Indices over Live Objects
//!
//! ## Ownership
//!
//! ```text
//!  engine code ──Rc<T>──► T { object: Object, .. }
//!                              │ membership: Weak<dyn Detach> + TagHandle
//!                              ▼
//!  ObjectContainer ──Rc──► RefCell<Indices<T>>
//!                            ids:  u32 → (Weak<T>, TagHandle)
//!                            tags: tag → [TagHandle] → Weak<T>
//! ```
//!
//! Neither side owns the other. Engine code owns objects through `Rc<T>`;
//! the container only holds `Weak<T>`, so a lookup can never resurrect an
//! object whose teardown has started. The object's back-reference is a
//! `Weak` to the indices, so it cannot keep a container alive either.
//!
//! ## Lifetime Rules
//!
//! - Dropping an object (its [`Object`] field, really) removes its entries.
//! - Dropping the container detaches every object still registered, so no
//!   object ever points at a dead container.
//!
//! ## Threading
//!
//! `Rc` and `RefCell` make the container `!Send` and `!Sync`. Registration,
//! lookup, and teardown all happen on the thread that owns it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use super::error::RegistryError;
use super::handle::TagHandle;
use super::identity::{AsObject, Detach, Membership};
use super::tag_index::TagIndex;

struct IdEntry<T> {
    object: Weak<T>,
    handle: TagHandle,
}

impl<T> IdEntry<T> {
    /// Dead entries belong to objects mid-drop or moved out of their `Rc`.
    fn is_live(&self) -> bool {
        self.object.strong_count() > 0
    }
}

struct Indices<T> {
    ids: HashMap<u32, IdEntry<T>>,
    tags: TagIndex<T>,
}

impl<T> Indices<T> {
    fn new() -> Self {
        Self {
            ids: HashMap::new(),
            tags: TagIndex::new(),
        }
    }

    /// Remove the entries of the object with `id` whose tag entry is
    /// `handle`. An ID entry carrying a different handle belongs to some
    /// other object and is left alone.
    fn remove(&mut self, id: u32, handle: TagHandle) {
        if self.ids.get(&id).is_some_and(|entry| entry.handle == handle) {
            self.ids.remove(&id);
        }
        self.tags.remove(handle);
    }
}

impl<T> Detach for RefCell<Indices<T>> {
    fn detach(&self, id: u32, handle: TagHandle) {
        let mut indices = self.borrow_mut();
        log::trace!(
            "Detaching object {id} (tag {:?})",
            indices.tags.tag_of(handle)
        );
        indices.remove(id, handle);
    }
}

/// Indexes live objects by their unique ID and by their (shared) tag.
///
/// ```ignore
/// let container = ObjectContainer::new();
/// let door = Rc::new(Door::new(7, "door01"));
/// container.add(&door)?;
///
/// assert!(container.find_by_id(7).is_some());
/// assert_eq!(container.find_by_tag("door01").len(), 1);
///
/// drop(door); // deregisters itself
/// assert!(container.find_by_id(7).is_none());
/// ```
pub struct ObjectContainer<T: AsObject + 'static> {
    inner: Rc<RefCell<Indices<T>>>,
}

impl<T: AsObject + 'static> ObjectContainer<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Indices::new())),
        }
    }

    /// Register `object` under its ID and tag.
    ///
    /// Fails without touching either index if the ID is taken in this
    /// container or if the object is already registered anywhere.
    pub fn add(&self, object: &Rc<T>) -> Result<(), RegistryError> {
        let obj = object.as_object();
        let id = obj.id();

        if obj.is_registered() {
            return Err(RegistryError::AlreadyRegistered { id });
        }
        // Drops entries left behind by an `Rc` the object was moved out of.
        obj.remove_container();

        let handle = {
            let mut indices = self.inner.borrow_mut();
            let stale = match indices.ids.get(&id) {
                Some(entry) if entry.is_live() => {
                    return Err(RegistryError::DuplicateId { id });
                }
                Some(entry) => Some(entry.handle),
                None => None,
            };
            if let Some(stale) = stale {
                indices.remove(id, stale);
            }
            let handle = indices.tags.insert(obj.tag(), Rc::downgrade(object));
            indices.ids.insert(
                id,
                IdEntry {
                    object: Rc::downgrade(object),
                    handle,
                },
            );
            handle
        };

        let registry: Weak<RefCell<Indices<T>>> = Rc::downgrade(&self.inner);
        let registry: Weak<dyn Detach> = registry;
        let owner: Weak<T> = Rc::downgrade(object);
        let owner: Weak<dyn AsObject> = owner;
        obj.set_membership(Membership {
            registry,
            handle,
            owner,
        });

        log::trace!("Registered object {id} (tag {:?})", obj.tag());
        Ok(())
    }

    /// Explicitly detach `object` from this container.
    ///
    /// Unlike [`Object::remove_container`](super::Object::remove_container),
    /// which is a no-op for unregistered objects, this reports an object that
    /// isn't registered *here* as an error.
    pub fn remove(&self, object: &T) -> Result<(), RegistryError> {
        let obj = object.as_object();
        if !obj.is_member_of(self.registry_ptr()) {
            return Err(RegistryError::NotRegistered { id: obj.id() });
        }
        obj.remove_container();
        Ok(())
    }

    /// Whether `object` is registered with this container.
    pub fn contains(&self, object: &T) -> bool {
        object.as_object().is_member_of(self.registry_ptr())
    }

    /// The object registered under `id`.
    pub fn find_by_id(&self, id: u32) -> Option<Rc<T>> {
        self.inner
            .borrow()
            .ids
            .get(&id)
            .and_then(|entry| entry.object.upgrade())
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.inner.borrow().ids.get(&id).is_some_and(IdEntry::is_live)
    }

    /// Every object with exactly this tag, in registration order.
    pub fn find_by_tag(&self, tag: &str) -> Vec<Rc<T>> {
        self.inner
            .borrow()
            .tags
            .get(tag)
            .filter_map(Weak::upgrade)
            .collect()
    }

    /// The `nth` (0-based) object with this tag, in registration order.
    pub fn find_nth_by_tag(&self, tag: &str, nth: usize) -> Option<Rc<T>> {
        self.inner
            .borrow()
            .tags
            .get(tag)
            .filter_map(Weak::upgrade)
            .nth(nth)
    }

    /// Number of objects registered under `tag`.
    pub fn tag_count(&self, tag: &str) -> usize {
        self.inner.borrow().tags.count(tag)
    }

    /// All registered IDs, ascending.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .inner
            .borrow()
            .ids
            .iter()
            .filter(|(_, entry)| entry.is_live())
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// All tags with at least one registered object, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.inner.borrow().tags.tags().map(str::to_owned).collect();
        tags.sort_unstable();
        tags
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.inner.borrow().ids.values().filter(|e| e.is_live()).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.inner.borrow().ids.values().any(IdEntry::is_live)
    }

    /// Detach every registered object.
    pub fn clear(&self) {
        let members: Vec<Rc<T>> = {
            let mut indices = self.inner.borrow_mut();
            let members: Vec<Rc<T>> = indices
                .ids
                .values()
                .filter_map(|entry| entry.object.upgrade())
                .collect();
            indices.ids.clear();
            indices.tags.clear();
            members
        };

        for member in &members {
            member.as_object().forget_membership();
        }

        if !members.is_empty() {
            log::debug!("Detached {} objects from container", members.len());
        }
    }

    fn registry_ptr(&self) -> *const () {
        Rc::as_ptr(&self.inner).cast()
    }
}

impl<T: AsObject + 'static> Default for ObjectContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: AsObject + 'static> Drop for ObjectContainer<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;

    struct Door {
        object: Object,
        locked: bool,
    }

    impl Door {
        fn new(id: u32, tag: &str) -> Rc<Self> {
            Rc::new(Self {
                object: Object::new(id, tag),
                locked: false,
            })
        }
    }

    impl AsObject for Door {
        fn as_object(&self) -> &Object {
            &self.object
        }
    }

    #[test]
    fn add_and_find() {
        let container = ObjectContainer::new();
        let door = Door::new(7, "door01");
        container.add(&door).unwrap();

        let found = container.find_by_id(7).unwrap();
        assert!(Rc::ptr_eq(&found, &door));
        assert!(!found.locked);
        assert_eq!(container.find_by_tag("door01").len(), 1);
        assert!(door.object.is_registered());
        assert!(container.contains(&door));
    }

    #[test]
    fn find_missing_returns_none() {
        let container: ObjectContainer<Door> = ObjectContainer::new();
        assert!(container.find_by_id(1).is_none());
        assert!(container.find_by_tag("nothing").is_empty());
        assert!(container.find_nth_by_tag("nothing", 0).is_none());
    }

    #[test]
    fn duplicate_id_rejected_and_index_untouched() {
        let container = ObjectContainer::new();
        let first = Door::new(7, "door01");
        let second = Door::new(7, "door02");
        container.add(&first).unwrap();

        let err = container.add(&second).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId { id: 7 });

        let found = container.find_by_id(7).unwrap();
        assert_eq!(found.object.tag(), "door01");
        assert!(container.find_by_tag("door02").is_empty());
        assert!(!second.object.is_registered());
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn same_object_twice_rejected() {
        let container = ObjectContainer::new();
        let door = Door::new(1, "a");
        container.add(&door).unwrap();
        assert_eq!(
            container.add(&door),
            Err(RegistryError::AlreadyRegistered { id: 1 })
        );
        assert_eq!(container.tag_count("a"), 1);
    }

    #[test]
    fn object_in_one_container_only() {
        let a = ObjectContainer::new();
        let b = ObjectContainer::new();
        let door = Door::new(1, "x");
        a.add(&door).unwrap();

        assert_eq!(b.add(&door), Err(RegistryError::AlreadyRegistered { id: 1 }));
        assert!(b.is_empty());
        assert!(!b.contains(&door));
    }

    #[test]
    fn drop_deregisters() {
        let container = ObjectContainer::new();
        let door = Door::new(3, "gate");
        container.add(&door).unwrap();
        assert_eq!(container.len(), 1);

        drop(door);
        assert!(container.find_by_id(3).is_none());
        assert!(!container.contains_id(3));
        assert_eq!(container.tag_count("gate"), 0);
        assert!(container.is_empty());
    }

    #[test]
    fn lookup_handle_keeps_registration_until_last_owner_drops() {
        let container = ObjectContainer::new();
        let door = Door::new(3, "gate");
        container.add(&door).unwrap();

        let found = container.find_by_id(3).unwrap();
        drop(door);
        assert!(container.contains_id(3));

        drop(found);
        assert!(!container.contains_id(3));
    }

    #[test]
    fn remove_container_twice_is_noop() {
        let container = ObjectContainer::new();
        let door = Door::new(5, "d");
        container.add(&door).unwrap();

        door.object.remove_container();
        door.object.remove_container();
        assert!(container.is_empty());
        assert!(!door.object.is_registered());
    }

    #[test]
    fn detach_then_reattach() {
        let container = ObjectContainer::new();
        let door = Door::new(5, "d");
        container.add(&door).unwrap();
        door.object.remove_container();
        container.add(&door).unwrap();
        assert_eq!(container.len(), 1);
        assert_eq!(container.tag_count("d"), 1);
    }

    #[test]
    fn removing_one_of_shared_tag_keeps_other() {
        let container = ObjectContainer::new();
        let a = Door::new(1, "guard");
        let b = Door::new(2, "guard");
        container.add(&a).unwrap();
        container.add(&b).unwrap();

        a.object.remove_container();

        let left = container.find_by_tag("guard");
        assert_eq!(left.len(), 1);
        assert!(Rc::ptr_eq(&left[0], &b));
    }

    #[test]
    fn nth_by_tag_follows_registration_order() {
        let container = ObjectContainer::new();
        let doors: Vec<_> = (10..13).map(|id| Door::new(id, "door")).collect();
        for door in &doors {
            container.add(door).unwrap();
        }
        assert_eq!(container.find_nth_by_tag("door", 0).unwrap().object.id(), 10);
        assert_eq!(container.find_nth_by_tag("door", 2).unwrap().object.id(), 12);
        assert!(container.find_nth_by_tag("door", 3).is_none());
    }

    #[test]
    fn explicit_remove_checks_membership() {
        let a: ObjectContainer<Door> = ObjectContainer::new();
        let b: ObjectContainer<Door> = ObjectContainer::new();
        let door = Door::new(9, "x");

        assert_eq!(a.remove(&door), Err(RegistryError::NotRegistered { id: 9 }));

        a.add(&door).unwrap();
        assert_eq!(b.remove(&door), Err(RegistryError::NotRegistered { id: 9 }));
        assert_eq!(a.len(), 1);

        a.remove(&door).unwrap();
        assert!(a.is_empty());
        assert!(!door.object.is_registered());
    }

    #[test]
    fn moving_out_of_rc_detaches() {
        let container = ObjectContainer::new();
        let door = Door::new(7, "door01");
        container.add(&door).unwrap();

        let Ok(door) = Rc::try_unwrap(door) else {
            panic!("door has a single owner");
        };
        assert!(!door.object.is_registered());
        assert_eq!(door.object.tag_handle(), None);
        assert!(container.find_by_id(7).is_none());
        assert!(!container.contains_id(7));
        assert!(container.find_by_tag("door01").is_empty());
        assert_eq!(container.tag_count("door01"), 0);
        assert!(container.tags().is_empty());
        assert!(container.ids().is_empty());
        assert_eq!(container.len(), 0);
        assert!(container.is_empty());
    }

    #[test]
    fn id_of_moved_out_object_can_be_reused() {
        let container = ObjectContainer::new();
        let old = Door::new(7, "door01");
        container.add(&old).unwrap();
        let Some(old) = Rc::into_inner(old) else {
            panic!("door has a single owner");
        };

        let new = Door::new(7, "door02");
        container.add(&new).unwrap();
        assert!(Rc::ptr_eq(&container.find_by_id(7).unwrap(), &new));

        // The moved-out door still remembers its old entries; dropping it
        // must leave the new door alone.
        drop(old);
        assert!(Rc::ptr_eq(&container.find_by_id(7).unwrap(), &new));
        assert_eq!(container.tag_count("door02"), 1);
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn moved_out_object_can_be_added_again() {
        let first = ObjectContainer::new();
        let second = ObjectContainer::new();
        let door = Door::new(3, "gate");
        first.add(&door).unwrap();

        let Ok(door) = Rc::try_unwrap(door) else {
            panic!("door has a single owner");
        };
        let door = Rc::new(door);
        second.add(&door).unwrap();

        assert!(second.contains(&door));
        assert!(!first.contains(&door));
        assert!(Rc::ptr_eq(&second.find_by_id(3).unwrap(), &door));
        assert_eq!(second.tag_count("gate"), 1);
        assert!(first.is_empty());


        // Re-adding cleaned up `first`, so the ID is free there again.
        let other = Door::new(3, "gate");
        first.add(&other).unwrap();
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn clear_detaches_everything() {
        let container = ObjectContainer::new();
        let a = Door::new(1, "x");
        let b = Door::new(2, "y");
        container.add(&a).unwrap();
        container.add(&b).unwrap();

        container.clear();
        assert!(container.is_empty());
        assert!(container.tags().is_empty());
        assert!(!a.object.is_registered());
        assert!(!b.object.is_registered());
    }

    #[test]
    fn dropping_container_detaches_objects() {
        let door = Door::new(1, "x");
        {
            let container = ObjectContainer::new();
            container.add(&door).unwrap();
            assert!(door.object.is_registered());
        }
        assert!(!door.object.is_registered());

        // Object can join a new container afterwards.
        let other = ObjectContainer::new();
        other.add(&door).unwrap();
        assert!(other.contains_id(1));
    }

    #[test]
    fn ids_and_tags_listing() {
        let container = ObjectContainer::new();
        let objs = [Door::new(3, "b"), Door::new(1, "a"), Door::new(2, "b")];
        for obj in &objs {
            container.add(obj).unwrap();
        }
        assert_eq!(container.ids(), vec![1, 2, 3]);
        assert_eq!(container.tags(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn plain_objects_can_be_registered() {
        let container = ObjectContainer::new();
        let obj = Rc::new(Object::new(4, "Waypoint"));
        container.add(&obj).unwrap();
        assert_eq!(container.find_by_tag("Waypoint")[0].id(), 4);
    }
}
