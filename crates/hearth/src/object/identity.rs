//! # Object — The Identity Component
//!
//! Engine types embed an [`Object`] to become registrable. It carries the
//! unique ID, the shared tag, and the back-reference to whichever container
//! currently indexes it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

use super::handle::TagHandle;

/// Implemented by every type that can be registered with an
/// [`ObjectContainer`](super::ObjectContainer).
///
/// Engine entities embed an [`Object`] and hand it out here:
///
/// ```ignore
/// struct Door {
///     object: Object,
///     locked: bool,
/// }
///
/// impl AsObject for Door {
///     fn as_object(&self) -> &Object {
///         &self.object
///     }
/// }
/// ```
pub trait AsObject {
    fn as_object(&self) -> &Object;
}

impl AsObject for Object {
    fn as_object(&self) -> &Object {
        self
    }
}

/// The container side of the back-reference: whatever an object needs to
/// take itself out of the indices it was put into.
pub(crate) trait Detach {
    fn detach(&self, id: u32, handle: TagHandle);
}

pub(crate) struct Membership {
    pub(crate) registry: Weak<dyn Detach>,
    pub(crate) handle: TagHandle,
    /// The `Rc` the object was registered through.
    pub(crate) owner: Weak<dyn AsObject>,
}

impl Membership {
    /// False once the object has been moved out of its `Rc` (or is being
    /// dropped): the container can no longer hand it out.
    fn is_current(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

/// Identity of a live engine object: a unique numeric ID plus a tag that
/// other objects may share.
///
/// An `Object` is registered with at most one container at a time. It never
/// owns the container and the container never owns it. Dropping the object
/// removes it from its container.
///
/// Registration is tied to the `Rc` passed to
/// [`ObjectContainer::add`](super::ObjectContainer::add). Moving the value
/// out of that `Rc` (`Rc::try_unwrap`, `Rc::into_inner`) leaves it
/// unregistered; it can be wrapped again and added anew.
pub struct Object {
    id: u32,
    tag: String,
    membership: RefCell<Option<Membership>>,
}

impl Object {
    pub fn new(id: u32, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            membership: RefCell::new(None),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// The tag, exactly as it was given.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether this object is currently held in some container's indices.
    pub fn is_registered(&self) -> bool {
        self.membership
            .borrow()
            .as_ref()
            .is_some_and(Membership::is_current)
    }

    /// The handle of this object's tag-index entry, while registered.
    pub fn tag_handle(&self) -> Option<TagHandle> {
        self.membership
            .borrow()
            .as_ref()
            .filter(|m| m.is_current())
            .map(|m| m.handle)
    }

    /// Take this object out of its container's indices.
    ///
    /// Only this object's own ID entry and tag entry are removed; other
    /// objects with the same tag stay where they are. Does nothing when the
    /// object isn't registered. Entries left behind by an `Rc` the object
    /// was moved out of are cleaned up here too.
    pub fn remove_container(&self) {
        let Some(membership) = self.membership.borrow_mut().take() else {
            return;
        };
        if let Some(registry) = membership.registry.upgrade() {
            registry.detach(self.id, membership.handle);
        }
    }

    /// Whether the registry at `registry` is the one this object belongs to.
    pub(crate) fn is_member_of(&self, registry: *const ()) -> bool {
        self.membership
            .borrow()
            .as_ref()
            .is_some_and(|m| m.is_current() && std::ptr::addr_eq(m.registry.as_ptr(), registry))
    }

    pub(crate) fn set_membership(&self, membership: Membership) {
        *self.membership.borrow_mut() = Some(membership);
    }

    /// Drop the back-reference without touching the container. Used when the
    /// container has already emptied its own indices.
    pub(crate) fn forget_membership(&self) {
        self.membership.borrow_mut().take();
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        self.remove_container();
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("registered", &self.is_registered())
            .finish()
    }
}
