//! # Registry Errors

use thiserror::Error;

/// Misuse of an [`ObjectContainer`](super::ObjectContainer).
///
/// These are programming errors rather than runtime conditions, but they are
/// reported as values so the caller decides whether to abort. A failed call
/// never changes either index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("object ID {id} is already registered with this container")]
    DuplicateId { id: u32 },

    #[error("object {id} already belongs to a container")]
    AlreadyRegistered { id: u32 },

    #[error("object {id} is not registered with this container")]
    NotRegistered { id: u32 },
}
