//! # Hearth — Asset Identity and Indexing
//!
//! The substrate that higher engine layers (resource lookup, spawning,
//! scripting) build on:
//!
//! - [`archive`] — decodes BIF resource archives into a table of
//!   [`Resource`](archive::Resource) records.
//! - [`object`] — the [`ObjectContainer`](object::ObjectContainer) registry
//!   that indexes live objects by unique ID and by non-unique tag.
//!
//! The two halves are independent. Code that resolves archived resources into
//! spawned objects joins them.

pub mod archive;
pub mod object;

pub use archive::{ArchiveError, BifFile, FileType, Resource};
pub use object::{AsObject, Object, ObjectContainer, RegistryError};
