//! # Object Registry
//!
//! Live engine objects (creatures, doors, placeables, waypoints…) carry an
//! identity: a unique 32-bit ID and a tag. The tag is a designer-assigned
//! label and is *not* unique, since a module may well contain ten doors
//! tagged `door_tavern`.
//!
//! ## Module Overview
//!
//! - [`identity`] — [`Object`], the identity component, and [`AsObject`]
//! - [`container`] — [`ObjectContainer`], the ID and tag indices
//! - [`handle`] — [`TagHandle`], stable names for tag-index entries
//!
//! ## Membership
//!
//! ```text
//!            add (fails on ID collision)
//! Unregistered ─────────────────────────► Registered
//!      ▲                                      │
//!      └──────────────────────────────────────┘
//!        remove_container / drop / container dropped
//! ```
//!
//! Detaching is idempotent and always succeeds.

pub mod container;
mod error;
pub mod handle;
pub mod identity;
mod tag_index;

pub use container::ObjectContainer;
pub use error::RegistryError;
pub use handle::TagHandle;
pub use identity::{AsObject, Object};
