//! Resource identifiers, the global remap table and resource class conventions.
//!
//! # Key Types
//! - [`ResourceId`] - A 32-bit compiled resource identifier
//! - [`RemapTable`] - Read-only old → new ID mapping; a missing key means deletion
//! - [`ClassKind`] / [`ClassContext`] - Plain vs. styleable table convention of a class
//! - [`ResourceConfig`] - Customized class allowlist and styleable naming rules

mod class;
mod config;
mod id;
mod table;

pub use class::{simple_name, ClassContext, ClassKind};
pub use config::{ResourceConfig, RESOURCE_CLASS_PREFIX, STYLEABLE_CLASS_NAME};
pub use id::ResourceId;
pub use table::RemapTable;
