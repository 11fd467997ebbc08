// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # resremap
//!
//! Rewrites the resource ID lookup tables that Android resource compilers emit into the
//! static initializers of generated `R$*` classes, so that they stay consistent after
//! resources were removed or renumbered.
//!
//! A generated initializer builds each table with the same three steps: a `const`
//! holding the length, a `new-array`, and either one `fill-array-data` with a constant
//! payload or a run of `aput` stores. Given a global old → new [`resources::RemapTable`],
//! every element is either kept under its new ID or deleted:
//!
//! - **Plain** classes (`R$array`, `R$id`, ...) drop deleted elements and shrink the
//!   array, rewriting the length literal.
//! - **Styleable** classes (`R$styleable`) are indexed by position from unrelated code,
//!   so deleted elements become `0` and the length never changes.
//!
//! ## Quick Start
//!
//! ```rust
//! use resremap::prelude::*;
//!
//! let mut classes = vec![ClassDef::new(
//!     "Lcom/example/R$array;",
//!     Some(MethodBody::from(vec![
//!         Instruction::constant(Register(0), 2),
//!         Instruction::new_array(Register(0), Register(1)),
//!         Instruction::fill_array(
//!             Register(1),
//!             ArrayPayload::from_u32s(&[0x7f01_0000, 0x7f01_0001]),
//!         ),
//!         Instruction::return_void(),
//!     ])),
//! )];
//!
//! let table: RemapTable = [(0x7f01_0000_u32, 0x7f01_0010_u32)].into_iter().collect();
//! let config = ResourceConfig::default();
//! let report = ResourceArrayRemapper::new(&config, &table).run(&mut classes);
//!
//! assert!(!report.diagnostics().has_errors());
//! assert_eq!(report.stats().kept, 1);
//! ```
//!
//! ## Architecture
//!
//! - [`bytecode`] - Instruction model, method bodies and the bulk-fill payload codec
//! - [`resources`] - Resource IDs, the remap table and class conventions
//! - [`remap`] - Site discovery, per-element policy, rewriting and patching
//! - [`diagnostics`] - Collected findings about skipped sites and aborted classes
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Problems are isolated as narrowly as possible. An allocation that does not have the
//! expected shape is skipped ([`Error::MalformedInitializer`]) while the other arrays of
//! the class are still rewritten. A payload whose element width does not match a
//! resource ID ([`Error::PayloadWidthMismatch`]) leaves the whole class untouched.
//! Neither ever aborts the run; see [`remap::RemapReport`].
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger.
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//!
//! # Fuzz the payload decoder
//! cargo +nightly fuzz run payload --release
//! ```
#[macro_use]
pub(crate) mod error;


/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use resremap::prelude::*;
///
/// let table = RemapTable::new();
/// let context = ClassContext::plain("Lcom/example/R$id;");
/// let mut body = MethodBody::new();
/// let summary = remap_method(&mut body, &context, &table)?;
/// assert!(summary.sites.is_empty());
/// # Ok::<(), resremap::Error>(())
/// ```
pub mod prelude;

/// Instruction model for static initializers.
///
/// Only the instruction shapes that take part in building a resource table are
/// modelled precisely; everything else is carried as an opaque instruction with its
/// register reads, writes and control flow behaviour.
///
/// # Key Types
///
/// - [`bytecode::Instruction`] - One instruction
/// - [`bytecode::MethodBody`] - An ordered instruction sequence
/// - [`bytecode::ArrayPayload`] - Constant data of a `fill-array-data`
/// - [`bytecode::ClassDef`] - A class and its static initializer
pub mod bytecode;

/// Collected findings of a remapping run.
pub mod diagnostics;

/// Rewriting of resource tables; see [`remap::ResourceArrayRemapper`].
pub mod remap;

/// Resource identifiers, remap tables and class conventions.
pub mod resources;

/// `resremap` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `resremap` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use resremap::{prelude::*, Error};
///
/// let mut body = MethodBody::from(vec![
///     Instruction::new_array(Register(0), Register(1)),
///     Instruction::fill_array(Register(1), ArrayPayload::from_u32s(&[0x7f01_0000])),
/// ]);
/// let context = ClassContext::plain("Lcom/example/R$array;");
///
/// let summary = remap_method(&mut body, &context, &RemapTable::new())?;
/// assert!(matches!(summary.skipped[0], Error::MalformedInitializer { position: 0, .. }));
/// # Ok::<(), Error>(())
/// ```
pub use error::Error;
