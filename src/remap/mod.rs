//! Rewriting of compiled resource tables inside static initializers.
//!
//! When resources are removed or renumbered, every integer array in a generated
//! `R$*` class that lists resource IDs has to follow. This module finds those arrays
//! in a static initializer, maps each element through a [`crate::resources::RemapTable`]
//! and patches the instructions so the array holds exactly the surviving IDs.
//!
//! # Pipeline
//!
//! ```text
//! MethodBody ──► locator ──► policy ──► rewriter ──► patcher ──► MethodBody
//!                (sites)    (Keep/Delete) (Plain/Styleable)  (edits)
//! ```
//!
//! - [`locator`] - Finds `const` / `new-array` / populate sites
//! - [`policy`] - Decides `Keep(new_id)` or `Delete` per element
//! - [`rewriter`] - Shrinks plain arrays, zero-fills styleable ones
//! - [`patcher`] - Validated instruction edits
//!
//! [`remap_method`] runs the pipeline for one class and [`ResourceArrayRemapper`]
//! runs it for many classes in parallel.
//!
//! # Example
//!
//! ```rust
//! use resremap::prelude::*;
//!
//! let mut body = MethodBody::from(vec![
//!     Instruction::constant(Register(0), 2),
//!     Instruction::new_array(Register(0), Register(1)),
//!     Instruction::fill_array(Register(1), ArrayPayload::from_u32s(&[0x7f04_0000, 0x7f04_0001])),
//! ]);
//! let table: RemapTable = [(0x7f04_0001_u32, 0x7f04_0001_u32)].into_iter().collect();
//! let context = ClassContext::styleable("Lcom/example/R$styleable;");
//!
//! let summary = remap_method(&mut body, &context, &table)?;
//! assert_eq!(summary.sites[0].new_length, 2);
//! assert_eq!(summary.sites[0].zeroed, 1);
//! assert_eq!(
//!     body.get(2),
//!     Some(&Instruction::fill_array(Register(1), ArrayPayload::from_u32s(&[0, 0x7f04_0001])))
//! );
//! # Ok::<(), resremap::Error>(())
//! ```

pub mod locator;
pub mod patcher;
pub mod policy;
pub mod rewriter;

mod pass;
mod report;

pub use locator::{locate_sites, select_class, ArraySite, LocatedSites, Population};
pub use pass::{remap_method, ResourceArrayRemapper};
pub use policy::{Decision, RemapPolicy};
pub use report::{ClassOutcome, ClassSummary, RemapReport, RemapStats};
pub use rewriter::{rewrite_site, SiteRewrite, SizeEdit};
