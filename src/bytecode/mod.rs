//! Register-based bytecode model for compiled static initializers.
//!
//! This module holds the minimal instruction set the remapping engine reasons about,
//! the fixed-width payload of bulk-fill instructions together with its bit-exact
//! binary encoding, and the method/class containers handed in by an external loader.
//!
//! # Key Types
//! - [`Instruction`] - Tagged instruction variant (allocation, constant load, bulk fill,
//!   indexed store, opaque)
//! - [`ArrayPayload`] - Shared, immutable element buffer of a bulk fill
//! - [`MethodBody`] - Ordered instruction sequence of one method
//! - [`ClassDef`] - A class name with its optional static initializer
//!
//! # Example
//! ```rust
//! use resremap::bytecode::{ArrayPayload, Instruction, MethodBody, Register};
//!
//! let body = MethodBody::from(vec![
//!     Instruction::constant(Register(0), 1),
//!     Instruction::new_array(Register(0), Register(1)),
//!     Instruction::fill_array(Register(1), ArrayPayload::from_u32s(&[0x7f03_0000])),
//!     Instruction::return_void(),
//! ]);
//! println!("{body}");
//! ```

mod body;
mod instruction;
pub mod io;
mod payload;

pub use body::{ClassDef, MethodBody};
pub use instruction::{FlowType, Instruction, OpaqueInstruction, Register};
pub use payload::{ArrayPayload, ElementWidth, FILL_ARRAY_DATA_IDENT};
