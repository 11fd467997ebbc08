//! Register-based instruction representation for static initializers.
//!
//! The engine only needs to understand the handful of instructions that build constant
//! arrays; everything else is carried through as an [`OpaqueInstruction`] that records
//! just enough (defined registers, read registers, control flow) to keep the linear
//! def-use scans sound.
//!
//! # Key Components
//!
//! - [`Register`] - A virtual register number
//! - [`Instruction`] - The tagged instruction variant
//! - [`OpaqueInstruction`] - Any instruction the engine does not interpret
//! - [`FlowType`] - How an instruction affects control flow
//!
//! # Usage Examples
//!
//! ```rust
//! use resremap::bytecode::{ArrayPayload, Instruction, Register};
//!
//! let v0 = Register(0);
//! let v1 = Register(1);
//! let code = [
//!     Instruction::constant(v0, 2),
//!     Instruction::new_array(v0, v1),
//!     Instruction::fill_array(v1, ArrayPayload::from_u32s(&[0x7f04_0000, 0x7f04_0001])),
//! ];
//!
//! assert!(code[1].reads(v0));
//! assert!(code[1].defines(v1));
//! assert_eq!(code[0].to_string(), "const v0, 2");
//! ```

use std::fmt;

use crate::bytecode::ArrayPayload;

/// A virtual register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register(pub u16);

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// How an instruction affects control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowType {
    /// Normal execution continues to next instruction
    Sequential,
    /// Call to another method; execution resumes at the next instruction
    Call,
    /// Conditional branch to another location
    ConditionalBranch,
    /// Always branches to another location (unconditional jump)
    UnconditionalBranch,
    /// Multi-way branch (switch statement)
    Switch,
    /// Returns from current method
    Return,
    /// Exception throwing
    Throw,
}

impl FlowType {
    /// Returns true if execution always falls through to the next instruction.
    #[must_use]
    pub fn falls_through(self) -> bool {
        matches!(self, FlowType::Sequential | FlowType::Call)
    }

    /// Returns true for any kind of branch.
    #[must_use]
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            FlowType::ConditionalBranch | FlowType::UnconditionalBranch | FlowType::Switch
        )
    }
}

/// An instruction the engine carries through without interpreting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueInstruction {
    /// Mnemonic, used for display only
    pub mnemonic: String,
    /// Registers written by the instruction
    pub defs: Vec<Register>,
    /// Registers read by the instruction
    pub uses: Vec<Register>,
    /// Control flow behaviour
    pub flow: FlowType,
}

impl OpaqueInstruction {
    /// Creates a sequential opaque instruction.
    #[must_use]
    pub fn new(mnemonic: impl Into<String>, defs: Vec<Register>, uses: Vec<Register>) -> Self {
        OpaqueInstruction {
            mnemonic: mnemonic.into(),
            defs,
            uses,
            flow: FlowType::Sequential,
        }
    }

    /// Sets the control flow behaviour.
    #[must_use]
    pub fn with_flow(mut self, flow: FlowType) -> Self {
        self.flow = flow;
        self
    }
}

/// A single instruction of a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `new-array dest, size` - allocates an array whose length is read from `size_register`
    Allocation {
        /// Register holding the array length
        size_register: Register,
        /// Register receiving the new array
        dest_register: Register,
    },
    /// `const dest, #value` - loads a literal
    ConstantLoad {
        /// Register receiving the literal
        dest_register: Register,
        /// The literal
        value: i64,
    },
    /// `fill-array-data array, payload` - initializes an array from a constant payload
    BulkFill {
        /// Register holding the array
        array_register: Register,
        /// Element data copied into the array
        payload: ArrayPayload,
    },
    /// Stores a literal `value` at literal `index` of the array in `array_register`
    IndexedStore {
        /// Register holding the array
        array_register: Register,
        /// Element index
        index: u32,
        /// Element value
        value: u32,
    },
    /// Anything else
    Other(OpaqueInstruction),
}

impl Instruction {
    /// Creates a [`Instruction::ConstantLoad`].
    #[must_use]
    pub fn constant(dest_register: Register, value: i64) -> Self {
        Instruction::ConstantLoad {
            dest_register,
            value,
        }
    }

    /// Creates an [`Instruction::Allocation`].
    #[must_use]
    pub fn new_array(size_register: Register, dest_register: Register) -> Self {
        Instruction::Allocation {
            size_register,
            dest_register,
        }
    }

    /// Creates a [`Instruction::BulkFill`].
    #[must_use]
    pub fn fill_array(array_register: Register, payload: ArrayPayload) -> Self {
        Instruction::BulkFill {
            array_register,
            payload,
        }
    }

    /// Creates an [`Instruction::IndexedStore`].
    #[must_use]
    pub fn store(array_register: Register, index: u32, value: u32) -> Self {
        Instruction::IndexedStore {
            array_register,
            index,
            value,
        }
    }

    /// Creates a sequential opaque instruction.
    #[must_use]
    pub fn other(mnemonic: &str, defs: &[Register], uses: &[Register]) -> Self {
        Instruction::Other(OpaqueInstruction::new(mnemonic, defs.to_vec(), uses.to_vec()))
    }

    /// Creates a `return-void`.
    #[must_use]
    pub fn return_void() -> Self {
        Instruction::Other(
            OpaqueInstruction::new("return-void", vec![], vec![]).with_flow(FlowType::Return),
        )
    }

    /// Returns the control flow behaviour.
    #[must_use]
    pub fn flow(&self) -> FlowType {
        match self {
            Instruction::Other(opaque) => opaque.flow,
            _ => FlowType::Sequential,
        }
    }

    /// Returns true if this instruction writes `register`.
    #[must_use]
    pub fn defines(&self, register: Register) -> bool {
        match self {
            Instruction::Allocation { dest_register, .. }
            | Instruction::ConstantLoad { dest_register, .. } => *dest_register == register,
            Instruction::BulkFill { .. } | Instruction::IndexedStore { .. } => false,
            Instruction::Other(opaque) => opaque.defs.contains(&register),
        }
    }

    /// Returns true if this instruction reads `register`.
    #[must_use]
    pub fn reads(&self, register: Register) -> bool {
        match self {
            Instruction::Allocation { size_register, .. } => *size_register == register,
            Instruction::ConstantLoad { .. } => false,
            Instruction::BulkFill { array_register, .. }
            | Instruction::IndexedStore { array_register, .. } => *array_register == register,
            Instruction::Other(opaque) => opaque.uses.contains(&register),
        }
    }

    /// Returns the mnemonic.
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        match self {
            Instruction::Allocation { .. } => "new-array",
            Instruction::ConstantLoad { .. } => "const",
            Instruction::BulkFill { .. } => "fill-array-data",
            Instruction::IndexedStore { .. } => "aput",
            Instruction::Other(opaque) => &opaque.mnemonic,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Allocation {
                size_register,
                dest_register,
            } => write!(f, "new-array {}, {}", dest_register, size_register),
            Instruction::ConstantLoad {
                dest_register,
                value,
            } => write!(f, "const {}, {}", dest_register, value),
            Instruction::BulkFill {
                array_register,
                payload,
            } => write!(f, "fill-array-data {}, {}", array_register, payload),
            Instruction::IndexedStore {
                array_register,
                index,
                value,
            } => write!(f, "aput {}[{}], 0x{:08x}", array_register, index, value),
            Instruction::Other(opaque) => {
                write!(f, "{}", opaque.mnemonic)?;
                let registers: Vec<String> = opaque
                    .defs
                    .iter()
                    .chain(&opaque.uses)
                    .map(ToString::to_string)
                    .collect();
                if !registers.is_empty() {
                    write!(f, " {}", registers.join(", "))?;
                }
                Ok(())
            }
        }
    }
}
