//! # resremap Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from the
//! resremap library. Import this module to get quick access to everything needed to
//! build static initializers and remap their resource tables.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all resremap operations
pub use crate::Error;

/// The result type used throughout resremap
pub use crate::Result;

// ================================================================================================
// Bytecode
// ================================================================================================

/// Instruction model
pub use crate::bytecode::{FlowType, Instruction, OpaqueInstruction, Register};

/// Method bodies and classes
pub use crate::bytecode::{ClassDef, MethodBody};

/// Bulk-fill payloads
pub use crate::bytecode::{ArrayPayload, ElementWidth};

// ================================================================================================
// Resources
// ================================================================================================

/// Resource identifiers and the remap table
pub use crate::resources::{RemapTable, ResourceId};

/// Class selection and conventions
pub use crate::resources::{ClassContext, ClassKind, ResourceConfig};

// ================================================================================================
// Remapping
// ================================================================================================

/// Entry points
pub use crate::remap::{remap_method, ResourceArrayRemapper};

/// Results
pub use crate::remap::{ClassOutcome, ClassSummary, RemapReport, RemapStats, SiteRewrite};

/// Per-element decisions
pub use crate::remap::{Decision, RemapPolicy};

// ================================================================================================
// Diagnostics
// ================================================================================================

/// Diagnostics collection
pub use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics};
