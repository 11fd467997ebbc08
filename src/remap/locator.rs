//! Array-site discovery inside static initializers.
//!
//! A resource table is compiled into a fixed instruction shape:
//!
//! ```text
//! const       v0, 4                      <- size definition
//! new-array   v1, v0                     <- allocation
//! fill-array-data v1, [ ... ]            <- population (or a run of aput)
//! sput-object v1, LR$id;->table:[I
//! ```
//!
//! The locator recovers that shape with two linear scans around every allocation: a
//! backward scan for the reaching `const` of the size register and a forward scan for
//! the bulk fill or the contiguous store run that populates the array. This is only
//! sound because generated initializers are branch-free, so any control flow met by
//! either scan ends it; the backward scan then reports the site as malformed instead
//! of guessing a definition.
//!
//! Discovery is read-only. Positions recorded in an [`ArraySite`] are only valid for
//! the body they were located in, until that body is next patched.

use crate::{
    bytecode::{ElementWidth, Instruction, MethodBody, Register},
    resources::{simple_name, ClassContext, ClassKind, ResourceConfig, ResourceId, RESOURCE_CLASS_PREFIX},
    Error, Result,
};

/// How a located array is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Population {
    /// A single bulk-fill instruction.
    BulkFill {
        /// Instruction index of the bulk fill
        position: usize,
        /// Number of elements in its payload
        payload_len: usize,
    },
    /// A contiguous run of indexed stores.
    StoreRun {
        /// Instruction index of the first store
        start: usize,
        /// Number of stores in the run
        len: usize,
    },
}

/// One array construction inside a static initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySite {
    /// Table convention of the enclosing class
    pub kind: ClassKind,
    /// Instruction index of the `const` defining the array length
    pub size_position: usize,
    /// Instruction index of the allocation
    pub allocation_position: usize,
    /// Register holding the array length
    pub size_register: Register,
    /// Register receiving the array
    pub array_register: Register,
    /// Length literal read by the allocation
    pub declared_length: u32,
    /// The instructions populating the array
    pub population: Population,
    /// Array contents after initialization, one entry per declared slot
    pub elements: Vec<ResourceId>,
}

/// Result of scanning one method body.
#[derive(Debug, Default)]
pub struct LocatedSites {
    /// Candidate sites in instruction order
    pub sites: Vec<ArraySite>,
    /// [`Error::MalformedInitializer`] for every allocation that was skipped
    pub malformed: Vec<Error>,
}

/// Decides whether a class has its static initializer examined, and how.
///
/// Generated resource inner classes (`R$string`, `R$styleable`, ...) are always
/// examined. Any other class is examined only if its descriptor is on the customized
/// allowlist. The allowlist has no further effect on how sites are rewritten.
///
/// # Arguments
///
/// * `descriptor` - Class name, e.g. `Lcom/example/R$id;`
/// * `config` - Customized allowlist and styleable naming rules
///
/// # Returns
///
/// The class context, or `None` if the class is not a resource class.
#[must_use]
pub fn select_class(descriptor: &str, config: &ResourceConfig) -> Option<ClassContext> {
    let name = simple_name(descriptor);
    let customized = config.is_customized(descriptor);
    if !customized && !name.starts_with(RESOURCE_CLASS_PREFIX) {
        return None;
    }

    let kind = if config.is_styleable(name) {
        ClassKind::Styleable
    } else {
        ClassKind::Plain
    };

    Some(ClassContext {
        name: descriptor.to_string(),
        kind,
        customized,
    })
}

/// Finds every candidate array site in `body`.
///
/// Allocations without a reaching literal size are reported in
/// [`LocatedSites::malformed`] and skipped. Allocations that are never populated by a
/// bulk fill or a store run are not resource tables and are silently ignored.
///
/// # Arguments
///
/// * `body` - The static initializer to scan
/// * `context` - The enclosing class; every site is tagged with its kind
///
/// # Errors
///
/// Returns [`Error::PayloadWidthMismatch`] if a bulk fill populating a located array
/// does not use 4-byte elements. The whole class must then be left untouched.
pub fn locate_sites(body: &MethodBody, context: &ClassContext) -> Result<LocatedSites> {
    let mut located = LocatedSites::default();

    for (position, instruction) in body.iter().enumerate() {
        if !matches!(instruction, Instruction::Allocation { .. }) {
            continue;
        }

        match locate_site_at(body, position, context.kind) {
            Ok(Some(site)) => located.sites.push(site),
            Ok(None) => {}
            Err(error @ Error::MalformedInitializer { .. }) => located.malformed.push(error),
            Err(error) => return Err(error),
        }
    }

    Ok(located)
}

/// Decodes the array site whose allocation is at `position`.
///
/// # Returns
///
/// `Ok(None)` if the allocation is not a candidate (zero length or never populated).
///
/// # Errors
///
/// Returns [`Error::MalformedInitializer`] if the site does not have the expected
/// shape and [`Error::PayloadWidthMismatch`] for a bulk fill with the wrong width.
pub(crate) fn locate_site_at(
    body: &MethodBody,
    position: usize,
    kind: ClassKind,
) -> Result<Option<ArraySite>> {
    let Some(Instruction::Allocation {
        size_register,
        dest_register,
    }) = body.get(position)
    else {
        return Err(Error::Patch(format!(
            "instruction {} is not an allocation",
            position
        )));
    };

    let (size_position, literal) = find_size_definition(body, position, *size_register)?;
    let Ok(declared_length) = u32::try_from(literal) else {
        return Err(Error::MalformedInitializer {
            position,
            message: format!("array length literal {} is out of range", literal),
        });
    };

    if declared_length == 0 {
        return Ok(None);
    }

    let Some(population) = find_population(body, position, *dest_register)? else {
        return Ok(None);
    };

    let elements = decode_elements(body, position, declared_length, &population)?;

    Ok(Some(ArraySite {
        kind,
        size_position,
        allocation_position: position,
        size_register: *size_register,
        array_register: *dest_register,
        declared_length,
        population,
        elements,
    }))
}

/// Finds the literal that reaches the allocation at `position` through `register`.
///
/// Last write wins; a write by anything other than a `const`, or any control flow
/// before the definition is found, makes the site malformed.
pub(crate) fn find_size_definition(
    body: &MethodBody,
    position: usize,
    register: Register,
) -> Result<(usize, i64)> {
    let instructions = body.instructions();

    for index in (0..position).rev() {
        let instruction = &instructions[index];
        if !instruction.flow().falls_through() {
            return Err(Error::MalformedInitializer {
                position,
                message: format!(
                    "control flow ({}) at instruction {} before the size of {} is defined",
                    instruction.mnemonic(),
                    index,
                    register
                ),
            });
        }

        match instruction {
            Instruction::ConstantLoad {
                dest_register,
                value,
            } if *dest_register == register => return Ok((index, *value)),
            _ if instruction.defines(register) => {
                return Err(Error::MalformedInitializer {
                    position,
                    message: format!(
                        "size register {} is defined by non-literal {} at instruction {}",
                        register,
                        instruction.mnemonic(),
                        index
                    ),
                });
            }
            _ => {}
        }
    }

    Err(Error::MalformedInitializer {
        position,
        message: format!("no literal definition of {} reaches new-array", register),
    })
}

fn find_population(
    body: &MethodBody,
    position: usize,
    array: Register,
) -> Result<Option<Population>> {
    let instructions = body.instructions();

    for (index, instruction) in instructions.iter().enumerate().skip(position + 1) {
        match instruction {
            Instruction::BulkFill {
                array_register,
                payload,
            } if *array_register == array => {
                if payload.width() != ElementWidth::Four {
                    return Err(Error::PayloadWidthMismatch {
                        position: index,
                        expected: ElementWidth::Four.raw(),
                        actual: payload.width().raw(),
                    });
                }
                ensure_no_later_writes(body, position, array, index + 1)?;
                return Ok(Some(Population::BulkFill {
                    position: index,
                    payload_len: payload.len(),
                }));
            }
            Instruction::IndexedStore { array_register, .. } if *array_register == array => {
                let len = instructions[index..]
                    .iter()
                    .take_while(|next| {
                        matches!(next, Instruction::IndexedStore { array_register, .. } if *array_register == array)
                    })
                    .count();
                ensure_no_later_writes(body, position, array, index + len)?;
                return Ok(Some(Population::StoreRun { start: index, len }));
            }
            Instruction::Allocation { .. } => return Ok(None),
            _ if !instruction.flow().falls_through() || instruction.defines(array) => {
                return Ok(None);
            }
            _ => {}
        }
    }

    Ok(None)
}

fn writes_to(instruction: &Instruction, array: Register) -> bool {
    matches!(
        instruction,
        Instruction::IndexedStore { array_register, .. }
            | Instruction::BulkFill { array_register, .. } if *array_register == array
    )
}

/// Rejects writes to `array` after its populating run, up to the end of the block or
/// the next redefinition of the register.
///
/// Such writes are invisible to decoding, and a shrunk array would leave them
/// indexing past its new length.
fn ensure_no_later_writes(
    body: &MethodBody,
    position: usize,
    array: Register,
    from: usize,
) -> Result<()> {
    for (index, instruction) in body.instructions().iter().enumerate().skip(from) {
        if writes_to(instruction, array) {
            return Err(Error::MalformedInitializer {
                position,
                message: format!(
                    "{} writes to {} at instruction {}, outside its populating run",
                    instruction.mnemonic(),
                    array,
                    index
                ),
            });
        }
        if !instruction.flow().falls_through() || instruction.defines(array) {
            break;
        }
    }

    Ok(())
}

/// Largest number of trailing elements an array may declare beyond the ones its
/// population writes.
pub const MAX_UNWRITTEN_ELEMENTS: usize = 0x1_0000;

fn decode_elements(
    body: &MethodBody,
    position: usize,
    declared_length: u32,
    population: &Population,
) -> Result<Vec<ResourceId>> {
    let length = declared_length as usize;

    let written: Vec<(usize, u32)> = match population {
        Population::BulkFill {
            position: fill_position,
            ..
        } => {
            let Some(Instruction::BulkFill { payload, .. }) = body.get(*fill_position) else {
                return Err(Error::Patch(format!(
                    "instruction {} is not a bulk fill",
                    fill_position
                )));
            };
            let Some(values) = payload.as_u32s() else {
                return Err(Error::PayloadWidthMismatch {
                    position: *fill_position,
                    expected: ElementWidth::Four.raw(),
                    actual: payload.width().raw(),
                });
            };
            if values.len() > length {
                return Err(Error::MalformedInitializer {
                    position,
                    message: format!(
                        "payload holds {} elements but the array length is {}",
                        values.len(),
                        length
                    ),
                });
            }
            values.into_iter().enumerate().collect()
        }
        Population::StoreRun { start, len } => {
            let mut stores = Vec::with_capacity(*len);
            for instruction in &body.instructions()[*start..*start + *len] {
                if let Instruction::IndexedStore { index, value, .. } = instruction {
                    if *index as usize >= length {
                        return Err(Error::MalformedInitializer {
                            position,
                            message: format!(
                                "store to index {} of an array of length {}",
                                index, length
                            ),
                        });
                    }
                    stores.push((*index as usize, *value));
                }
            }
            stores
        }
    };

    let extent = written.iter().map(|(index, _)| index + 1).max().unwrap_or(0);
    if length - extent > MAX_UNWRITTEN_ELEMENTS {
        return Err(Error::MalformedInitializer {
            position,
            message: format!(
                "array declares {} elements but writes only the first {}",
                length, extent
            ),
        });
    }

    let mut elements = vec![ResourceId(0); length];
    for (index, value) in written {
        elements[index] = ResourceId(value);
    }

    Ok(elements)
}
