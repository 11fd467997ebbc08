//! Instruction-level edit primitives used by the rewriter.
//!
//! Every primitive checks that it is applied to the instruction shape it expects and
//! returns [`Error::Patch`] otherwise; a failed primitive leaves the body unchanged.
//! Positions are instruction indices and are invalidated by [`insert`], [`remove`]
//! and length-changing [`splice_store_run`] calls.

use crate::{
    bytecode::{ArrayPayload, Instruction, MethodBody, Register},
    Error, Result,
};

/// Replaces the literal of the `const` at `position`.
///
/// # Returns
///
/// The previous literal.
///
/// # Errors
///
/// Returns [`Error::Patch`] if `position` is not a `const`.
pub fn set_constant(body: &mut MethodBody, position: usize, value: i64) -> Result<i64> {
    match body.instructions_mut().get_mut(position) {
        Some(Instruction::ConstantLoad { value: literal, .. }) => {
            Ok(std::mem::replace(literal, value))
        }
        other => Err(Error::Patch(format!(
            "expected const at instruction {}, found {}",
            position,
            describe(other.as_deref())
        ))),
    }
}

/// Replaces the payload of the bulk fill at `position`.
///
/// The new payload is installed as-is; it must have been built into its own buffer
/// (see [`ArrayPayload::replace_elements`]) so other holders of the old payload are
/// not affected.
///
/// # Returns
///
/// The previous payload.
///
/// # Errors
///
/// Returns [`Error::Patch`] if `position` is not a bulk fill or the element widths
/// differ.
pub fn replace_payload(
    body: &mut MethodBody,
    position: usize,
    payload: ArrayPayload,
) -> Result<ArrayPayload> {
    match body.instructions_mut().get_mut(position) {
        Some(Instruction::BulkFill {
            payload: current, ..
        }) => {
            if current.width() != payload.width() {
                return Err(Error::Patch(format!(
                    "payload width {} does not match {} at instruction {}",
                    payload.width().bytes(),
                    current.width().bytes(),
                    position
                )));
            }
            Ok(std::mem::replace(current, payload))
        }
        other => Err(Error::Patch(format!(
            "expected fill-array-data at instruction {}, found {}",
            position,
            describe(other.as_deref())
        ))),
    }
}

/// Replaces the `len` stores starting at `start` with one store per `(index, value)`.
///
/// All replaced instructions must be stores into `array`. An empty `stores` slice
/// removes the run.
///
/// # Errors
///
/// Returns [`Error::Patch`] if the range is out of bounds or contains anything other
/// than stores into `array`.
pub fn splice_store_run(
    body: &mut MethodBody,
    start: usize,
    len: usize,
    array: Register,
    stores: &[(u32, u32)],
) -> Result<()> {
    let Some(end) = start.checked_add(len).filter(|end| *end <= body.len()) else {
        return Err(Error::Patch(format!(
            "store run {}..{} exceeds a body of {} instructions",
            start,
            start.saturating_add(len),
            body.len()
        )));
    };

    if let Some((offset, instruction)) = body.instructions()[start..end]
        .iter()
        .enumerate()
        .find(|(_, i)| !matches!(i, Instruction::IndexedStore { array_register, .. } if *array_register == array))
    {
        return Err(Error::Patch(format!(
            "expected aput into {} at instruction {}, found {}",
            array,
            start + offset,
            instruction.mnemonic()
        )));
    }

    body.instructions_mut().splice(
        start..end,
        stores
            .iter()
            .map(|&(index, value)| Instruction::store(array, index, value)),
    );
    Ok(())
}

/// Inserts `instruction` before `position`; `position == len` appends.
///
/// # Errors
///
/// Returns [`Error::Patch`] if `position` is past the end of the body.
pub fn insert(body: &mut MethodBody, position: usize, instruction: Instruction) -> Result<()> {
    if position > body.len() {
        return Err(Error::Patch(format!(
            "cannot insert at {} into a body of {} instructions",
            position,
            body.len()
        )));
    }
    body.instructions_mut().insert(position, instruction);
    Ok(())
}

/// Removes and returns the instruction at `position`.
///
/// # Errors
///
/// Returns [`Error::Patch`] if `position` is out of bounds.
pub fn remove(body: &mut MethodBody, position: usize) -> Result<Instruction> {
    if position >= body.len() {
        return Err(Error::Patch(format!(
            "cannot remove instruction {} from a body of {} instructions",
            position,
            body.len()
        )));
    }
    Ok(body.instructions_mut().remove(position))
}

/// Returns the positions of every instruction that reads the value `register` holds
/// after `definition`.
///
/// The scan ends at the next instruction that writes `register`; an instruction that
/// both reads and writes it is still reported. Control flow does not end the scan,
/// so readers are over-approximated rather than missed.
#[must_use]
pub fn readers_of_definition(body: &MethodBody, definition: usize, register: Register) -> Vec<usize> {
    let mut readers = Vec::new();

    for (position, instruction) in body.iter().enumerate().skip(definition + 1) {
        if instruction.reads(register) {
            readers.push(position);
        }
        if instruction.defines(register) {
            break;
        }
    }

    readers
}

fn describe(instruction: Option<&Instruction>) -> String {
    instruction.map_or_else(|| "end of body".to_string(), |i| i.mnemonic().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bytecode::ElementWidth,
        test::factories::{V0, V1, V2},
    };

    fn body() -> MethodBody {
        MethodBody::from(vec![
            Instruction::constant(V0, 2),
            Instruction::new_array(V0, V1),
            Instruction::store(V1, 0, 0x7f01_0000),
            Instruction::store(V1, 1, 0x7f01_0001),
            Instruction::other("sput-object", &[], &[V1]),
            Instruction::return_void(),
        ])
    }

    #[test]
    fn set_constant_returns_old_literal() {
        let mut body = body();
        assert_eq!(set_constant(&mut body, 0, 5).unwrap(), 2);
        assert_eq!(body.get(0), Some(&Instruction::constant(V0, 5)));

        assert!(matches!(set_constant(&mut body, 1, 5), Err(Error::Patch(_))));
        assert!(matches!(set_constant(&mut body, 99, 5), Err(Error::Patch(_))));
    }

    #[test]
    fn replace_payload_checks_width() {
        let original = ArrayPayload::from_u32s(&[1, 2]);
        let mut body = MethodBody::from(vec![Instruction::fill_array(V1, original.clone())]);

        let narrow = ArrayPayload::from_elements(ElementWidth::Two, &[1]).unwrap();
        assert!(matches!(
            replace_payload(&mut body, 0, narrow),
            Err(Error::Patch(_))
        ));

        let old = replace_payload(&mut body, 0, ArrayPayload::from_u32s(&[3])).unwrap();
        assert!(old.shares_buffer(&original));
        assert_eq!(
            body.get(0),
            Some(&Instruction::fill_array(V1, ArrayPayload::from_u32s(&[3])))
        );
        // the original payload is unchanged
        assert_eq!(original.as_u32s(), Some(vec![1, 2]));
    }

    #[test]
    fn splice_store_run_resizes() {
        let mut body = body();
        splice_store_run(&mut body, 2, 2, V1, &[(0, 0x7f01_0011)]).unwrap();
        assert_eq!(body.len(), 5);
        assert_eq!(body.get(2), Some(&Instruction::store(V1, 0, 0x7f01_0011)));
        assert_eq!(body.get(3).map(Instruction::mnemonic), Some("sput-object"));

        splice_store_run(&mut body, 2, 1, V1, &[]).unwrap();
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn splice_store_run_rejects_foreign_instructions() {
        let mut body = body();
        assert!(matches!(
            splice_store_run(&mut body, 2, 3, V1, &[]),
            Err(Error::Patch(_))
        ));
        assert!(matches!(
            splice_store_run(&mut body, 2, 2, V2, &[]),
            Err(Error::Patch(_))
        ));
        assert!(matches!(
            splice_store_run(&mut body, 5, 4, V1, &[]),
            Err(Error::Patch(_))
        ));
        assert_eq!(body, self::body());
    }

    #[test]
    fn insert_and_remove_bounds() {
        let mut body = body();
        insert(&mut body, 6, Instruction::constant(V2, 1)).unwrap();
        assert_eq!(body.len(), 7);
        assert!(insert(&mut body, 8, Instruction::constant(V2, 1)).is_err());

        assert_eq!(remove(&mut body, 6).unwrap(), Instruction::constant(V2, 1));
        assert!(remove(&mut body, 6).is_err());
    }

    #[test]
    fn readers_stop_at_redefinition() {
        let body = MethodBody::from(vec![
            Instruction::constant(V0, 1),
            Instruction::new_array(V0, V1),
            Instruction::new_array(V0, V2),
            Instruction::constant(V0, 4),
            Instruction::new_array(V0, V1),
        ]);
        assert_eq!(readers_of_definition(&body, 0, V0), vec![1, 2]);
        assert_eq!(readers_of_definition(&body, 3, V0), vec![4]);
    }

    #[test]
    fn reader_that_redefines_is_reported() {
        let body = MethodBody::from(vec![
            Instruction::constant(V0, 1),
            Instruction::new_array(V0, V0),
            Instruction::new_array(V0, V1),
        ]);
        assert_eq!(readers_of_definition(&body, 0, V0), vec![1]);
    }
}
