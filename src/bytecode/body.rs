//! Method bodies and class definitions handed to the engine.

use std::fmt;

use crate::bytecode::Instruction;

/// The ordered instruction sequence of one method.
///
/// Static initializers targeted by this crate are compiler-generated and branch-free, so
/// a body is a flat list rather than a graph of basic blocks. Positions are plain
/// indices into the list; every mutation through [`crate::remap::patcher`] may shift
/// them, so positions must not be cached across a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodBody {
    instructions: Vec<Instruction>,
}

impl MethodBody {
    /// Creates an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the body holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the instruction at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Instruction> {
        self.instructions.get(position)
    }

    /// Returns all instructions in order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterates over the instructions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Appends an instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub(crate) fn instructions_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.instructions
    }
}

impl From<Vec<Instruction>> for MethodBody {
    fn from(instructions: Vec<Instruction>) -> Self {
        MethodBody { instructions }
    }
}

impl FromIterator<Instruction> for MethodBody {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        MethodBody {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MethodBody {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl fmt::Display for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{:04}: {}", position, instruction)?;
        }
        Ok(())
    }
}

/// A compiled class as far as this crate is concerned: its name and static initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Descriptor-form name, e.g. `Lcom/example/R$string;`
    pub name: String,
    /// The static initializer, if the class has one
    pub static_initializer: Option<MethodBody>,
}

impl ClassDef {
    /// Creates a class definition.
    #[must_use]
    pub fn new(name: impl Into<String>, static_initializer: Option<MethodBody>) -> Self {
        ClassDef {
            name: name.into(),
            static_initializer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Register;

    #[test]
    fn collect_and_display() {
        let body: MethodBody = vec![
            Instruction::constant(Register(0), 1),
            Instruction::new_array(Register(0), Register(1)),
            Instruction::return_void(),
        ]
        .into_iter()
        .collect();

        assert_eq!(body.len(), 3);
        assert!(!body.is_empty());
        assert_eq!(body.get(2), Some(&Instruction::return_void()));
        assert_eq!(body.get(3), None);
        assert_eq!(
            body.to_string(),
            "0000: const v0, 1\n0001: new-array v1, v0\n0002: return-void\n"
        );
        assert_eq!((&body).into_iter().count(), 3);
    }
}
