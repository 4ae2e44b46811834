use crate::isa::{Descriptor, Format, Word, EXTENDED_BASE, INSTRUCTIONS};

/// A decoded machine word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub descriptor: &'static Descriptor,
    pub operand: Option<u16>,
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        self.descriptor.mnemonic
    }

    /// The canonical encoding. Bits the instruction ignores are zero.
    pub fn encode(&self) -> u16 {
        self.descriptor.opcode | self.operand.unwrap_or(0)
    }
}

/// Every 16-bit word decodes. In the 0xF group, bits 11-9 select the instruction and the bits
/// below the operand field are ignored.
pub fn decode(raw: u16) -> Instruction {
    let word = Word(raw);
    let index = match word.opcode() as usize {
        0xF => EXTENDED_BASE + word.sub_opcode() as usize,
        opcode => opcode,
    };
    let descriptor = &INSTRUCTIONS[index];
    let operand = match descriptor.format {
        Format::NoOperand => None,
        Format::Constant => Some(u16::from(word.constant())),
        Format::Memory => Some(word.address()),
    };
    Instruction { descriptor, operand }
}
