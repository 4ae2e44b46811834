use bitfield::bitfield;

/// How an instruction packs its operand into the machine word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// The opcode is the whole word.
    NoOperand,
    /// 8-bit opcode, 8-bit constant.
    Constant,
    /// 4-bit opcode, 12-bit address.
    Memory,
}

impl Format {
    /// Largest operand the format can encode.
    pub fn operand_max(self) -> Option<u16> {
        match self {
            Format::NoOperand => None,
            Format::Constant => Some(0x00FF),
            Format::Memory => Some(0x0FFF),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Descriptor {
    pub mnemonic: &'static str,
    pub opcode: u16,
    pub format: Format,
}

const fn memory(mnemonic: &'static str, opcode: u16) -> Descriptor {
    Descriptor { mnemonic, opcode, format: Format::Memory }
}

const fn no_operand(mnemonic: &'static str, opcode: u16) -> Descriptor {
    Descriptor { mnemonic, opcode, format: Format::NoOperand }
}

const fn constant(mnemonic: &'static str, opcode: u16) -> Descriptor {
    Descriptor { mnemonic, opcode, format: Format::Constant }
}

/// The MAC-1 instruction set. The first 15 entries are indexed by the top nibble of the word,
/// the remaining 8 by bits 11-9 of the 0xF group.
pub static INSTRUCTIONS: [Descriptor; 23] = [
    memory("LODD", 0x0000),
    memory("STOD", 0x1000),
    memory("ADDD", 0x2000),
    memory("SUBD", 0x3000),
    memory("JPOS", 0x4000),
    memory("JZER", 0x5000),
    memory("JUMP", 0x6000),
    memory("LOCO", 0x7000),
    memory("LODL", 0x8000),
    memory("STOL", 0x9000),
    memory("ADDL", 0xA000),
    memory("SUBL", 0xB000),
    memory("JNEG", 0xC000),
    memory("JNZE", 0xD000),
    memory("CALL", 0xE000),
    no_operand("PSHI", 0xF000),
    no_operand("POPI", 0xF200),
    no_operand("PUSH", 0xF400),
    no_operand("POP", 0xF600),
    no_operand("RETN", 0xF800),
    no_operand("SWAP", 0xFA00),
    constant("INSP", 0xFC00),
    constant("DESP", 0xFE00),
];

/// First index of the 0xF group in `INSTRUCTIONS`.
pub const EXTENDED_BASE: usize = 15;

/// Finds the descriptor of an upper-case mnemonic.
pub fn lookup(mnemonic: &str) -> Option<&'static Descriptor> {
    INSTRUCTIONS.iter().find(|descriptor| descriptor.mnemonic == mnemonic)
}

bitfield! {
    /// One 16-bit MAC-1 machine word.
    #[derive(Copy, Clone, Default, PartialEq, Eq)]
    pub struct Word(u16);
    impl Debug;
    u16;
    pub opcode, _: 15, 12;
    pub address, set_address: 11, 0;
    pub sub_opcode, _: 11, 9;
    pub u8, constant, set_constant: 7, 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order() {
        for (index, descriptor) in INSTRUCTIONS.iter().enumerate().take(EXTENDED_BASE) {
            assert_eq!(descriptor.opcode >> 12, index as u16);
            assert_eq!(descriptor.format, Format::Memory);
        }
        for (index, descriptor) in INSTRUCTIONS.iter().enumerate().skip(EXTENDED_BASE) {
            assert_eq!(Word(descriptor.opcode).opcode(), 0xF);
            assert_eq!(Word(descriptor.opcode).sub_opcode() as usize, index - EXTENDED_BASE);
        }
    }

    #[test]
    fn test_opcode_clear_of_operand() {
        for descriptor in INSTRUCTIONS.iter() {
            if let Some(max) = descriptor.format.operand_max() {
                assert_eq!(descriptor.opcode & max, 0, "{}", descriptor.mnemonic);
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("LOCO").map(|d| d.opcode), Some(0x7000));
        assert_eq!(lookup("DESP").map(|d| d.format), Some(Format::Constant));
        assert!(lookup("loco").is_none());
        assert!(lookup("HALT").is_none());
    }

    #[test]
    fn test_word_fields() {
        let mut word = Word(0x6000);
        word.set_address(0x0ABC);
        assert_eq!(word.0, 0x6ABC);
        assert_eq!(word.opcode(), 0x6);

        let mut word = Word(0xFE00);
        word.set_constant(0x42);
        assert_eq!(word.0, 0xFE42);
        assert_eq!(word.sub_opcode(), 0b111);
    }
}
