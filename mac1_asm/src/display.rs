use core::fmt::{Display, Formatter, Result};

use super::codegen::Assembly;
use super::decode::{self, Instruction};

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.mnemonic())?;
        if let Some(operand) = self.operand {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

/// One row per word: address, raw word, labels bound there, and the disassembly.
impl Display for Assembly {
    fn fmt(&self, f: &mut Formatter) -> Result {
        for (address, &word) in self.words.iter().enumerate() {
            let labels: Vec<_> =
                self.labels_at(address).map(|label| format!("{}:", label)).collect();
            writeln!(
                f,
                "{:04X}  {:04X}  {:<12}{}",
                address,
                word,
                labels.join(" "),
                decode::decode(word)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn test_instruction() {
        assert_eq!(disassemble(0x700A).to_string(), "LOCO 10");
        assert_eq!(disassemble(0xFE01).to_string(), "DESP 1");
        assert_eq!(disassemble(0xF800).to_string(), "RETN");
    }

    #[test]
    fn test_listing() {
        let assembly = assemble_listing("START: LOCO 10\nPUSH\nEND: JUMP START").unwrap();
        assert_eq!(
            assembly.to_string(),
            "0000  700A  START:      LOCO 10\n\
             0001  F400              PUSH\n\
             0002  6000  END:        JUMP 0\n"
        );
    }
}
