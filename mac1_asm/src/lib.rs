//! Two-pass assembler and disassembler for the MAC-1 instruction set.

#![warn(clippy::all)]

pub mod codegen;
pub mod decode;
pub mod display;
pub mod error;
pub mod isa;
pub mod parser;

pub use codegen::Assembly;
pub use decode::Instruction;
pub use error::AssemblyError;

#[macro_use]
extern crate log;

/// Assembles MAC-1 source into machine words, ready to load at address 0.
pub fn assemble(source: &str) -> error::Result<Vec<u16>> {
    assemble_listing(source).map(|assembly| assembly.words)
}

/// Like `assemble`, keeping the symbol table and the source line of every word.
pub fn assemble_listing(source: &str) -> error::Result<Assembly> {
    let lines = parser::parse(source)?;
    let assembly = codegen::generate(&lines)?;
    debug!(
        target: "asm",
        "Assembled {} words, {} labels",
        assembly.words.len(),
        assembly.symbols.len()
    );
    Ok(assembly)
}

pub fn disassemble(word: u16) -> Instruction {
    decode::decode(word)
}
