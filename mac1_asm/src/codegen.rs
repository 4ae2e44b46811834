use std::collections::BTreeMap;

use crate::error::{AssemblyError, Result, Type};
use crate::isa::{Descriptor, Format, Word};
use crate::parser::{self, ParsedLine};

/// The output of a successful assembly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assembly {
    pub words: Vec<u16>,
    /// Label -> address.
    pub symbols: BTreeMap<String, usize>,
    /// Source line of each word.
    pub lines: Vec<usize>,
}

impl Assembly {
    /// Labels bound to `address`, in name order.
    pub fn labels_at(&self, address: usize) -> impl Iterator<Item = &str> {
        self.symbols
            .iter()
            .filter(move |&(_, &bound)| bound == address)
            .map(|(label, _)| label.as_str())
    }
}

/// Two-pass code generation: labels are bound first, so operands may refer forward.
pub fn generate(lines: &[ParsedLine]) -> Result<Assembly> {
    let symbols = build_symbol_table(lines)?;
    let mut assembly = Assembly { symbols, ..Default::default() };
    for line in lines {
        if let Some(descriptor) = line.instruction {
            let word = encode(line, descriptor, &assembly.symbols)?;
            assembly.words.push(word);
            assembly.lines.push(line.line);
        }
    }
    Ok(assembly)
}

/// Pass 1.
fn build_symbol_table(lines: &[ParsedLine]) -> Result<BTreeMap<String, usize>> {
    let mut symbols = BTreeMap::new();
    let mut address = 0;
    for line in lines {
        if let Some(label) = &line.label {
            if symbols.contains_key(label) {
                return Err(AssemblyError::new(line.line, Type::DuplicateLabel(label.clone())));
            }
            trace!(target: "asm", "{} = {:#05X}", label, address);
            symbols.insert(label.clone(), address);
        }
        if line.instruction.is_some() {
            address += 1;
        }
    }
    Ok(symbols)
}

/// Pass 2 for a single instruction.
fn encode(
    line: &ParsedLine,
    descriptor: &Descriptor,
    symbols: &BTreeMap<String, usize>,
) -> Result<u16> {
    let error = |kind| AssemblyError::new(line.line, kind);
    let mut word = Word(descriptor.opcode);
    let operand = line.operand.as_deref().unwrap_or_default();
    match descriptor.format {
        Format::NoOperand => {}
        Format::Constant => {
            let value = parse_literal(operand).map_err(error)?;
            let value = check_range(value, Format::Constant).map_err(error)?;
            word.set_constant(value as u8);
        }
        Format::Memory => {
            let value = match symbols.get(operand) {
                Some(&address) => address as i64,
                None => parse_literal(operand).map_err(|kind| match kind {
                    // A name that could never be a literal is a missing label.
                    Type::MalformedLiteral(_) if is_symbol_name(operand) => {
                        error(Type::UnresolvedSymbol(operand.into()))
                    }
                    kind => error(kind),
                })?,
            };
            let value = check_range(value, Format::Memory).map_err(error)?;
            word.set_address(value);
        }
    }
    Ok(word.0)
}

fn is_symbol_name(operand: &str) -> bool {
    parser::is_label(operand) && !operand.starts_with(|c: char| c.is_ascii_digit())
}

fn check_range(value: i64, format: Format) -> core::result::Result<u16, Type> {
    let max = format.operand_max().unwrap_or(0);
    if value >= 0 && value <= i64::from(max) {
        Ok(value as u16)
    } else {
        Err(Type::OutOfRange { value, max })
    }
}

/// Decimal or `0x` hexadecimal, with an optional minus sign.
pub fn parse_literal(text: &str) -> core::result::Result<i64, Type> {
    let malformed = || Type::MalformedLiteral(text.into());
    let (negative, digits) = match text.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, text),
    };
    // from_str_radix accepts its own sign, which must not follow ours.
    if digits.starts_with('+') || digits.starts_with('-') {
        return Err(malformed());
    }
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|_| malformed())?;
    Ok(if negative { -magnitude } else { magnitude })
}
