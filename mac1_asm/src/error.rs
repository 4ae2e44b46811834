use std::fmt::{self, Display, Formatter};

/// Why a line failed to assemble.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    UnknownMnemonic(String),
    MissingOperand(&'static str),
    UnexpectedOperand(&'static str),
    /// Text after the single operand.
    ExtraOperand(String),
    InvalidLabel(String),
    DuplicateLabel(String),
    UnresolvedSymbol(String),
    MalformedLiteral(String),
    OutOfRange { value: i64, max: u16 },
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Type::*;
        match self {
            UnknownMnemonic(mnemonic) => write!(f, "unknown instruction '{}'", mnemonic),
            MissingOperand(mnemonic) => write!(f, "'{}' requires an operand", mnemonic),
            UnexpectedOperand(mnemonic) => write!(f, "'{}' takes no operand", mnemonic),
            ExtraOperand(text) => write!(f, "unexpected '{}' after the operand", text),
            InvalidLabel(label) => write!(f, "'{}' is not a valid label", label),
            DuplicateLabel(label) => write!(f, "label '{}' is already defined", label),
            UnresolvedSymbol(symbol) => write!(f, "undefined label '{}'", symbol),
            MalformedLiteral(text) => write!(f, "'{}' is not a number", text),
            OutOfRange { value, max } => {
                write!(f, "operand {} is out of range (0-{})", value, max)
            }
        }
    }
}

/// An assembly failure, tagged with the 1-based source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyError {
    pub line: usize,
    pub kind: Type,
}

impl AssemblyError {
    pub fn new(line: usize, kind: Type) -> AssemblyError {
        AssemblyError { line, kind }
    }
}

impl Display for AssemblyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for AssemblyError {}

pub type Result<T> = core::result::Result<T, AssemblyError>;
