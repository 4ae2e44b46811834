use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// A word address outside of main memory.
    InvalidAddress { address: usize, size: usize },
    /// A program that does not fit in main memory when loaded at `start`.
    ProgramTooLarge { start: usize, len: usize, size: usize },
    /// A register name that is not part of the MIC-1 register file.
    UnknownRegister(String),
    /// A microprogram with more words than the control store holds.
    FirmwareOverflow { len: usize, capacity: usize },
    /// A cache fill whose length differs from the configured block size.
    InvalidBlock { expected: usize, actual: usize },
    InvalidConfig(String),
}

pub type Result<T> = core::result::Result<T, Type>;

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Type::*;
        match self {
            InvalidAddress { address, size } => write!(
                f,
                "memory address {:#06X} is out of bounds (memory holds {} words)",
                address, size
            ),
            ProgramTooLarge { start, len, size } => write!(
                f,
                "program of {} words loaded at {:#06X} exceeds memory of {} words",
                len, start, size
            ),
            UnknownRegister(name) => write!(f, "register {} does not exist", name),
            FirmwareOverflow { len, capacity } => write!(
                f,
                "microprogram of {} words exceeds the {} word control store",
                len, capacity
            ),
            InvalidBlock { expected, actual } => write!(
                f,
                "cache block has {} words, expected {}",
                actual, expected
            ),
            InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for Type {}
