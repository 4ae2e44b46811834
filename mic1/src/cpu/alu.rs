use bitflags::bitflags;
use num_derive::FromPrimitive;

use crate::util;

bitflags! {
    #[derive(Default)]
    #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
    pub struct Flags: u8 {
        const ZERO = 0b01;
        const NEGATIVE = 0b10;
    }
}

impl Flags {
    /// Flags are a pure function of the result.
    pub fn from_result(result: u16) -> Flags {
        let mut flags = Flags::empty();
        flags.set(Flags::ZERO, result == 0);
        flags.set(Flags::NEGATIVE, util::is_bit_set(result, 15));
        flags
    }

    pub fn n(self) -> bool {
        self.contains(Flags::NEGATIVE)
    }

    pub fn z(self) -> bool {
        self.contains(Flags::ZERO)
    }
}

/// The four operations selectable by the 2-bit ALU field.
#[derive(FromPrimitive, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Op {
    Add = 0,
    And = 1,
    /// Passes A through. B is ignored.
    Identity = 2,
    /// Complements A. B is ignored.
    Not = 3,
}

impl Default for Op {
    fn default() -> Self {
        Op::Add
    }
}

from_u8!(Op);

impl Op {
    pub fn execute(self, a: u16, b: u16) -> (u16, Flags) {
        use Op::*;
        let result = match self {
            Add => a.wrapping_add(b),
            And => a & b,
            Identity => a,
            Not => !a,
        };
        (result, Flags::from_result(result))
    }
}
