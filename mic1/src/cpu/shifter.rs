use num_derive::FromPrimitive;

#[derive(FromPrimitive, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Op {
    None = 0,
    /// Unsigned one-bit right shift.
    Right = 1,
    /// One-bit left shift. Bit 15 falls off, bit 0 is zero-filled.
    Left = 2,
    /// Field value 3 has no shift assigned. Passes through like None.
    Unassigned = 3,
}

impl Default for Op {
    fn default() -> Self {
        Op::None
    }
}

from_u8!(Op);

impl Op {
    pub fn apply(self, value: u16) -> u16 {
        match self {
            Op::Right => value >> 1,
            Op::Left => value << 1,
            Op::None | Op::Unassigned => value,
        }
    }
}
