use std::collections::BTreeMap;
use std::str::FromStr;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error;
use crate::util;

/// The storage registers of the MIC-1 datapath. The discriminant doubles as the register's
/// address on buses A, B and C.
#[derive(FromPrimitive, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Register {
    MAR,
    MBR,
    PC,
    SP,
    AC,
    IR,
    TIR,
}

pub const NUM_REGISTERS: usize = Register::TIR as usize + 1;

// Bus addresses past the register file. They are wired to constants and only drive bus B.
pub const BUS_ZERO: u8 = 7;
pub const BUS_ONE: u8 = 8;
pub const BUS_MINUS_ONE: u8 = 9;
pub const BUS_AMASK: u8 = 10;
pub const BUS_SMASK: u8 = 11;

pub const AMASK: u16 = 0x0FFF;
pub const SMASK: u16 = 0x00FF;

impl Register {
    pub const ALL: [Register; NUM_REGISTERS] = [
        Register::MAR,
        Register::MBR,
        Register::PC,
        Register::SP,
        Register::AC,
        Register::IR,
        Register::TIR,
    ];

    pub fn name(self) -> &'static str {
        use Register::*;
        match self {
            MAR => "MAR",
            MBR => "MBR",
            PC => "PC",
            SP => "SP",
            AC => "AC",
            IR => "IR",
            TIR => "TIR",
        }
    }

    /// The register wired to a 4-bit bus address, if any.
    pub fn from_bus_address(address: u8) -> Option<Register> {
        Register::from_u8(address)
    }
}

impl FromStr for Register {
    type Err = error::Type;

    fn from_str(name: &str) -> error::Result<Register> {
        Register::ALL
            .iter()
            .copied()
            .find(|register| register.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| error::Type::UnknownRegister(name.into()))
    }
}

/// What a bus address field selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    Register(Register),
    Constant(u16),
    Unmapped,
}

impl Selector {
    pub fn from_bus_address(address: u8) -> Selector {
        if let Some(register) = Register::from_bus_address(address) {
            return Selector::Register(register);
        }
        match address {
            BUS_ZERO => Selector::Constant(0),
            BUS_ONE => Selector::Constant(1),
            BUS_MINUS_ONE => Selector::Constant(0xFFFF),
            BUS_AMASK => Selector::Constant(AMASK),
            BUS_SMASK => Selector::Constant(SMASK),
            _ => Selector::Unmapped,
        }
    }
}

/// The MIC-1 register file. Every write is truncated to 16 bits.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct File([u16; NUM_REGISTERS]);

impl File {
    pub fn get(&self, register: Register) -> u16 {
        self.0[register as usize]
    }

    /// Stores the low 16 bits of `value`. Overflow is silently discarded.
    pub fn set(&mut self, register: Register, value: i32) {
        self.0[register as usize] = util::mask_16bit(value);
    }

    pub fn clear(&mut self) {
        self.0 = [0; NUM_REGISTERS];
    }

    pub fn snapshot(&self) -> BTreeMap<&'static str, u16> {
        Register::ALL.iter().map(|&register| (register.name(), self.get(register))).collect()
    }
}

impl core::fmt::Debug for File {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        writeln!(f)?;
        for &register in Register::ALL.iter() {
            writeln!(f, "{:>10}: {:04X}", register.name(), self.get(register))?;
        }
        Ok(())
    }
}
