use crate::error::{self, Result};

use super::alu::Flags;
use super::micro_code::{Condition, MicroInstruction, Signals};

pub const CONTROL_STORE_SIZE: usize = 256;

/// OR-ed into the next address field when a conditional branch is taken.
pub const BRANCH_BIT: u8 = 0x80;

/// Control store entry point of each MAC-1 opcode (IR bits 15-12). Entry k is 10 + 10k.
pub const DECODE_TABLE: [u8; 16] = [
    10,  // 0x0 LODD
    20,  // 0x1 STOD
    30,  // 0x2 ADDD
    40,  // 0x3 SUBD
    50,  // 0x4 JPOS
    60,  // 0x5 JZER
    70,  // 0x6 JUMP
    80,  // 0x7 LOCO
    90,  // 0x8 LODL
    100, // 0x9 STOL
    110, // 0xA ADDL
    120, // 0xB SUBL
    130, // 0xC JNEG
    140, // 0xD JNZE
    150, // 0xE CALL
    160, // 0xF stack and extended group
];

/// Sequences microinstructions: owns the control store, the MPC and the MIR.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlUnit {
    store: Vec<MicroInstruction>,
    mpc: u8,
    mir: MicroInstruction,
}

impl Default for ControlUnit {
    fn default() -> ControlUnit {
        ControlUnit {
            store: vec![MicroInstruction::default(); CONTROL_STORE_SIZE],
            mpc: 0,
            mir: MicroInstruction::default(),
        }
    }
}

impl ControlUnit {
    /// Replaces the control store. Words past the end of `firmware` are zeroed.
    pub fn load_firmware(&mut self, firmware: &[u32]) -> Result<()> {
        if firmware.len() > CONTROL_STORE_SIZE {
            return Err(error::Type::FirmwareOverflow {
                len: firmware.len(),
                capacity: CONTROL_STORE_SIZE,
            });
        }
        let words = firmware.iter().chain(std::iter::repeat(&0));
        for (slot, &word) in self.store.iter_mut().zip(words) {
            *slot = MicroInstruction::from(word);
        }
        Ok(())
    }

    pub fn mpc(&self) -> u8 {
        self.mpc
    }

    pub fn mir(&self) -> MicroInstruction {
        self.mir
    }

    /// Word at `address` without touching the MIR.
    pub fn peek(&self, address: u8) -> MicroInstruction {
        self.store[address as usize]
    }

    /// Latches the word addressed by the MPC into the MIR.
    pub fn fetch(&mut self) -> MicroInstruction {
        self.mir = self.store[self.mpc as usize];
        self.mir
    }

    pub fn decode(&self) -> Signals {
        Signals::from(self.mir)
    }

    pub fn next_address(signals: &Signals, flags: Flags, ir: u16) -> u8 {
        let taken = match signals.cond {
            Condition::Decode => return DECODE_TABLE[(ir >> 12) as usize],
            Condition::Negative => flags.n(),
            Condition::Zero => flags.z(),
            Condition::Never => false,
        };
        if taken {
            signals.addr | BRANCH_BIT
        } else {
            signals.addr
        }
    }

    pub fn update_mpc(&mut self, address: u8) {
        trace!(target: "mpc", "MPC {} -> {}", self.mpc, address);
        self.mpc = address;
    }

    /// Clears sequencing state. The control store is kept.
    pub fn reset(&mut self) {
        self.mpc = 0;
        self.mir = MicroInstruction::default();
    }
}
